//! Page slicing for question listings.
//!
//! # Invariants
//! - A page never holds more than `page_size` items.
//! - Concatenating pages `1..=n` reproduces the input order.
//! - Pages past the end, page numbers below 1, and a zero page size all
//!   yield an empty page.

/// Questions per page when the caller does not configure one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page used when the request does not carry a usable one.
pub const FIRST_PAGE: i64 = 1;

/// Returns the items at positions `[(page-1)*page_size, page*page_size)`.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: usize) -> Vec<T> {
    let Some(start) = page_start(page, page_size) else {
        return Vec::new();
    };
    items.into_iter().skip(start).take(page_size).collect()
}

/// Parses a raw `page` query value, falling back to [`FIRST_PAGE`] when the
/// value is absent or not an integer.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(FIRST_PAGE)
}

fn page_start(page: i64, page_size: usize) -> Option<usize> {
    if page < 1 || page_size == 0 {
        return None;
    }
    let index = usize::try_from(page - 1).ok()?;
    // Overflow means the page starts beyond any in-memory listing.
    Some(index.checked_mul(page_size).unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::{paginate, parse_page, DEFAULT_PAGE_SIZE};

    #[test]
    fn pages_are_bounded_and_reassemble_in_order() {
        let items: Vec<u32> = (1..=23).collect();
        let mut rebuilt = Vec::new();
        for page in 1..=3 {
            let chunk = paginate(items.clone(), page, DEFAULT_PAGE_SIZE);
            assert!(chunk.len() <= DEFAULT_PAGE_SIZE);
            rebuilt.extend(chunk);
        }
        assert_eq!(rebuilt, items);
        assert_eq!(paginate(items.clone(), 3, DEFAULT_PAGE_SIZE), vec![21, 22, 23]);
    }

    #[test]
    fn page_beyond_data_is_empty() {
        let items: Vec<u32> = (1..=10).collect();
        assert!(paginate(items.clone(), 2, 10).is_empty());
        assert!(paginate(items, 1000, 10).is_empty());
        assert!(paginate(Vec::<u32>::new(), 1, 10).is_empty());
    }

    #[test]
    fn non_positive_page_and_zero_size_are_empty() {
        let items: Vec<u32> = (1..=5).collect();
        assert!(paginate(items.clone(), 0, 10).is_empty());
        assert!(paginate(items.clone(), -3, 10).is_empty());
        assert!(paginate(items, 1, 0).is_empty());
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let items: Vec<u32> = (1..=5).collect();
        assert!(paginate(items, i64::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn parse_page_defaults_to_first_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some(" 3 ")), 3);
        assert_eq!(parse_page(Some("-2")), -2);
    }
}

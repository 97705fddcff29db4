//! Category domain model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable category identifier.
pub type CategoryId = i64;

/// Pseudo-category meaning "no category filter" in quiz selection.
pub const ALL_CATEGORIES: CategoryId = 0;

/// Named grouping of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Display label. Serialized as `type` to match the wire schema.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Category {
    pub fn new(id: CategoryId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }
}

/// Ordered `id -> type` lookup, the shape clients render category menus from.
pub type CategoryMap = BTreeMap<CategoryId, String>;

/// Collapses a category list into its id-keyed display map.
pub fn category_map(categories: impl IntoIterator<Item = Category>) -> CategoryMap {
    categories
        .into_iter()
        .map(|category| (category.id, category.kind))
        .collect()
}

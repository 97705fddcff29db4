//! Category repository contract and SQLite implementation.
//!
//! Categories are read-only for the trivia service; insert/delete exist for
//! seeding and maintenance tooling.

use crate::model::category::{Category, CategoryId};
use crate::repo::ensure_connection_ready;
use crate::repo::question_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for category storage.
pub trait CategoryRepository {
    /// Inserts a category under its caller-chosen id.
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Lists every category ordered by id ascending.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Deletes one category. Fails while questions still reference it.
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        self.conn.execute(
            "INSERT INTO categories (id, type) VALUES (?1, ?2);",
            params![category.id, category.kind.as_str()],
        )?;
        Ok(category.id)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, type FROM categories WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_category_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, type FROM categories ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }
        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id: CategoryId = row.get("id")?;
    let kind: String = row.get("type")?;
    if kind.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank type for category {id}"
        )));
    }
    Ok(Category { id, kind })
}

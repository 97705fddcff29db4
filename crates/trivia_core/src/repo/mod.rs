//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the storage operations the trivia service depends on.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - List operations return rows ordered by identifier ascending.
//! - Deleting a missing row is `NotFound`, never a silent no-op.

pub mod category_repo;
pub mod question_repo;

use crate::db::migrations::latest_version;
use question_repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Rejects connections that were not opened through `crate::db`.
fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected = latest_version();
    if found != expected {
        return Err(RepoError::SchemaNotReady { found, expected });
    }
    Ok(())
}

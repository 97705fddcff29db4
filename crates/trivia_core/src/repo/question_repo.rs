//! Question repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/filter/get/insert/delete over the `questions` table.
//! - Decode rows into validated [`Question`] values.
//!
//! # Invariants
//! - Writes call `NewQuestion::validate()` before touching SQL.
//! - Reads reject rows that violate model invariants instead of masking them.
//! - Listing order is `id ASC`.
//! - Exclusion sets are applied in memory; their size never reaches SQL.

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::question::{
    NewQuestion, Question, QuestionId, QuestionValidationError, MAX_DIFFICULTY, MIN_DIFFICULTY,
};
use crate::repo::ensure_connection_ready;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const QUESTION_SELECT_SQL: &str = "SELECT id, question, answer, category, difficulty FROM questions";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by question and category persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(QuestionValidationError),
    Db(DbError),
    QuestionNotFound(QuestionId),
    CategoryNotFound(CategoryId),
    InvalidData(String),
    /// Connection schema is not at the version this binary expects.
    SchemaNotReady { found: u32, expected: u32 },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::QuestionNotFound(id) => write!(f, "question not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted trivia data: {message}"),
            Self::SchemaNotReady { found, expected } => write!(
                f,
                "connection schema version {found} does not match expected {expected}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QuestionValidationError> for RepoError {
    fn from(value: QuestionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter options for listing questions.
///
/// An empty query lists every question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionListQuery {
    /// Restricts results to one category.
    pub category: Option<CategoryId>,
    /// Ids to leave out of the result.
    pub exclude_ids: BTreeSet<QuestionId>,
}

impl QuestionListQuery {
    pub fn in_category(category: CategoryId) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }
}

/// Repository interface for question storage.
pub trait QuestionRepository {
    /// Inserts a question and returns it with its assigned id.
    fn create_question(&self, question: &NewQuestion) -> RepoResult<Question>;
    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>>;
    /// Lists questions matching `query`, ordered by id ascending.
    fn list_questions(&self, query: &QuestionListQuery) -> RepoResult<Vec<Question>>;
    fn count_questions(&self) -> RepoResult<u64>;
    /// Hard-deletes one question. Missing ids are `QuestionNotFound`.
    fn delete_question(&self, id: QuestionId) -> RepoResult<()>;
}

/// SQLite-backed question repository.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    /// Wraps a connection opened through `crate::db`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn create_question(&self, question: &NewQuestion) -> RepoResult<Question> {
        question.validate()?;

        self.conn.execute(
            "INSERT INTO questions (question, answer, category, difficulty)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                question.question.as_str(),
                question.answer.as_str(),
                question.category,
                question.difficulty,
            ],
        )?;

        Ok(question.clone().into_question(self.conn.last_insert_rowid()))
    }

    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUESTION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_question_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_questions(&self, query: &QuestionListQuery) -> RepoResult<Vec<Question>> {
        let mut sql = format!("{QUESTION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Integer(category));
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next()? {
            let question = parse_question_row(row)?;
            if !query.exclude_ids.contains(&question.id) {
                questions.push(question);
            }
        }

        Ok(questions)
    }

    fn count_questions(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM questions;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative question count `{count}`")))
    }

    fn delete_question(&self, id: QuestionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM questions WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::QuestionNotFound(id));
        }
        Ok(())
    }
}

fn parse_question_row(row: &Row<'_>) -> RepoResult<Question> {
    let id: QuestionId = row.get("id")?;
    let difficulty: i64 = row.get("difficulty")?;
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        return Err(RepoError::InvalidData(format!(
            "invalid difficulty `{difficulty}` for question {id}"
        )));
    }

    Ok(Question {
        id,
        question: row.get("question")?,
        answer: row.get("answer")?,
        category: row.get("category")?,
        difficulty,
    })
}

//! Question domain model.
//!
//! # Invariants
//! - `id` is assigned on insert and immutable afterwards.
//! - `difficulty` stays within [`MIN_DIFFICULTY`]..=[`MAX_DIFFICULTY`].
//! - `question` and `answer` are never blank.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable question identifier.
pub type QuestionId = i64;

pub const MIN_DIFFICULTY: i64 = 1;
pub const MAX_DIFFICULTY: i64 = 5;

/// Persisted trivia item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub category: Option<CategoryId>,
    pub difficulty: i64,
}

impl Question {
    /// Case-insensitive substring match against the question text.
    ///
    /// `term` is expected to be lowercased already so a search over many
    /// questions lowercases it once.
    pub fn text_contains_lowercase(&self, term: &str) -> bool {
        self.question.to_lowercase().contains(term)
    }
}

/// Question payload before storage assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: Option<CategoryId>,
    pub difficulty: i64,
}

/// Field-level rejection of a [`NewQuestion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionValidationError {
    Blank { field: &'static str },
    MissingCategory,
    DifficultyOutOfRange { value: i64 },
}

impl QuestionValidationError {
    /// Wire name of the rejected field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } => *field,
            Self::MissingCategory => "category",
            Self::DifficultyOutOfRange { .. } => "difficulty",
        }
    }
}

impl Display for QuestionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "`{field}` must not be blank"),
            Self::MissingCategory => write!(f, "`category` is required"),
            Self::DifficultyOutOfRange { value } => write!(
                f,
                "`difficulty` must be between {MIN_DIFFICULTY} and {MAX_DIFFICULTY}, got {value}"
            ),
        }
    }
}

impl Error for QuestionValidationError {}

impl NewQuestion {
    /// Checks field-level invariants. Category existence is left to storage.
    pub fn validate(&self) -> Result<(), QuestionValidationError> {
        if self.question.trim().is_empty() {
            return Err(QuestionValidationError::Blank { field: "question" });
        }
        if self.answer.trim().is_empty() {
            return Err(QuestionValidationError::Blank { field: "answer" });
        }
        if self.category.is_none() {
            return Err(QuestionValidationError::MissingCategory);
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(QuestionValidationError::DifficultyOutOfRange {
                value: self.difficulty,
            });
        }
        Ok(())
    }

    /// Attaches the storage-assigned id.
    pub fn into_question(self, id: QuestionId) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

//! Service-level error type and its boundary classification.
//!
//! # Invariants
//! - Every failure maps to exactly one [`ErrorKind`].
//! - Validation and storage failures stay distinguishable in-process and only
//!   collapse to `Unprocessable` through [`TriviaError::kind`].

use crate::model::category::CategoryId;
use crate::model::question::QuestionId;
use crate::repo::question_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TriviaResult<T> = Result<T, TriviaError>;

/// Coarse failure class exposed to callers outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input could not be parsed at all.
    BadRequest,
    /// Requested entity or a result set expected to be non-empty is absent.
    NotFound,
    /// Input is semantically invalid or the operation could not complete.
    Unprocessable,
}

/// What a `NotFound` failure was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Question(QuestionId),
    Categories,
    QuestionPage { page: i64 },
    CategoryPage { category: CategoryId, page: i64 },
}

impl Display for Missing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Question(id) => write!(f, "question {id}"),
            Self::Categories => write!(f, "categories"),
            Self::QuestionPage { page } => write!(f, "questions page {page}"),
            Self::CategoryPage { category, page } => {
                write!(f, "questions page {page} of category {category}")
            }
        }
    }
}

/// Failure of a trivia service operation.
#[derive(Debug)]
pub enum TriviaError {
    NotFound(Missing),
    /// A required field is absent, empty or outside its allowed range.
    Validation { field: &'static str, reason: String },
    /// Storage rejected or failed the operation.
    Storage(RepoError),
    /// Request payload is syntactically malformed.
    BadRequest(String),
}

impl TriviaError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::Validation {
            field,
            reason: "field is required".to_string(),
        }
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Boundary classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation { .. } | Self::Storage(_) => ErrorKind::Unprocessable,
            Self::BadRequest(_) => ErrorKind::BadRequest,
        }
    }
}

impl Display for TriviaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(missing) => write!(f, "not found: {missing}"),
            Self::Validation { field, reason } => write!(f, "invalid `{field}`: {reason}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
        }
    }
}

impl Error for TriviaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TriviaError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::QuestionNotFound(id) => Self::NotFound(Missing::Question(id)),
            RepoError::Validation(err) => Self::invalid_field(err.field(), err.to_string()),
            other => Self::Storage(other),
        }
    }
}

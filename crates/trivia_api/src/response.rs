//! Response envelope and wire payload shapes.
//!
//! # Invariants
//! - Every body carries `success`.
//! - Error bodies are `{success: false, error: <status>, message}`.

use crate::config::CorsPolicy;
use serde::Serialize;
use serde_json::{json, Value};
use trivia_core::{CategoryId, CategoryMap, ErrorKind, Question, QuestionId};

/// Status, headers and JSON body of one response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl ApiResponse {
    /// `200 OK` with `payload` serialized as the body.
    pub fn ok(payload: &impl Serialize) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self::with_status(200, body),
            Err(_) => Self::error(ErrorKind::Unprocessable),
        }
    }

    /// Uniform error envelope for `kind`.
    pub fn error(kind: ErrorKind) -> Self {
        let status = status_code(kind);
        Self::with_status(
            status,
            json!({
                "success": false,
                "error": status,
                "message": error_message(kind),
            }),
        )
    }

    fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    pub fn with_cors(mut self, cors: &CorsPolicy) -> Self {
        self.headers.extend(
            cors.headers()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value)),
        );
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub fn status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::BadRequest => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::Unprocessable => 422,
    }
}

fn error_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::BadRequest => "bad request",
        ErrorKind::NotFound => "resource not found",
        ErrorKind::Unprocessable => "unprocessable",
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesPayload<'a> {
    pub success: bool,
    pub categories: &'a CategoryMap,
}

#[derive(Debug, Serialize)]
pub struct QuestionsPayload<'a> {
    pub success: bool,
    pub questions: &'a [Question],
    pub total_questions: u64,
    pub categories: &'a CategoryMap,
    pub current_category: Option<CategoryId>,
}

#[derive(Debug, Serialize)]
pub struct DeletedPayload<'a> {
    pub success: bool,
    pub question_id: QuestionId,
    pub current_questions: &'a [Question],
    pub total_questions: u64,
}

#[derive(Debug, Serialize)]
pub struct CreatedPayload<'a> {
    pub success: bool,
    pub created: QuestionId,
    pub current_questions: &'a [Question],
    pub total_questions: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchPayload<'a> {
    pub success: bool,
    pub questions: &'a [Question],
    pub total_questions: u64,
    pub current_category: Option<CategoryId>,
}

#[derive(Debug, Serialize)]
pub struct CategoryQuestionsPayload<'a> {
    pub success: bool,
    pub questions: &'a [Question],
    pub current_category: CategoryId,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct QuizPayload<'a> {
    pub success: bool,
    pub question: Option<&'a Question>,
}

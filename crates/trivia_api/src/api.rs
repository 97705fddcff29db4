//! JSON boundary over the trivia service.
//!
//! # Responsibility
//! - Match request paths onto trivia operations.
//! - Decode request bodies and query parameters into service inputs.
//! - Encode results and errors into the wire envelopes.
//!
//! # Invariants
//! - Never panics; every failure becomes a 400/404/422 envelope.
//! - Every response carries the configured CORS headers.
//! - One service is built per request; nothing is cached between requests.

use crate::config::TriviaConfig;
use crate::request::{ApiRequest, Method};
use crate::response::{
    ApiResponse, CategoriesPayload, CategoryQuestionsPayload, CreatedPayload, DeletedPayload,
    QuestionsPayload, QuizPayload, SearchPayload,
};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;
use trivia_core::db::open_db;
use trivia_core::{
    parse_page, CategoryId, ErrorKind, NewQuestion, QuestionId, QuizRound,
    SqliteCategoryRepository, SqliteQuestionRepository, TriviaError, TriviaResult, TriviaService,
};

static QUESTION_ID_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/questions/(\d+)$").expect("valid question path regex"));
static CATEGORY_QUESTIONS_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/categories/(\d+)/questions$").expect("valid category path regex")
});

type SqliteTriviaService<'conn> =
    TriviaService<SqliteQuestionRepository<'conn>, SqliteCategoryRepository<'conn>>;

/// Known route shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Categories,
    Questions,
    QuestionSearch,
    Question(QuestionId),
    CategoryQuestions(CategoryId),
    Quizzes,
}

impl Route {
    fn resolve(path: &str) -> Option<Self> {
        match path {
            "/categories" => return Some(Self::Categories),
            "/questions" => return Some(Self::Questions),
            "/questions/search" => return Some(Self::QuestionSearch),
            "/quizzes" => return Some(Self::Quizzes),
            _ => {}
        }
        if let Some(id) = capture_id(&QUESTION_ID_PATH_RE, path) {
            return Some(Self::Question(id));
        }
        capture_id(&CATEGORY_QUESTIONS_PATH_RE, path).map(Self::CategoryQuestions)
    }
}

/// Accepts either `4` or `"4"` where clients disagree on number encoding.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Text(String),
}

impl IntOrText {
    fn to_int(&self, field: &'static str) -> TriviaResult<i64> {
        match self {
            Self::Int(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| TriviaError::invalid_field(field, "expected an integer")),
        }
    }

    /// Text form used where a number is searched as plain text.
    fn into_text(self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Text(text) => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateQuestionBody {
    question: Option<String>,
    answer: Option<String>,
    category: Option<IntOrText>,
    difficulty: Option<IntOrText>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<IntOrText>,
}

#[derive(Debug, Deserialize)]
struct QuizCategoryBody {
    id: Option<IntOrText>,
}

#[derive(Debug, Deserialize)]
struct QuizBody {
    quiz_category: Option<QuizCategoryBody>,
    previous_questions: Option<Vec<QuestionId>>,
}

/// Opens the configured database and serves one request.
///
/// A database that cannot be opened is reported as `422`.
pub fn handle(config: &TriviaConfig, request: &ApiRequest) -> ApiResponse {
    match open_db(&config.db_path) {
        Ok(conn) => dispatch(&conn, config, request),
        Err(err) => {
            warn!(
                "event=api_request module=api status=error method={} path={} error_code=db_open_failed error={err}",
                request.method, request.path
            );
            ApiResponse::error(ErrorKind::Unprocessable).with_cors(&config.cors)
        }
    }
}

/// Serves one request against an already-open connection.
pub fn dispatch(conn: &Connection, config: &TriviaConfig, request: &ApiRequest) -> ApiResponse {
    let started_at = Instant::now();
    let response = match route(conn, config, request) {
        Ok(response) => response,
        Err(err) => {
            if err.kind() == ErrorKind::Unprocessable {
                warn!(
                    "event=api_request module=api status=rejected method={} path={} error={err}",
                    request.method, request.path
                );
            }
            ApiResponse::error(err.kind())
        }
    };

    info!(
        "event=api_request module=api status={} method={} path={} duration_ms={}",
        response.status,
        request.method,
        request.path,
        started_at.elapsed().as_millis()
    );
    response.with_cors(&config.cors)
}

fn route(
    conn: &Connection,
    config: &TriviaConfig,
    request: &ApiRequest,
) -> TriviaResult<ApiResponse> {
    let Some(route) = Route::resolve(&request.path) else {
        return Ok(ApiResponse::error(ErrorKind::NotFound));
    };
    let page = parse_page(request.query_param("page"));

    match (request.method, route) {
        (Method::Options, _) => Ok(ApiResponse::ok(&json!({ "success": true }))),
        (Method::Get, Route::Categories) => get_categories(&service(conn, config)?),
        (Method::Get, Route::Questions) => get_questions(&service(conn, config)?, page),
        (Method::Post, Route::Questions) => {
            create_question(&service(conn, config)?, json_body(request)?)
        }
        (Method::Delete, Route::Question(id)) => delete_question(&service(conn, config)?, id),
        (Method::Post, Route::QuestionSearch) => {
            search_questions(&service(conn, config)?, json_body(request)?, page)
        }
        (Method::Get, Route::CategoryQuestions(category)) => {
            category_questions(&service(conn, config)?, category, page)
        }
        (Method::Post, Route::Quizzes) => play_quiz(&service(conn, config)?, json_body(request)?),
        // Known path, unsupported method.
        _ => Ok(ApiResponse::error(ErrorKind::NotFound)),
    }
}

fn service<'conn>(
    conn: &'conn Connection,
    config: &TriviaConfig,
) -> TriviaResult<SqliteTriviaService<'conn>> {
    Ok(TriviaService::new(
        SqliteQuestionRepository::try_new(conn)?,
        SqliteCategoryRepository::try_new(conn)?,
    )
    .with_page_size(config.page_size))
}

fn get_categories(service: &SqliteTriviaService<'_>) -> TriviaResult<ApiResponse> {
    let categories = service.list_categories()?;
    Ok(ApiResponse::ok(&CategoriesPayload {
        success: true,
        categories: &categories,
    }))
}

fn get_questions(service: &SqliteTriviaService<'_>, page: i64) -> TriviaResult<ApiResponse> {
    let listing = service.list_questions(page)?;
    Ok(ApiResponse::ok(&QuestionsPayload {
        success: true,
        questions: &listing.questions,
        total_questions: listing.total_questions,
        categories: &listing.categories,
        current_category: listing.current_category,
    }))
}

fn delete_question(service: &SqliteTriviaService<'_>, id: QuestionId) -> TriviaResult<ApiResponse> {
    let deleted = service.delete_question(id)?;
    Ok(ApiResponse::ok(&DeletedPayload {
        success: true,
        question_id: deleted.question_id,
        current_questions: &deleted.current_questions,
        total_questions: deleted.total_questions,
    }))
}

fn create_question(
    service: &SqliteTriviaService<'_>,
    body: CreateQuestionBody,
) -> TriviaResult<ApiResponse> {
    let question = NewQuestion {
        question: body
            .question
            .ok_or_else(|| TriviaError::missing_field("question"))?,
        answer: body
            .answer
            .ok_or_else(|| TriviaError::missing_field("answer"))?,
        category: Some(
            body.category
                .ok_or_else(|| TriviaError::missing_field("category"))?
                .to_int("category")?,
        ),
        difficulty: body
            .difficulty
            .ok_or_else(|| TriviaError::missing_field("difficulty"))?
            .to_int("difficulty")?,
    };

    let created = service.create_question(question)?;
    Ok(ApiResponse::ok(&CreatedPayload {
        success: true,
        created: created.question.id,
        current_questions: &created.current_questions,
        total_questions: created.total_questions,
    }))
}

fn search_questions(
    service: &SqliteTriviaService<'_>,
    body: SearchBody,
    page: i64,
) -> TriviaResult<ApiResponse> {
    let search_term = body
        .search_term
        .ok_or_else(|| TriviaError::missing_field("searchTerm"))?
        .into_text();
    let results = service.search_questions(&search_term, page)?;
    Ok(ApiResponse::ok(&SearchPayload {
        success: true,
        questions: &results.questions,
        total_questions: results.total_questions,
        current_category: None,
    }))
}

fn category_questions(
    service: &SqliteTriviaService<'_>,
    category: CategoryId,
    page: i64,
) -> TriviaResult<ApiResponse> {
    let listing = service.questions_by_category(category, page)?;
    Ok(ApiResponse::ok(&CategoryQuestionsPayload {
        success: true,
        questions: &listing.questions,
        current_category: listing.current_category,
        total_questions: listing.total_questions,
    }))
}

fn play_quiz(service: &SqliteTriviaService<'_>, body: QuizBody) -> TriviaResult<ApiResponse> {
    let category = body
        .quiz_category
        .and_then(|category| category.id)
        .ok_or_else(|| TriviaError::missing_field("quiz_category"))?
        .to_int("quiz_category")?;
    let previous = body
        .previous_questions
        .ok_or_else(|| TriviaError::missing_field("previous_questions"))?;

    let question = service.next_quiz_question(&QuizRound::new(category, previous))?;
    Ok(ApiResponse::ok(&QuizPayload {
        success: true,
        question: question.as_ref(),
    }))
}

/// Decodes the request body into `T`.
///
/// Missing body and wrong shape are `Unprocessable`; bytes that are not JSON
/// at all are `BadRequest`.
fn json_body<T: DeserializeOwned>(request: &ApiRequest) -> TriviaResult<T> {
    let raw = request
        .body
        .as_deref()
        .filter(|raw| !raw.iter().all(u8::is_ascii_whitespace))
        .ok_or_else(|| TriviaError::missing_field("body"))?;
    let value: Value = serde_json::from_slice(raw)
        .map_err(|err| TriviaError::BadRequest(format!("body is not valid JSON: {err}")))?;
    serde_json::from_value(value).map_err(|err| TriviaError::invalid_field("body", err.to_string()))
}

fn capture_id(pattern: &Regex, path: &str) -> Option<i64> {
    pattern.captures(path)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{IntOrText, Route};

    #[test]
    fn routes_resolve_literal_and_parameterized_paths() {
        assert_eq!(Route::resolve("/categories"), Some(Route::Categories));
        assert_eq!(Route::resolve("/questions/search"), Some(Route::QuestionSearch));
        assert_eq!(Route::resolve("/questions/19"), Some(Route::Question(19)));
        assert_eq!(
            Route::resolve("/categories/4/questions"),
            Some(Route::CategoryQuestions(4))
        );
        assert_eq!(Route::resolve("/questions/abc"), None);
        assert_eq!(Route::resolve("/questions/-1"), None);
        assert_eq!(Route::resolve("/questions/99999999999999999999"), None);
        assert_eq!(Route::resolve("/questions/"), None);
    }

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        assert_eq!(IntOrText::Int(4).to_int("id").unwrap(), 4);
        assert_eq!(IntOrText::Text(" 4 ".to_string()).to_int("id").unwrap(), 4);
        assert!(IntOrText::Text("History".to_string()).to_int("id").is_err());
    }

    #[test]
    fn numeric_search_terms_become_text() {
        assert_eq!(IntOrText::Int(1990).into_text(), "1990");
        assert_eq!(IntOrText::Text("Who".to_string()).into_text(), "Who");
    }
}

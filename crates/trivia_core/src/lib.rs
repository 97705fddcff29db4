//! Core question storage and selection logic for the trivia API.
//! Transport layers call into [`TriviaService`]; nothing here knows about HTTP.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{category_map, Category, CategoryId, CategoryMap, ALL_CATEGORIES};
pub use model::question::{NewQuestion, Question, QuestionId, QuestionValidationError};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::question_repo::{
    QuestionListQuery, QuestionRepository, RepoError, RepoResult, SqliteQuestionRepository,
};
pub use service::error::{ErrorKind, Missing, TriviaError, TriviaResult};
pub use service::pagination::{paginate, parse_page, DEFAULT_PAGE_SIZE};
pub use service::quiz::{pick_question, QuizRound};
pub use service::trivia_service::{
    CategoryQuestions, CreatedQuestion, DeletedQuestion, QuestionPage, SearchResults,
    TriviaService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

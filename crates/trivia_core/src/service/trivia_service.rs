//! Trivia use-case service.
//!
//! # Responsibility
//! - Shape repository result sets into paginated listings.
//! - Implement search, category filtering and quiz selection.
//!
//! # Invariants
//! - The service keeps no state between calls; every call re-reads storage.
//! - Each operation performs at most one mutating repository call.
//! - `total_questions` counts every stored question, except in
//!   [`CategoryQuestions`] where it counts the returned page.

use crate::model::category::{category_map, CategoryId, CategoryMap};
use crate::model::question::{NewQuestion, Question, QuestionId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::question_repo::{QuestionListQuery, QuestionRepository};
use crate::service::error::{Missing, TriviaError, TriviaResult};
use crate::service::pagination::{paginate, DEFAULT_PAGE_SIZE, FIRST_PAGE};
use crate::service::quiz::{pick_question, QuizRound};
use log::{info, warn};
use rand::Rng;

/// One page of the full question listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total_questions: u64,
    pub categories: CategoryMap,
    /// Always `None` for the unfiltered listing.
    pub current_category: Option<CategoryId>,
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedQuestion {
    pub question_id: QuestionId,
    /// First page of the remaining questions.
    pub current_questions: Vec<Question>,
    pub total_questions: u64,
}

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedQuestion {
    pub question: Question,
    /// First page of the listing after the insert.
    pub current_questions: Vec<Question>,
    pub total_questions: u64,
}

/// One page of search matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub questions: Vec<Question>,
    /// Count of all stored questions, not of matches.
    pub total_questions: u64,
}

/// One page of a category's questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryQuestions {
    pub current_category: CategoryId,
    pub questions: Vec<Question>,
    /// Length of `questions`.
    pub total_questions: usize,
}

/// Query and selection service over question/category repositories.
pub struct TriviaService<Q: QuestionRepository, C: CategoryRepository> {
    questions: Q,
    categories: C,
    page_size: usize,
}

impl<Q: QuestionRepository, C: CategoryRepository> TriviaService<Q, C> {
    /// Creates a service paging by [`DEFAULT_PAGE_SIZE`].
    pub fn new(questions: Q, categories: C) -> Self {
        Self {
            questions,
            categories,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size used by every paginated operation.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the full `id -> type` category map.
    ///
    /// # Errors
    /// - `NotFound` when no category exists.
    pub fn list_categories(&self) -> TriviaResult<CategoryMap> {
        let categories = self.categories.list_categories()?;
        if categories.is_empty() {
            return Err(TriviaError::NotFound(Missing::Categories));
        }
        Ok(category_map(categories))
    }

    /// Lists one page of all questions together with the category map.
    ///
    /// # Errors
    /// - `NotFound` when the page is empty, whether because `page` is past the
    ///   end or because no questions exist.
    pub fn list_questions(&self, page: i64) -> TriviaResult<QuestionPage> {
        let all = self.questions.list_questions(&QuestionListQuery::default())?;
        let total_questions = all.len() as u64;
        let questions = paginate(all, page, self.page_size);
        if questions.is_empty() {
            return Err(TriviaError::NotFound(Missing::QuestionPage { page }));
        }

        let categories = category_map(self.categories.list_categories()?);
        Ok(QuestionPage {
            questions,
            total_questions,
            categories,
            current_category: None,
        })
    }

    /// Deletes one question and returns the post-delete first page.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    /// - `Storage` when the delete cannot be committed.
    pub fn delete_question(&self, id: QuestionId) -> TriviaResult<DeletedQuestion> {
        if self.questions.get_question(id)?.is_none() {
            return Err(TriviaError::NotFound(Missing::Question(id)));
        }

        if let Err(err) = self.questions.delete_question(id) {
            warn!("event=question_delete module=service status=error question_id={id} error={err}");
            return Err(TriviaError::Storage(err));
        }

        let (current_questions, total_questions) = self.first_page()?;
        info!(
            "event=question_delete module=service status=ok question_id={id} total_questions={total_questions}"
        );
        Ok(DeletedQuestion {
            question_id: id,
            current_questions,
            total_questions,
        })
    }

    /// Inserts a question and returns it with the refreshed first page.
    ///
    /// # Errors
    /// - `Validation` when a field is blank or out of range.
    /// - `Storage` when the insert fails, including unknown categories.
    pub fn create_question(&self, question: NewQuestion) -> TriviaResult<CreatedQuestion> {
        question
            .validate()
            .map_err(|err| TriviaError::invalid_field(err.field(), err.to_string()))?;

        let created = match self.questions.create_question(&question) {
            Ok(created) => created,
            Err(err) => {
                warn!("event=question_create module=service status=error error={err}");
                return Err(TriviaError::Storage(err));
            }
        };

        let (current_questions, total_questions) = self.first_page()?;
        info!(
            "event=question_create module=service status=ok question_id={} total_questions={total_questions}",
            created.id
        );
        Ok(CreatedQuestion {
            question: created,
            current_questions,
            total_questions,
        })
    }

    /// Case-insensitive substring search over question text.
    ///
    /// Zero matches is a successful empty page, never `NotFound`.
    ///
    /// # Errors
    /// - `Validation` when `search_term` is empty.
    pub fn search_questions(&self, search_term: &str, page: i64) -> TriviaResult<SearchResults> {
        if search_term.is_empty() {
            return Err(TriviaError::missing_field("searchTerm"));
        }

        let needle = search_term.to_lowercase();
        let all = self.questions.list_questions(&QuestionListQuery::default())?;
        let total_questions = all.len() as u64;
        let matches = all
            .into_iter()
            .filter(|question| question.text_contains_lowercase(&needle))
            .collect::<Vec<_>>();
        let match_count = matches.len();
        let questions = paginate(matches, page, self.page_size);

        info!(
            "event=question_search module=service status=ok term_chars={} matches={match_count} page={page}",
            search_term.chars().count()
        );
        Ok(SearchResults {
            questions,
            total_questions,
        })
    }

    /// Lists one page of the questions in `category`.
    ///
    /// # Errors
    /// - `NotFound` when the page is empty, including unknown categories.
    pub fn questions_by_category(
        &self,
        category: CategoryId,
        page: i64,
    ) -> TriviaResult<CategoryQuestions> {
        let matches = self
            .questions
            .list_questions(&QuestionListQuery::in_category(category))?;
        let questions = paginate(matches, page, self.page_size);
        if questions.is_empty() {
            return Err(TriviaError::NotFound(Missing::CategoryPage { category, page }));
        }

        Ok(CategoryQuestions {
            current_category: category,
            total_questions: questions.len(),
            questions,
        })
    }

    /// Serves one random question not yet seen in this quiz round.
    ///
    /// Returns `None` once the round's candidate set is exhausted.
    pub fn next_quiz_question(&self, round: &QuizRound) -> TriviaResult<Option<Question>> {
        self.next_quiz_question_with_rng(round, &mut rand::thread_rng())
    }

    /// Same as [`Self::next_quiz_question`] with a caller-provided random source.
    pub fn next_quiz_question_with_rng<R: Rng + ?Sized>(
        &self,
        round: &QuizRound,
        rng: &mut R,
    ) -> TriviaResult<Option<Question>> {
        let candidates = self.questions.list_questions(&round.candidate_query())?;
        let picked = pick_question(&candidates, rng);

        info!(
            "event=quiz_next module=service status=ok category={} previous={} candidates={} exhausted={}",
            round.category,
            round.previous_questions.len(),
            candidates.len(),
            picked.is_none()
        );
        Ok(picked)
    }

    fn first_page(&self) -> TriviaResult<(Vec<Question>, u64)> {
        let all = self.questions.list_questions(&QuestionListQuery::default())?;
        let total_questions = all.len() as u64;
        Ok((paginate(all, FIRST_PAGE, self.page_size), total_questions))
    }
}

//! Quiz-mode question selection.
//!
//! # Invariants
//! - A served question is never one of the round's previous questions.
//! - Category [`ALL_CATEGORIES`] disables the category filter.
//! - An exhausted candidate set yields `None`, not an error.

use crate::model::category::{CategoryId, ALL_CATEGORIES};
use crate::model::question::{Question, QuestionId};
use crate::repo::question_repo::QuestionListQuery;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// State a client carries between quiz requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizRound {
    pub category: CategoryId,
    pub previous_questions: BTreeSet<QuestionId>,
}

impl QuizRound {
    pub fn new(
        category: CategoryId,
        previous_questions: impl IntoIterator<Item = QuestionId>,
    ) -> Self {
        Self {
            category,
            previous_questions: previous_questions.into_iter().collect(),
        }
    }

    pub fn is_all_categories(&self) -> bool {
        self.category == ALL_CATEGORIES
    }

    /// Storage query producing this round's candidate set.
    pub fn candidate_query(&self) -> QuestionListQuery {
        QuestionListQuery {
            category: (!self.is_all_categories()).then_some(self.category),
            exclude_ids: self.previous_questions.clone(),
        }
    }
}

/// Picks one candidate uniformly at random.
pub fn pick_question<R: Rng + ?Sized>(candidates: &[Question], rng: &mut R) -> Option<Question> {
    candidates.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use super::{pick_question, QuizRound};
    use crate::model::question::Question;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeSet, HashSet};

    fn question(id: i64) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: format!("answer {id}"),
            category: Some(1),
            difficulty: 1,
        }
    }

    #[test]
    fn all_categories_round_has_no_category_filter() {
        let round = QuizRound::new(0, [3, 1, 3]);
        let query = round.candidate_query();
        assert_eq!(query.category, None);
        assert_eq!(query.exclude_ids, BTreeSet::from([1, 3]));
    }

    #[test]
    fn category_round_filters_by_category() {
        let query = QuizRound::new(4, []).candidate_query();
        assert_eq!(query.category, Some(4));
        assert!(query.exclude_ids.is_empty());
    }

    #[test]
    fn pick_from_empty_candidates_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_question(&[], &mut rng), None);
    }

    #[test]
    fn pick_eventually_reaches_every_candidate() {
        let candidates: Vec<Question> = (1..=4).map(question).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<i64> = (0..200)
            .filter_map(|_| pick_question(&candidates, &mut rng))
            .map(|question| question.id)
            .collect();
        assert_eq!(seen, HashSet::from([1, 2, 3, 4]));
    }
}

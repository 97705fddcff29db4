use std::collections::BTreeSet;
use trivia_core::db::open_db_in_memory;
use trivia_core::{
    Category, CategoryRepository, NewQuestion, QuestionListQuery, QuestionRepository,
    QuestionValidationError, RepoError, SqliteCategoryRepository, SqliteQuestionRepository,
};

fn new_question(text: &str, category: i64) -> NewQuestion {
    NewQuestion {
        question: text.to_string(),
        answer: format!("answer to {text}"),
        category: Some(category),
        difficulty: 2,
    }
}

fn seed_categories(repo: &SqliteCategoryRepository<'_>) {
    repo.create_category(&Category::new(1, "Science")).unwrap();
    repo.create_category(&Category::new(4, "History")).unwrap();
}

#[test]
fn create_assigns_increasing_ids_and_get_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    seed_categories(&SqliteCategoryRepository::try_new(&conn).unwrap());
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let first = repo.create_question(&new_question("first", 1)).unwrap();
    let second = repo.create_question(&new_question("second", 4)).unwrap();
    assert!(second.id > first.id);

    let loaded = repo.get_question(second.id).unwrap().unwrap();
    assert_eq!(loaded, second);
    assert_eq!(loaded.category, Some(4));
    assert!(repo.get_question(999).unwrap().is_none());
}

#[test]
fn create_rejects_invalid_input_before_sql() {
    let conn = open_db_in_memory().unwrap();
    seed_categories(&SqliteCategoryRepository::try_new(&conn).unwrap());
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let mut blank = new_question("  ", 1);
    blank.question = "  ".to_string();
    let err = repo.create_question(&blank).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(QuestionValidationError::Blank { field: "question" })
    ));

    let mut too_hard = new_question("hard", 1);
    too_hard.difficulty = 6;
    assert!(matches!(
        repo.create_question(&too_hard).unwrap_err(),
        RepoError::Validation(QuestionValidationError::DifficultyOutOfRange { value: 6 })
    ));
    assert_eq!(repo.count_questions().unwrap(), 0);
}

#[test]
fn create_with_unknown_category_is_a_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let err = repo.create_question(&new_question("orphan", 77)).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(repo.count_questions().unwrap(), 0);
}

#[test]
fn list_is_ordered_by_id_and_filters_by_category_and_exclusions() {
    let conn = open_db_in_memory().unwrap();
    seed_categories(&SqliteCategoryRepository::try_new(&conn).unwrap());
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let ids = ["a", "b", "c", "d", "e"]
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let category = if index % 2 == 0 { 1 } else { 4 };
            repo.create_question(&new_question(text, category)).unwrap().id
        })
        .collect::<Vec<_>>();

    let all = repo.list_questions(&QuestionListQuery::default()).unwrap();
    assert_eq!(all.iter().map(|q| q.id).collect::<Vec<_>>(), ids);

    let science = repo
        .list_questions(&QuestionListQuery::in_category(1))
        .unwrap();
    assert_eq!(
        science.iter().map(|q| q.id).collect::<Vec<_>>(),
        vec![ids[0], ids[2], ids[4]]
    );

    let query = QuestionListQuery {
        category: Some(1),
        exclude_ids: BTreeSet::from([ids[0], ids[4], 12345]),
    };
    let remaining = repo.list_questions(&query).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, ids[2]);
}

#[test]
fn exclusion_set_larger_than_sql_variable_limit_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    seed_categories(&SqliteCategoryRepository::try_new(&conn).unwrap());
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();
    let kept = repo.create_question(&new_question("kept", 4)).unwrap();

    let query = QuestionListQuery {
        category: None,
        exclude_ids: (kept.id + 1..=kept.id + 40_000).collect(),
    };
    let remaining = repo.list_questions(&query).unwrap();
    assert_eq!(remaining, vec![kept.clone()]);

    let everything = QuestionListQuery {
        category: Some(4),
        exclude_ids: (1..=40_000).collect(),
    };
    assert!(repo.list_questions(&everything).unwrap().is_empty());
}

#[test]
fn delete_removes_exactly_one_and_missing_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed_categories(&SqliteCategoryRepository::try_new(&conn).unwrap());
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let keep = repo.create_question(&new_question("keep", 1)).unwrap();
    let drop_me = repo.create_question(&new_question("drop", 1)).unwrap();

    repo.delete_question(drop_me.id).unwrap();
    assert_eq!(repo.count_questions().unwrap(), 1);
    assert!(repo.get_question(drop_me.id).unwrap().is_none());
    assert!(repo.get_question(keep.id).unwrap().is_some());

    let err = repo.delete_question(drop_me.id).unwrap_err();
    assert!(matches!(err, RepoError::QuestionNotFound(id) if id == drop_me.id));
}

#[test]
fn deleted_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    seed_categories(&SqliteCategoryRepository::try_new(&conn).unwrap());
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let first = repo.create_question(&new_question("first", 1)).unwrap();
    repo.delete_question(first.id).unwrap();
    let next = repo.create_question(&new_question("next", 1)).unwrap();
    assert!(next.id > first.id);
}

#[test]
fn read_rejects_out_of_range_persisted_difficulty() {
    let conn = open_db_in_memory().unwrap();
    // Bypass the CHECK constraint to simulate a row written by another tool.
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO questions (question, answer, category, difficulty)
         VALUES ('q', 'a', NULL, 9);
         PRAGMA ignore_check_constraints = OFF;",
    )
    .unwrap();
    let repo = SqliteQuestionRepository::try_new(&conn).unwrap();

    let err = repo
        .list_questions(&QuestionListQuery::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("difficulty")));
}

#[test]
fn categories_list_in_id_order_and_delete_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    repo.create_category(&Category::new(4, "History")).unwrap();
    repo.create_category(&Category::new(1, "Science")).unwrap();

    let listed = repo.list_categories().unwrap();
    assert_eq!(
        listed,
        vec![Category::new(1, "Science"), Category::new(4, "History")]
    );
    assert_eq!(
        repo.get_category(4).unwrap(),
        Some(Category::new(4, "History"))
    );

    repo.delete_category(4).unwrap();
    assert!(repo.get_category(4).unwrap().is_none());
    assert!(matches!(
        repo.delete_category(4).unwrap_err(),
        RepoError::CategoryNotFound(4)
    ));
}

#[test]
fn category_in_use_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    seed_categories(&categories);
    let questions = SqliteQuestionRepository::try_new(&conn).unwrap();
    questions.create_question(&new_question("in use", 1)).unwrap();

    assert!(matches!(
        categories.delete_category(1).unwrap_err(),
        RepoError::Db(_)
    ));
}

#[test]
fn blank_category_type_is_rejected_by_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    assert!(repo.create_category(&Category::new(9, "   ")).is_err());
}

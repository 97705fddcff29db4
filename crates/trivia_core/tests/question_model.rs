use serde_json::json;
use trivia_core::{category_map, Category, NewQuestion, Question, QuestionValidationError};

fn valid_question() -> NewQuestion {
    NewQuestion {
        question: "What is the heaviest organ in the human body?".to_string(),
        answer: "The liver".to_string(),
        category: Some(1),
        difficulty: 4,
    }
}

#[test]
fn question_serializes_to_wire_shape() {
    let question = valid_question().into_question(20);
    let value = serde_json::to_value(&question).unwrap();
    assert_eq!(
        value,
        json!({
            "id": 20,
            "question": "What is the heaviest organ in the human body?",
            "answer": "The liver",
            "category": 1,
            "difficulty": 4
        })
    );

    let back: Question = serde_json::from_value(value).unwrap();
    assert_eq!(back, question);
}

#[test]
fn uncategorized_question_serializes_null_category() {
    let mut question = valid_question().into_question(3);
    question.category = None;
    assert_eq!(serde_json::to_value(&question).unwrap()["category"], json!(null));
}

#[test]
fn category_serializes_label_as_type() {
    let value = serde_json::to_value(Category::new(4, "History")).unwrap();
    assert_eq!(value, json!({"id": 4, "type": "History"}));
}

#[test]
fn category_map_is_ordered_by_id() {
    let map = category_map(vec![Category::new(6, "Sports"), Category::new(2, "Art")]);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2, 6]);
    assert_eq!(map.get(&6).map(String::as_str), Some("Sports"));
}

#[test]
fn validate_accepts_complete_question() {
    assert_eq!(valid_question().validate(), Ok(()));
}

#[test]
fn validate_reports_offending_field() {
    let mut blank_answer = valid_question();
    blank_answer.answer = " \t".to_string();
    let err = blank_answer.validate().unwrap_err();
    assert_eq!(err, QuestionValidationError::Blank { field: "answer" });
    assert_eq!(err.field(), "answer");

    let mut uncategorized = valid_question();
    uncategorized.category = None;
    assert_eq!(uncategorized.validate().unwrap_err().field(), "category");

    for difficulty in [0, 6, -1] {
        let mut out_of_range = valid_question();
        out_of_range.difficulty = difficulty;
        let err = out_of_range.validate().unwrap_err();
        assert_eq!(
            err,
            QuestionValidationError::DifficultyOutOfRange { value: difficulty }
        );
        assert!(err.to_string().contains("between 1 and 5"));
    }
}

#[test]
fn text_match_is_case_insensitive_for_non_ascii() {
    let mut question = valid_question().into_question(1);
    question.question = "Wer schrieb ÜBER die Brücke?".to_string();
    assert!(question.text_contains_lowercase(&"über".to_lowercase()));
    assert!(question.text_contains_lowercase("brücke"));
    assert!(!question.text_contains_lowercase("bridge"));
}

//! Trivia domain model.
//!
//! # Responsibility
//! - Define the question and category records shared by storage and service.
//! - Own input validation for new questions.
//!
//! # Invariants
//! - Identifiers are assigned by storage and never change afterwards.
//! - A question's category, when set, names an existing category.

pub mod category;
pub mod question;

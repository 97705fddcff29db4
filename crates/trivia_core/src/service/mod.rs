//! Trivia query and selection services.
//!
//! # Responsibility
//! - Turn repository result sets into paginated, filtered listings.
//! - Select quiz questions without repeating already-served ones.
//! - Keep callers decoupled from storage details.

pub mod error;
pub mod pagination;
pub mod quiz;
pub mod trivia_service;

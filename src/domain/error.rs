//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Reasons a store operation was not applied.
///
/// Whenever one of these is returned the forest is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("topic not found: {0}")]
    UnknownTopic(String),

    #[error("subtopic not found: {subtopic} (topic {topic})")]
    UnknownSubtopic { topic: String, subtopic: String },

    #[error("question not found: {question} (topic {topic}, subtopic {subtopic})")]
    UnknownQuestion {
        topic: String,
        subtopic: String,
        question: String,
    },

    #[error("new {kind} order is not a permutation of the current one: {reason}")]
    NotAPermutation { kind: &'static str, reason: String },

    #[error("index out of range: from={from}, to={to}, len={len}")]
    IndexOutOfRange { from: usize, to: usize, len: usize },

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Result type for store operations.
pub type DomainResult<T> = Result<T, DomainError>;

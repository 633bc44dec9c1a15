//! Error types for stagegraph operations.
//!
//! [`StageGraphError`] is the error returned by every public entry point.
//! [`ValidationError`] describes why a graph description was rejected; it is
//! kept separate so callers can show a "graph could not be rendered" state
//! with the exact offending ids.

use std::io;

use thiserror::Error;

/// The main error type for stagegraph operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the JSON source next to the parser error so the
/// CLI can point at the offending line and column.
#[derive(Debug, Error)]
pub enum StageGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid graph description: {err}")]
    Parse { err: serde_json::Error, src: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StageGraphError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// Reasons a graph description is rejected.
///
/// The engine never repairs a description; the first violation found (stages
/// first, then transitions, both in input order) is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("stage at position {position} has an empty id")]
    EmptyStageId { position: usize },

    #[error("stage id `{stage}` is used more than once")]
    DuplicateStage { stage: String },

    #[error("stages `{first}` and `{second}` are both marked as initial")]
    MultipleInitialStages { first: String, second: String },

    #[error("transition id `{transition}` is used more than once")]
    DuplicateTransition { transition: String },

    #[error("transition `{transition}` references unknown stage `{stage}`")]
    UnknownStage { transition: String, stage: String },

    #[error("transition `{transition}` loops on stage `{stage}`")]
    SelfLoop { transition: String, stage: String },
}

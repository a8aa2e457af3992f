//! Generator error types.

use thiserror::Error;

/// Errors that can occur when generating questions.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The syllabus cannot be turned into questions.
    #[error("invalid syllabus: {}", .0.join("; "))]
    InvalidSyllabus(Vec<String>),

    /// Zero questions were requested.
    #[error("question count must be at least 1")]
    InvalidCount,

    /// The generator reported itself unavailable.
    #[error("generator {name} is offline: {message}")]
    Offline { name: String, message: String },

    /// The generator failed while producing questions.
    #[error(transparent)]
    Generation(#[from] anyhow::Error),
}

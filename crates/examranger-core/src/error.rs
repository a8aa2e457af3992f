//! Grading error types.
//!
//! Every failure of the grading engine is one of these variants, so callers
//! can tell a missing exam from a malformed submission without string
//! matching. Store failures are carried through unchanged.

use thiserror::Error;

/// Errors that can occur while recording or ranking attempts.
#[derive(Debug, Error)]
pub enum GradingError {
    /// The exam does not exist (or was deleted before submission).
    #[error("exam not found: {0}")]
    ExamNotFound(String),

    /// The submitted answers do not fit the exam.
    #[error("invalid answers: {0}")]
    InvalidAnswers(String),

    /// The exam has no questions and the engine is configured to refuse it.
    #[error("exam {0} has no questions")]
    EmptyExam(String),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl GradingError {
    /// Returns `true` if resubmitting the same attempt cannot succeed.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, GradingError::Store(_))
    }
}

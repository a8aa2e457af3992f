//! Catalog administration error types.

use thiserror::Error;

/// Errors that can occur when editing subjects, exams, or questions.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("subject not found: {0}")]
    SubjectNotFound(String),

    #[error("exam not found: {0}")]
    ExamNotFound(String),

    #[error("question {question_id} not found in exam {exam_id}")]
    QuestionNotFound { exam_id: String, question_id: String },

    /// The record failed validation.
    #[error("invalid {kind}: {message}")]
    Invalid { kind: &'static str, message: String },

    /// A record with this id already exists.
    #[error("{kind} already exists: {id}")]
    Duplicate { kind: &'static str, id: String },

    /// The subject still has exams attached.
    #[error("subject {subject_id} still has {exam_count} exam(s)")]
    SubjectInUse { subject_id: String, exam_count: usize },
}

impl CatalogError {
    pub(crate) fn invalid(kind: &'static str, message: impl Into<String>) -> Self {
        CatalogError::Invalid {
            kind,
            message: message.into(),
        }
    }
}

//! examranger-generator: Question generation from a subject syllabus.
//!
//! Implements the `QuestionGenerator` trait with a template generator that
//! turns comma-separated syllabus topics into multiple-choice questions.

pub mod error;
pub mod syllabus;
pub mod template;

use examranger_core::model::{Question, Subject};
use examranger_core::traits::{GenerateRequest, QuestionGenerator};

pub use error::GeneratorError;
pub use syllabus::validate_syllabus;
pub use template::{generate_questions, TemplateGenerator};

/// Generate `count` questions for `subject`.
///
/// The syllabus is validated and the generator's status checked before any
/// generation work is started.
pub async fn generate_for_subject(
    generator: &dyn QuestionGenerator,
    subject: &Subject,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<Question>, GeneratorError> {
    let errors = validate_syllabus(&subject.syllabus);
    if !errors.is_empty() {
        return Err(GeneratorError::InvalidSyllabus(errors));
    }
    if count == 0 {
        return Err(GeneratorError::InvalidCount);
    }

    let status = generator.status().await;
    if !status.is_online() {
        return Err(GeneratorError::Offline {
            name: generator.name().to_string(),
            message: status.message,
        });
    }

    let request = GenerateRequest {
        subject_name: subject.name.clone(),
        syllabus: subject.syllabus.clone(),
        count,
        seed,
    };

    tracing::info!(
        generator = generator.name(),
        subject = %subject.name,
        count,
        "generating questions"
    );
    let questions = generator.generate(&request).await?;
    tracing::debug!(generated = questions.len(), "generation finished");
    Ok(questions)
}

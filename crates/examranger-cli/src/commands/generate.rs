//! The `examranger generate` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use examranger_generator::{generate_for_subject, TemplateGenerator};
use examranger_store::{ExamDraft, QuestionDraft};

pub async fn execute(
    subject_id: String,
    count: Option<usize>,
    exam_title: Option<String>,
    duration: u32,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, mut store) = super::open_store(config_path.as_deref())?;
    let subject = store
        .store()
        .subject(&subject_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("subject not found: {subject_id}"))?;

    let settings = &config.generator;
    let generator = TemplateGenerator::new(
        Duration::from_millis(settings.delay_ms),
        Duration::from_millis(settings.jitter_ms),
    )
    .with_seed(settings.seed);
    let count = count.unwrap_or(settings.default_count);

    eprintln!("Generating {count} question(s) for {}...", subject.name);
    let questions = generate_for_subject(&generator, &subject, count, None).await?;

    for q in &questions {
        println!("{}. {}", q.id, q.text);
        for (i, option) in q.options.iter().enumerate() {
            let mark = if i == q.correct_answer { "*" } else { " " };
            println!("   {mark} {i}) {option}");
        }
    }

    if let Some(title) = exam_title {
        let exam = store.update(|s| {
            s.create_exam(ExamDraft {
                title,
                description: format!("Generated from the {} syllabus.", subject.name),
                subject_id: subject.id.clone(),
                duration,
                questions: questions.into_iter().map(QuestionDraft::from).collect(),
                is_active: true,
            })
        })?;
        println!(
            "\nCreated exam {} ({}) with {} question(s)",
            exam.id,
            exam.title,
            exam.question_count()
        );
    }

    Ok(())
}

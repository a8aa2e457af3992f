//! The `examranger submit` command.

use std::path::PathBuf;

use anyhow::Result;

use examranger_core::model::{parse_answers, Attempt};
use examranger_core::traits::ExamStore;
use examranger_core::GradingEngine;

pub fn execute(user: String, exam: String, answers: String, config_path: Option<PathBuf>) -> Result<()> {
    let answers = parse_answers(&answers)?;
    let (config, mut store) = super::open_store(config_path.as_deref())?;

    let engine = GradingEngine::new(config.engine_config());
    let attempt = Attempt::new(user, exam, answers);
    let result = store.update(|s| engine.record_attempt(s, attempt))?;
    let participants = store.store().results_for_exam(&result.exam_id)?.len();

    println!(
        "Result #{}: {}/{} ({}%)",
        result.id, result.score, result.max_score, result.percentage
    );
    println!("{}", result.feedback);
    if let Some(rank) = result.rank {
        println!("Rank: #{rank} of {participants}");
    }

    Ok(())
}

//! The `examranger review` command.

use std::path::PathBuf;

use anyhow::Result;

use examranger_core::report::ResultReport;
use examranger_report::write_review_html;

pub fn execute(result_id: u64, output: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = super::open_store(config_path.as_deref())?;
    let store = store.store();

    let result = store
        .result(result_id)
        .ok_or_else(|| anyhow::anyhow!("result not found: {result_id}"))?;
    let exam = store.exam(&result.exam_id).ok_or_else(|| {
        anyhow::anyhow!("exam {} for result {result_id} no longer exists", result.exam_id)
    })?;

    let report = ResultReport::build(exam, result);
    println!("{}", report.to_markdown());

    if let Some(path) = output {
        if path.extension().is_some_and(|ext| ext == "html") {
            write_review_html(&report, &path)?;
        } else {
            report.save_json(&path)?;
        }
        eprintln!("Saved review to {}", path.display());
    }

    Ok(())
}

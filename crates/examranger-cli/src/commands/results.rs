//! The `examranger results` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examranger_core::get_user_results;
use examranger_core::statistics::compute_user_stats;

pub fn execute(user: String, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = super::open_store(config_path.as_deref())?;
    let history = get_user_results(store.store(), &user)?;
    let exams_available = store.store().exams().iter().filter(|e| e.is_active).count();
    let stats = compute_user_stats(&user, &history, exams_available);

    match format.as_str() {
        "json" => {
            let json = serde_json::json!({ "stats": stats, "results": history });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        "text" => {
            println!(
                "{}: {} completed of {} available | average {}% | best {}%",
                stats.user_id,
                stats.completed,
                stats.exams_available,
                stats.average_percentage,
                stats.best_percentage
            );
            if let Some(trend) = stats.trend {
                println!("Trend: {trend:+} points since the previous attempt");
            }
            if history.is_empty() {
                println!("No results yet.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec!["Result", "Exam", "Score", "Percentage", "Rank", "Completed"]);
            for r in &history {
                let title = store
                    .store()
                    .exam(&r.exam_id)
                    .map(|e| e.title.clone())
                    .unwrap_or_else(|| r.exam_id.clone());
                table.add_row(vec![
                    Cell::new(r.id),
                    Cell::new(title),
                    Cell::new(format!("{}/{}", r.score, r.max_score)),
                    Cell::new(format!("{}%", r.percentage)),
                    Cell::new(r.rank.map(|n| format!("#{n}")).unwrap_or_else(|| "-".into())),
                    Cell::new(r.completed_at.format("%Y-%m-%d %H:%M")),
                ]);
            }
            println!("{table}");
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

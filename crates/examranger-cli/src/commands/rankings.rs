//! The `examranger rankings` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examranger_core::get_rankings;
use examranger_core::statistics::compute_exam_stats;
use examranger_report::{generate_rankings_html, write_rankings_html};

pub fn execute(
    exam_id: String,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = super::open_store(config_path.as_deref())?;
    let exam = store
        .store()
        .exam(&exam_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("exam not found: {exam_id}"))?;

    let rankings = get_rankings(store.store(), &exam_id)?;
    let stats = compute_exam_stats(&exam_id, &rankings);

    match format.as_str() {
        "html" => match &output {
            Some(path) => {
                write_rankings_html(&exam, &rankings, &stats, path)?;
                eprintln!("Wrote {}", path.display());
            }
            None => println!("{}", generate_rankings_html(&exam, &rankings, &stats)),
        },
        "json" => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "exam": exam,
                "stats": stats,
                "rankings": rankings,
            }))?;
            match &output {
                Some(path) => {
                    std::fs::write(path, json)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        "text" => {
            println!("{} ({} attempts)", exam.title, stats.attempts);
            if rankings.is_empty() {
                println!("No attempts yet.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec!["Rank", "User", "Score", "Percentage", "Completed"]);
            for r in &rankings {
                table.add_row(vec![
                    Cell::new(r.rank.map(|n| n.to_string()).unwrap_or_else(|| "-".into())),
                    Cell::new(&r.user_id),
                    Cell::new(format!("{}/{}", r.score, r.max_score)),
                    Cell::new(format!("{}%", r.percentage)),
                    Cell::new(r.completed_at.format("%Y-%m-%d %H:%M")),
                ]);
            }
            println!("{table}");
            println!(
                "Average {}% | best {}% | worst {}% | pass rate {:.1}%",
                stats.average_percentage,
                stats.best_percentage,
                stats.worst_percentage,
                stats.pass_rate * 100.0
            );
        }
        other => anyhow::bail!("unknown format: {other} (expected text, json, or html)"),
    }

    Ok(())
}

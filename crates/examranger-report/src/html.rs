//! HTML report generator.
//!
//! Produces self-contained HTML files with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use examranger_core::grading::FeedbackBand;
use examranger_core::model::{Exam, ExamResult};
use examranger_core::report::{option_label, ResultReport};
use examranger_core::statistics::ExamStats;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn band_class(band: FeedbackBand) -> &'static str {
    match band {
        FeedbackBand::Excellent => "excellent",
        FeedbackBand::Good => "good",
        FeedbackBand::Fair => "fair",
        FeedbackBand::NeedsImprovement => "poor",
    }
}

fn push_head(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>examranger: {}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

/// Generate the rankings page for an exam.
///
/// `rankings` is expected in rank order, as returned by `get_rankings`.
pub fn generate_rankings_html(exam: &Exam, rankings: &[ExamResult], stats: &ExamStats) -> String {
    let mut html = String::new();
    push_head(&mut html, &format!("{} rankings", exam.title));

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&exam.title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} questions | {} minutes | {} attempts by {} users | generated {}</p>\n",
        exam.question_count(),
        exam.duration,
        stats.attempts,
        stats.participants,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if !exam.description.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", html_escape(&exam.description)));
    }
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Average</th><th>Best</th><th>Worst</th><th>Pass rate</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}%</td><td>{}%</td><td>{}%</td><td>{:.1}%</td></tr></tbody></table>\n",
        stats.average_percentage,
        stats.best_percentage,
        stats.worst_percentage,
        stats.pass_rate * 100.0,
    ));
    if stats.attempts > 0 {
        html.push_str(&generate_band_chart(stats));
    }
    html.push_str("</section>\n");

    // Standings
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Rankings</h2>\n");
    if rankings.is_empty() {
        html.push_str("<p class=\"meta\">No attempts yet.</p>\n");
    } else {
        html.push_str("<table class=\"results-table\" id=\"results\">\n");
        html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Rank</th><th onclick=\"sortTable(1)\">User</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Percentage</th><th onclick=\"sortTable(4)\">Completed</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for r in rankings {
            let class = band_class(FeedbackBand::from_percentage(r.percentage));
            let rank = r.rank.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}/{}</td><td class=\"{}\">{}%</td><td>{}</td></tr>\n",
                rank,
                html_escape(&r.user_id),
                r.score,
                r.max_score,
                class,
                r.percentage,
                r.completed_at.format("%Y-%m-%d %H:%M"),
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(rankings).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Generate the per-question review page for a single result.
pub fn generate_review_html(report: &ResultReport) -> String {
    let mut html = String::new();
    let result = &report.result;
    push_head(&mut html, &format!("{} review", report.exam_title));

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.exam_title)));
    let rank = result
        .rank
        .map(|n| format!(" | rank #{n}"))
        .unwrap_or_default();
    html.push_str(&format!(
        "<p class=\"meta\">{} | {}/{} ({}%){} | {}</p>\n",
        html_escape(&result.user_id),
        result.score,
        result.max_score,
        result.percentage,
        rank,
        result.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));
    html.push_str(&format!(
        "<p class=\"feedback {}\">{}</p>\n",
        band_class(report.band),
        html_escape(&result.feedback)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} correct | {} incorrect | {} unanswered</p>\n",
        report.correct, report.incorrect, report.unanswered
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"review\">\n");
    for q in &report.questions {
        let class = if q.is_correct { "pass" } else { "fail" };
        html.push_str(&format!("<article class=\"question {class}\">\n"));
        html.push_str(&format!(
            "<h3>{}. {}</h3>\n<ol>\n",
            q.number,
            html_escape(&q.text)
        ));
        for (i, option) in q.options.iter().enumerate() {
            let mut marks = Vec::new();
            if i == q.correct_answer {
                marks.push("correct");
            }
            if q.selected == Some(i) {
                marks.push("selected");
            }
            html.push_str(&format!(
                "<li class=\"{}\">{}</li>\n",
                marks.join(" "),
                html_escape(option)
            ));
        }
        html.push_str("</ol>\n");

        let yours = match q.selected {
            Some(i) => html_escape(&option_label(&q.options, i)),
            None => "not answered".to_string(),
        };
        html.push_str(&format!("<p class=\"meta\">Your answer: {yours}</p>\n"));
        if let Some(explanation) = &q.explanation {
            html.push_str(&format!(
                "<p class=\"explanation\">{}</p>\n",
                html_escape(explanation)
            ));
        }
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn write_file(path: &Path, html: String) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

/// Write an exam's rankings page to a file.
pub fn write_rankings_html(
    exam: &Exam,
    rankings: &[ExamResult],
    stats: &ExamStats,
    path: &Path,
) -> Result<()> {
    write_file(path, generate_rankings_html(exam, rankings, stats))
}

/// Write a result review page to a file.
pub fn write_review_html(report: &ResultReport, path: &Path) -> Result<()> {
    write_file(path, generate_review_html(report))
}

fn generate_band_chart(stats: &ExamStats) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = stats.band_counts.len() * (bar_height + padding) + padding;
    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (band, count)) in stats.band_counts.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let share = *count as f64 / stats.attempts as f64;
        let width = (share * max_width as f64) as usize;

        let color = match band {
            FeedbackBand::Excellent => "#22c55e",
            FeedbackBand::Good => "#84cc16",
            FeedbackBand::Fair => "#eab308",
            FeedbackBand::NeedsImprovement => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            band
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            count
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --fair: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --fair: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass, .excellent, .good { background: var(--pass); }
.fail, .poor { background: var(--fail); }
.fair { background: var(--fair); }
.question { border: 1px solid var(--border); border-radius: 8px; padding: 0.5rem 1rem; margin: 1rem 0; }
li.correct { font-weight: bold; }
li.selected::after { content: " (your answer)"; color: #6b7280; }
.explanation { font-style: italic; }
.feedback { padding: 0.5rem 1rem; border-radius: 8px; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    if (!isNaN(na) && !isNaN(nb)) return asc ? na - nb : nb - na;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

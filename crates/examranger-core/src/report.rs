//! Result review reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::FeedbackBand;
use crate::model::{Answer, Exam, ExamResult};

/// A result together with a question-by-question review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    /// When the report was created.
    pub generated_at: DateTime<Utc>,
    pub exam_title: String,
    pub result: ExamResult,
    pub band: FeedbackBand,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub questions: Vec<QuestionReview>,
}

/// Review of one question in a result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    /// 1-based position in the exam.
    pub number: usize,
    pub text: String,
    pub options: Vec<String>,
    pub selected: Answer,
    pub correct_answer: usize,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl ResultReport {
    /// Build a review of `result` against the exam it was taken on.
    ///
    /// The exam may have changed since submission; questions beyond the
    /// stored answers are reviewed as unanswered.
    pub fn build(exam: &Exam, result: &ExamResult) -> Self {
        let questions: Vec<QuestionReview> = exam
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let selected = result.answers.get(i).copied().flatten();
                QuestionReview {
                    number: i + 1,
                    text: q.text.clone(),
                    options: q.options.clone(),
                    selected,
                    correct_answer: q.correct_answer,
                    is_correct: q.is_correct(selected),
                    explanation: q.explanation.clone(),
                }
            })
            .collect();

        let correct = questions.iter().filter(|q| q.is_correct).count();
        let unanswered = questions.iter().filter(|q| q.selected.is_none()).count();

        Self {
            generated_at: Utc::now(),
            exam_title: exam.title.clone(),
            result: result.clone(),
            band: FeedbackBand::from_percentage(result.percentage),
            correct,
            incorrect: questions.len() - correct - unanswered,
            unanswered,
            questions,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ResultReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the review as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.exam_title));
        md.push_str(&format!(
            "**Score:** {}/{} ({}%)",
            self.result.score, self.result.max_score, self.result.percentage
        ));
        if let Some(rank) = self.result.rank {
            md.push_str(&format!(" | **Rank:** #{rank}"));
        }
        md.push_str(&format!("\n\n{}\n\n", self.result.feedback));

        md.push_str("| # | Question | Your answer | Correct answer | |\n");
        md.push_str("|---|----------|-------------|----------------|---|\n");
        for q in &self.questions {
            let yours = q
                .selected
                .map(|i| option_label(&q.options, i))
                .unwrap_or_else(|| "-".to_string());
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                q.number,
                q.text,
                yours,
                option_label(&q.options, q.correct_answer),
                if q.is_correct { "correct" } else { "incorrect" }
            ));
        }

        md
    }
}

/// Option text for display, tolerating indices past the end.
pub fn option_label(options: &[String], index: usize) -> String {
    options
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("option {}", index + 1))
}

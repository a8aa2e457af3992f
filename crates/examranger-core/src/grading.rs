//! Scoring, feedback classification, and rank ordering.
//!
//! Everything here is a pure function of its inputs; the engine in
//! [`crate::engine`] wires these to a store.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GradingError;
use crate::model::{Answer, Exam, ExamResult};

/// Outcome of scoring one answer sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
}

impl ScoreSummary {
    pub fn feedback_band(&self) -> FeedbackBand {
        FeedbackBand::from_percentage(self.percentage)
    }
}

/// Score `answers` against the exam's answer key.
///
/// Answer `i` earns a point when it equals the correct option of question
/// `i`. Unanswered, out-of-range, and missing entries never match. An exam
/// with no questions scores 0 out of 0 at 0%.
pub fn score(exam: &Exam, answers: &[Answer]) -> ScoreSummary {
    let correct = exam
        .questions
        .iter()
        .enumerate()
        .filter(|(i, q)| q.is_correct(answers.get(*i).copied().flatten()))
        .count() as u32;
    let max_score = exam.question_count() as u32;

    ScoreSummary {
        score: correct,
        max_score,
        percentage: percentage(correct, max_score),
    }
}

/// `round(score / max_score * 100)` with halves rounded up.
///
/// Computed in integers so 0.5 boundaries are exact. Returns 0 when
/// `max_score` is 0.
pub fn percentage(score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    let score = u64::from(score.min(max_score));
    let max = u64::from(max_score);
    ((score * 200 + max) / (2 * max)) as u32
}

/// Check that an answer sheet has exactly one entry per question.
pub fn check_answers(exam: &Exam, answers: &[Answer]) -> Result<(), GradingError> {
    if answers.len() != exam.question_count() {
        return Err(GradingError::InvalidAnswers(format!(
            "exam {} has {} question(s) but {} answer(s) were submitted",
            exam.id,
            exam.question_count(),
            answers.len()
        )));
    }
    Ok(())
}

/// Qualitative band a percentage falls into.
///
/// Each band includes its lower edge: exactly 90 is `Excellent`, exactly 70
/// is `Good`, exactly 50 is `Fair`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackBand {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl FeedbackBand {
    pub const ALL: [FeedbackBand; 4] = [
        FeedbackBand::Excellent,
        FeedbackBand::Good,
        FeedbackBand::Fair,
        FeedbackBand::NeedsImprovement,
    ];

    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 90 => FeedbackBand::Excellent,
            p if p >= 70 => FeedbackBand::Good,
            p if p >= 50 => FeedbackBand::Fair,
            _ => FeedbackBand::NeedsImprovement,
        }
    }

    /// The feedback sentence stored on results in this band.
    pub fn message(&self) -> &'static str {
        match self {
            FeedbackBand::Excellent => {
                "Excellent! You have a strong understanding of the material."
            }
            FeedbackBand::Good => "Good job! You understand most of the concepts.",
            FeedbackBand::Fair => "Fair. You understand some concepts but need more practice.",
            FeedbackBand::NeedsImprovement => {
                "Needs improvement. Consider reviewing the material again."
            }
        }
    }
}

impl fmt::Display for FeedbackBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackBand::Excellent => write!(f, "excellent"),
            FeedbackBand::Good => write!(f, "good"),
            FeedbackBand::Fair => write!(f, "fair"),
            FeedbackBand::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// Feedback sentence for a percentage.
pub fn classify_feedback(percentage: u32) -> &'static str {
    FeedbackBand::from_percentage(percentage).message()
}

/// Ranking comparator: higher percentage first.
///
/// Equal percentages compare equal, so a stable sort keeps insertion order
/// for ties.
pub fn by_percentage_desc(a: &ExamResult, b: &ExamResult) -> Ordering {
    b.percentage.cmp(&a.percentage)
}

/// Sort results into ranking order in place (stable).
pub fn sort_for_ranking(results: &mut [ExamResult]) {
    results.sort_by(by_percentage_desc);
}

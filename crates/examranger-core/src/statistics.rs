//! Aggregate statistics over exam results.
//!
//! `ExamStats` summarizes one exam's standings; `UserStats` is the
//! per-user dashboard view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grading::FeedbackBand;
use crate::model::ExamResult;

/// Percentage at or above which an attempt counts as passed.
pub const PASS_MARK: u32 = 50;

/// Statistics for a single exam across all attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamStats {
    pub exam_id: String,
    /// Number of recorded attempts.
    pub attempts: usize,
    /// Number of distinct users who attempted the exam.
    pub participants: usize,
    /// Mean percentage, rounded half up.
    pub average_percentage: u32,
    pub best_percentage: u32,
    pub worst_percentage: u32,
    /// Fraction of attempts at or above [`PASS_MARK`].
    pub pass_rate: f64,
    /// Attempts per feedback band.
    pub band_counts: BTreeMap<FeedbackBand, usize>,
}

/// Compute statistics for one exam's results.
///
/// Only results whose `exam_id` matches are counted.
pub fn compute_exam_stats(exam_id: &str, results: &[ExamResult]) -> ExamStats {
    let relevant: Vec<&ExamResult> = results.iter().filter(|r| r.exam_id == exam_id).collect();

    let mut band_counts: BTreeMap<FeedbackBand, usize> =
        FeedbackBand::ALL.iter().map(|b| (*b, 0)).collect();
    for r in &relevant {
        *band_counts
            .entry(FeedbackBand::from_percentage(r.percentage))
            .or_default() += 1;
    }

    let mut users: Vec<&str> = relevant.iter().map(|r| r.user_id.as_str()).collect();
    users.sort_unstable();
    users.dedup();

    let passed = relevant.iter().filter(|r| r.percentage >= PASS_MARK).count();
    let pass_rate = if relevant.is_empty() {
        0.0
    } else {
        passed as f64 / relevant.len() as f64
    };

    ExamStats {
        exam_id: exam_id.to_string(),
        attempts: relevant.len(),
        participants: users.len(),
        average_percentage: rounded_mean(relevant.iter().map(|r| r.percentage)),
        best_percentage: relevant.iter().map(|r| r.percentage).max().unwrap_or(0),
        worst_percentage: relevant.iter().map(|r| r.percentage).min().unwrap_or(0),
        pass_rate,
        band_counts,
    }
}

/// Dashboard statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    /// Exams currently offered.
    pub exams_available: usize,
    /// Attempts the user has completed.
    pub completed: usize,
    pub average_percentage: u32,
    pub best_percentage: u32,
    /// Latest percentage minus the one before it, when there are two.
    pub trend: Option<i64>,
}

/// Compute dashboard statistics from a user's history.
///
/// `history` must be ordered most recent first, as returned by
/// [`crate::engine::get_user_results`].
pub fn compute_user_stats(user_id: &str, history: &[ExamResult], exams_available: usize) -> UserStats {
    let trend = match history {
        [latest, previous, ..] => Some(i64::from(latest.percentage) - i64::from(previous.percentage)),
        _ => None,
    };

    UserStats {
        user_id: user_id.to_string(),
        exams_available,
        completed: history.len(),
        average_percentage: rounded_mean(history.iter().map(|r| r.percentage)),
        best_percentage: history.iter().map(|r| r.percentage).max().unwrap_or(0),
        trend,
    }
}

fn rounded_mean(values: impl Iterator<Item = u32>) -> u32 {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + u64::from(v), c + 1));
    if count == 0 {
        return 0;
    }
    ((sum * 2 + count) / (2 * count)) as u32
}

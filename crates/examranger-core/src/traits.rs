//! Core trait definitions for stores, clocks, and question generators.
//!
//! The grading engine only talks to storage through [`ExamStore`] and only
//! reads time through [`Clock`]. Question generators are implemented in the
//! `examranger-generator` crate.

use std::cell::Cell;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Exam, ExamResult, Question};

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Persistence the grading engine needs.
///
/// Implementations must return results in insertion order; rank tie-breaks
/// depend on it.
pub trait ExamStore {
    /// Look up an exam by id.
    fn get_exam(&self, exam_id: &str) -> Result<Option<Exam>>;

    /// All results for one exam, in insertion order.
    fn results_for_exam(&self, exam_id: &str) -> Result<Vec<ExamResult>>;

    /// All results for one user, in insertion order.
    fn results_for_user(&self, user_id: &str) -> Result<Vec<ExamResult>>;

    /// Allocate the next result id. Ids never repeat within a store.
    fn next_result_id(&mut self) -> Result<u64>;

    /// Append a newly graded result.
    fn append_result(&mut self, result: ExamResult) -> Result<()>;

    /// Replace a stored result with the same id (used for rank rewrites).
    fn update_result(&mut self, result: &ExamResult) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Clock trait
// ---------------------------------------------------------------------------

/// Source of submission timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that starts at a fixed instant and advances by `step` on every
/// reading. Useful for reproducible histories.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Cell::new(start),
            step,
        }
    }

    /// Time that the next call to [`Clock::now`] will return.
    pub fn peek(&self) -> DateTime<Utc> {
        self.current.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.current.get();
        self.current.set(now + self.step);
        now
    }
}

// ---------------------------------------------------------------------------
// Question generator trait
// ---------------------------------------------------------------------------

/// Trait for backends that produce exam questions from a syllabus.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Human-readable generator name (e.g. "template").
    fn name(&self) -> &str;

    /// Report whether the generator can currently serve requests.
    async fn status(&self) -> ServiceStatus;

    /// Generate questions for a subject.
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Question>>;
}

/// Request to generate questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Subject name woven into question text.
    pub subject_name: String,
    /// Comma-separated syllabus topics.
    pub syllabus: String,
    /// Number of questions to produce.
    pub count: usize,
    /// Seed for answer-key selection. `None` lets the generator choose.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Generator availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Online,
    Offline,
}

/// Status report returned by [`QuestionGenerator::status`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: Availability,
    pub message: String,
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        self.status == Availability::Online
    }
}

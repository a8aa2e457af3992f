//! examranger-core: Exam data model, grading engine, and ranking.
//!
//! This crate defines the records every other examranger crate exchanges
//! (subjects, exams, questions, results), the pure scoring and feedback
//! rules, and the engine that records attempts and keeps per-exam ranks
//! current against any [`traits::ExamStore`].

pub mod engine;
pub mod error;
pub mod grading;
pub mod model;
pub mod parser;
pub mod report;
pub mod statistics;
pub mod traits;

pub use engine::{get_rankings, get_user_results, recompute_ranks, EngineConfig, GradingEngine};
pub use error::GradingError;
pub use grading::{classify_feedback, score, FeedbackBand, ScoreSummary};

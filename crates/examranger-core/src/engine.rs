//! Grading engine: records attempts and keeps per-exam ranks current.
//!
//! The engine holds no data of its own. Every call reads and writes through
//! the [`ExamStore`] it is handed, and `record_attempt` borrows that store
//! mutably for the whole append-then-rerank sequence.

use chrono::{DateTime, Utc};

use crate::error::GradingError;
use crate::grading::{self, sort_for_ranking};
use crate::model::{Attempt, ExamResult};
use crate::traits::{Clock, ExamStore, SystemClock};

/// Configuration for the grading engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Refuse submissions against exams with no questions instead of
    /// grading them at 0%.
    pub reject_empty_exams: bool,
}

/// Records attempts against a store.
pub struct GradingEngine<C: Clock = SystemClock> {
    clock: C,
    config: EngineConfig,
}

impl GradingEngine<SystemClock> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(SystemClock, config)
    }
}

impl<C: Clock> GradingEngine<C> {
    pub fn with_clock(clock: C, config: EngineConfig) -> Self {
        Self { clock, config }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Grade an attempt, store the result, and rerank its exam.
    ///
    /// Fails without touching the store when the exam is missing, the
    /// answer count does not match the question count, or (if configured)
    /// the exam is empty. The returned result carries its final rank.
    pub fn record_attempt<S>(&self, store: &mut S, attempt: Attempt) -> Result<ExamResult, GradingError>
    where
        S: ExamStore + ?Sized,
    {
        let exam = store
            .get_exam(&attempt.exam_id)?
            .ok_or_else(|| GradingError::ExamNotFound(attempt.exam_id.clone()))?;

        if exam.questions.is_empty() {
            if self.config.reject_empty_exams {
                return Err(GradingError::EmptyExam(exam.id));
            }
            tracing::warn!(exam_id = %exam.id, "grading attempt against an exam with no questions");
        }
        grading::check_answers(&exam, &attempt.answers)?;

        let summary = grading::score(&exam, &attempt.answers);
        let id = store.next_result_id()?;
        let completed_at: DateTime<Utc> = self.clock.now();

        let result = ExamResult {
            id,
            exam_id: attempt.exam_id,
            user_id: attempt.user_id,
            score: summary.score,
            max_score: summary.max_score,
            percentage: summary.percentage,
            answers: attempt.answers,
            completed_at,
            rank: None,
            feedback: summary.feedback_band().message().to_string(),
        };

        store.append_result(result.clone())?;
        let ranked = recompute_ranks(store, &result.exam_id)?;

        let recorded = ranked
            .into_iter()
            .find(|r| r.id == id)
            .unwrap_or(result);

        tracing::info!(
            result_id = recorded.id,
            exam_id = %recorded.exam_id,
            user_id = %recorded.user_id,
            score = recorded.score,
            max_score = recorded.max_score,
            percentage = recorded.percentage,
            rank = recorded.rank,
            "attempt recorded"
        );

        Ok(recorded)
    }
}

/// Reassign ranks for every result of `exam_id` and persist the changes.
///
/// Results are ordered by percentage, highest first; ties keep insertion
/// order. Rank is the 1-based position in that order. Only results whose
/// rank actually changed are written back. Returns the results in rank
/// order.
pub fn recompute_ranks<S>(store: &mut S, exam_id: &str) -> Result<Vec<ExamResult>, GradingError>
where
    S: ExamStore + ?Sized,
{
    let mut results = store.results_for_exam(exam_id)?;
    sort_for_ranking(&mut results);

    let mut rewritten = 0usize;
    for (index, result) in results.iter_mut().enumerate() {
        let rank = index as u32 + 1;
        if result.rank != Some(rank) {
            result.rank = Some(rank);
            store.update_result(result)?;
            rewritten += 1;
        }
    }

    tracing::debug!(exam_id, total = results.len(), rewritten, "ranks recomputed");
    Ok(results)
}

/// All results for an exam in ranking order. Does not modify the store.
pub fn get_rankings<S>(store: &S, exam_id: &str) -> Result<Vec<ExamResult>, GradingError>
where
    S: ExamStore + ?Sized,
{
    let mut results = store.results_for_exam(exam_id)?;
    sort_for_ranking(&mut results);
    Ok(results)
}

/// All results for a user, most recent first.
///
/// Results completed at the same instant are listed latest-inserted first.
pub fn get_user_results<S>(store: &S, user_id: &str) -> Result<Vec<ExamResult>, GradingError>
where
    S: ExamStore + ?Sized,
{
    let mut results = store.results_for_user(user_id)?;
    results.reverse();
    results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Exam, Question};
    use crate::traits::ManualClock;
    use anyhow::Result;
    use chrono::Duration;

    /// Minimal store backed by vectors.
    #[derive(Default)]
    struct VecStore {
        exams: Vec<Exam>,
        results: Vec<ExamResult>,
        next_id: u64,
        updates: usize,
    }

    impl ExamStore for VecStore {
        fn get_exam(&self, exam_id: &str) -> Result<Option<Exam>> {
            Ok(self.exams.iter().find(|e| e.id == exam_id).cloned())
        }

        fn results_for_exam(&self, exam_id: &str) -> Result<Vec<ExamResult>> {
            Ok(self.results.iter().filter(|r| r.exam_id == exam_id).cloned().collect())
        }

        fn results_for_user(&self, user_id: &str) -> Result<Vec<ExamResult>> {
            Ok(self.results.iter().filter(|r| r.user_id == user_id).cloned().collect())
        }

        fn next_result_id(&mut self) -> Result<u64> {
            self.next_id += 1;
            Ok(self.next_id)
        }

        fn append_result(&mut self, result: ExamResult) -> Result<()> {
            self.results.push(result);
            Ok(())
        }

        fn update_result(&mut self, result: &ExamResult) -> Result<()> {
            let slot = self
                .results
                .iter_mut()
                .find(|r| r.id == result.id)
                .ok_or_else(|| anyhow::anyhow!("no result {}", result.id))?;
            *slot = result.clone();
            self.updates += 1;
            Ok(())
        }
    }

    fn exam(id: &str, question_count: usize) -> Exam {
        Exam {
            id: id.into(),
            title: format!("Exam {id}"),
            description: String::new(),
            subject_id: "1".into(),
            duration: 30,
            questions: (0..question_count)
                .map(|i| Question {
                    id: (i + 1).to_string(),
                    text: format!("Q{}", i + 1),
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct_answer: 1,
                    explanation: None,
                })
                .collect(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Answer sheet with `correct` right answers out of `total`.
    fn sheet(correct: usize, total: usize) -> Vec<Option<usize>> {
        (0..total).map(|i| if i < correct { Some(1) } else { Some(0) }).collect()
    }

    fn engine() -> GradingEngine<ManualClock> {
        let start = "2024-03-01T08:00:00Z".parse().unwrap();
        GradingEngine::with_clock(ManualClock::new(start, Duration::minutes(1)), EngineConfig::default())
    }

    fn store_with(exams: Vec<Exam>) -> VecStore {
        VecStore {
            exams,
            ..Default::default()
        }
    }

    #[test]
    fn record_attempt_scores_and_ranks() {
        let mut store = store_with(vec![exam("x", 2)]);
        let result = engine()
            .record_attempt(&mut store, Attempt::new("u1", "x", vec![Some(1), Some(0)]))
            .unwrap();

        assert_eq!(result.id, 1);
        assert_eq!(result.score, 1);
        assert_eq!(result.max_score, 2);
        assert_eq!(result.percentage, 50);
        assert!(result.feedback.starts_with("Fair."));
        assert_eq!(result.rank, Some(1));
        assert_eq!(store.results[0].rank, Some(1));
    }

    #[test]
    fn ranks_follow_percentage_with_insertion_tie_break() {
        let mut store = store_with(vec![exam("x", 10)]);
        let engine = engine();

        for (user, correct) in [("a", 8), ("b", 6), ("c", 9)] {
            engine
                .record_attempt(&mut store, Attempt::new(user, "x", sheet(correct, 10)))
                .unwrap();
        }
        let ranks: Vec<_> = store.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![Some(2), Some(3), Some(1)]);

        let fourth = engine
            .record_attempt(&mut store, Attempt::new("d", "x", sheet(6, 10)))
            .unwrap();
        assert_eq!(fourth.rank, Some(4));
        let ranks: Vec<_> = store.results.iter().map(|r| r.rank.unwrap()).collect();
        assert_eq!(ranks, vec![2, 3, 1, 4]);
    }

    #[test]
    fn higher_score_pushes_older_results_down() {
        let mut store = store_with(vec![exam("x", 4)]);
        let engine = engine();

        engine.record_attempt(&mut store, Attempt::new("a", "x", sheet(2, 4))).unwrap();
        engine.record_attempt(&mut store, Attempt::new("b", "x", sheet(3, 4))).unwrap();
        let top = engine.record_attempt(&mut store, Attempt::new("c", "x", sheet(4, 4))).unwrap();

        assert_eq!(top.rank, Some(1));
        let ranks: Vec<_> = store.results.iter().map(|r| r.rank.unwrap()).collect();
        assert_eq!(ranks, vec![3, 2, 1]);
    }

    #[test]
    fn ranks_are_scoped_per_exam() {
        let mut store = store_with(vec![exam("x", 2), exam("y", 2)]);
        let engine = engine();

        engine.record_attempt(&mut store, Attempt::new("a", "x", sheet(1, 2))).unwrap();
        let y = engine.record_attempt(&mut store, Attempt::new("a", "y", sheet(0, 2))).unwrap();
        let x2 = engine.record_attempt(&mut store, Attempt::new("b", "x", sheet(2, 2))).unwrap();

        assert_eq!(y.rank, Some(1));
        assert_eq!(x2.rank, Some(1));
        assert_eq!(store.results[0].rank, Some(2));
        assert_eq!(store.results[1].rank, Some(1));
    }

    #[test]
    fn ranks_form_a_permutation() {
        let mut store = store_with(vec![exam("x", 5)]);
        let engine = engine();
        let scores = [3, 5, 0, 3, 4, 1, 5, 2, 3];

        for (i, &correct) in scores.iter().enumerate() {
            engine
                .record_attempt(&mut store, Attempt::new(format!("u{i}"), "x", sheet(correct, 5)))
                .unwrap();
        }

        let mut ranks: Vec<u32> = store.results.iter().map(|r| r.rank.unwrap()).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=scores.len() as u32).collect::<Vec<_>>());

        let ranked = get_rankings(&store, "x").unwrap();
        for pair in ranked.windows(2) {
            assert!(pair[0].percentage >= pair[1].percentage);
            assert!(pair[0].rank < pair[1].rank);
            if pair[0].percentage == pair[1].percentage {
                assert!(pair[0].id < pair[1].id, "ties must keep insertion order");
            }
        }
    }

    #[test]
    fn unchanged_ranks_are_not_rewritten() {
        let mut store = store_with(vec![exam("x", 2)]);
        let engine = engine();

        engine.record_attempt(&mut store, Attempt::new("a", "x", sheet(2, 2))).unwrap();
        engine.record_attempt(&mut store, Attempt::new("b", "x", sheet(1, 2))).unwrap();
        // Each submission only wrote its own new rank.
        assert_eq!(store.updates, 2);

        recompute_ranks(&mut store, "x").unwrap();
        assert_eq!(store.updates, 2);
    }

    #[test]
    fn missing_exam_leaves_store_untouched() {
        let mut store = store_with(vec![exam("x", 2)]);
        let err = engine()
            .record_attempt(&mut store, Attempt::new("a", "gone", vec![Some(1), Some(1)]))
            .unwrap_err();

        assert!(matches!(err, GradingError::ExamNotFound(ref id) if id == "gone"));
        assert!(store.results.is_empty());
        assert_eq!(store.next_id, 0);
    }

    #[test]
    fn wrong_answer_count_is_rejected() {
        let mut store = store_with(vec![exam("x", 3)]);
        let err = engine()
            .record_attempt(&mut store, Attempt::new("a", "x", vec![Some(1)]))
            .unwrap_err();

        assert!(matches!(err, GradingError::InvalidAnswers(_)));
        assert!(store.results.is_empty());
    }

    #[test]
    fn empty_exam_grades_to_zero_by_default() {
        let mut store = store_with(vec![exam("empty", 0)]);
        let result = engine()
            .record_attempt(&mut store, Attempt::new("a", "empty", vec![]))
            .unwrap();

        assert_eq!(result.percentage, 0);
        assert_eq!(result.max_score, 0);
        assert_eq!(result.rank, Some(1));
    }

    #[test]
    fn empty_exam_can_be_refused() {
        let mut store = store_with(vec![exam("empty", 0)]);
        let engine = GradingEngine::new(EngineConfig {
            reject_empty_exams: true,
        });

        let err = engine
            .record_attempt(&mut store, Attempt::new("a", "empty", vec![]))
            .unwrap_err();
        assert!(matches!(err, GradingError::EmptyExam(_)));
        assert!(store.results.is_empty());
    }

    #[test]
    fn rankings_are_idempotent() {
        let mut store = store_with(vec![exam("x", 3)]);
        let engine = engine();
        for (user, correct) in [("a", 1), ("b", 3), ("c", 1)] {
            engine.record_attempt(&mut store, Attempt::new(user, "x", sheet(correct, 3))).unwrap();
        }

        let first = get_rankings(&store, "x").unwrap();
        let second = get_rankings(&store, "x").unwrap();
        assert_eq!(first, second);
        let users: Vec<_> = first.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(users, vec!["b", "a", "c"]);
    }

    #[test]
    fn user_results_newest_first() {
        let mut store = store_with(vec![exam("x", 2), exam("y", 2)]);
        let engine = engine();

        let first = engine.record_attempt(&mut store, Attempt::new("u", "x", sheet(1, 2))).unwrap();
        engine.record_attempt(&mut store, Attempt::new("other", "x", sheet(2, 2))).unwrap();
        let last = engine.record_attempt(&mut store, Attempt::new("u", "y", sheet(2, 2))).unwrap();

        let history = get_user_results(&store, "u").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, last.id);
        assert_eq!(history[1].id, first.id);
        assert!(history[0].completed_at > history[1].completed_at);
    }

    #[test]
    fn user_results_same_instant_latest_inserted_first() {
        let mut store = store_with(vec![exam("x", 2), exam("y", 2)]);
        let start = "2024-03-01T08:00:00Z".parse().unwrap();
        let engine = GradingEngine::with_clock(
            ManualClock::new(start, Duration::zero()),
            EngineConfig::default(),
        );

        let first = engine.record_attempt(&mut store, Attempt::new("u", "x", sheet(2, 2))).unwrap();
        let second = engine.record_attempt(&mut store, Attempt::new("u", "y", sheet(0, 2))).unwrap();
        let third = engine.record_attempt(&mut store, Attempt::new("u", "x", sheet(1, 2))).unwrap();
        assert_eq!(first.completed_at, third.completed_at);

        let ids: Vec<u64> = get_user_results(&store, "u").unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn store_failures_propagate() {
        struct Broken;
        impl ExamStore for Broken {
            fn get_exam(&self, _: &str) -> Result<Option<Exam>> {
                anyhow::bail!("storage offline")
            }
            fn results_for_exam(&self, _: &str) -> Result<Vec<ExamResult>> {
                anyhow::bail!("storage offline")
            }
            fn results_for_user(&self, _: &str) -> Result<Vec<ExamResult>> {
                anyhow::bail!("storage offline")
            }
            fn next_result_id(&mut self) -> Result<u64> {
                anyhow::bail!("storage offline")
            }
            fn append_result(&mut self, _: ExamResult) -> Result<()> {
                anyhow::bail!("storage offline")
            }
            fn update_result(&mut self, _: &ExamResult) -> Result<()> {
                anyhow::bail!("storage offline")
            }
        }

        let err = engine()
            .record_attempt(&mut Broken, Attempt::new("a", "x", vec![]))
            .unwrap_err();
        assert!(matches!(err, GradingError::Store(_)));
        assert_eq!(err.to_string(), "storage offline");
    }
}

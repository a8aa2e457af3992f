//! End-to-end pipeline tests across the library crates.
//!
//! These tests drive the full flow (catalog import, question generation,
//! grading, ranking, review) against a JSON data file.

use chrono::{DateTime, Duration, Utc};

use examranger_core::model::{parse_answers, Attempt};
use examranger_core::parser::parse_catalog;
use examranger_core::report::ResultReport;
use examranger_core::statistics::compute_exam_stats;
use examranger_core::traits::ManualClock;
use examranger_core::{get_rankings, get_user_results, EngineConfig, GradingEngine};
use examranger_generator::{generate_for_subject, TemplateGenerator};
use examranger_report::generate_rankings_html;
use examranger_store::{ExamDraft, JsonFileStore, QuestionDraft};

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../catalogs/programming.toml");

fn start() -> DateTime<Utc> {
    "2024-05-01T08:00:00Z".parse().unwrap()
}

#[test]
fn e2e_import_grade_and_rank() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    let catalog = parse_catalog(std::path::Path::new(CATALOG)).unwrap();
    store.update(|s| s.import_catalog(catalog)).unwrap();

    let engine = GradingEngine::with_clock(
        ManualClock::new(start(), Duration::minutes(1)),
        EngineConfig::default(),
    );
    let submissions = [("ann", "1,1,1,1"), ("ben", "0,0,0,0"), ("cat", "1,1,-,0"), ("dan", "1,1,0,1")];
    for (user, answers) in submissions {
        let attempt = Attempt::new(user, "rust-basics", parse_answers(answers).unwrap());
        store.update(|s| engine.record_attempt(s, attempt)).unwrap();
    }

    // Reopen to make sure ranks were persisted, not just held in memory.
    let store = JsonFileStore::open(&path).unwrap();
    let rankings = get_rankings(store.store(), "rust-basics").unwrap();
    let order: Vec<(&str, u32, Option<u32>)> = rankings
        .iter()
        .map(|r| (r.user_id.as_str(), r.percentage, r.rank))
        .collect();
    assert_eq!(
        order,
        vec![
            ("ann", 100, Some(1)),
            ("dan", 75, Some(2)),
            ("cat", 50, Some(3)),
            ("ben", 0, Some(4)),
        ]
    );

    let stats = compute_exam_stats("rust-basics", &rankings);
    assert_eq!(stats.average_percentage, 56);
    assert_eq!(stats.pass_rate, 0.75);

    let exam = store.store().exam("rust-basics").unwrap();
    let html = generate_rankings_html(exam, &rankings, &stats);
    assert!(html.contains("Rust Basics"));
    assert!(html.find("ann").unwrap() < html.find("ben").unwrap());
}

#[test]
fn e2e_user_history_and_review() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::open(dir.path().join("data.json")).unwrap();
    let engine = GradingEngine::with_clock(
        ManualClock::new(start(), Duration::hours(1)),
        EngineConfig::default(),
    );

    let first = store
        .update(|s| engine.record_attempt(s, Attempt::new("eve", "1", vec![Some(1), Some(1)])))
        .unwrap();
    let second = store
        .update(|s| engine.record_attempt(s, Attempt::new("eve", "2", vec![Some(0), None])))
        .unwrap();

    let history = get_user_results(store.store(), "eve").unwrap();
    assert_eq!(history[0].id, second.id);
    assert_eq!(history[1].id, first.id);

    let exam = store.store().exam("2").unwrap();
    let report = ResultReport::build(exam, &history[0]);
    assert_eq!(report.correct, 0);
    assert_eq!(report.incorrect, 1);
    assert_eq!(report.unanswered, 1);
    assert!(report.result.feedback.starts_with("Needs improvement"));
}

#[tokio::test]
async fn e2e_generated_exam_is_gradable() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::open(dir.path().join("data.json")).unwrap();
    let subject = store.store().subject("2").unwrap().clone();

    let generator = TemplateGenerator::instant();
    let questions = generate_for_subject(&generator, &subject, 10, Some(11)).await.unwrap();
    let answers = questions.iter().map(|q| Some(q.correct_answer)).collect();

    let exam = store
        .update(|s| {
            s.create_exam(ExamDraft {
                title: "Generated Mathematics".into(),
                description: String::new(),
                subject_id: subject.id.clone(),
                duration: 30,
                questions: questions.into_iter().map(QuestionDraft::from).collect(),
                is_active: true,
            })
        })
        .unwrap();

    let engine = GradingEngine::new(EngineConfig::default());
    let attempt = Attempt::new("zoe", exam.id.clone(), answers);
    let result = store.update(|s| engine.record_attempt(s, attempt)).unwrap();
    assert_eq!(result.score, 10);
    assert_eq!(result.percentage, 100);
    assert_eq!(result.rank, Some(1));
}

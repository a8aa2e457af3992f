//! The complete persisted state of an examranger store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use examranger_core::model::{Exam, ExamResult, Question, Subject};

/// Everything a store holds, in the shape written to the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub exams: Vec<Exam>,
    /// Results in submission order.
    #[serde(default)]
    pub results: Vec<ExamResult>,
    /// Last result id handed out; 0 when none have been.
    #[serde(default)]
    pub last_result_id: u64,
}

impl Snapshot {
    /// The demo catalog a fresh installation starts with: two subjects and
    /// one short exam for each.
    pub fn seed() -> Self {
        let at: DateTime<Utc> = DateTime::from_timestamp(1_672_531_200, 0).unwrap_or_default();

        let subjects = vec![
            Subject {
                id: "1".into(),
                name: "Computer Science".into(),
                syllabus: "Programming fundamentals, Data structures, Algorithms, Web development, \
                           Database systems, Software engineering principles, Object-oriented programming, \
                           System design, Network protocols, Security basics"
                    .into(),
                created_at: at,
                updated_at: at,
            },
            Subject {
                id: "2".into(),
                name: "Mathematics".into(),
                syllabus: "Algebra, Calculus, Geometry, Trigonometry, Statistics, Probability, \
                           Linear algebra, Differential equations, Number theory, Mathematical logic"
                    .into(),
                created_at: at,
                updated_at: at,
            },
        ];

        let exams = vec![
            Exam {
                id: "1".into(),
                title: "Computer Science Fundamentals".into(),
                description: "Test your knowledge of programming basics, data structures, and algorithms."
                    .into(),
                subject_id: "1".into(),
                duration: 30,
                questions: vec![
                    seed_question(
                        "1",
                        "What is the time complexity of binary search?",
                        &["O(1)", "O(log n)", "O(n)", "O(n²)"],
                        1,
                        "Binary search has a time complexity of O(log n) as it divides the search space in half with each iteration.",
                    ),
                    seed_question(
                        "2",
                        "Which data structure follows LIFO principle?",
                        &["Queue", "Stack", "Tree", "Graph"],
                        1,
                        "A Stack follows the Last In, First Out (LIFO) principle.",
                    ),
                ],
                is_active: true,
                created_at: at,
                updated_at: at,
            },
            Exam {
                id: "2".into(),
                title: "Mathematics Quiz".into(),
                description: "Test your mathematical skills including algebra, calculus, and geometry."
                    .into(),
                subject_id: "2".into(),
                duration: 45,
                questions: vec![
                    seed_question(
                        "3",
                        "What is the derivative of x²?",
                        &["x", "2x", "x²", "2x²"],
                        1,
                        "The derivative of x² is 2x using the power rule.",
                    ),
                    seed_question(
                        "4",
                        "What is the area of a circle with radius r?",
                        &["πr", "πr²", "2πr", "2πr²"],
                        1,
                        "The area of a circle is πr².",
                    ),
                ],
                is_active: true,
                created_at: at,
                updated_at: at,
            },
        ];

        Self {
            subjects,
            exams,
            results: Vec::new(),
            last_result_id: 0,
        }
    }

    /// Problems that make this snapshot unusable as a store.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let max_id = self.results.iter().map(|r| r.id).max().unwrap_or(0);
        if max_id > self.last_result_id {
            issues.push(format!(
                "result id {max_id} exceeds last allocated id {}",
                self.last_result_id
            ));
        }

        let mut ids: Vec<u64> = self.results.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            issues.push("duplicate result ids".to_string());
        }

        issues
    }
}

fn seed_question(id: &str, text: &str, options: &[&str], correct: usize, explanation: &str) -> Question {
    Question {
        id: id.into(),
        text: text.into(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: correct,
        explanation: Some(explanation.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_well_formed() {
        let seed = Snapshot::seed();
        assert_eq!(seed.subjects.len(), 2);
        assert_eq!(seed.exams.len(), 2);
        assert!(seed.results.is_empty());
        assert!(seed.integrity_issues().is_empty());
        for exam in &seed.exams {
            assert!(seed.subjects.iter().any(|s| s.id == exam.subject_id));
            for q in &exam.questions {
                assert!(q.issues().is_empty(), "{:?}", q.issues());
            }
        }
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = serde_json::to_value(Snapshot::seed()).unwrap();
        assert!(json.get("lastResultId").is_some());
        assert_eq!(json["exams"][0]["subjectId"], "1");
        assert_eq!(json["exams"][0]["questions"][0]["correctAnswer"], 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }
}

//! Core data model types for examranger.
//!
//! These are the records persisted by the store and exchanged between the
//! grading engine, the generator, and the CLI. Field names serialize in
//! camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GradingError;

/// Fewest options a question may offer.
pub const MIN_OPTIONS: usize = 2;
/// Most options a question may offer.
pub const MAX_OPTIONS: usize = 8;

/// A selected option index, or `None` when the question was left unanswered.
pub type Answer = Option<usize>;

/// A subject groups exams and carries the syllabus used for generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// Comma-separated list of topics.
    pub syllabus: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subject {
    /// Non-empty, trimmed syllabus topics in declaration order.
    pub fn topics(&self) -> Vec<&str> {
        split_topics(&self.syllabus)
    }
}

/// Split a comma-separated syllabus into trimmed, non-empty topics.
pub fn split_topics(syllabus: &str) -> Vec<&str> {
    syllabus
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Identifier, unique within its exam.
    pub id: String,
    /// The prompt shown to the test-taker.
    pub text: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: usize,
    /// Optional explanation shown when reviewing a result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Describe every way this question violates the model invariants.
    ///
    /// An empty vector means the question is well formed.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.text.trim().is_empty() {
            issues.push("question text is empty".to_string());
        }
        if self.options.len() < MIN_OPTIONS {
            issues.push(format!(
                "question has {} option(s), at least {MIN_OPTIONS} required",
                self.options.len()
            ));
        }
        if self.options.len() > MAX_OPTIONS {
            issues.push(format!(
                "question has {} options, at most {MAX_OPTIONS} allowed",
                self.options.len()
            ));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            issues.push("all options must have content".to_string());
        }
        if self.correct_answer >= self.options.len() {
            issues.push(format!(
                "correct answer {} is out of range for {} options",
                self.correct_answer,
                self.options.len()
            ));
        }

        issues
    }

    /// Whether `answer` selects the correct option.
    pub fn is_correct(&self, answer: Answer) -> bool {
        answer == Some(self.correct_answer)
    }
}

/// An exam: an ordered list of questions taken under a time limit.
///
/// Question order is significant: answer `i` of an attempt is graded against
/// question `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub subject_id: String,
    /// Time limit in minutes.
    pub duration: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Exam {
    /// Number of questions, which is also the maximum score.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// A submission: one answer per question of the exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub user_id: String,
    pub exam_id: String,
    pub answers: Vec<Answer>,
}

impl Attempt {
    pub fn new(user_id: impl Into<String>, exam_id: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            user_id: user_id.into(),
            exam_id: exam_id.into(),
            answers,
        }
    }
}

/// The graded outcome of an attempt.
///
/// Created once at submission time. Only `rank` changes afterwards, when a
/// later submission for the same exam reorders the standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    /// Store-allocated, strictly increasing identifier.
    pub id: u64,
    pub exam_id: String,
    pub user_id: String,
    /// Number of correct answers.
    pub score: u32,
    /// Number of questions at submission time.
    pub max_score: u32,
    /// `round(score / max_score * 100)`, or 0 for an empty exam.
    pub percentage: u32,
    pub answers: Vec<Answer>,
    pub completed_at: DateTime<Utc>,
    /// 1-based position among all results for the same exam.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    pub feedback: String,
}

/// Parse an answer list such as `"1,0,-,2"`.
///
/// Entries are zero-based option indices; `-` or an empty entry marks an
/// unanswered question. Anything else is rejected rather than coerced.
pub fn parse_answers(input: &str) -> Result<Vec<Answer>, GradingError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .enumerate()
        .map(|(i, raw)| {
            let entry = raw.trim();
            if entry.is_empty() || entry == "-" {
                return Ok(None);
            }
            entry.parse::<usize>().map(Some).map_err(|_| {
                GradingError::InvalidAnswers(format!(
                    "answer {} is not an option index: '{entry}'",
                    i + 1
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], correct: usize) -> Question {
        Question {
            id: "q1".into(),
            text: "Which data structure follows LIFO?".into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct,
            explanation: None,
        }
    }

    #[test]
    fn well_formed_question_has_no_issues() {
        let q = question(&["Queue", "Stack", "Tree", "Graph"], 1);
        assert!(q.issues().is_empty());
        assert!(q.is_correct(Some(1)));
        assert!(!q.is_correct(Some(0)));
        assert!(!q.is_correct(None));
    }

    #[test]
    fn question_issues_detected() {
        let q = question(&["Only"], 3);
        let issues = q.issues();
        assert!(issues.iter().any(|i| i.contains("at least 2")));
        assert!(issues.iter().any(|i| i.contains("out of range")));

        let q = question(&["a", " ", "c"], 0);
        assert!(q.issues().iter().any(|i| i.contains("content")));

        let nine = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];
        assert!(question(&nine, 0).issues().iter().any(|i| i.contains("at most 8")));
    }

    #[test]
    fn parse_answer_list() {
        assert_eq!(
            parse_answers("1, 0,-,2").unwrap(),
            vec![Some(1), Some(0), None, Some(2)]
        );
        assert_eq!(parse_answers("3,,1").unwrap(), vec![Some(3), None, Some(1)]);
        assert!(parse_answers("").unwrap().is_empty());
    }

    #[test]
    fn parse_answer_list_rejects_garbage() {
        let err = parse_answers("1,x,2").unwrap_err();
        assert!(matches!(err, GradingError::InvalidAnswers(_)));
        assert!(parse_answers("-1").is_err());
        assert!(parse_answers("1.5").is_err());
    }

    #[test]
    fn syllabus_topics_are_trimmed() {
        assert_eq!(
            split_topics("Algebra, Calculus ,, Geometry "),
            vec!["Algebra", "Calculus", "Geometry"]
        );
    }

    #[test]
    fn result_serializes_camel_case_without_rank() {
        let result = ExamResult {
            id: 7,
            exam_id: "1".into(),
            user_id: "2".into(),
            score: 1,
            max_score: 2,
            percentage: 50,
            answers: vec![Some(1), None],
            completed_at: "2023-05-15T10:30:00Z".parse().unwrap(),
            rank: None,
            feedback: "Fair.".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["maxScore"], 2);
        assert_eq!(json["answers"][1], serde_json::Value::Null);
        assert!(json.get("rank").is_none());
    }
}

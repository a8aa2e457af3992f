//! TOML exam catalog parser.
//!
//! Loads subjects and exams from TOML files and directories, and validates
//! them before they are imported into a store.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;

use crate::model::{Exam, Question, Subject};

/// A parsed catalog: the subjects and exams declared in one or more files.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
    pub exams: Vec<Exam>,
}

impl Catalog {
    pub fn question_count(&self) -> usize {
        self.exams.iter().map(|e| e.questions.len()).sum()
    }

    fn extend(&mut self, other: Catalog) {
        self.subjects.extend(other.subjects);
        self.exams.extend(other.exams);
    }
}

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    subjects: Vec<TomlSubject>,
    #[serde(default)]
    exams: Vec<TomlExam>,
}

#[derive(Debug, Deserialize)]
struct TomlSubject {
    id: String,
    name: String,
    #[serde(default)]
    syllabus: String,
}

#[derive(Debug, Deserialize)]
struct TomlExam {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    subject: String,
    #[serde(default = "default_duration")]
    duration: u32,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

fn default_duration() -> u32 {
    30
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    id: Option<String>,
    text: String,
    options: Vec<String>,
    correct: usize,
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
///
/// Questions without an explicit id are numbered from 1 in file order.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    let now = Utc::now();

    let subjects = parsed
        .subjects
        .into_iter()
        .map(|s| Subject {
            id: s.id,
            name: s.name,
            syllabus: s.syllabus,
            created_at: now,
            updated_at: now,
        })
        .collect();

    let exams = parsed
        .exams
        .into_iter()
        .map(|e| Exam {
            id: e.id,
            title: e.title,
            description: e.description,
            subject_id: e.subject,
            duration: e.duration,
            questions: e
                .questions
                .into_iter()
                .enumerate()
                .map(|(i, q)| Question {
                    id: q.id.unwrap_or_else(|| (i + 1).to_string()),
                    text: q.text,
                    options: q.options,
                    correct_answer: q.correct,
                    explanation: q.explanation,
                })
                .collect(),
            is_active: e.active,
            created_at: now,
            updated_at: now,
        })
        .collect();

    Ok(Catalog { subjects, exams })
}

/// Recursively load all `.toml` catalog files from a directory into one
/// catalog. Files that fail to parse are skipped with a warning.
pub fn load_catalog_directory(dir: &Path) -> Result<Catalog> {
    let mut catalog = Catalog::default();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            catalog.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(parsed) => catalog.extend(parsed),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalog)
}

/// Load a catalog from a file or a directory of files.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if path.is_dir() {
        load_catalog_directory(path)
    } else {
        parse_catalog(path)
    }
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The exam or subject ID (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn for_item(id: &str, message: impl Into<String>) -> Self {
        Self {
            item_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a catalog for common issues.
///
/// `known_subjects` lists subject ids that already exist outside this
/// catalog (for example in the target store).
pub fn validate_catalog(catalog: &Catalog, known_subjects: &[String]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate subject IDs
    let mut seen_subjects = HashSet::new();
    for subject in &catalog.subjects {
        if !seen_subjects.insert(subject.id.as_str()) {
            warnings.push(ValidationWarning::for_item(
                &subject.id,
                format!("duplicate subject ID: {}", subject.id),
            ));
        }
        if subject.name.trim().is_empty() {
            warnings.push(ValidationWarning::for_item(&subject.id, "subject name is empty"));
        }
        if subject.topics().len() < 3 {
            warnings.push(ValidationWarning::for_item(
                &subject.id,
                "syllabus has fewer than 3 topics; question generation will refuse it",
            ));
        }
    }

    // Duplicate exam IDs
    let mut seen_exams = HashSet::new();
    for exam in &catalog.exams {
        if !seen_exams.insert(exam.id.as_str()) {
            warnings.push(ValidationWarning::for_item(
                &exam.id,
                format!("duplicate exam ID: {}", exam.id),
            ));
        }
    }

    for exam in &catalog.exams {
        if !seen_subjects.contains(exam.subject_id.as_str())
            && !known_subjects.iter().any(|s| s == &exam.subject_id)
        {
            warnings.push(ValidationWarning::for_item(
                &exam.id,
                format!("unknown subject: {}", exam.subject_id),
            ));
        }
        if exam.title.trim().is_empty() {
            warnings.push(ValidationWarning::for_item(&exam.id, "exam title is empty"));
        }
        if exam.duration == 0 {
            warnings.push(ValidationWarning::for_item(
                &exam.id,
                "duration must be at least 1 minute",
            ));
        }
        if exam.questions.is_empty() {
            warnings.push(ValidationWarning::for_item(
                &exam.id,
                "exam has no questions; every attempt will score 0%",
            ));
        }
        if !exam.is_active {
            warnings.push(ValidationWarning::for_item(&exam.id, "exam is inactive"));
        }

        let mut seen_questions = HashSet::new();
        for (i, question) in exam.questions.iter().enumerate() {
            if !seen_questions.insert(question.id.as_str()) {
                warnings.push(ValidationWarning::for_item(
                    &exam.id,
                    format!("duplicate question ID: {}", question.id),
                ));
            }
            for issue in question.issues() {
                warnings.push(ValidationWarning::for_item(
                    &exam.id,
                    format!("question {}: {issue}", i + 1),
                ));
            }
        }
    }

    warnings
}

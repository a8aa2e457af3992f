//! In-memory store and catalog administration.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use examranger_core::model::{Exam, ExamResult, Question, Subject};
use examranger_core::parser::Catalog;
use examranger_core::traits::ExamStore;

use crate::error::CatalogError;
use crate::snapshot::Snapshot;

/// Minimum syllabus length accepted for a subject.
pub const MIN_SYLLABUS_LEN: usize = 10;

/// Fields supplied when creating a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectDraft {
    pub name: String,
    pub syllabus: String,
}

/// Fields supplied when creating an exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub subject_id: String,
    pub duration: u32,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Fields supplied when adding a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl From<Question> for QuestionDraft {
    fn from(q: Question) -> Self {
        Self {
            text: q.text,
            options: q.options,
            correct_answer: q.correct_answer,
            explanation: q.explanation,
        }
    }
}

impl QuestionDraft {
    fn into_question(self) -> Question {
        Question {
            id: new_id(),
            text: self.text,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
        }
    }
}

/// Counts from a catalog import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub subjects_added: usize,
    pub subjects_replaced: usize,
    pub exams_added: usize,
    pub exams_replaced: usize,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A store that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Snapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the demo catalog.
    pub fn seeded() -> Self {
        Self::from_snapshot(Snapshot::seed())
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    /// All results in submission order.
    pub fn results(&self) -> &[ExamResult] {
        &self.snapshot.results
    }

    pub fn result(&self, result_id: u64) -> Option<&ExamResult> {
        self.snapshot.results.iter().find(|r| r.id == result_id)
    }

    // -----------------------------------------------------------------------
    // Subjects
    // -----------------------------------------------------------------------

    pub fn subjects(&self) -> &[Subject] {
        &self.snapshot.subjects
    }

    pub fn subject(&self, subject_id: &str) -> Option<&Subject> {
        self.snapshot.subjects.iter().find(|s| s.id == subject_id)
    }

    pub fn create_subject(&mut self, draft: SubjectDraft) -> Result<Subject, CatalogError> {
        validate_subject_fields(&draft.name, &draft.syllabus)?;
        let now = Utc::now();
        let subject = Subject {
            id: new_id(),
            name: draft.name.trim().to_string(),
            syllabus: draft.syllabus,
            created_at: now,
            updated_at: now,
        };
        tracing::info!(subject_id = %subject.id, name = %subject.name, "subject created");
        self.snapshot.subjects.push(subject.clone());
        Ok(subject)
    }

    pub fn update_subject(&mut self, mut subject: Subject) -> Result<Subject, CatalogError> {
        validate_subject_fields(&subject.name, &subject.syllabus)?;
        let slot = self
            .snapshot
            .subjects
            .iter_mut()
            .find(|s| s.id == subject.id)
            .ok_or_else(|| CatalogError::SubjectNotFound(subject.id.clone()))?;
        subject.created_at = slot.created_at;
        subject.updated_at = Utc::now();
        *slot = subject.clone();
        tracing::info!(subject_id = %subject.id, "subject updated");
        Ok(subject)
    }

    /// Delete a subject. Refused while exams still reference it.
    pub fn delete_subject(&mut self, subject_id: &str) -> Result<Subject, CatalogError> {
        let exam_count = self.exams_by_subject(subject_id).len();
        if exam_count > 0 {
            return Err(CatalogError::SubjectInUse {
                subject_id: subject_id.to_string(),
                exam_count,
            });
        }
        let index = self
            .snapshot
            .subjects
            .iter()
            .position(|s| s.id == subject_id)
            .ok_or_else(|| CatalogError::SubjectNotFound(subject_id.to_string()))?;
        tracing::info!(subject_id, "subject deleted");
        Ok(self.snapshot.subjects.remove(index))
    }

    // -----------------------------------------------------------------------
    // Exams
    // -----------------------------------------------------------------------

    pub fn exams(&self) -> &[Exam] {
        &self.snapshot.exams
    }

    pub fn exam(&self, exam_id: &str) -> Option<&Exam> {
        self.snapshot.exams.iter().find(|e| e.id == exam_id)
    }

    pub fn exams_by_subject(&self, subject_id: &str) -> Vec<&Exam> {
        self.snapshot
            .exams
            .iter()
            .filter(|e| e.subject_id == subject_id)
            .collect()
    }

    pub fn create_exam(&mut self, draft: ExamDraft) -> Result<Exam, CatalogError> {
        let now = Utc::now();
        let exam = Exam {
            id: new_id(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            subject_id: draft.subject_id,
            duration: draft.duration,
            questions: draft
                .questions
                .into_iter()
                .map(QuestionDraft::into_question)
                .collect(),
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };
        self.validate_exam(&exam)?;
        tracing::info!(
            exam_id = %exam.id,
            title = %exam.title,
            questions = exam.questions.len(),
            "exam created"
        );
        self.snapshot.exams.push(exam.clone());
        Ok(exam)
    }

    pub fn update_exam(&mut self, mut exam: Exam) -> Result<Exam, CatalogError> {
        self.validate_exam(&exam)?;
        let slot = self.exam_mut(&exam.id)?;
        exam.created_at = slot.created_at;
        exam.updated_at = Utc::now();
        *slot = exam.clone();
        tracing::info!(exam_id = %exam.id, "exam updated");
        Ok(exam)
    }

    /// Delete an exam. Results already recorded against it are kept.
    pub fn delete_exam(&mut self, exam_id: &str) -> Result<Exam, CatalogError> {
        let index = self
            .snapshot
            .exams
            .iter()
            .position(|e| e.id == exam_id)
            .ok_or_else(|| CatalogError::ExamNotFound(exam_id.to_string()))?;
        tracing::info!(exam_id, "exam deleted");
        Ok(self.snapshot.exams.remove(index))
    }

    // -----------------------------------------------------------------------
    // Questions
    // -----------------------------------------------------------------------

    pub fn add_question(&mut self, exam_id: &str, draft: QuestionDraft) -> Result<Question, CatalogError> {
        let question = draft.into_question();
        validate_question(&question)?;
        let exam = self.exam_mut(exam_id)?;
        exam.questions.push(question.clone());
        exam.updated_at = Utc::now();
        tracing::debug!(exam_id, question_id = %question.id, "question added");
        Ok(question)
    }

    pub fn update_question(&mut self, exam_id: &str, question: Question) -> Result<Question, CatalogError> {
        validate_question(&question)?;
        let exam = self.exam_mut(exam_id)?;
        let slot = exam
            .questions
            .iter_mut()
            .find(|q| q.id == question.id)
            .ok_or_else(|| CatalogError::QuestionNotFound {
                exam_id: exam_id.to_string(),
                question_id: question.id.clone(),
            })?;
        *slot = question.clone();
        exam.updated_at = Utc::now();
        Ok(question)
    }

    pub fn delete_question(&mut self, exam_id: &str, question_id: &str) -> Result<Question, CatalogError> {
        let exam = self.exam_mut(exam_id)?;
        let index = exam
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or_else(|| CatalogError::QuestionNotFound {
                exam_id: exam_id.to_string(),
                question_id: question_id.to_string(),
            })?;
        exam.updated_at = Utc::now();
        Ok(exam.questions.remove(index))
    }

    // -----------------------------------------------------------------------
    // Import
    // -----------------------------------------------------------------------

    /// Insert or replace the subjects and exams of a parsed catalog,
    /// keeping their ids.
    ///
    /// Everything is validated before anything is written, so a failed
    /// import leaves the store unchanged.
    pub fn import_catalog(&mut self, catalog: Catalog) -> Result<ImportSummary, CatalogError> {
        for subject in &catalog.subjects {
            validate_subject_fields(&subject.name, &subject.syllabus)?;
        }
        for exam in &catalog.exams {
            let subject_known = catalog.subjects.iter().any(|s| s.id == exam.subject_id)
                || self.subject(&exam.subject_id).is_some();
            if !subject_known {
                return Err(CatalogError::SubjectNotFound(exam.subject_id.clone()));
            }
            validate_exam_fields(exam)?;
        }

        let mut summary = ImportSummary::default();
        for subject in catalog.subjects {
            match self.snapshot.subjects.iter_mut().find(|s| s.id == subject.id) {
                Some(slot) => {
                    *slot = subject;
                    summary.subjects_replaced += 1;
                }
                None => {
                    self.snapshot.subjects.push(subject);
                    summary.subjects_added += 1;
                }
            }
        }
        for exam in catalog.exams {
            match self.snapshot.exams.iter_mut().find(|e| e.id == exam.id) {
                Some(slot) => {
                    *slot = exam;
                    summary.exams_replaced += 1;
                }
                None => {
                    self.snapshot.exams.push(exam);
                    summary.exams_added += 1;
                }
            }
        }

        tracing::info!(?summary, "catalog imported");
        Ok(summary)
    }

    fn exam_mut(&mut self, exam_id: &str) -> Result<&mut Exam, CatalogError> {
        self.snapshot
            .exams
            .iter_mut()
            .find(|e| e.id == exam_id)
            .ok_or_else(|| CatalogError::ExamNotFound(exam_id.to_string()))
    }

    fn validate_exam(&self, exam: &Exam) -> Result<(), CatalogError> {
        if self.subject(&exam.subject_id).is_none() {
            return Err(CatalogError::SubjectNotFound(exam.subject_id.clone()));
        }
        validate_exam_fields(exam)
    }
}

fn validate_subject_fields(name: &str, syllabus: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::invalid("subject", "subject name is required"));
    }
    if syllabus.trim().chars().count() < MIN_SYLLABUS_LEN {
        return Err(CatalogError::invalid(
            "subject",
            format!("syllabus must be at least {MIN_SYLLABUS_LEN} characters long"),
        ));
    }
    Ok(())
}

fn validate_exam_fields(exam: &Exam) -> Result<(), CatalogError> {
    if exam.title.trim().is_empty() {
        return Err(CatalogError::invalid("exam", "exam title is required"));
    }
    if exam.duration == 0 {
        return Err(CatalogError::invalid("exam", "duration must be a positive number of minutes"));
    }
    let mut seen = std::collections::HashSet::new();
    for question in &exam.questions {
        if !seen.insert(question.id.as_str()) {
            return Err(CatalogError::Duplicate {
                kind: "question",
                id: question.id.clone(),
            });
        }
        validate_question(question)?;
    }
    Ok(())
}

fn validate_question(question: &Question) -> Result<(), CatalogError> {
    match question.issues().into_iter().next() {
        Some(issue) => Err(CatalogError::invalid("question", issue)),
        None => Ok(()),
    }
}

impl ExamStore for MemoryStore {
    fn get_exam(&self, exam_id: &str) -> Result<Option<Exam>> {
        Ok(self.exam(exam_id).cloned())
    }

    fn results_for_exam(&self, exam_id: &str) -> Result<Vec<ExamResult>> {
        Ok(self
            .snapshot
            .results
            .iter()
            .filter(|r| r.exam_id == exam_id)
            .cloned()
            .collect())
    }

    fn results_for_user(&self, user_id: &str) -> Result<Vec<ExamResult>> {
        Ok(self
            .snapshot
            .results
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    fn next_result_id(&mut self) -> Result<u64> {
        self.snapshot.last_result_id += 1;
        Ok(self.snapshot.last_result_id)
    }

    fn append_result(&mut self, result: ExamResult) -> Result<()> {
        if self.result(result.id).is_some() {
            anyhow::bail!("result {} already exists", result.id);
        }
        self.snapshot.results.push(result);
        Ok(())
    }

    fn update_result(&mut self, result: &ExamResult) -> Result<()> {
        let slot = self
            .snapshot
            .results
            .iter_mut()
            .find(|r| r.id == result.id)
            .ok_or_else(|| anyhow::anyhow!("result {} not found", result.id))?;
        *slot = result.clone();
        Ok(())
    }
}

//! examranger-store: Storage adapters and catalog administration.
//!
//! Implements the `ExamStore` trait for an in-memory arena and for a JSON
//! data file, and provides the subject/exam/question administration the
//! grading engine does not need but every host application does.

pub mod config;
pub mod error;
pub mod json;
pub mod memory;
pub mod snapshot;

pub use config::{load_config, load_config_from, ExamrangerConfig, GeneratorSettings};
pub use error::CatalogError;
pub use json::JsonFileStore;
pub use memory::{ExamDraft, ImportSummary, MemoryStore, QuestionDraft, SubjectDraft};
pub use snapshot::Snapshot;

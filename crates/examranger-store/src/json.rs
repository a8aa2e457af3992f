//! A store persisted to a single JSON data file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::memory::MemoryStore;
use crate::snapshot::Snapshot;

/// A [`MemoryStore`] backed by a JSON data file.
///
/// Reads go through [`JsonFileStore::store`]. Every change goes through
/// [`JsonFileStore::update`], which writes the whole snapshot once.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the data file at `path`.
    ///
    /// A missing file starts from the seed catalog. A file that cannot be
    /// parsed, or whose results are inconsistent, is replaced by the seed
    /// catalog with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read data file: {}", path.display()))?;
            match serde_json::from_str::<Snapshot>(&content) {
                Ok(snapshot) => {
                    let issues = snapshot.integrity_issues();
                    if issues.is_empty() {
                        tracing::debug!(
                            path = %path.display(),
                            exams = snapshot.exams.len(),
                            results = snapshot.results.len(),
                            "data file loaded"
                        );
                        snapshot
                    } else {
                        tracing::warn!(
                            path = %path.display(),
                            ?issues,
                            "data file is inconsistent, resetting to seed data"
                        );
                        Snapshot::seed()
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "data file is corrupt, resetting to seed data"
                    );
                    Snapshot::seed()
                }
            }
        } else {
            tracing::info!(path = %path.display(), "no data file, starting from seed data");
            Snapshot::seed()
        };

        Ok(Self {
            path,
            inner: MemoryStore::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &MemoryStore {
        &self.inner
    }

    /// Write the current state to disk.
    ///
    /// The data is written to a sibling temp file and renamed over the
    /// target, so a crash never leaves a half-written data file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory: {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(self.inner.snapshot())
            .context("failed to serialize store")?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace data file: {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "data file saved");
        Ok(())
    }

    /// Apply a change to the store and persist it if the change succeeds.
    ///
    /// If `f` fails or the data file cannot be written, the in-memory state
    /// is rolled back and the file on disk is left untouched.
    pub fn update<T, E>(&mut self, f: impl FnOnce(&mut MemoryStore) -> Result<T, E>) -> Result<T>
    where
        E: Into<anyhow::Error>,
    {
        let before = self.inner.clone();
        let value = match f(&mut self.inner) {
            Ok(value) => value,
            Err(e) => {
                self.inner = before;
                return Err(e.into());
            }
        };
        if let Err(e) = self.save() {
            self.inner = before;
            return Err(e);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::memory::SubjectDraft;
    use examranger_core::engine::{get_rankings, EngineConfig, GradingEngine};
    use examranger_core::model::Attempt;
    use examranger_core::traits::ExamStore;

    #[test]
    fn missing_file_starts_from_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data.json")).unwrap();
        assert_eq!(store.store().snapshot(), &Snapshot::seed());
        assert!(!store.path().exists());
    }

    #[test]
    fn results_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let engine = GradingEngine::new(EngineConfig::default());

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store
                .update(|s| {
                    engine.record_attempt(s, Attempt::new("alice", "1", vec![Some(1), Some(1)]))
                })
                .unwrap();
        }

        let mut store = JsonFileStore::open(&path).unwrap();
        let result = store
            .update(|s| engine.record_attempt(s, Attempt::new("bob", "1", vec![Some(0), Some(1)])))
            .unwrap();
        assert_eq!(result.id, 2);
        assert_eq!(result.rank, Some(2));

        let reopened = JsonFileStore::open(&path).unwrap();
        let rankings = get_rankings(reopened.store(), "1").unwrap();
        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings[0].user_id, "alice");
        assert_eq!(rankings[0].rank, Some(1));
    }

    #[test]
    fn corrupt_file_resets_to_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.store().snapshot(), &Snapshot::seed());
    }

    #[test]
    fn inconsistent_ids_reset_to_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let engine = GradingEngine::new(EngineConfig::default());
        store
            .update(|s| engine.record_attempt(s, Attempt::new("alice", "1", vec![None, None])))
            .unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        raw["lastResultId"] = serde_json::json!(0);
        std::fs::write(&path, raw.to_string()).unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.store().results().is_empty());
    }

    #[test]
    fn update_persists_only_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let mut store = JsonFileStore::open(&path).unwrap();

        let subject = store
            .update(|s| {
                s.create_subject(SubjectDraft {
                    name: "Physics".into(),
                    syllabus: "Mechanics, Optics, Thermodynamics".into(),
                })
            })
            .unwrap();
        assert!(path.exists());

        let err = store
            .update(|s| s.delete_subject("missing"))
            .unwrap_err();
        assert!(err.downcast_ref::<CatalogError>().is_some());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.store().subject(&subject.id).is_some());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_save_leaves_disk_and_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let engine = GradingEngine::new(EngineConfig::default());

        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .update(|s| engine.record_attempt(s, Attempt::new("alice", "1", vec![Some(1), None])))
            .unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();

        // A directory in the temp file's place makes the write fail.
        let tmp = path.with_extension("json.tmp");
        std::fs::create_dir(&tmp).unwrap();
        let err = store
            .update(|s| engine.record_attempt(s, Attempt::new("bob", "1", vec![Some(1), Some(1)])))
            .unwrap_err();
        assert!(err.to_string().contains("failed to write"));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), on_disk);
        let results = store.store().results_for_exam("1").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user_id, "alice");
        assert_eq!(results[0].rank, Some(1));
        assert_eq!(store.store().snapshot().last_result_id, 1);

        std::fs::remove_dir(&tmp).unwrap();
        let result = store
            .update(|s| engine.record_attempt(s, Attempt::new("bob", "1", vec![Some(1), Some(1)])))
            .unwrap();
        assert_eq!(result.id, 2);
        assert_eq!(result.rank, Some(1));

        let reopened = JsonFileStore::open(&path).unwrap();
        let ranked: Vec<_> = get_rankings(reopened.store(), "1")
            .unwrap()
            .into_iter()
            .map(|r| (r.user_id, r.rank))
            .collect();
        assert_eq!(
            ranked,
            vec![("bob".to_string(), Some(1)), ("alice".to_string(), Some(2))]
        );
    }
}

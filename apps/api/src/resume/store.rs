//! Flat-file record store: one JSON array of resumes, rewritten whole on every save.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::resume::models::ResumeRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct ResumeStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl ResumeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every saved record. A missing file is an empty store; so is an
    /// unreadable one, which is logged and will be overwritten on next save.
    pub async fn load(&self) -> Result<Vec<ResumeRecord>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        match serde_json::from_str::<Vec<ResumeRecord>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    "Resume store {} is not a valid record array ({e}); treating as empty",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Appends one record and writes the whole array back. Returns the new count.
    pub async fn append(&self, record: ResumeRecord) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        records.push(record);

        let body = serde_json::to_string_pretty(&records)?;
        self.write_atomically(body.as_bytes()).await?;

        info!(
            "Saved resume to {} ({} total)",
            self.path.display(),
            records.len()
        );
        Ok(records.len())
    }

    async fn write_atomically(&self, body: &[u8]) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        tokio::fs::write(&tmp, body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)
    }
}

/// Sorted, de-duplicated union of all skills across `records`.
pub fn all_skills(records: &[ResumeRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.skills.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Records holding every one of `selected` (exact match). No selection keeps all.
pub fn filter_by_skills<'a>(
    records: &'a [ResumeRecord],
    selected: &[String],
) -> Vec<&'a ResumeRecord> {
    records
        .iter()
        .filter(|r| selected.iter().all(|skill| r.has_skill(skill)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, skills: &[&str]) -> ResumeRecord {
        ResumeRecord {
            name: Some(name.to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resumes.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resumes.json"));

        assert_eq!(store.append(record("A", &["Rust"])).await.unwrap(), 1);
        let second = record("Zoë", &["SQL", "Python"]);
        assert_eq!(store.append(second.clone()).await.unwrap(), 2);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.last(), Some(&second));
    }

    #[tokio::test]
    async fn test_file_is_pretty_json_array_with_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("resumes.json"));
        store.append(record("Zoë", &[])).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n  {"));
        assert!(raw.contains("Zoë"));
        assert!(!dir.path().join("resumes.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_treated_as_empty_and_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumes.json");
        std::fs::write(&path, "not json").unwrap();
        let store = ResumeStore::new(&path);

        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.append(record("A", &[])).await.unwrap(), 1);
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(ResumeStore::new(dir.path().join("resumes.json")));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(record(&format!("R{i}"), &[])).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.load().await.unwrap().len(), 8);
    }

    #[test]
    fn test_all_skills_sorted_unique() {
        let records = vec![
            record("A", &["SQL", "Python"]),
            record("B", &["Python", "Go"]),
        ];
        assert_eq!(all_skills(&records), vec!["Go", "Python", "SQL"]);
    }

    #[test]
    fn test_filter_by_skills_is_and_filter() {
        let records = vec![
            record("A", &["SQL", "Python"]),
            record("B", &["Python"]),
            record("C", &["SQL"]),
        ];
        let selected = vec!["Python".to_string(), "SQL".to_string()];
        let names: Vec<_> = filter_by_skills(&records, &selected)
            .iter()
            .filter_map(|r| r.name.as_deref())
            .collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_filter_without_selection_keeps_everything() {
        let records = vec![record("A", &[]), record("B", &["Go"])];
        assert_eq!(filter_by_skills(&records, &[]).len(), 2);
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let records = vec![record("A", &["python"])];
        assert!(filter_by_skills(&records, &["Python".to_string()]).is_empty());
    }
}

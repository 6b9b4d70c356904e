//! Best-score persistence.
//!
//! The engine never touches storage: a [`crate::session::Session`] reads the
//! stored best score once per game and writes it back whenever a move reports
//! a new best. Stores are a single integer slot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed best-score record: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single persisted integer: the best score ever reached.
pub trait BestScoreStore {
    /// The stored best score, 0 if nothing has been stored yet.
    fn load(&self) -> Result<u64, StoreError>;
    fn save(&mut self, best_score: u64) -> Result<(), StoreError>;
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for Box<S> {
    fn load(&self) -> Result<u64, StoreError> { (**self).load() }
    fn save(&mut self, best_score: u64) -> Result<(), StoreError> { (**self).save(best_score) }
}

/// Keeps the best score for the lifetime of the process only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best_score: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_best_score(best_score: u64) -> Self {
        MemoryStore { best_score: Some(best_score) }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> { Ok(self.best_score.unwrap_or(0)) }

    fn save(&mut self, best_score: u64) -> Result<(), StoreError> {
        self.best_score = Some(best_score);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    best_score: u64,
}

/// Stores `{"best_score": N}` in a JSON file.
///
/// A missing file reads as 0. Writes go to a temporary sibling which is then
/// renamed over the target, so a crash never leaves a half-written record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileStore { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BestScoreStore for JsonFileStore {
    fn load(&self) -> Result<u64, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let record: Record = serde_json::from_slice(&bytes)?;
                Ok(record.best_score)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, best_score: u64) -> Result<(), StoreError> {
        let data = serde_json::to_vec(&Record { best_score })?;
        let tmp = self.temp_path();
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_defaults_to_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), 0);
        store.save(2048).unwrap();
        assert_eq!(store.load().unwrap(), 2048);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("best.json");
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), 0);
        store.save(1234).unwrap();
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), 1234);
        assert!(!dir.path().join("best.json.tmp").exists());
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"{"best_score":1234}"#);
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("best.json");
        fs::write(&path, "not json").unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn file_store_reports_unwritable_path() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("missing").join("best.json"));
        let err = store.save(8).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}

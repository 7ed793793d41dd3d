//! Solved-path persistence backends
//!
//! - Memory: shared in-process storage for tests and ephemeral play
//! - JSON file: pretty-printed save file on disk

use crate::error::StorageError;
use crate::position::WordPath;
use crate::store::canonical_word;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Everything the core needs to survive a restart.
/// A word is solved exactly when it has an entry in `solved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Grid size the records were traced on
    #[serde(default)]
    pub grid_size: usize,
    /// Canonical uppercase word -> traced path
    #[serde(default)]
    pub solved: BTreeMap<String, WordPath>,
}

fn default_version() -> u32 {
    SAVE_VERSION
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            grid_size: 0,
            solved: BTreeMap::new(),
        }
    }
}

impl SaveData {
    pub fn new(grid_size: usize, solved: &BTreeMap<String, WordPath>) -> Self {
        Self {
            version: SAVE_VERSION,
            grid_size,
            solved: solved.clone(),
        }
    }

    pub fn is_solved(&self, word: &str) -> bool {
        self.solved.contains_key(&canonical_word(word))
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let mut data: SaveData = serde_json::from_str(json)?;
        // Older files may carry lowercase keys
        data.solved = std::mem::take(&mut data.solved)
            .into_iter()
            .map(|(word, path)| (canonical_word(&word), path))
            .collect();
        Ok(data)
    }
}

/// Trait for solved-path storage
pub trait SolvedRecordBackend {
    /// Load the saved records; an absent save is empty data, not an error
    fn load(&self) -> Result<SaveData, StorageError>;

    /// Replace the saved records
    fn save(&self, data: &SaveData) -> Result<(), StorageError>;

    /// Check if backend is available
    fn is_available(&self) -> bool;

    /// Get backend name for display
    fn backend_name(&self) -> &'static str;
}

// ==================== Memory Backend ====================

/// In-memory storage. Clones share the same data, so a test can keep a
/// handle and inspect what was saved.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    data: Arc<Mutex<SaveData>>,
    available: Arc<AtomicBool>,
    saves: Arc<Mutex<usize>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_data(SaveData::default())
    }

    pub fn with_data(data: SaveData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            available: Arc::new(AtomicBool::new(true)),
            saves: Arc::new(Mutex::new(0)),
        }
    }

    /// Simulate storage going away
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Snapshot of the stored data
    pub fn snapshot(&self) -> SaveData {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SolvedRecordBackend for MemoryBackend {
    fn load(&self) -> Result<SaveData, StorageError> {
        if !self.is_available() {
            return Err(StorageError::Unavailable(self.backend_name()));
        }
        Ok(self.snapshot())
    }

    fn save(&self, data: &SaveData) -> Result<(), StorageError> {
        if !self.is_available() {
            return Err(StorageError::Unavailable(self.backend_name()));
        }
        *self.data.lock().unwrap_or_else(|e| e.into_inner()) = data.clone();
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn backend_name(&self) -> &'static str {
        "Memory"
    }
}

// ==================== JSON File Backend ====================

/// Pretty-printed JSON save file
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SolvedRecordBackend for JsonFileBackend {
    fn load(&self) -> Result<SaveData, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => SaveData::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SaveData::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, data: &SaveData) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data.to_json()?)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("saved {} solved words to {}", data.solved.len(), self.path.display());
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "JSON file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn sample() -> SaveData {
        let mut solved = BTreeMap::new();
        solved.insert(
            "CAT".to_string(),
            WordPath::new(vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 1),
            ]),
        );
        SaveData::new(6, &solved)
    }

    #[test]
    fn test_memory_backend() {
        let backend = MemoryBackend::new();
        let handle = backend.clone();

        backend.save(&sample()).unwrap();
        assert_eq!(handle.save_count(), 1);
        assert!(handle.snapshot().is_solved("cat"));
        assert_eq!(backend.load().unwrap(), sample());
    }

    #[test]
    fn test_memory_unavailable() {
        let backend = MemoryBackend::new();
        backend.set_available(false);

        assert!(!backend.is_available());
        assert!(matches!(backend.load(), Err(StorageError::Unavailable("Memory"))));
        assert!(backend.save(&sample()).is_err());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("save.json"));

        assert_eq!(backend.load().unwrap(), SaveData::default());

        backend.save(&sample()).unwrap();
        assert_eq!(backend.load().unwrap(), sample());
        assert!(!dir.path().join("nested").join("save.json.tmp").exists());
    }

    #[test]
    fn test_json_format() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["grid_size"], 6);
        assert_eq!(value["solved"]["CAT"], serde_json::json!([[0, 0], [0, 1], [1, 1]]));
    }

    #[test]
    fn test_lowercase_keys_canonicalized() {
        let data = SaveData::from_json(r#"{"solved": {"cat": [[0, 0], [0, 1], [0, 2]]}}"#).unwrap();
        assert_eq!(data.version, SAVE_VERSION);
        assert!(data.solved.contains_key("CAT"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{ not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(backend.load(), Err(StorageError::Json(_))));
    }
}

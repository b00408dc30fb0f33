//! High score persistence
//!
//! The leaderboard is one JSON list stored under a single key. Backends:
//! - `MemoryStore`: in-process, for tests and headless runs
//! - `FileStore`: JSON file (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Store failures never interrupt play: reads degrade to an empty board and
//! failed writes are logged and dropped.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::highscores::{HighScoreRecord, HighScores};

/// Key the leaderboard blob is stored under
pub const HIGH_SCORES_KEY: &str = "gridChallengeHighScores";

/// Errors from a score store
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read high scores: {0}")]
    Read(String),

    #[error("Failed to write high scores: {0}")]
    Write(String),

    #[error("Corrupt high score data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load/save of the persisted record list
pub trait ScoreStore {
    fn load(&self) -> Result<Vec<HighScoreRecord>, PersistenceError>;
    fn save(&mut self, records: &[HighScoreRecord]) -> Result<(), PersistenceError>;
}

/// Parse a stored blob; a missing blob is an empty list
pub fn decode_records(blob: Option<&str>) -> Result<Vec<HighScoreRecord>, PersistenceError> {
    match blob {
        Some(json) => Ok(serde_json::from_str(json)?),
        None => Ok(Vec::new()),
    }
}

pub fn encode_records(records: &[HighScoreRecord]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(records)?)
}

/// Whole leaderboard, empty if the store cannot be read
pub fn load_high_scores<S: ScoreStore + ?Sized>(store: &S) -> HighScores {
    match store.load() {
        Ok(records) => {
            log::info!("Loaded {} high scores", records.len());
            HighScores::from_records(records)
        }
        Err(e) => {
            log::warn!("Could not load high scores: {}", e);
            HighScores::new()
        }
    }
}

/// Best score for a level, 0 if none or if the store cannot be read
pub fn best_score<S: ScoreStore + ?Sized>(store: &S, level: u8) -> u32 {
    match store.load() {
        Ok(records) => HighScores::from_records(records).best_score(level),
        Err(e) => {
            log::warn!("Could not load high score: {}", e);
            0
        }
    }
}

/// Add a finished session to the leaderboard.
/// Returns the rank achieved, or None if trimmed or if the store failed.
pub fn record_session<S: ScoreStore + ?Sized>(store: &mut S, record: HighScoreRecord) -> Option<usize> {
    // Never overwrite a blob we could not read
    let records = match store.load() {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Could not save high score: {}", e);
            return None;
        }
    };

    let mut scores = HighScores::from_records(records);
    let rank = scores.add_record(record);

    match store.save(&scores.entries) {
        Ok(()) => {
            log::info!("High scores saved ({} entries)", scores.len());
            rank
        }
        Err(e) => {
            log::warn!("Could not save high score: {}", e);
            None
        }
    }
}

/// In-memory store holding the serialized blob
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { blob: None }
    }

    /// Start from an existing (possibly corrupt) blob
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<HighScoreRecord>, PersistenceError> {
        decode_records(self.blob.as_deref())
    }

    fn save(&mut self, records: &[HighScoreRecord]) -> Result<(), PersistenceError> {
        self.blob = Some(encode_records(records)?);
        Ok(())
    }
}

//! Browser LocalStorage score store (wasm32)

use super::{HIGH_SCORES_KEY, PersistenceError, ScoreStore, decode_records, encode_records};
use crate::highscores::HighScoreRecord;

/// Leaderboard blob kept under `HIGH_SCORES_KEY`
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .ok_or_else(|| PersistenceError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| PersistenceError::Unavailable("LocalStorage disabled".into()))
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Vec<HighScoreRecord>, PersistenceError> {
        let blob = Self::storage()?
            .get_item(HIGH_SCORES_KEY)
            .map_err(|e| PersistenceError::Read(format!("{:?}", e)))?;
        decode_records(blob.as_deref())
    }

    fn save(&mut self, records: &[HighScoreRecord]) -> Result<(), PersistenceError> {
        let json = encode_records(records)?;
        Self::storage()?
            .set_item(HIGH_SCORES_KEY, &json)
            .map_err(|e| PersistenceError::Write(format!("{:?}", e)))
    }
}

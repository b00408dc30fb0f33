//! JSON file score store (native)

use std::fs;
use std::path::{Path, PathBuf};

use super::{PersistenceError, ScoreStore, decode_records, encode_records};
use crate::highscores::HighScoreRecord;

/// Default file name, alongside the working directory
pub const DEFAULT_SCORES_FILE: &str = "grid_challenge_scores.json";

/// Stores the leaderboard blob in a file. Writes go to `<path>.tmp` first and
/// are renamed over the old file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<Vec<HighScoreRecord>, PersistenceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        decode_records(Some(&json))
    }

    fn save(&mut self, records: &[HighScoreRecord]) -> Result<(), PersistenceError> {
        let json = encode_records(records)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

//! High score leaderboard and session scoring
//!
//! Records for every level share one persisted list; each level keeps its
//! best 10 by score, then accuracy.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES_PER_LEVEL;
use crate::format_clock;
use crate::sim::SessionState;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub level: u8,
    /// Rounds scored in the session
    pub score: u32,
    /// Percentage of attempted rounds completed
    pub accuracy: u32,
    /// Unix timestamp (ms) when achieved; 0 for records saved without one
    #[serde(default)]
    pub timestamp: f64,
}

impl HighScoreRecord {
    /// Higher score first, then higher accuracy
    fn ranking(a: &Self, b: &Self) -> Ordering {
        b.score.cmp(&a.score).then(b.accuracy.cmp(&a.accuracy))
    }
}

/// High score leaderboard for all levels
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_records(entries: Vec<HighScoreRecord>) -> Self {
        Self { entries }
    }

    /// Add a record, trimming its level to the best 10.
    /// Returns the rank achieved within the level (1-indexed) or None if it was trimmed.
    pub fn add_record(&mut self, record: HighScoreRecord) -> Option<usize> {
        let level = record.level;
        let (mut ranked, others): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.level == level);

        // Stored lists are not trusted to be ordered; stable sort keeps ties in insertion order
        ranked.sort_by(HighScoreRecord::ranking);

        // Insert after every entry that ranks at least as high
        let pos = ranked
            .iter()
            .position(|e| HighScoreRecord::ranking(&record, e) == Ordering::Less)
            .unwrap_or(ranked.len());
        ranked.insert(pos, record);
        ranked.truncate(MAX_HIGH_SCORES_PER_LEVEL);

        self.entries = others;
        self.entries.extend(ranked);

        (pos < MAX_HIGH_SCORES_PER_LEVEL).then_some(pos + 1)
    }

    /// A level's entries, best first
    pub fn entries_for(&self, level: u8) -> Vec<&HighScoreRecord> {
        let mut ranked: Vec<_> = self.entries.iter().filter(|e| e.level == level).collect();
        ranked.sort_by(|a, b| HighScoreRecord::ranking(a, b));
        ranked
    }

    /// Best score recorded for a level, 0 if none
    pub fn best_score(&self, level: u8) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.score)
            .max()
            .unwrap_or(0)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Percentage of attempted rounds that were completed, rounded
pub fn accuracy(rounds_completed: u32, rounds_attempted: u32) -> u32 {
    let attempted = rounds_attempted.max(1) as f64;
    (rounds_completed as f64 / attempted * 100.0).round() as u32
}

/// End-of-session performance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceRating {
    Outstanding,
    Excellent,
    Good,
    Progress,
    RoomForImprovement,
    TryAgain,
}

impl PerformanceRating {
    pub fn from_accuracy(accuracy: u32) -> Self {
        match accuracy {
            90.. => PerformanceRating::Outstanding,
            75..=89 => PerformanceRating::Excellent,
            60..=74 => PerformanceRating::Good,
            40..=59 => PerformanceRating::Progress,
            20..=39 => PerformanceRating::RoomForImprovement,
            _ => PerformanceRating::TryAgain,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PerformanceRating::Outstanding => "Outstanding performance! You're a memory master!",
            PerformanceRating::Excellent => "Excellent work! Your focus is impressive!",
            PerformanceRating::Good => "Good job! You're developing strong skills!",
            PerformanceRating::Progress => "Keep practicing! You're making progress!",
            PerformanceRating::RoomForImprovement => "Not bad! Room for improvement!",
            PerformanceRating::TryAgain => "Try again for better results!",
        }
    }
}

/// Results shown on the end screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub level: u8,
    pub score: u32,
    pub rounds_attempted: u32,
    pub rounds_completed: u32,
    pub accuracy: u32,
    /// Seconds played, never more than the session length
    pub time_played_secs: u32,
    pub rating: PerformanceRating,
}

impl SessionSummary {
    pub fn from_state(state: &SessionState, session_duration_secs: u32) -> Self {
        let accuracy = accuracy(state.rounds_completed, state.rounds_attempted);
        let played = (state.elapsed_ms / 1000).min(session_duration_secs as u64) as u32;
        Self {
            level: state.selected_level,
            score: state.score,
            rounds_attempted: state.rounds_attempted,
            rounds_completed: state.rounds_completed,
            accuracy,
            time_played_secs: played,
            rating: PerformanceRating::from_accuracy(accuracy),
        }
    }

    /// Attempted rounds as displayed (at least 1)
    pub fn rounds_attempted_display(&self) -> u32 {
        self.rounds_attempted.max(1)
    }

    pub fn time_played_display(&self) -> String {
        format_clock(self.time_played_secs)
    }

    /// Leaderboard entry for this session
    pub fn to_record(&self, timestamp: f64) -> HighScoreRecord {
        HighScoreRecord {
            level: self.level,
            score: self.score,
            accuracy: self.accuracy,
            timestamp,
        }
    }
}

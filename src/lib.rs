//! Grid Challenge - a memory and perception mini-game
//!
//! Core modules:
//! - `sim`: Round/phase state machine, pattern and dot layout generation, timers
//! - `highscores`: Per-level leaderboard and session scoring
//! - `persistence`: Score storage backends (LocalStorage on web, JSON file natively)
//! - `renderer`: Presentation interface the simulation drives
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Data-driven level and timing configuration

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::GridChallenge;
pub use highscores::{HighScoreRecord, HighScores, PerformanceRating, SessionSummary};
pub use settings::{LevelConfig, PatternComplexity, PhaseKind, PhaseSpec, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step in milliseconds (also the phase timer refresh rate)
    pub const TICK_MS: u32 = 100;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Full play period of one session
    pub const SESSION_DURATION_SECS: u32 = 360;
    /// How long a newly memorized dot stays highlighted
    pub const DOT_HIGHLIGHT_SECS: u32 = 3;
    /// Pause after an answer or a completed recall before moving on
    pub const FEEDBACK_DELAY_MS: u32 = 500;
    /// Pause between the end of one round and the start of the next
    pub const NEXT_ROUND_DELAY_MS: u32 = 1000;
    /// How often the phase timer reports its remaining time
    pub const TIMER_REPORT_INTERVAL_MS: u32 = 100;

    /// Symmetry patterns are SIZE x SIZE cells
    pub const SYMMETRY_GRID_SIZE: usize = 8;

    /// Dot grid defaults (800x600 minus 48px padding)
    pub const TOTAL_DOTS: usize = 60;
    pub const GRID_WIDTH: f32 = 752.0;
    pub const GRID_HEIGHT: f32 = 552.0;
    /// Rendered dot diameter; positions leave room for it on the far edges
    pub const DOT_SIZE: f32 = 20.0;
    /// Rejection-sampling budget per dot before the spacing rule is waived
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Leaderboard entries kept per level
    pub const MAX_HIGH_SCORES_PER_LEVEL: usize = 10;
}

/// Format whole seconds as `m:ss`
#[inline]
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

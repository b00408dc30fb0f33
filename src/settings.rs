//! Level definitions and game timing settings
//!
//! Defaults reproduce the built-in four-level game. A JSON override can be
//! persisted in LocalStorage (web) or pointed to by `GRID_CHALLENGE_SETTINGS`
//! (native).

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Unknown level {0} (expected 1-4)")]
    UnknownLevel(u8),
}

/// Kind of a timed step within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    /// Show the dot grid and highlight one more dot to memorize
    Highlight,
    /// Judge whether two patterns are mirror images
    Symmetry,
    /// Click the memorized dots in order
    Identify,
    /// Anything else found in a settings file; skipped at run time
    #[serde(other)]
    Unknown,
}

impl PhaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Highlight => "highlight",
            PhaseKind::Symmetry => "symmetry",
            PhaseKind::Identify => "identify",
            PhaseKind::Unknown => "unknown",
        }
    }

    /// Name shown in the HUD
    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseKind::Highlight => "Memory",
            PhaseKind::Symmetry => "Symmetry",
            PhaseKind::Identify => "Recall",
            PhaseKind::Unknown => "Unknown",
        }
    }
}

/// One timed step of a level's phase list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpec {
    #[serde(rename = "type")]
    pub kind: PhaseKind,
    #[serde(rename = "duration")]
    pub duration_secs: u32,
}

impl PhaseSpec {
    pub const fn new(kind: PhaseKind, duration_secs: u32) -> Self {
        Self {
            kind,
            duration_secs,
        }
    }
}

/// Which generator builds a level's symmetry patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatternComplexity {
    #[default]
    Simple,
    Moderate,
    Complex,
    Expert,
}

impl PatternComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternComplexity::Simple => "simple",
            PatternComplexity::Moderate => "moderate",
            PatternComplexity::Complex => "complex",
            PatternComplexity::Expert => "expert",
        }
    }
}

/// Symmetry-phase difficulty for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymmetryLevelSettings {
    /// Base chance that a pattern cell is filled
    pub filled_square_chance: f64,
    /// Chance that the right pattern is the exact mirror of the left
    pub symmetry_chance: f64,
    pub pattern_complexity: PatternComplexity,
}

/// A selectable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: u8,
    pub name: String,
    pub dots_to_memorize: usize,
    pub phases: Vec<PhaseSpec>,
    pub symmetry: SymmetryLevelSettings,
}

/// Highlight phase length in the built-in levels
pub const HIGHLIGHT_PHASE_SECS: u32 = 3;
/// Symmetry phase length in the built-in levels
pub const SYMMETRY_PHASE_SECS: u32 = 6;
/// Identify phase length in the built-in levels
pub const IDENTIFY_PHASE_SECS: u32 = 12;

impl LevelConfig {
    /// Build a level with one highlight+symmetry pair per dot and a final identify phase
    pub fn standard(
        level: u8,
        name: &str,
        dots_to_memorize: usize,
        symmetry: SymmetryLevelSettings,
    ) -> Self {
        let mut phases = Vec::with_capacity(dots_to_memorize * 2 + 1);
        for _ in 0..dots_to_memorize {
            phases.push(PhaseSpec::new(PhaseKind::Highlight, HIGHLIGHT_PHASE_SECS));
            phases.push(PhaseSpec::new(PhaseKind::Symmetry, SYMMETRY_PHASE_SECS));
        }
        phases.push(PhaseSpec::new(PhaseKind::Identify, IDENTIFY_PHASE_SECS));

        Self {
            level,
            name: name.to_string(),
            dots_to_memorize,
            phases,
            symmetry,
        }
    }

    /// The four built-in levels
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::standard(
                1,
                "Level 1 - Beginner",
                2,
                SymmetryLevelSettings {
                    filled_square_chance: 0.3,
                    symmetry_chance: 0.7,
                    pattern_complexity: PatternComplexity::Simple,
                },
            ),
            Self::standard(
                2,
                "Level 2 - Intermediate",
                3,
                SymmetryLevelSettings {
                    filled_square_chance: 0.4,
                    symmetry_chance: 0.6,
                    pattern_complexity: PatternComplexity::Moderate,
                },
            ),
            Self::standard(
                3,
                "Level 3 - Advanced",
                4,
                SymmetryLevelSettings {
                    filled_square_chance: 0.5,
                    symmetry_chance: 0.5,
                    pattern_complexity: PatternComplexity::Complex,
                },
            ),
            Self::standard(
                4,
                "Level 4 - Expert",
                5,
                SymmetryLevelSettings {
                    filled_square_chance: 0.6,
                    symmetry_chance: 0.45,
                    pattern_complexity: PatternComplexity::Expert,
                },
            ),
        ]
    }
}

/// Dot grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub total_dots: usize,
    pub width: f32,
    pub height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            total_dots: TOTAL_DOTS,
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Length of a session in seconds
    pub session_duration_secs: u32,
    /// How long a newly memorized dot stays highlighted
    pub highlight_display_secs: u32,
    /// Delay after an answer or a completed recall
    pub feedback_delay_ms: u32,
    /// Delay between rounds
    pub next_round_delay_ms: u32,
    /// Phase timer display refresh interval
    pub timer_report_interval_ms: u32,

    // === Layout ===
    pub grid: GridConfig,
    /// Symmetry patterns are this many cells per side
    pub symmetry_grid_size: usize,

    // === Levels ===
    pub levels: Vec<LevelConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_duration_secs: SESSION_DURATION_SECS,
            highlight_display_secs: DOT_HIGHLIGHT_SECS,
            feedback_delay_ms: FEEDBACK_DELAY_MS,
            next_round_delay_ms: NEXT_ROUND_DELAY_MS,
            timer_report_interval_ms: TIMER_REPORT_INTERVAL_MS,
            grid: GridConfig::default(),
            symmetry_grid_size: SYMMETRY_GRID_SIZE,
            levels: LevelConfig::builtin(),
        }
    }
}

impl Settings {
    /// Number of selectable levels
    pub const LEVEL_COUNT: u8 = 4;

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "grid_challenge_settings";

    /// Environment variable naming a settings file (native)
    #[allow(dead_code)]
    const SETTINGS_ENV: &'static str = "GRID_CHALLENGE_SETTINGS";

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Look up a level by its number (1-based)
    pub fn level(&self, level: u8) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Check the invariants the state machine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.len() != Self::LEVEL_COUNT as usize {
            return Err(ConfigError::Invalid(format!(
                "expected {} levels, found {}",
                Self::LEVEL_COUNT,
                self.levels.len()
            )));
        }
        for (i, level) in self.levels.iter().enumerate() {
            let expected = i as u8 + 1;
            if level.level != expected {
                return Err(ConfigError::Invalid(format!(
                    "level at position {} is numbered {}, expected {}",
                    i, level.level, expected
                )));
            }
            if level.dots_to_memorize > self.grid.total_dots {
                return Err(ConfigError::Invalid(format!(
                    "level {} memorizes {} dots but the grid only has {}",
                    level.level, level.dots_to_memorize, self.grid.total_dots
                )));
            }
            let chances = [
                level.symmetry.filled_square_chance,
                level.symmetry.symmetry_chance,
            ];
            if chances.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::Invalid(format!(
                    "level {} has a symmetry chance outside [0, 1]",
                    level.level
                )));
            }
        }
        if self.grid.width <= DOT_SIZE || self.grid.height <= DOT_SIZE {
            return Err(ConfigError::Invalid(format!(
                "dot grid {}x{} is too small",
                self.grid.width, self.grid.height
            )));
        }
        if self.session_duration_secs == 0 {
            return Err(ConfigError::Invalid("session duration is zero".into()));
        }
        if self.symmetry_grid_size == 0 {
            return Err(ConfigError::Invalid("symmetry grid size is zero".into()));
        }
        if self.timer_report_interval_ms == 0 {
            return Err(ConfigError::Invalid("timer report interval is zero".into()));
        }
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `GRID_CHALLENGE_SETTINGS`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_file(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Read and validate a settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

//! Session and round state
//!
//! A `Session` owns everything that lives for one timed play period. The
//! per-round part is reset at every round start; nothing here is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::Dot;
use super::pattern::Pattern;
use super::timer::{Delay, PhaseTimer, SessionClock};
use crate::highscores::SessionSummary;
use crate::settings::{ConfigError, LevelConfig, PhaseKind, Settings};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Start,
    LevelSelect,
    Game,
    End,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Start => "start",
            Screen::LevelSelect => "level",
            Screen::Game => "game",
            Screen::End => "end",
        }
    }
}

/// Which dot grid a layout is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotGrid {
    /// Highlight phase grid
    Memorize,
    /// Identify phase grid (clickable)
    Recall,
}

/// Where the round state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No session has started yet
    Idle,
    /// Showing the dot grid, possibly highlighting a new dot
    Highlight,
    /// Waiting for a symmetry answer
    Symmetry {
        is_symmetric: bool,
        /// Set once the player answers; further answers are ignored
        answer: Option<bool>,
    },
    /// Collecting dot clicks
    Identify {
        /// Set once the recall has been evaluated
        locked: bool,
    },
    /// Scored, waiting to start the next round
    RoundComplete,
    /// Session clock ran out
    GameOver,
}

/// What the phase timer does when it runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Highlight phases simply move on
    AdvancePhase,
    /// Unanswered symmetry question counts as wrong
    SymmetryTimeout,
    /// Evaluate whatever was clicked and finish the round
    IdentifyTimeout,
}

/// Actions deferred behind a feedback pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayedAction {
    /// Record the pending symmetry answer and advance
    RecordSymmetry,
    /// Recall already evaluated, finish the round
    CompleteRound,
    /// Begin the next round
    StartRound,
}

/// Everything the presentation layer needs to know about, in order
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SessionStarted { level: u8, seed: u64 },
    ClockChanged { remaining_secs: u32 },
    RoundStarted { round: u32 },
    PhaseEntered { kind: PhaseKind },
    DotsRendered { grid: DotGrid, dots: Vec<Dot> },
    DotHighlighted { id: u32, duration_ms: u32 },
    SymmetryShown { left: Pattern, right: Pattern },
    AnswerInputEnabled(bool),
    PhaseTimerChanged { remaining_secs: u32 },
    /// Number of dots clicked so far in the identify phase
    SequenceChanged { clicked: usize },
    DotClicked { id: u32 },
    WrongDotsFlagged { ids: Vec<u32> },
    PhaseResolved { kind: PhaseKind, correct: bool },
    RoundCompleted { round: u32, awarded: bool, score: u32 },
    SessionEnded { summary: SessionSummary },
}

/// Per-round state, discarded at round end
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    /// Layout shared by every phase of the round
    pub dots: Vec<Dot>,
    /// Dots to recall, in highlight order (never longer than dots_to_memorize)
    pub memorized_sequence: Vec<Dot>,
    /// Dot ids clicked in the identify phase (never longer than memorized_sequence)
    pub user_sequence: Vec<u32>,
    /// One entry per symmetry phase plus the identify phase
    pub phase_results: Vec<bool>,
    pub highlight_phase_count: usize,
    pub current_phase_index: usize,
}

impl RoundState {
    pub fn new(dots: Vec<Dot>) -> Self {
        Self {
            dots,
            ..Default::default()
        }
    }

    /// True iff the clicks match the memorized dots one-for-one, in order
    pub fn check_memory_sequence(&self) -> bool {
        self.user_sequence.len() == self.memorized_sequence.len()
            && self
                .user_sequence
                .iter()
                .zip(&self.memorized_sequence)
                .all(|(&clicked, dot)| clicked == dot.id)
    }

    /// A round scores only if every recorded phase was correct
    pub fn all_phases_correct(&self) -> bool {
        self.phase_results.iter().all(|&ok| ok)
    }

    pub fn has_dot(&self, id: u32) -> bool {
        self.dots.iter().any(|d| d.id == id)
    }

    pub fn is_memorized(&self, id: u32) -> bool {
        self.memorized_sequence.iter().any(|d| d.id == id)
    }
}

/// Session-wide counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub selected_level: u8,
    pub time_remaining_secs: u32,
    /// 1-based number of the round in progress
    pub current_round: u32,
    pub score: u32,
    pub rounds_completed: u32,
    pub rounds_attempted: u32,
    pub is_playing: bool,
    /// Wall time spent in the session
    pub elapsed_ms: u64,
}

impl SessionState {
    pub fn new(selected_level: u8, duration_secs: u32) -> Self {
        Self {
            selected_level,
            time_remaining_secs: duration_secs,
            current_round: 1,
            score: 0,
            rounds_completed: 0,
            rounds_attempted: 0,
            is_playing: false,
            elapsed_ms: 0,
        }
    }
}

/// One timed play period at a fixed level
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    /// The selected level's definition
    pub level: LevelConfig,
    pub state: SessionState,
    pub round: RoundState,
    pub phase: GamePhase,
    /// Set when the session clock runs out
    pub summary: Option<SessionSummary>,
    pub(crate) rng: Pcg32,
    pub(crate) clock: SessionClock,
    pub(crate) phase_timer: PhaseTimer<TimerAction>,
    pub(crate) delay: Delay<DelayedAction>,
}

impl Session {
    /// Create an idle session for `level`; `tick::start_session` starts the clock
    pub fn new(settings: Settings, level: u8, seed: u64) -> Result<Self, ConfigError> {
        let level_config = settings
            .level(level)
            .cloned()
            .ok_or(ConfigError::UnknownLevel(level))?;

        Ok(Self {
            seed,
            state: SessionState::new(level, settings.session_duration_secs),
            round: RoundState::default(),
            phase: GamePhase::Idle,
            summary: None,
            rng: Pcg32::seed_from_u64(seed),
            clock: SessionClock::new(settings.session_duration_secs),
            phase_timer: PhaseTimer::new(settings.timer_report_interval_ms),
            delay: Delay::default(),
            level: level_config,
            settings,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Whether a phase timer is counting down
    pub fn phase_timer_running(&self) -> bool {
        self.phase_timer.is_running()
    }

    /// Whether a feedback or next-round pause is pending
    pub fn delay_pending(&self) -> bool {
        self.delay.is_pending()
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logical countdowns advanced by `tick` only, no wall-clock callbacks
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod layout;
pub mod pattern;
pub mod state;
pub mod tick;
pub mod timer;

pub use layout::{Dot, generate_dots, min_distance};
pub use pattern::{Cell, Pattern, generate_pattern, mirror_pattern};
pub use state::{
    DelayedAction, DotGrid, GameEvent, GamePhase, RoundState, Screen, Session, SessionState,
    TimerAction,
};
pub use tick::{TickInput, end_session, start_session, tick};
pub use timer::{Delay, PhaseTimer, SessionClock, TimerUpdate};

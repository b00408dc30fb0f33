//! Presentation interface
//!
//! The simulation never touches the page. It emits `GameEvent`s and `present`
//! turns each one into calls on a `Renderer`.

pub mod headless;
#[cfg(test)]
pub(crate) mod recording;

pub use headless::LogRenderer;

use crate::format_clock;
use crate::highscores::SessionSummary;
use crate::settings::PhaseKind;
use crate::sim::{Dot, DotGrid, GameEvent, Pattern, Screen};

/// Title shown over the memorize grid
pub const HIGHLIGHT_TITLE: &str = "Memorize the highlighted dot";

/// Renderer setup failures
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Game cannot start - missing elements: {}", .0.join(", "))]
    MissingElements(Vec<String>),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Text fields in the game HUD and level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudField {
    /// Session clock, `m:ss`
    Clock,
    Level,
    Round,
    PhaseName,
    PhaseTitle,
    /// Best score for the selected level
    HighScore,
}

/// Everything the game needs from a presentation backend
pub trait Renderer {
    fn render_dots(&mut self, grid: DotGrid, dots: &[Dot]);
    fn render_symmetry_grids(&mut self, left: &Pattern, right: &Pattern);
    /// Highlight a memorize-grid dot for `duration_ms`
    fn highlight_dot(&mut self, id: u32, duration_ms: u32);
    fn show_screen(&mut self, screen: Screen);
    /// Show the container for one phase and hide the others
    fn show_phase(&mut self, kind: PhaseKind);
    fn update_timer_display(&mut self, remaining_secs: u32);
    fn update_sequence_display(&mut self, text: &str);
    fn mark_dot_clicked(&mut self, id: u32);
    fn flag_clicked_dots_wrong(&mut self, ids: &[u32]);
    fn set_answer_enabled(&mut self, enabled: bool);
    fn update_hud(&mut self, field: HudField, text: &str);
    fn show_results(&mut self, summary: &SessionSummary);
}

/// Identify-phase progress: "-" before any click, then "1 → 2 → …"
pub fn sequence_text(clicked: usize) -> String {
    if clicked == 0 {
        return "-".to_string();
    }
    (1..=clicked)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Apply one simulation event to the renderer
pub fn present<R: Renderer + ?Sized>(renderer: &mut R, event: &GameEvent) {
    match event {
        GameEvent::SessionStarted { level, .. } => {
            renderer.update_hud(HudField::Level, &level.to_string());
        }
        GameEvent::ClockChanged { remaining_secs } => {
            renderer.update_hud(HudField::Clock, &format_clock(*remaining_secs));
        }
        GameEvent::RoundStarted { round } => {
            renderer.update_hud(HudField::Round, &round.to_string());
        }
        GameEvent::PhaseEntered { kind } => {
            renderer.show_phase(*kind);
            renderer.update_hud(HudField::PhaseName, kind.display_name());
            if *kind == PhaseKind::Highlight {
                renderer.update_hud(HudField::PhaseTitle, HIGHLIGHT_TITLE);
            }
        }
        GameEvent::DotsRendered { grid, dots } => renderer.render_dots(*grid, dots),
        GameEvent::DotHighlighted { id, duration_ms } => renderer.highlight_dot(*id, *duration_ms),
        GameEvent::SymmetryShown { left, right } => renderer.render_symmetry_grids(left, right),
        GameEvent::AnswerInputEnabled(enabled) => renderer.set_answer_enabled(*enabled),
        GameEvent::PhaseTimerChanged { remaining_secs } => {
            renderer.update_timer_display(*remaining_secs)
        }
        GameEvent::SequenceChanged { clicked } => {
            renderer.update_sequence_display(&sequence_text(*clicked))
        }
        GameEvent::DotClicked { id } => renderer.mark_dot_clicked(*id),
        GameEvent::WrongDotsFlagged { ids } => renderer.flag_clicked_dots_wrong(ids),
        GameEvent::PhaseResolved { .. } | GameEvent::RoundCompleted { .. } => {}
        GameEvent::SessionEnded { summary } => renderer.show_results(summary),
    }
}

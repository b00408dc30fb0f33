//! Headless renderer that logs every call

use super::{HudField, Renderer};
use crate::highscores::SessionSummary;
use crate::settings::PhaseKind;
use crate::sim::{Dot, DotGrid, Pattern, Screen};

/// Logs renderer calls and remembers the visible screen
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub screen: Option<Screen>,
    /// Total renderer calls seen
    pub calls: usize,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn render_dots(&mut self, grid: DotGrid, dots: &[Dot]) {
        self.calls += 1;
        log::debug!("render {:?} grid: {} dots", grid, dots.len());
    }

    fn render_symmetry_grids(&mut self, left: &Pattern, right: &Pattern) {
        self.calls += 1;
        log::debug!(
            "render symmetry grids: {} / {} filled",
            left.filled_count(),
            right.filled_count()
        );
    }

    fn highlight_dot(&mut self, id: u32, duration_ms: u32) {
        self.calls += 1;
        log::debug!("highlight dot {} for {}ms", id, duration_ms);
    }

    fn show_screen(&mut self, screen: Screen) {
        self.calls += 1;
        log::info!("screen: {}", screen.as_str());
        self.screen = Some(screen);
    }

    fn show_phase(&mut self, kind: PhaseKind) {
        self.calls += 1;
        log::debug!("show phase: {}", kind.as_str());
    }

    fn update_timer_display(&mut self, remaining_secs: u32) {
        self.calls += 1;
        log::trace!("phase timer: {}", remaining_secs);
    }

    fn update_sequence_display(&mut self, text: &str) {
        self.calls += 1;
        log::debug!("sequence: {}", text);
    }

    fn mark_dot_clicked(&mut self, id: u32) {
        self.calls += 1;
        log::debug!("clicked dot {}", id);
    }

    fn flag_clicked_dots_wrong(&mut self, ids: &[u32]) {
        self.calls += 1;
        log::debug!("wrong recall: {:?}", ids);
    }

    fn set_answer_enabled(&mut self, enabled: bool) {
        self.calls += 1;
        log::debug!("answer buttons {}", if enabled { "enabled" } else { "disabled" });
    }

    fn update_hud(&mut self, field: HudField, text: &str) {
        self.calls += 1;
        log::debug!("{:?}: {}", field, text);
    }

    fn show_results(&mut self, summary: &SessionSummary) {
        self.calls += 1;
        log::info!(
            "results: score {}, accuracy {}% - {}",
            summary.score,
            summary.accuracy,
            summary.rating.message()
        );
    }
}

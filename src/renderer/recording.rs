//! Renderer that records every call, for tests

use super::{HudField, Renderer};
use crate::highscores::SessionSummary;
use crate::settings::PhaseKind;
use crate::sim::{Dot, DotGrid, Pattern, Screen};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Dots(DotGrid, usize),
    Symmetry(Pattern, Pattern),
    Highlight(u32, u32),
    Screen(Screen),
    ShowPhase(PhaseKind),
    PhaseTimer(u32),
    Sequence(String),
    Clicked(u32),
    Wrong(Vec<u32>),
    AnswerEnabled(bool),
    Hud(HudField, String),
    Results(SessionSummary),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub calls: Vec<Call>,
}

impl RecordingRenderer {
    /// Most recent text written to a HUD field
    pub fn hud(&self, field: HudField) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Hud(f, text) if *f == field => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn last_screen(&self) -> Option<Screen> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Screen(s) => Some(*s),
            _ => None,
        })
    }

    pub fn results(&self) -> Option<&SessionSummary> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Results(s) => Some(s),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn render_dots(&mut self, grid: DotGrid, dots: &[Dot]) {
        self.calls.push(Call::Dots(grid, dots.len()));
    }

    fn render_symmetry_grids(&mut self, left: &Pattern, right: &Pattern) {
        self.calls.push(Call::Symmetry(left.clone(), right.clone()));
    }

    fn highlight_dot(&mut self, id: u32, duration_ms: u32) {
        self.calls.push(Call::Highlight(id, duration_ms));
    }

    fn show_screen(&mut self, screen: Screen) {
        self.calls.push(Call::Screen(screen));
    }

    fn show_phase(&mut self, kind: PhaseKind) {
        self.calls.push(Call::ShowPhase(kind));
    }

    fn update_timer_display(&mut self, remaining_secs: u32) {
        self.calls.push(Call::PhaseTimer(remaining_secs));
    }

    fn update_sequence_display(&mut self, text: &str) {
        self.calls.push(Call::Sequence(text.to_string()));
    }

    fn mark_dot_clicked(&mut self, id: u32) {
        self.calls.push(Call::Clicked(id));
    }

    fn flag_clicked_dots_wrong(&mut self, ids: &[u32]) {
        self.calls.push(Call::Wrong(ids.to_vec()));
    }

    fn set_answer_enabled(&mut self, enabled: bool) {
        self.calls.push(Call::AnswerEnabled(enabled));
    }

    fn update_hud(&mut self, field: HudField, text: &str) {
        self.calls.push(Call::Hud(field, text.to_string()));
    }

    fn show_results(&mut self, summary: &SessionSummary) {
        self.calls.push(Call::Results(summary.clone()));
    }
}

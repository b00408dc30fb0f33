//! DOM renderer (web only)
//!
//! Looks every element up once at startup. Missing required elements abort
//! initialization; optional ones are skipped when absent.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::highscores::SessionSummary;
use crate::renderer::{HudField, RenderError, Renderer};
use crate::settings::PhaseKind;
use crate::sim::{Cell, Dot, DotGrid, Pattern, Screen};

/// Elements the game cannot run without
pub const REQUIRED_ELEMENTS: [&str; 12] = [
    "startScreen",
    "levelScreen",
    "gameScreen",
    "endScreen",
    "startButton",
    "dotGrid",
    "leftGrid",
    "rightGrid",
    "identifyGrid",
    "timer",
    "currentLevel",
    "currentRound",
];

pub struct DomRenderer {
    document: Document,
    start_screen: Element,
    level_screen: Element,
    game_screen: Element,
    end_screen: Element,
    dot_grid: Element,
    left_grid: Element,
    right_grid: Element,
    identify_grid: Element,
    timer: Element,
    current_level: Element,
    current_round: Element,
    /// Phase whose timer display is live
    active_phase: Option<PhaseKind>,
}

impl DomRenderer {
    /// Resolve all required elements, listing every missing id on failure
    pub fn new() -> Result<Self, RenderError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| RenderError::Platform("no document".into()))?;

        let missing: Vec<String> = REQUIRED_ELEMENTS
            .iter()
            .filter(|id| document.get_element_by_id(id).is_none())
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            log::error!("Missing critical elements: {:?}", missing);
            return Err(RenderError::MissingElements(missing));
        }

        let get = |id: &str| {
            document
                .get_element_by_id(id)
                .ok_or_else(|| RenderError::MissingElements(vec![id.to_string()]))
        };

        let renderer = Self {
            start_screen: get("startScreen")?,
            level_screen: get("levelScreen")?,
            game_screen: get("gameScreen")?,
            end_screen: get("endScreen")?,
            dot_grid: get("dotGrid")?,
            left_grid: get("leftGrid")?,
            right_grid: get("rightGrid")?,
            identify_grid: get("identifyGrid")?,
            timer: get("timer")?,
            current_level: get("currentLevel")?,
            current_round: get("currentRound")?,
            active_phase: None,
            document,
        };
        log::info!("All elements initialized successfully");
        Ok(renderer)
    }

    fn optional(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.optional(id) {
            el.set_text_content(Some(text));
        }
    }

    fn create_div(&self, class: &str) -> Option<Element> {
        match self.document.create_element("div") {
            Ok(el) => {
                el.set_class_name(class);
                Some(el)
            }
            Err(e) => {
                log::warn!("Failed to create element: {:?}", e);
                None
            }
        }
    }

    fn find_dot(container: &Element, id: u32) -> Option<Element> {
        container
            .query_selector(&format!("[data-id=\"{}\"]", id))
            .ok()
            .flatten()
    }

    fn render_pattern(&self, container: &Element, pattern: &Pattern) {
        container.set_inner_html("");
        for cell in pattern.cells() {
            let Some(el) = self.create_div("grid-cell") else {
                continue;
            };
            match cell {
                Cell::Filled => {
                    let _ = el.class_list().add_1("filled");
                }
                // Every empty cell carries a dot
                Cell::Empty => {
                    if let Some(dot) = self.create_div("cell-dot") {
                        let _ = el.append_child(&dot);
                    }
                }
            }
            let _ = container.append_child(&el);
        }
    }

    fn phase_container(kind: PhaseKind) -> Option<&'static str> {
        match kind {
            PhaseKind::Highlight => Some("dotGridPhase"),
            PhaseKind::Symmetry => Some("symmetryPhase"),
            PhaseKind::Identify => Some("identificationPhase"),
            PhaseKind::Unknown => None,
        }
    }

    fn phase_timer(kind: PhaseKind) -> Option<&'static str> {
        match kind {
            PhaseKind::Highlight => Some("dotPhaseTimer"),
            PhaseKind::Symmetry => Some("symmetryPhaseTimer"),
            PhaseKind::Identify => Some("identifyPhaseTimer"),
            PhaseKind::Unknown => None,
        }
    }
}

impl Renderer for DomRenderer {
    fn render_dots(&mut self, grid: DotGrid, dots: &[Dot]) {
        let container = match grid {
            DotGrid::Memorize => self.dot_grid.clone(),
            DotGrid::Recall => self.identify_grid.clone(),
        };
        container.set_inner_html("");

        for (index, dot) in dots.iter().enumerate() {
            let Some(el) = self.create_div("dot") else {
                continue;
            };
            let _ = el.set_attribute("data-id", &dot.id.to_string());
            let _ = el.set_attribute(
                "style",
                &format!("left: {}px; top: {}px;", dot.pos.x, dot.pos.y),
            );
            let _ = el.set_attribute("role", "button");
            let _ = el.set_attribute("aria-label", &format!("Dot {}", index + 1));
            let _ = el.set_attribute("tabindex", "0");
            let _ = container.append_child(&el);
        }
    }

    fn render_symmetry_grids(&mut self, left: &Pattern, right: &Pattern) {
        self.render_pattern(&self.left_grid, left);
        self.render_pattern(&self.right_grid, right);
    }

    fn highlight_dot(&mut self, id: u32, duration_ms: u32) {
        let Some(dot) = Self::find_dot(&self.dot_grid, id) else {
            log::warn!("Highlighted dot {} not on the grid", id);
            return;
        };
        let _ = dot.class_list().add_1("highlighted");

        let Some(window) = web_sys::window() else {
            return;
        };
        let clear = Closure::once_into_js(move || {
            let _ = dot.class_list().remove_1("highlighted");
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            clear.unchecked_ref(),
            duration_ms as i32,
        );
    }

    fn show_screen(&mut self, screen: Screen) {
        for el in [
            &self.start_screen,
            &self.level_screen,
            &self.game_screen,
            &self.end_screen,
        ] {
            let _ = el.class_list().remove_1("active");
        }
        let target = match screen {
            Screen::Start => &self.start_screen,
            Screen::LevelSelect => &self.level_screen,
            Screen::Game => &self.game_screen,
            Screen::End => &self.end_screen,
        };
        let _ = target.class_list().add_1("active");
    }

    fn show_phase(&mut self, kind: PhaseKind) {
        for id in ["dotGridPhase", "symmetryPhase", "identificationPhase"] {
            if let Some(el) = self.optional(id) {
                let _ = el.class_list().add_1("hidden");
            }
        }
        if let Some(el) = Self::phase_container(kind).and_then(|id| self.optional(id)) {
            let _ = el.class_list().remove_1("hidden");
        }
        self.active_phase = Some(kind);
    }

    fn update_timer_display(&mut self, remaining_secs: u32) {
        if let Some(id) = self.active_phase.and_then(Self::phase_timer) {
            self.set_text(id, &remaining_secs.to_string());
        }
    }

    fn update_sequence_display(&mut self, text: &str) {
        self.set_text("sequenceDisplay", text);
    }

    fn mark_dot_clicked(&mut self, id: u32) {
        if let Some(dot) = Self::find_dot(&self.identify_grid, id) {
            let _ = dot.class_list().add_1("clicked");
        }
    }

    fn flag_clicked_dots_wrong(&mut self, ids: &[u32]) {
        for &id in ids {
            if let Some(dot) = Self::find_dot(&self.identify_grid, id) {
                let _ = dot.class_list().add_1("wrong");
            }
        }
    }

    fn set_answer_enabled(&mut self, enabled: bool) {
        for id in ["yesButton", "noButton"] {
            if let Some(btn) = self.optional(id) {
                let _ = if enabled {
                    btn.remove_attribute("disabled")
                } else {
                    btn.set_attribute("disabled", "")
                };
            }
        }
    }

    fn update_hud(&mut self, field: HudField, text: &str) {
        match field {
            HudField::Clock => self.timer.set_text_content(Some(text)),
            HudField::Level => self.current_level.set_text_content(Some(text)),
            HudField::Round => self.current_round.set_text_content(Some(text)),
            HudField::PhaseName => self.set_text("currentPhase", text),
            HudField::PhaseTitle => self.set_text("dotPhaseTitle", text),
            HudField::HighScore => self.set_text("highScoreValue", text),
        }
    }

    fn show_results(&mut self, summary: &SessionSummary) {
        self.set_text("finalScore", &summary.score.to_string());
        self.set_text("roundsAttempted", &summary.rounds_attempted_display().to_string());
        self.set_text("roundsCompleted", &summary.rounds_completed.to_string());
        self.set_text("accuracy", &format!("{}%", summary.accuracy));
        self.set_text("levelCompleted", &summary.level.to_string());
        self.set_text("timePlayed", &summary.time_played_display());
        self.set_text("performanceText", summary.rating.message());
    }
}

//! Grid Challenge entry point
//!
//! Web: wires the DOM to the game and runs the fixed-step loop on
//! requestAnimationFrame. Native: plays one headless session with a scripted
//! player and prints the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, KeyboardEvent, MouseEvent};

    use grid_challenge::GridChallenge;
    use grid_challenge::persistence::LocalStorageStore;
    use grid_challenge::platform::{DomRenderer, session_seed};
    use grid_challenge::settings::Settings;

    type Game = GridChallenge<DomRenderer, LocalStorageStore>;

    /// Game plus frame timing
    struct App {
        game: Game,
        last_time: f64,
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Grid Challenge starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let renderer = DomRenderer::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let settings = Settings::load();
        let game = GridChallenge::new(settings, renderer, LocalStorageStore::new());
        let app = Rc::new(RefCell::new(App {
            game,
            last_time: 0.0,
        }));

        setup_screen_buttons(&document, app.clone());
        setup_level_buttons(&document, app.clone());
        setup_answer_buttons(&document, app.clone());
        setup_dot_input(&document, app.clone());

        request_animation_frame(app);

        log::info!("Grid Challenge running!");
        Ok(())
    }

    fn on_click(element: &Element, handler: impl FnMut(MouseEvent) + 'static) {
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
        let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_screen_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("startButton") {
            let app = app.clone();
            on_click(&btn, move |event| {
                event.prevent_default();
                log::info!("Start button clicked - going to level selection");
                app.borrow_mut().game.show_level_select();
            });
        }

        if let Some(btn) = document.get_element_by_id("backToStartButton") {
            let app = app.clone();
            on_click(&btn, move |event| {
                event.prevent_default();
                app.borrow_mut().game.show_start();
            });
        }

        if let Some(btn) = document.get_element_by_id("playAgainButton") {
            on_click(&btn, move |event| {
                event.prevent_default();
                app.borrow_mut().game.reset();
            });
        }
    }

    fn setup_level_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        let Ok(buttons) = document.query_selector_all(".level-select-btn") else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(btn) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(level) = btn
                .get_attribute("data-level")
                .and_then(|l| l.parse::<u8>().ok())
            else {
                log::warn!("Level button without a valid data-level");
                continue;
            };

            let app = app.clone();
            on_click(&btn, move |event| {
                event.prevent_default();
                // Rejections are logged by the game
                let _ = app.borrow_mut().game.select_level(level, session_seed());
            });
        }
    }

    fn setup_answer_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        for (id, answer) in [("yesButton", true), ("noButton", false)] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                on_click(&btn, move |event| {
                    event.prevent_default();
                    app.borrow_mut().game.answer_symmetry(answer);
                });
            }
        }
    }

    /// Dot id of the recall-grid dot an event landed on
    fn target_dot_id(event: &web_sys::Event) -> Option<u32> {
        event
            .target()?
            .dyn_into::<Element>()
            .ok()?
            .closest(".dot")
            .ok()??
            .get_attribute("data-id")?
            .parse()
            .ok()
    }

    fn setup_dot_input(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        let Some(grid) = document.get_element_by_id("identifyGrid") else {
            return;
        };

        // Dots are re-created every round, so listen on the grid
        {
            let app = app.clone();
            on_click(&grid, move |event| {
                if let Some(id) = target_dot_id(&event) {
                    app.borrow_mut().game.click_dot(id);
                }
            });
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            if key != "Enter" && key != " " {
                return;
            }
            if let Some(id) = target_dot_id(&event) {
                event.prevent_default();
                app.borrow_mut().game.click_dot(id);
            }
        });
        let _ = grid.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let dt = if a.last_time > 0.0 {
                time - a.last_time
            } else {
                0.0
            };
            a.last_time = time;
            a.game.update(dt);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use grid_challenge::GridChallenge;
    use grid_challenge::persistence::ScoreStore;
    use grid_challenge::renderer::Renderer;
    use grid_challenge::sim::GamePhase;

    /// Chance the scripted player gets a question or a recall right
    const PLAYER_ACCURACY: f64 = 0.85;
    /// Reaction time range in ticks
    const MIN_REACTION_TICKS: u32 = 5;
    const MAX_REACTION_TICKS: u32 = 30;

    /// Plays a session the way a fairly good human would
    pub struct ScriptedPlayer {
        rng: Pcg32,
        /// Ticks left before acting on the current question
        wait: Option<u32>,
    }

    impl ScriptedPlayer {
        pub fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
                wait: None,
            }
        }

        /// Look at the session and maybe answer; called once per tick
        pub fn act<R: Renderer, S: ScoreStore>(&mut self, game: &mut GridChallenge<R, S>) {
            let Some(session) = game.session() else {
                return;
            };

            let phase = session.phase;
            let awaiting_input = match phase {
                GamePhase::Symmetry { answer: None, .. } => true,
                GamePhase::Identify { locked: false } => session.round.user_sequence.is_empty(),
                _ => false,
            };
            if !awaiting_input {
                self.wait = None;
                return;
            }

            let wait = match self.wait {
                Some(w) => w,
                None => self.rng.random_range(MIN_REACTION_TICKS..=MAX_REACTION_TICKS),
            };
            if wait > 0 {
                self.wait = Some(wait - 1);
                return;
            }
            self.wait = None;

            let right = self.rng.random::<f64>() < PLAYER_ACCURACY;
            match phase {
                GamePhase::Symmetry { is_symmetric, .. } => {
                    let answer = if right { is_symmetric } else { !is_symmetric };
                    log::info!("Player answers {}", if answer { "yes" } else { "no" });
                    game.answer_symmetry(answer);
                }
                GamePhase::Identify { .. } => {
                    let mut ids: Vec<u32> =
                        session.round.memorized_sequence.iter().map(|d| d.id).collect();
                    if !right && ids.len() > 1 {
                        ids.swap(0, 1);
                    }
                    log::info!("Player recalls {:?}", ids);
                    for id in ids {
                        game.click_dot(id);
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use grid_challenge::GridChallenge;
    use grid_challenge::consts::TICK_MS;
    use grid_challenge::persistence::{FileStore, file::DEFAULT_SCORES_FILE};
    use grid_challenge::platform::session_seed;
    use grid_challenge::renderer::LogRenderer;
    use grid_challenge::settings::Settings;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Grid Challenge (native) starting...");

    let level = match std::env::args().nth(1) {
        None => 1,
        Some(arg) => match arg.parse::<u8>() {
            Ok(level) => level,
            Err(_) => {
                eprintln!("usage: grid-challenge [LEVEL 1-{}]", Settings::LEVEL_COUNT);
                std::process::exit(2);
            }
        },
    };

    let scores_path =
        std::env::var("GRID_CHALLENGE_SCORES").unwrap_or_else(|_| DEFAULT_SCORES_FILE.to_string());
    let store = FileStore::new(scores_path);
    let mut game = GridChallenge::new(Settings::load(), LogRenderer::new(), store);

    game.show_level_select();
    let seed = session_seed();
    if let Err(e) = game.select_level(level, seed) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let mut player = headless::ScriptedPlayer::new(seed);
    while game.is_playing() {
        player.act(&mut game);
        game.update(TICK_MS as f64);
    }

    let Some(summary) = game.session().and_then(|s| s.summary.as_ref()) else {
        return;
    };
    println!();
    println!("Level:            {}", summary.level);
    println!("Score:            {}", summary.score);
    println!("Rounds attempted: {}", summary.rounds_attempted_display());
    println!("Rounds completed: {}", summary.rounds_completed);
    println!("Accuracy:         {}%", summary.accuracy);
    println!("Time played:      {}", summary.time_played_display());
    println!("{}", summary.rating.message());
    println!(
        "Best on level {}:  {}",
        summary.level,
        grid_challenge::persistence::best_score(game.store(), summary.level)
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

//! Combo Typer entry point
//!
//! Browser build wires DOM events into the session and runs the frame loop.
//! Native build runs a headless autoplay demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use combo_typer::audio::AudioManager;
    use combo_typer::platform::Collaborators;
    use combo_typer::platform::web::{CanvasRenderer, LocalStorageScores};
    use combo_typer::sim::{SpawnTimer, Viewport};
    use combo_typer::{GameSession, Key, Settings};

    /// Longest frame gap fed to the spawn timer (ms); background tabs stall rAF
    const MAX_FRAME_MS: f64 = 250.0;

    struct Game {
        session: GameSession<SpawnTimer>,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// Game over overlay currently shown
        overlay_shown: bool,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).min(MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            self.session.advance_time(dt);
            self.session.on_tick();
            self.update_overlay();
        }

        fn update_overlay(&mut self) {
            let over = self.session.is_game_over();
            if over == self.overlay_shown {
                return;
            }
            self.overlay_shown = over;

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("gameOverScreen") {
                let toggled = if over {
                    el.class_list().remove_1("hidden")
                } else {
                    el.class_list().add_1("hidden")
                };
                if let Err(e) = toggled {
                    log::warn!("Could not toggle game over screen: {:?}", e);
                }
            }
            if over {
                if let Some(el) = document.get_element_by_id("finalScore") {
                    el.set_text_content(self.session.final_score_label());
                }
            }
        }

        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(combo_typer::consts::DEFAULT_WIDTH as f64);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(combo_typer::consts::DEFAULT_HEIGHT as f64);
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height as u32);
            self.session.on_resize(width as f32, height as f32);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Combo Typer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load().validated();
        // Keep repaired values so the stored copy stays editable
        if let Err(e) = settings.save() {
            log::warn!("Could not save settings: {}", e);
        }
        let collab = Collaborators {
            renderer: Box::new(CanvasRenderer::new(ctx)),
            audio: Box::new(AudioManager::new(&settings)),
            scores: Box::new(LocalStorageScores::load()),
        };

        let seed = js_sys::Date::now() as u64;
        let session = GameSession::new(
            seed,
            settings,
            Viewport::default(),
            SpawnTimer::new(),
            collab,
        );
        let game = Rc::new(RefCell::new(Game {
            session,
            canvas,
            last_time: 0.0,
            overlay_shown: false,
        }));
        game.borrow_mut().fit_to_window();

        setup_keyboard(game.clone());
        setup_resize(game.clone());
        setup_reboot_button(game.clone());

        request_animation_frame(game);

        log::info!("Combo Typer running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = Key::from_dom(&event.key());
            if matches!(key, Key::Space | Key::Backspace) {
                // Keep the page from scrolling or navigating back
                event.prevent_default();
            }
            game.borrow_mut().session.on_key_press(&key);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            game.borrow_mut().fit_to_window();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_reboot_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let button = document
            .query_selector("#gameOverScreen button")
            .ok()
            .flatten();
        if let Some(btn) = button {
            // The page's own handler reloads everything; the session resets in place
            let _ = btn.remove_attribute("onclick");
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.reset();
                g.update_overlay();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use combo_typer::platform::Collaborators;
    use combo_typer::sim::{Autoplay, SpawnTimer, Viewport};
    use combo_typer::{GameSession, MatchMode, Settings};

    /// Frame length at 60 Hz
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_TICKS: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Combo Typer (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);
    let accuracy = args.next().and_then(|s| s.parse().ok()).unwrap_or(0.9);
    let mut settings = Settings::load();
    if let Some(mode) = args.next() {
        match MatchMode::from_str(&mode) {
            Some(m) => settings.match_mode = m,
            None => log::warn!(
                "Unknown match mode {:?}, keeping {}",
                mode,
                settings.match_mode.as_str()
            ),
        }
    }
    let mode = settings.match_mode;

    let mut session = GameSession::new(
        seed,
        settings,
        Viewport::default(),
        SpawnTimer::new(),
        Collaborators::headless(),
    );
    // Roughly 270 keys per minute
    let mut bot = Autoplay::new(seed ^ 0x5eed, accuracy, 0.075);

    while !session.is_game_over() && session.state().time_ticks < MAX_TICKS {
        session.advance_time(FRAME_MS);
        for key in bot.keys_for_tick(session.state()) {
            session.on_key_press(&key);
        }
        session.on_tick();
    }

    let state = session.state();
    let seconds = state.time_ticks as f64 / 60.0;
    println!(
        "{} mode, seed {} accuracy {:.2}: score {} ({} words) in {:.1}s, final speed {:.2}",
        mode.as_str(),
        seed,
        accuracy,
        state.score,
        state.words_typed,
        seconds,
        state.difficulty.fall_speed
    );
    if let Some(label) = session.final_score_label() {
        println!("Final score: {}", label);
    }
}

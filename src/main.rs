//! Neon Invaders entry point
//!
//! Wires the engine to the hosting page: requestAnimationFrame scheduling
//! with synchronous cancellation, keyboard input, HUD updates, and the
//! game-active notification the page's hidden key listener consumes.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use neon_invaders::render::CanvasRenderer;
    use neon_invaders::sim::{FrameInput, GamePhase};
    use neon_invaders::{Engine, GameActiveListener, HighScores};

    /// Forwards the active flag to the page as a `game-active` CustomEvent,
    /// so the hidden key-sequence listener arms itself without the engine
    /// ever naming it.
    struct DomActiveNotifier;

    impl GameActiveListener for DomActiveNotifier {
        fn set_game_active(&self, active: bool) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let init = web_sys::CustomEventInit::new();
            init.set_detail(&JsValue::from_bool(active));
            if let Ok(event) =
                web_sys::CustomEvent::new_with_event_init_dict("game-active", &init)
            {
                let _ = document.dispatch_event(&event);
            }
        }
    }

    /// Everything the shell owns
    struct App {
        engine: Engine,
        renderer: Option<CanvasRenderer>,
        highscores: HighScores,
        // Held direction keys and the edge-triggered fire flag
        left: bool,
        right: bool,
        fire_queued: bool,
        /// Pending rAF handle; withdrawn synchronously on pause/stop/reset
        animation_id: Option<i32>,
        /// One leaderboard entry per session
        score_recorded: bool,
    }

    impl App {
        fn new() -> Self {
            Self {
                engine: Engine::new(js_sys::Date::now() as u64),
                renderer: None,
                highscores: HighScores::load(),
                left: false,
                right: false,
                fire_queued: false,
                animation_id: None,
                score_recorded: false,
            }
        }

        /// Lazily acquire the canvas. A missing canvas is not recoverable;
        /// the session simply refuses to start.
        fn ensure_renderer(&mut self) -> bool {
            if self.renderer.is_some() {
                return true;
            }
            let canvas = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.query_selector(".game-canvas").ok().flatten())
                .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
            let Some(canvas) = canvas else {
                log::error!("no .game-canvas element; not starting");
                return false;
            };
            match CanvasRenderer::new(&canvas) {
                Ok(renderer) => {
                    self.renderer = Some(renderer);
                    true
                }
                Err(err) => {
                    log::error!("canvas context unavailable: {err:?}");
                    false
                }
            }
        }

        /// One update + render pass
        fn frame(&mut self, now_ms: f64) {
            let input = FrameInput {
                left: self.left,
                right: self.right,
                fire: self.fire_queued,
                now_ms,
            };
            self.fire_queued = false;

            self.engine.frame(&input);

            if let Some(renderer) = &self.renderer {
                renderer.draw(&self.engine.state);
            }

            if self.engine.state.is_over() && !self.score_recorded {
                self.score_recorded = true;
                let state = &self.engine.state;
                if let Some(rank) =
                    self.highscores
                        .add_score(state.score, state.level, js_sys::Date::now())
                {
                    log::info!("new high score, rank {rank}");
                }
                self.highscores.save();
            }
        }

        fn render_once(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.draw(&self.engine.state);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        log::info!("Neon Invaders booting...");

        let app = Rc::new(RefCell::new(App::new()));
        app.borrow_mut()
            .engine
            .set_listener(Rc::new(DomActiveNotifier));

        setup_keyboard(&app);
        setup_buttons(&app);
        setup_auto_pause(&app);
        update_hud(&app);

        log::info!("Neon Invaders ready; press Start");
    }

    fn schedule_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let app_for_cb = app.clone();
        let closure = Closure::once(move |time: f64| {
            app_for_cb.borrow_mut().animation_id = None;
            run_frame(app_for_cb, time);
        });
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .expect("requestAnimationFrame failed");
        app.borrow_mut().animation_id = Some(id);
        closure.forget();
    }

    /// Withdraw the pending frame callback so nothing mutates after a stop
    fn cancel_pending_frame(app: &Rc<RefCell<App>>) {
        let id = app.borrow_mut().animation_id.take();
        if let Some(id) = id {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn run_frame(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        update_hud(&app);

        // The loop re-arms itself only while the session runs
        let running = app.borrow().engine.state.is_running();
        if running {
            schedule_frame(app);
        }
    }

    fn start_game(app: &Rc<RefCell<App>>) {
        // Repeated starts must never stack a second callback chain
        cancel_pending_frame(app);
        {
            let mut a = app.borrow_mut();
            if !a.ensure_renderer() {
                return;
            }
            a.left = false;
            a.right = false;
            a.fire_queued = false;
            a.score_recorded = false;
            a.engine.start(js_sys::Date::now() as u64);
        }
        update_hud(app);
        schedule_frame(app.clone());
    }

    fn toggle_pause(app: &Rc<RefCell<App>>) {
        let phase = app.borrow().engine.state.phase;
        match phase {
            GamePhase::Running => {
                cancel_pending_frame(app);
                app.borrow_mut().engine.pause();
            }
            GamePhase::Paused => {
                app.borrow_mut().engine.resume();
                schedule_frame(app.clone());
            }
            GamePhase::Idle | GamePhase::Over => {}
        }
        update_hud(app);
    }

    fn pause_game(app: &Rc<RefCell<App>>) {
        if app.borrow().engine.state.is_running() {
            cancel_pending_frame(app);
            app.borrow_mut().engine.pause();
            update_hud(app);
        }
    }

    fn reset_game(app: &Rc<RefCell<App>>) {
        cancel_pending_frame(app);
        {
            let mut a = app.borrow_mut();
            a.engine.reset();
            a.left = false;
            a.right = false;
            a.fire_queued = false;
            a.render_once();
        }
        update_hud(app);
    }

    fn setup_keyboard(app: &Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                if !a.engine.state.is_running() {
                    return;
                }
                let key = event.key();
                match key.as_str() {
                    "ArrowLeft" => a.left = true,
                    "ArrowRight" => a.right = true,
                    " " => a.fire_queued = true,
                    _ => {}
                }
                // Keep the page from scrolling on the reserved game keys
                if matches!(
                    key.as_str(),
                    " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight"
                ) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                if !a.engine.state.is_running() {
                    return;
                }
                match event.key().as_str() {
                    "ArrowLeft" => a.left = false,
                    "ArrowRight" => a.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: &Rc<RefCell<App>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                start_game(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                toggle_pause(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                reset_game(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Losing the tab or window focus pauses the session, dropping the
    /// active flag with it.
    fn setup_auto_pause(app: &Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    log::info!("auto-paused (tab hidden)");
                    pause_game(&app);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if app.borrow().engine.state.is_running() {
                    log::info!("auto-paused (window blur)");
                }
                pause_game(&app);
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn update_hud(app: &Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let a = app.borrow();
        let state = &a.engine.state;

        if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
            el.set_text_content(Some(&state.score.to_string()));
        }
        if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
            el.set_text_content(Some(&state.lives.to_string()));
        }
        if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
            el.set_text_content(Some(&state.level.to_string()));
        }

        if let Some(el) = document.get_element_by_id("game-over") {
            if state.is_over() {
                let _ = el.set_attribute("class", "");
                if let Some(score_el) = document.get_element_by_id("final-score") {
                    score_el.set_text_content(Some(&state.score.to_string()));
                }
                if let Some(best_el) = document.get_element_by_id("best-score") {
                    let best = a.highscores.top_score().unwrap_or(state.score);
                    best_el.set_text_content(Some(&best.to_string()));
                }
            } else {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Invaders (native) starting...");
    log::info!("The game targets wasm32; native mode runs a headless smoke pass");

    smoke_pass();
}

/// Drive a short scripted session without a canvas, as a quick sanity run.
#[cfg(not(target_arch = "wasm32"))]
fn smoke_pass() {
    use neon_invaders::Engine;
    use neon_invaders::sim::FrameInput;

    let mut engine = Engine::new(0xC0FFEE);
    engine.start(0xC0FFEE);

    for i in 0..600u32 {
        let input = FrameInput {
            left: i % 40 < 20,
            right: i % 40 >= 20,
            fire: i % 30 == 0,
            now_ms: f64::from(i) * 16.7,
        };
        engine.frame(&input);
    }

    let state = &engine.state;
    println!(
        "600 frames: score {}, lives {}, level {}, enemies {}",
        state.score,
        state.lives,
        state.level,
        state.enemies.len()
    );
}

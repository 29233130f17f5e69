//! Chroma Snake entry point
//!
//! Handles platform-specific initialization and runs the tick loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, TouchEvent};

    use chroma_snake::host::WebViewSink;
    use chroma_snake::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use chroma_snake::platform::{
        cancel_scheduled, direction_from_key, direction_from_swipe, schedule_once,
    };
    use chroma_snake::sim::choose_direction;
    use chroma_snake::{GameSession, SessionEvent, Settings, Stage};

    type Session = GameSession<Box<dyn KeyValueStore>>;

    /// Shell state around the session
    struct Game {
        session: Session,
        /// Pending tick timeout
        timer: Option<i32>,
        /// Where the current touch started
        touch_start: Option<(f32, f32)>,
        /// Idle mode - autopilot steers
        autopilot: bool,
    }

    impl Game {
        fn cancel_timer(&mut self) {
            if let Some(handle) = self.timer.take() {
                cancel_scheduled(handle);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let session = &self.session;
            let stage = session.stage();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&session.state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-high .hud-value").ok().flatten() {
                el.set_text_content(Some(&session.high_score().to_string()));
            }
            if let Some(el) = document.query_selector("#hud-attempt .hud-value").ok().flatten() {
                el.set_text_content(Some(&stage.label()));
            }
            if let Some(el) = document.get_element_by_id("hud") {
                let _ = el.set_attribute("style", &format!("--snake: {}", session.state.snake_color.hex()));
            }

            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            show("rules", stage == Stage::Rules);
            show("leaderboard", stage == Stage::Leaderboard);
            show("next-prompt", session.is_awaiting_next() || session.is_paused());

            if stage == Stage::Leaderboard {
                for (i, score) in session.attempts.scores.iter().enumerate() {
                    if let Some(el) = document.get_element_by_id(&format!("final-score-{}", i + 1)) {
                        el.set_text_content(Some(&score.to_string()));
                    }
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Chroma Snake starting...");

        let store: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}, keeping scores in memory", e);
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load(&store).unwrap_or_else(|e| {
            log::warn!("Using default settings: {}", e);
            Settings::default()
        });

        let seed = js_sys::Date::now() as u64;
        let session = GameSession::new(
            settings.game_config(),
            seed,
            store,
            Some(Box::new(WebViewSink)),
        );
        let game = Rc::new(RefCell::new(Game {
            session,
            timer: None,
            touch_start: None,
            autopilot: settings.autopilot,
        }));

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        game.borrow().update_hud();
        log::info!("Chroma Snake running!");
    }

    /// Arm the next tick at the session's current speed
    fn schedule_tick(game: Rc<RefCell<Game>>) {
        let delay = game.borrow().session.tick_interval_ms();
        let next = game.clone();
        match schedule_once(delay, move || on_tick(next)) {
            Ok(handle) => game.borrow_mut().timer = Some(handle),
            Err(e) => log::error!("Failed to schedule tick: {:?}", e),
        }
    }

    fn on_tick(game: Rc<RefCell<Game>>) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.timer = None;
            if g.autopilot {
                let d = choose_direction(&g.session.state);
                g.session.set_direction(d);
            }
            let event = g.session.tick();
            g.update_hud();
            matches!(event, SessionEvent::Moved | SessionEvent::Ate { .. })
        };

        // Re-armed only after the tick settled; a speed change just
        // shows up as a different delay
        if keep_running {
            schedule_tick(game);
        }
    }

    /// Begin ticking if an attempt is waiting and no timer is pending
    fn ensure_running(game: &Rc<RefCell<Game>>) {
        let idle = {
            let g = game.borrow();
            g.timer.is_none() && g.session.is_running()
        };
        if idle {
            schedule_tick(game.clone());
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if let Some(direction) = direction_from_key(&key) {
                    event.prevent_default();
                    game.borrow_mut().session.set_direction(direction);
                    return;
                }
                match key.as_str() {
                    " " | "Enter" => {
                        {
                            let mut g = game.borrow_mut();
                            g.session.resume();
                        }
                        ensure_running(&game);
                        game.borrow().update_hud();
                    }
                    "i" | "I" => {
                        let mut g = game.borrow_mut();
                        g.autopilot = !g.autopilot;
                        log::info!("Idle mode: {}", g.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - remember where the swipe began
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().touch_start =
                        Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - turn the swipe into a direction
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some((x0, y0)) = g.touch_start.take() else {
                    return;
                };
                if let Some(touch) = event.changed_touches().get(0) {
                    let dx = touch.client_x() as f32 - x0;
                    let dy = touch.client_y() as f32 - y0;
                    if let Some(direction) = direction_from_swipe(dx, dy) {
                        g.session.set_direction(direction);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Start (rules screen)
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Err(e) = game.borrow_mut().session.start() {
                    log::warn!("Start ignored: {}", e);
                }
                ensure_running(&game);
                game.borrow().update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Next attempt
        if let Some(btn) = document.get_element_by_id("next-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.resume();
                ensure_running(&game);
                game.borrow().update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Replay (leaderboard)
        if let Some(btn) = document.get_element_by_id("replay-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if let Err(e) = g.session.replay() {
                    log::warn!("Replay ignored: {}", e);
                }
                g.update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Quit to rules
        if let Some(btn) = document.get_element_by_id("quit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.cancel_timer();
                g.session.reset_to_rules();
                g.update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, app backgrounded)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.is_running() {
                        g.cancel_timer();
                        g.session.pause();
                        g.update_hud();
                        log::info!("Auto-paused (hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.session.is_running() {
                    g.cancel_timer();
                    g.session.pause();
                    g.update_hud();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use chroma_snake::host::LogSink;
    use chroma_snake::persistence::MemoryStore;
    use chroma_snake::sim::{SpeedPolicy, choose_direction};
    use chroma_snake::{GameSession, SessionEvent, Settings, Stage};

    /// Give up on an attempt the autopilot can't finish
    const MAX_TICKS_PER_ATTEMPT: u32 = 5_000;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Chroma Snake (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` for the web version");

    // Usage: chroma-snake [seed] [fixed|classic]
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    let mut settings = Settings::default();
    if let Some(arg) = std::env::args().nth(2) {
        match SpeedPolicy::from_str(&arg) {
            Some(policy) => settings.speed_policy = policy,
            None => log::warn!(
                "Unknown speed policy {:?}, keeping {}",
                arg,
                settings.speed_policy.as_str()
            ),
        }
    }
    let mut session = GameSession::new(
        settings.game_config(),
        seed,
        MemoryStore::new(),
        Some(Box::new(LogSink)),
    );

    if let Err(e) = session.start() {
        log::error!("Could not start session: {}", e);
        return;
    }

    while session.stage() != Stage::Leaderboard {
        // Moves past the last attempt's frozen board
        session.resume();
        let mut ticks = 0;
        loop {
            let direction = choose_direction(&session.state);
            session.set_direction(direction);
            match session.tick() {
                SessionEvent::AttemptFinished { score, next } => {
                    println!("Attempt finished with {} points, next: {}", score, next.label());
                    break;
                }
                SessionEvent::Halted => {
                    log::error!("Session halted");
                    return;
                }
                _ => {}
            }
            ticks += 1;
            if ticks >= MAX_TICKS_PER_ATTEMPT {
                session.end_attempt();
                break;
            }
        }
    }

    println!(
        "\nFinal scores: {:?} (high score {})",
        session.attempts.scores,
        session.high_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

//! Résumé Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent, Response};

    use resume_breaker::audio::AudioManager;
    use resume_breaker::hud::{overlay_bricks, pause_label};
    use resume_breaker::ingest::{RESUME_ASSET_PATH, check_asset_path, elements_from_json};
    use resume_breaker::layout::{Layout, TextElement};
    use resume_breaker::platform::input::key_action;
    use resume_breaker::platform::storage::LocalStore;
    use resume_breaker::platform::{InputAction, InputQueue};
    use resume_breaker::renderer::CanvasRenderer;
    use resume_breaker::settings::{SettingChange, Theme};
    use resume_breaker::sim::ArcadeWorld;
    use resume_breaker::{Game, LoadError, Viewport, parse_hex_color};

    type WebGame = Game<ArcadeWorld, AudioManager, LocalStore>;

    /// Everything the browser callbacks share
    struct App {
        game: WebGame,
        renderer: CanvasRenderer,
        input: InputQueue,
        canvas: HtmlCanvasElement,
        last_time: f64,
        pause_label: &'static str,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            self.game.advance(dt, &mut self.input);
            self.game.render(&mut self.renderer);
            self.update_hud();
        }

        fn update_hud(&mut self) {
            let label = pause_label(self.game.session().phase);
            if label == self.pause_label {
                return;
            }
            self.pause_label = label;
            if let Some(btn) = document().and_then(|d| d.get_element_by_id("pauseButton")) {
                btn.set_text_content(Some(label));
            }
        }

        fn resize(&mut self, viewport: Viewport) {
            self.canvas.set_width(viewport.width as u32);
            self.canvas.set_height(viewport.height as u32);
            self.game.resize(viewport);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn window_viewport() -> Viewport {
        let window = web_sys::window();
        let dim = |v: Option<Result<JsValue, JsValue>>| {
            v.and_then(Result::ok)
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32
        };
        Viewport::new(
            dim(window.as_ref().map(|w| w.inner_width())),
            dim(window.as_ref().map(|w| w.inner_height())),
        )
    }

    fn apply_theme(theme: Theme) {
        if let Some(root) = document().and_then(|d| d.document_element()) {
            let _ = root.set_attribute("data-theme", theme.as_str());
        }
    }

    fn js_error(e: JsValue) -> LoadError {
        LoadError::Fetch(format!("{:?}", e))
    }

    /// Fetch and parse `assets/resume.json`
    async fn load_resume() -> Result<Vec<TextElement>, LoadError> {
        check_asset_path(RESUME_ASSET_PATH)?;
        let window = web_sys::window().ok_or_else(|| LoadError::Fetch("no window".to_string()))?;

        let response = JsFuture::from(window.fetch_with_str(RESUME_ASSET_PATH))
            .await
            .map_err(js_error)?;
        let response: Response = response.dyn_into().map_err(js_error)?;
        if !response.ok() {
            return Err(LoadError::Fetch(format!("HTTP {}", response.status())));
        }

        let text: js_sys::Promise = response.text().map_err(js_error)?;
        let body = JsFuture::from(text)
            .await
            .map_err(js_error)?;
        let body = body
            .as_string()
            .ok_or_else(|| LoadError::Fetch("response body is not text".to_string()))?;
        elements_from_json(&body)
    }

    /// Start-screen bricks behind the title text
    fn render_overlay(layout: &Layout) {
        let Some(document) = document() else { return };
        let Some(container) = document.get_element_by_id("brickContainer") else {
            return;
        };
        for brick in overlay_bricks(layout) {
            let Ok(div) = document.create_element("div") else {
                continue;
            };
            div.set_class_name("overlay-brick");
            div.set_text_content(Some(&brick.text));
            let _ = div.set_attribute("style", &brick.style());
            let _ = container.append_child(&div);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Résumé Breaker starting...");

        let Some(document) = document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let viewport = window_viewport();
        canvas.set_width(viewport.width as u32);
        canvas.set_height(viewport.height as u32);

        let renderer = match CanvasRenderer::new(&canvas) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Canvas unavailable: {:?}", e);
                return;
            }
        };

        let game = Game::new(
            viewport,
            ArcadeWorld::new(viewport),
            AudioManager::new(),
            LocalStore::new(),
        );
        apply_theme(game.settings().theme);

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            input: InputQueue::new(),
            canvas,
            last_time: 0.0,
            pause_label: "Pause",
        }));

        setup_input_handlers(&document, app.clone());
        setup_settings(&document, app.clone());

        let source = load_resume().await;
        if let Ok(elements) = &source {
            render_overlay(&app.borrow().game.layout_for(elements));
        }
        app.borrow_mut().game.load_layout(source);

        request_animation_frame(app);
    }

    fn setup_input_handlers(document: &Document, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        // Pointer move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().input.push(InputAction::PointerMove {
                    x: event.client_x() as f32,
                });
            });
            let _ = window
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // First gesture unlocks audio
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                app.borrow_mut().game.audio_mut().resume();
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(action) = key_action(&event.key()) {
                    app.borrow_mut().input.push(action);
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Buttons
        for (id, action) in [
            ("pauseButton", InputAction::TogglePause),
            ("settingsButton", InputAction::OpenSettings),
        ] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().input.push(action);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize(window_viewport());
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Wire one settings input to a handler
    fn bind_input(
        document: &Document,
        id: &str,
        app: &Rc<RefCell<App>>,
        on_change: impl Fn(&mut App, &HtmlInputElement) + 'static,
    ) {
        let Some(input) = document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        else {
            log::debug!("No #{} input, skipping", id);
            return;
        };

        let app = app.clone();
        let target = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            on_change(&mut app.borrow_mut(), &target);
        });
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_settings(doc: &Document, app: Rc<RefCell<App>>) {
        bind_input(doc, "soundToggle", &app, |a, el| {
            let enabled = el.checked();
            a.game
                .update_settings(SettingChange::Sound, |s| s.sound_enabled = enabled);
        });

        bind_input(doc, "ballColor", &app, |a, el| {
            if let Some(color) = parse_hex_color(&el.value()) {
                a.game
                    .update_settings(SettingChange::BallColor, |s| s.ball_color = color);
            }
        });

        bind_input(doc, "paddleColor", &app, |a, el| {
            if let Some(color) = parse_hex_color(&el.value()) {
                a.game
                    .update_settings(SettingChange::PaddleColor, |s| s.paddle_color = color);
            }
        });

        bind_input(doc, "paddleWidth", &app, |a, el| {
            if let Ok(width) = el.value().parse::<f32>() {
                a.game
                    .update_settings(SettingChange::PaddleWidth, |s| s.paddle_width = width);
            }
        });

        bind_input(doc, "ballSpeed", &app, |a, el| {
            if let Ok(speed) = el.value().parse::<f32>() {
                a.game
                    .update_settings(SettingChange::BallSpeed, |s| s.ball_speed = speed);
                let label = a.game.settings().ball_speed_label();
                if let Some(out) = document().and_then(|d| d.get_element_by_id("ballSpeedValue")) {
                    out.set_text_content(Some(&label));
                }
            }
        });

        bind_input(doc, "themeToggle", &app, |a, el| {
            let theme = if el.checked() { Theme::Dark } else { Theme::Light };
            a.game.update_settings(SettingChange::Theme, |s| s.theme = theme);
            apply_theme(theme);
        });
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Résumé Breaker (native) starting...");
    log::info!("Native mode runs a headless session - use `trunk serve` for the web version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use resume_breaker::audio::SilentAudio;
    use resume_breaker::ingest::{RESUME_ASSET_PATH, check_asset_path, elements_from_json};
    use resume_breaker::layout::TextElement;
    use resume_breaker::platform::{InputAction, InputQueue, MemoryStore, PhysicsWorld};
    use resume_breaker::sim::{ArcadeWorld, GamePhase};
    use resume_breaker::{Game, LoadError, Viewport};

    const FRAME: f32 = 1.0 / 60.0;
    const MAX_SECONDS: u32 = 300;

    fn load_resume() -> Result<Vec<TextElement>, LoadError> {
        check_asset_path(RESUME_ASSET_PATH)?;
        let json = std::fs::read_to_string(RESUME_ASSET_PATH)
            .map_err(|e| LoadError::Fetch(format!("{}: {}", RESUME_ASSET_PATH, e)))?;
        elements_from_json(&json)
    }

    /// Play a session with a paddle that tracks the ball
    pub fn run() {
        let viewport = Viewport::new(1024.0, 768.0);
        let mut game = Game::new(
            viewport,
            ArcadeWorld::new(viewport),
            SilentAudio,
            MemoryStore::new(),
        );
        game.load_layout(load_resume());

        let mut input = InputQueue::new();
        for _ in 0..MAX_SECONDS * 60 {
            if let Some(ball) = game.world().ball_position() {
                input.push(InputAction::PointerMove { x: ball.x });
            }
            game.advance(FRAME, &mut input);
            if game.session().phase.is_terminal() {
                break;
            }
        }

        let session = game.session();
        let outcome = match session.phase {
            GamePhase::Won => "won",
            GamePhase::GameOver => "lost",
            _ => "still playing",
        };
        println!(
            "Session {}: score {}, lives {}, {} of {} bricks left",
            outcome,
            session.score,
            session.lives,
            session.remaining(),
            session.bricks_spawned
        );
    }
}

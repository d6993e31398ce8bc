//! Game driver
//!
//! Owns one session plus everything around it (settings, timers, HUD,
//! textures) and the capabilities it talks to. Every state change goes
//! through `reduce`; the driver only turns the returned effects into calls on
//! the physics world, audio sink and store.

use crate::Viewport;
use crate::consts::*;
use crate::error::LoadError;
use crate::highscores::HighScore;
use crate::hud::Hud;
use crate::layout::{Layout, LayoutParams, TextElement, compute_layout};
use crate::platform::{
    AudioSink, Body, Bound, Contact, InputAction, InputSource, KeyValueStore, PhysicsWorld,
    Renderer,
};
use crate::renderer::{DrawOp, TextureCache, build_scene};
use crate::settings::{SettingChange, Settings};
use crate::sim::{
    Effect, GameEvent, Session, TimerKind, Timers, effective_paddle_width, reduce,
    rescale_velocity,
};

/// Longest frame the simulation will catch up on
const MAX_FRAME_DT: f32 = 0.1;

/// Game instance holding all state
pub struct Game<W: PhysicsWorld, A: AudioSink, S: KeyValueStore> {
    session: Session,
    settings: Settings,
    timers: Timers,
    hud: Hud,
    textures: TextureCache,
    high_score: HighScore,
    params: LayoutParams,
    accumulator: f32,
    world: W,
    audio: A,
    store: S,
}

impl<W: PhysicsWorld, A: AudioSink, S: KeyValueStore> Game<W, A, S> {
    pub fn new(viewport: Viewport, mut world: W, mut audio: A, store: S) -> Self {
        let settings = Settings::load(&store);
        let high_score = HighScore::load(&store);
        let session = Session::new(viewport, high_score.best);

        world.resize(viewport);
        world.set_paddle(
            session.paddle_x,
            effective_paddle_width(&settings, viewport),
        );
        world.set_paused(true);
        audio.set_muted(!settings.sound_enabled);

        log::info!(
            "New session {}x{} (high score {})",
            viewport.width,
            viewport.height,
            high_score.best
        );

        Self {
            hud: Hud::new(session.lives),
            textures: TextureCache::new(&settings),
            timers: Timers::new(),
            params: LayoutParams::default(),
            accumulator: 0.0,
            session,
            settings,
            high_score,
            world,
            audio,
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Layout `elements` for the current viewport
    pub fn layout_for(&self, elements: &[TextElement]) -> Layout {
        compute_layout(elements, self.session.viewport, &self.params)
    }

    /// Feed the loaded text source in; failures play on without bricks
    pub fn load_layout(&mut self, source: Result<Vec<TextElement>, LoadError>) {
        match source {
            Ok(elements) => {
                let layout = self.layout_for(&elements);
                self.dispatch(GameEvent::BricksReady(layout));
            }
            Err(e) => {
                log::error!("Could not load résumé: {}", e);
                self.dispatch(GameEvent::LayoutFailed);
            }
        }
    }

    /// Run one event through the state machine and apply its effects
    pub fn dispatch(&mut self, event: GameEvent) {
        let effects = reduce(&mut self.session, event, &self.settings);
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        if self.hud.apply(&effect) {
            return;
        }

        match effect {
            Effect::SpawnBrick { id, spec } => self.world.add_brick(id, &spec),
            Effect::DestroyBrick(id) => self.world.remove_brick(id),
            Effect::SetBallVelocity(velocity) => self.world.set_ball_velocity(velocity),
            Effect::SetBallSpeed(multiplier) => {
                let rescaled = self
                    .world
                    .ball_velocity()
                    .and_then(|v| rescale_velocity(v, BALL_BASE_SPEED, multiplier));
                if let Some(velocity) = rescaled {
                    self.world.set_ball_velocity(velocity);
                }
            }
            Effect::ResetBall => self.world.reset_ball(),
            Effect::DestroyBall => self.world.destroy_ball(),
            Effect::MovePaddle { x } => {
                let width = self.world.paddle().width;
                self.world.set_paddle(x, width);
            }
            Effect::ResizePaddle { width } => {
                let x = self.world.paddle().center().x;
                self.world.set_paddle(x, width);
            }
            Effect::ResizeWorld(viewport) => self.world.resize(viewport),
            Effect::SetPhysicsPaused(paused) => self.world.set_paused(paused),
            Effect::Schedule { timer, delay_ms } => self.timers.schedule(timer, delay_ms),
            Effect::Cancel(timer) => self.timers.cancel(timer),
            Effect::Play(sound) => self.audio.play(sound),
            Effect::PersistHighScore(score) => {
                if self.high_score.record(score) {
                    self.high_score.save(&mut self.store);
                }
            }
            Effect::RebuildTexture(kind) => {
                self.textures.refresh(kind, &self.settings);
            }
            Effect::SetMuted(muted) => self.audio.set_muted(muted),
            Effect::ApplyTheme(theme) => {
                theme.save(&mut self.store);
                log::info!("Theme set to {}", theme.as_str());
            }
            Effect::PopLifeIcon
            | Effect::ShowCountdown(_)
            | Effect::HideCountdown
            | Effect::ShowMessage(_) => {}
        }
    }

    /// Advance one rendered frame of `dt` seconds
    pub fn advance(&mut self, dt: f32, input: &mut impl InputSource) {
        for action in input.drain() {
            let event = match action {
                InputAction::PointerMove { x } => GameEvent::PointerMove { x },
                InputAction::TogglePause => GameEvent::TogglePause,
                InputAction::OpenSettings => GameEvent::SettingsOpened,
            };
            self.dispatch(event);
        }

        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        for timer in self.timers.advance(f64::from(dt) * 1000.0) {
            let event = match timer {
                TimerKind::CountdownTick => GameEvent::CountdownTick,
                TimerKind::Relaunch => GameEvent::RelaunchDue,
            };
            self.dispatch(event);
        }

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            for contact in self.world.step(SIM_DT) {
                if let Some(event) = contact_event(contact) {
                    self.dispatch(event);
                }
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.dispatch(GameEvent::Frame);
    }

    /// Change settings live and propagate the change
    pub fn update_settings(&mut self, change: SettingChange, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings);

        // Keep the bounds whatever the caller wrote
        let viewport_width = self.session.viewport.width;
        let width = self.settings.paddle_width;
        self.settings.set_paddle_width(width, viewport_width);
        let speed = self.settings.ball_speed;
        self.settings.set_ball_speed(speed);

        self.dispatch(GameEvent::SettingsChanged(change));
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.dispatch(GameEvent::Resize(viewport));
    }

    /// This frame's display list
    pub fn scene(&self) -> Vec<DrawOp> {
        build_scene(&self.session, &self.hud, &self.world, &self.settings)
    }

    pub fn render(&self, renderer: &mut impl Renderer) {
        renderer.present(&self.scene(), &self.textures);
    }
}

/// Physics contact as a session event
fn contact_event(contact: Contact) -> Option<GameEvent> {
    match contact {
        Contact::PaddleHit => Some(GameEvent::PaddleHit),
        Contact::BrickHit(id) => Some(GameEvent::BrickHit(id)),
        Contact::WorldBound {
            side: Bound::Bottom,
            body: Body::Ball,
        } => Some(GameEvent::BallOutOfBounds),
        Contact::WorldBound { .. } => None,
    }
}

//! Session state machine
//!
//! `reduce` is the single place session state changes. It never touches a
//! capability directly: everything the outside world must do is returned as
//! a list of `Effect`s, applied in order by the driver.

use glam::Vec2;

use super::state::{Brick, BrickId, GamePhase, Resume, Session};
use super::timer::TimerKind;
use crate::Viewport;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::layout::{BrickSpec, Layout};
use crate::renderer::TextureKind;
use crate::settings::{SettingChange, Settings, Theme};

/// Something that happened to the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Layout finished
    BricksReady(Layout),
    /// Text source could not be loaded
    LayoutFailed,
    CountdownTick,
    RelaunchDue,
    PaddleHit,
    BrickHit(BrickId),
    /// Ball crossed the bottom bound
    BallOutOfBounds,
    PointerMove { x: f32 },
    TogglePause,
    SettingsOpened,
    /// Settings were already updated; this names what changed
    SettingsChanged(SettingChange),
    /// Once per rendered frame
    Frame,
    Resize(Viewport),
}

/// Terminal message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    GameOver,
    Win,
}

/// Work for the driver
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SpawnBrick { id: BrickId, spec: BrickSpec },
    DestroyBrick(BrickId),
    SetBallVelocity(Vec2),
    /// Rescale a moving ball to `BALL_BASE_SPEED * multiplier`, keeping direction
    SetBallSpeed(f32),
    ResetBall,
    DestroyBall,
    MovePaddle { x: f32 },
    ResizePaddle { width: f32 },
    ResizeWorld(Viewport),
    SetPhysicsPaused(bool),
    Schedule { timer: TimerKind, delay_ms: u32 },
    Cancel(TimerKind),
    Play(SoundEffect),
    PopLifeIcon,
    PersistHighScore(u64),
    ShowMessage(Message),
    ShowCountdown(u32),
    HideCountdown,
    RebuildTexture(TextureKind),
    SetMuted(bool),
    ApplyTheme(Theme),
}

/// Points for destroying a brick on `row_index`; earlier rows score more
#[inline]
pub fn brick_points(total_rows: u32, row_index: u32) -> u64 {
    u64::from(total_rows.saturating_sub(row_index)) * POINTS_PER_ROW
}

/// Rescale `velocity` to `base * multiplier` keeping its direction
///
/// `None` when the ball is at rest, so a parked ball stays parked.
pub fn rescale_velocity(velocity: Vec2, base: f32, multiplier: f32) -> Option<Vec2> {
    velocity
        .try_normalize()
        .map(|dir| dir * base * multiplier)
}

/// Launch velocity for the current speed setting
pub fn launch_velocity(settings: &Settings) -> Vec2 {
    let (x, y) = BALL_INITIAL_VELOCITY;
    Vec2::new(x, y) * settings.ball_speed
}

/// Paddle width after clamping to the current viewport
pub fn effective_paddle_width(settings: &Settings, viewport: Viewport) -> f32 {
    Settings::bound_paddle_width(settings.paddle_width, viewport.width)
}

fn sound(settings: &Settings, effect: SoundEffect, effects: &mut Vec<Effect>) {
    if settings.sound_enabled {
        effects.push(Effect::Play(effect));
    }
}

/// Apply one event to the session
pub fn reduce(session: &mut Session, event: GameEvent, settings: &Settings) -> Vec<Effect> {
    let mut effects = Vec::new();

    match event {
        GameEvent::BricksReady(layout) => {
            if session.phase != GamePhase::Loading {
                log::warn!("Bricks ready in {:?}, ignoring", session.phase);
                return effects;
            }
            spawn_bricks(session, layout, &mut effects);
            enter_countdown(session, settings, &mut effects);
        }

        GameEvent::LayoutFailed => {
            if session.phase != GamePhase::Loading {
                return effects;
            }
            log::error!("Layout failed - playing without bricks");
            session.bricks_created = false;
            enter_countdown(session, settings, &mut effects);
        }

        GameEvent::CountdownTick => {
            if session.phase != GamePhase::Countdown {
                return effects;
            }
            session.countdown = session.countdown.saturating_sub(1);
            if session.countdown > 0 {
                effects.push(Effect::ShowCountdown(session.countdown));
                effects.push(Effect::Schedule {
                    timer: TimerKind::CountdownTick,
                    delay_ms: COUNTDOWN_INTERVAL_MS,
                });
            } else {
                effects.push(Effect::HideCountdown);
                session.phase = GamePhase::Playing;
                session.paused = false;
                effects.push(Effect::SetPhysicsPaused(false));
                effects.push(Effect::SetBallVelocity(launch_velocity(settings)));
                log::info!("Launch");
            }
        }

        GameEvent::RelaunchDue => {
            if session.phase != GamePhase::Playing || !session.relaunch_pending {
                return effects;
            }
            session.relaunch_pending = false;
            effects.push(Effect::SetBallVelocity(launch_velocity(settings)));
        }

        GameEvent::PaddleHit => {
            if session.phase == GamePhase::Playing {
                sound(settings, SoundEffect::BallHit, &mut effects);
            }
        }

        GameEvent::BrickHit(id) => {
            if session.phase == GamePhase::GameOver {
                return effects;
            }
            let Some(brick) = session.bricks.remove(&id) else {
                return effects;
            };
            effects.push(Effect::DestroyBrick(id));

            let points = brick_points(session.total_rows, brick.spec.row_index);
            session.score += points;
            sound(settings, SoundEffect::BrickHit, &mut effects);
            log::debug!(
                "Brick {:?} '{}' +{} -> {}",
                id,
                brick.spec.text,
                points,
                session.score
            );

            if session.score > session.high_score {
                session.high_score = session.score;
                effects.push(Effect::PersistHighScore(session.high_score));
            }
        }

        GameEvent::BallOutOfBounds => {
            if session.phase != GamePhase::Playing || session.game_ended {
                return effects;
            }
            session.lives = session.lives.saturating_sub(1);
            effects.push(Effect::PopLifeIcon);

            if session.lives > 0 {
                sound(settings, SoundEffect::LoseLife, &mut effects);
                session.relaunch_pending = true;
                effects.push(Effect::ResetBall);
                effects.push(Effect::Schedule {
                    timer: TimerKind::Relaunch,
                    delay_ms: RELAUNCH_DELAY_MS,
                });
                log::info!("Life lost, {} left", session.lives);
            } else {
                session.phase = GamePhase::GameOver;
                session.game_ended = true;
                session.paused = true;
                session.relaunch_pending = false;
                effects.push(Effect::DestroyBall);
                effects.push(Effect::Cancel(TimerKind::Relaunch));
                effects.push(Effect::SetPhysicsPaused(true));
                effects.push(Effect::ShowMessage(Message::GameOver));
                sound(settings, SoundEffect::GameOver, &mut effects);
                log::info!("Game over, score {}", session.score);
            }
        }

        GameEvent::PointerMove { x } => {
            // Input is live while the level loads
            if session.paused && session.phase != GamePhase::Loading {
                return effects;
            }
            let width = effective_paddle_width(settings, session.viewport);
            session.paddle_x = session.clamp_paddle_x(x, width);
            effects.push(Effect::MovePaddle {
                x: session.paddle_x,
            });
        }

        GameEvent::TogglePause => match session.phase {
            GamePhase::Playing | GamePhase::Countdown => pause(session, &mut effects),
            GamePhase::Paused => resume(session, &mut effects),
            _ => {}
        },

        GameEvent::SettingsOpened => {
            if matches!(session.phase, GamePhase::Playing | GamePhase::Countdown) {
                pause(session, &mut effects);
            }
        }

        GameEvent::SettingsChanged(change) => {
            apply_setting(session, change, settings, &mut effects);
        }

        GameEvent::Frame => {
            if session.bricks_created
                && session.bricks.is_empty()
                && session.bricks_spawned > 0
                && session.lives > 0
                && !session.game_ended
                && !session.phase.is_terminal()
            {
                session.phase = GamePhase::Won;
                session.game_ended = true;
                session.paused = true;
                session.relaunch_pending = false;
                effects.push(Effect::SetBallVelocity(Vec2::ZERO));
                effects.push(Effect::Cancel(TimerKind::Relaunch));
                effects.push(Effect::SetPhysicsPaused(true));
                effects.push(Effect::ShowMessage(Message::Win));
                sound(settings, SoundEffect::WinGame, &mut effects);
                log::info!("Cleared every brick, score {}", session.score);
            }
        }

        GameEvent::Resize(viewport) => {
            session.viewport = viewport;
            effects.push(Effect::ResizeWorld(viewport));
            let width = effective_paddle_width(settings, viewport);
            session.paddle_x = session.clamp_paddle_x(session.paddle_x, width);
            effects.push(Effect::ResizePaddle { width });
            effects.push(Effect::MovePaddle {
                x: session.paddle_x,
            });
        }
    }

    effects
}

fn spawn_bricks(session: &mut Session, layout: Layout, effects: &mut Vec<Effect>) {
    session.total_rows = layout.total_rows;
    for spec in layout.bricks {
        let id = session.next_brick_id();
        effects.push(Effect::SpawnBrick {
            id,
            spec: spec.clone(),
        });
        session.bricks.insert(id, Brick { id, spec });
    }
    session.bricks_spawned = session.bricks.len() as u32;
    session.bricks_created = true;
    log::info!(
        "Spawned {} bricks over {} rows",
        session.bricks_spawned,
        session.total_rows
    );
}

fn enter_countdown(session: &mut Session, settings: &Settings, effects: &mut Vec<Effect>) {
    session.phase = GamePhase::Countdown;
    session.paused = true;
    session.countdown = COUNTDOWN_START;

    let width = effective_paddle_width(settings, session.viewport);
    session.paddle_x = session.clamp_paddle_x(session.paddle_x, width);
    effects.push(Effect::ResizePaddle { width });
    effects.push(Effect::MovePaddle {
        x: session.paddle_x,
    });
    effects.push(Effect::SetPhysicsPaused(true));
    effects.push(Effect::ShowCountdown(session.countdown));
    effects.push(Effect::Schedule {
        timer: TimerKind::CountdownTick,
        delay_ms: COUNTDOWN_INTERVAL_MS,
    });
}

fn pause(session: &mut Session, effects: &mut Vec<Effect>) {
    let resume_to = match session.phase {
        GamePhase::Countdown => {
            effects.push(Effect::Cancel(TimerKind::CountdownTick));
            Resume::Countdown
        }
        _ if session.relaunch_pending => {
            effects.push(Effect::Cancel(TimerKind::Relaunch));
            Resume::Relaunch
        }
        _ => Resume::Playing,
    };
    session.resume_to = Some(resume_to);
    session.phase = GamePhase::Paused;
    session.paused = true;
    effects.push(Effect::SetPhysicsPaused(true));
    log::debug!("Paused ({:?})", resume_to);
}

fn resume(session: &mut Session, effects: &mut Vec<Effect>) {
    match session.resume_to.take().unwrap_or(Resume::Playing) {
        Resume::Countdown => {
            session.phase = GamePhase::Countdown;
            effects.push(Effect::ShowCountdown(session.countdown));
            effects.push(Effect::Schedule {
                timer: TimerKind::CountdownTick,
                delay_ms: COUNTDOWN_INTERVAL_MS,
            });
        }
        Resume::Relaunch => {
            session.phase = GamePhase::Playing;
            session.paused = false;
            effects.push(Effect::SetPhysicsPaused(false));
            effects.push(Effect::Schedule {
                timer: TimerKind::Relaunch,
                delay_ms: RELAUNCH_DELAY_MS,
            });
        }
        Resume::Playing => {
            session.phase = GamePhase::Playing;
            session.paused = false;
            effects.push(Effect::SetPhysicsPaused(false));
        }
    }
    log::debug!("Resumed into {:?}", session.phase);
}

/// The ball is moving, or frozen mid-flight by a pause
fn ball_in_flight(session: &Session) -> bool {
    match session.phase {
        GamePhase::Playing => !session.relaunch_pending,
        GamePhase::Paused => session.resume_to == Some(Resume::Playing),
        _ => false,
    }
}

fn apply_setting(
    session: &mut Session,
    change: SettingChange,
    settings: &Settings,
    effects: &mut Vec<Effect>,
) {
    match change {
        SettingChange::PaddleWidth => {
            let width = effective_paddle_width(settings, session.viewport);
            session.paddle_x = session.clamp_paddle_x(session.paddle_x, width);
            effects.push(Effect::ResizePaddle { width });
            effects.push(Effect::MovePaddle {
                x: session.paddle_x,
            });
            effects.push(Effect::RebuildTexture(TextureKind::Paddle));
        }
        SettingChange::PaddleColor => effects.push(Effect::RebuildTexture(TextureKind::Paddle)),
        SettingChange::BallColor => effects.push(Effect::RebuildTexture(TextureKind::Ball)),
        SettingChange::BallSpeed => {
            // A parked ball picks the new speed up at launch
            if ball_in_flight(session) {
                effects.push(Effect::SetBallSpeed(settings.ball_speed));
            }
        }
        SettingChange::Sound => effects.push(Effect::SetMuted(!settings.sound_enabled)),
        SettingChange::Theme => effects.push(Effect::ApplyTheme(settings.theme)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutParams, TextElement, compute_layout};
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn sample_layout() -> Layout {
        compute_layout(
            &[
                TextElement::new("Jane Doe Senior Engineer"),
                TextElement::new("Rust systems networking storage"),
            ],
            viewport(),
            &LayoutParams::default(),
        )
    }

    /// Session past the countdown with the ball in flight
    fn playing(layout: Layout) -> (Session, Settings) {
        let settings = Settings::default();
        let mut session = Session::new(viewport(), 0);
        reduce(&mut session, GameEvent::BricksReady(layout), &settings);
        for _ in 0..COUNTDOWN_START {
            reduce(&mut session, GameEvent::CountdownTick, &settings);
        }
        assert_eq!(session.phase, GamePhase::Playing);
        (session, settings)
    }

    fn count(effects: &[Effect], pred: impl Fn(&Effect) -> bool) -> usize {
        effects.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_bricks_ready_spawns_and_counts_down() {
        let settings = Settings::default();
        let mut session = Session::new(viewport(), 0);
        let layout = sample_layout();
        let n = layout.bricks.len();

        let effects = reduce(&mut session, GameEvent::BricksReady(layout), &settings);
        assert_eq!(
            count(&effects, |e| matches!(e, Effect::SpawnBrick { .. })),
            n
        );
        assert!(effects.contains(&Effect::ShowCountdown(3)));
        assert!(effects.contains(&Effect::Schedule {
            timer: TimerKind::CountdownTick,
            delay_ms: 1000
        }));
        assert_eq!(session.phase, GamePhase::Countdown);
        assert!(session.bricks_created);
        assert_eq!(session.bricks.len(), n);
        assert!(session.paused);
    }

    #[test]
    fn test_countdown_launches_with_speed_multiplier() {
        let mut settings = Settings::default();
        settings.set_ball_speed(1.5);
        let mut session = Session::new(viewport(), 0);
        reduce(&mut session, GameEvent::BricksReady(sample_layout()), &settings);

        let effects = reduce(&mut session, GameEvent::CountdownTick, &settings);
        assert!(effects.contains(&Effect::ShowCountdown(2)));
        reduce(&mut session, GameEvent::CountdownTick, &settings);
        let effects = reduce(&mut session, GameEvent::CountdownTick, &settings);

        assert!(effects.contains(&Effect::HideCountdown));
        assert!(effects.contains(&Effect::SetBallVelocity(Vec2::new(300.0, -300.0))));
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(!session.paused);
    }

    #[test]
    fn test_brick_hit_scores_by_row() {
        let (mut session, settings) = playing(sample_layout());
        let total_rows = session.total_rows;
        let (id, row) = session
            .bricks
            .values()
            .next()
            .map(|b| (b.id, b.spec.row_index))
            .unwrap();

        let effects = reduce(&mut session, GameEvent::BrickHit(id), &settings);
        let expected = u64::from(total_rows - row) * 10;
        assert_eq!(session.score, expected);
        assert!(effects.contains(&Effect::DestroyBrick(id)));
        assert!(effects.contains(&Effect::PersistHighScore(expected)));
        assert_eq!(session.high_score, expected);

        // Second hit on the same brick is a no-op
        assert!(reduce(&mut session, GameEvent::BrickHit(id), &settings).is_empty());
        assert_eq!(session.score, expected);
    }

    #[test]
    fn test_high_score_not_persisted_when_not_beaten() {
        let settings = Settings::default();
        let mut session = Session::new(viewport(), 10_000);
        reduce(&mut session, GameEvent::BricksReady(sample_layout()), &settings);
        let id = *session.bricks.keys().next().unwrap();
        let effects = reduce(&mut session, GameEvent::BrickHit(id), &settings);
        assert_eq!(
            count(&effects, |e| matches!(e, Effect::PersistHighScore(_))),
            0
        );
        assert_eq!(session.high_score, 10_000);
    }

    #[test]
    fn test_life_loss_schedules_relaunch() {
        let (mut session, settings) = playing(sample_layout());
        let effects = reduce(&mut session, GameEvent::BallOutOfBounds, &settings);

        assert_eq!(session.lives, 4);
        assert!(effects.contains(&Effect::PopLifeIcon));
        assert!(effects.contains(&Effect::ResetBall));
        assert!(effects.contains(&Effect::Schedule {
            timer: TimerKind::Relaunch,
            delay_ms: 1000
        }));
        assert!(session.relaunch_pending);

        let effects = reduce(&mut session, GameEvent::RelaunchDue, &settings);
        assert_eq!(
            effects,
            vec![Effect::SetBallVelocity(Vec2::new(200.0, -200.0))]
        );
        assert!(!session.relaunch_pending);

        // Stale relaunch does nothing
        assert!(reduce(&mut session, GameEvent::RelaunchDue, &settings).is_empty());
    }

    #[test]
    fn test_game_over_fires_exactly_once() {
        let (mut session, settings) = playing(sample_layout());
        let mut game_over_messages = 0;
        let mut destroyed = 0;

        for _ in 0..(INITIAL_LIVES + 3) {
            let effects = reduce(&mut session, GameEvent::BallOutOfBounds, &settings);
            reduce(&mut session, GameEvent::RelaunchDue, &settings);
            game_over_messages += count(&effects, |e| {
                matches!(e, Effect::ShowMessage(Message::GameOver))
            });
            destroyed += count(&effects, |e| matches!(e, Effect::DestroyBall));
        }

        assert_eq!(session.lives, 0);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(session.game_ended);
        assert_eq!(game_over_messages, 1);
        assert_eq!(destroyed, 1);

        // No further input accepted
        assert!(reduce(&mut session, GameEvent::PointerMove { x: 10.0 }, &settings).is_empty());
        assert!(reduce(&mut session, GameEvent::TogglePause, &settings).is_empty());
        let id = *session.bricks.keys().next().unwrap();
        assert!(reduce(&mut session, GameEvent::BrickHit(id), &settings).is_empty());
    }

    #[test]
    fn test_win_fires_exactly_once() {
        let (mut session, settings) = playing(sample_layout());
        let ids: Vec<BrickId> = session.bricks.keys().copied().collect();
        for id in ids {
            reduce(&mut session, GameEvent::BrickHit(id), &settings);
        }

        let mut wins = 0;
        for _ in 0..50 {
            let effects = reduce(&mut session, GameEvent::Frame, &settings);
            wins += count(&effects, |e| matches!(e, Effect::ShowMessage(Message::Win)));
        }
        assert_eq!(wins, 1);
        assert_eq!(session.phase, GamePhase::Won);
        assert!(session.game_ended);
        assert!(session.paused);
    }

    #[test]
    fn test_no_win_before_all_bricks_gone() {
        let (mut session, settings) = playing(sample_layout());
        for _ in 0..10 {
            assert!(reduce(&mut session, GameEvent::Frame, &settings).is_empty());
        }
    }

    #[test]
    fn test_empty_layout_is_unwinnable() {
        let (mut session, settings) = playing(Layout::default());
        assert!(session.bricks_created);
        assert!(reduce(&mut session, GameEvent::Frame, &settings).is_empty());
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_layout_failed_plays_without_bricks() {
        let settings = Settings::default();
        let mut session = Session::new(viewport(), 0);
        reduce(&mut session, GameEvent::LayoutFailed, &settings);
        assert_eq!(session.phase, GamePhase::Countdown);
        assert!(!session.bricks_created);
        for _ in 0..COUNTDOWN_START {
            reduce(&mut session, GameEvent::CountdownTick, &settings);
        }
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(reduce(&mut session, GameEvent::Frame, &settings).is_empty());
    }

    #[test]
    fn test_pause_during_countdown_restarts_from_last_value() {
        let settings = Settings::default();
        let mut session = Session::new(viewport(), 0);
        reduce(&mut session, GameEvent::BricksReady(sample_layout()), &settings);
        reduce(&mut session, GameEvent::CountdownTick, &settings);
        assert_eq!(session.countdown, 2);

        let effects = reduce(&mut session, GameEvent::TogglePause, &settings);
        assert!(effects.contains(&Effect::Cancel(TimerKind::CountdownTick)));
        assert_eq!(session.phase, GamePhase::Paused);

        // Stale tick while paused is ignored
        assert!(reduce(&mut session, GameEvent::CountdownTick, &settings).is_empty());

        let effects = reduce(&mut session, GameEvent::TogglePause, &settings);
        assert_eq!(session.phase, GamePhase::Countdown);
        assert!(effects.contains(&Effect::ShowCountdown(2)));
        assert!(effects.contains(&Effect::Schedule {
            timer: TimerKind::CountdownTick,
            delay_ms: 1000
        }));
        assert!(session.paused);
    }

    #[test]
    fn test_pause_during_relaunch_rearms_delay() {
        let (mut session, settings) = playing(sample_layout());
        reduce(&mut session, GameEvent::BallOutOfBounds, &settings);

        let effects = reduce(&mut session, GameEvent::TogglePause, &settings);
        assert!(effects.contains(&Effect::Cancel(TimerKind::Relaunch)));

        let effects = reduce(&mut session, GameEvent::TogglePause, &settings);
        assert!(effects.contains(&Effect::Schedule {
            timer: TimerKind::Relaunch,
            delay_ms: 1000
        }));
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(session.relaunch_pending);
    }

    #[test]
    fn test_settings_opened_pauses_once() {
        let (mut session, settings) = playing(sample_layout());
        reduce(&mut session, GameEvent::SettingsOpened, &settings);
        assert_eq!(session.phase, GamePhase::Paused);
        assert!(reduce(&mut session, GameEvent::SettingsOpened, &settings).is_empty());
        reduce(&mut session, GameEvent::TogglePause, &settings);
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pointer_move_clamps_and_respects_pause() {
        let (mut session, settings) = playing(sample_layout());
        let effects = reduce(&mut session, GameEvent::PointerMove { x: 5.0 }, &settings);
        assert_eq!(effects, vec![Effect::MovePaddle { x: 50.0 }]);
        let effects = reduce(&mut session, GameEvent::PointerMove { x: 900.0 }, &settings);
        assert_eq!(effects, vec![Effect::MovePaddle { x: 750.0 }]);

        reduce(&mut session, GameEvent::TogglePause, &settings);
        assert!(reduce(&mut session, GameEvent::PointerMove { x: 300.0 }, &settings).is_empty());
        assert_eq!(session.paddle_x, 750.0);
    }

    #[test]
    fn test_paddle_width_change_reclamps() {
        let (mut session, mut settings) = playing(sample_layout());
        reduce(&mut session, GameEvent::PointerMove { x: 800.0 }, &settings);
        assert_eq!(session.paddle_x, 750.0);

        settings.set_paddle_width(260.0, 800.0);
        let effects = reduce(
            &mut session,
            GameEvent::SettingsChanged(SettingChange::PaddleWidth),
            &settings,
        );
        assert!(effects.contains(&Effect::ResizePaddle { width: 260.0 }));
        assert!(effects.contains(&Effect::MovePaddle { x: 670.0 }));
        assert!(effects.contains(&Effect::RebuildTexture(TextureKind::Paddle)));
    }

    #[test]
    fn test_ball_speed_change_only_while_moving() {
        let (mut session, mut settings) = playing(sample_layout());
        settings.set_ball_speed(2.0);
        let effects = reduce(
            &mut session,
            GameEvent::SettingsChanged(SettingChange::BallSpeed),
            &settings,
        );
        assert_eq!(effects, vec![Effect::SetBallSpeed(2.0)]);

        reduce(&mut session, GameEvent::BallOutOfBounds, &settings);
        assert!(
            reduce(
                &mut session,
                GameEvent::SettingsChanged(SettingChange::BallSpeed),
                &settings
            )
            .is_empty()
        );
    }

    #[test]
    fn test_ball_speed_change_while_paused_mid_flight() {
        let (mut session, mut settings) = playing(sample_layout());
        reduce(&mut session, GameEvent::SettingsOpened, &settings);
        assert_eq!(session.phase, GamePhase::Paused);

        settings.set_ball_speed(2.0);
        let effects = reduce(
            &mut session,
            GameEvent::SettingsChanged(SettingChange::BallSpeed),
            &settings,
        );
        assert_eq!(effects, vec![Effect::SetBallSpeed(2.0)]);

        // Resuming does not touch the velocity again
        let effects = reduce(&mut session, GameEvent::TogglePause, &settings);
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(!effects.iter().any(|e| matches!(
            e,
            Effect::SetBallVelocity(_) | Effect::SetBallSpeed(_)
        )));
    }

    #[test]
    fn test_ball_speed_change_while_paused_at_rest() {
        let (mut session, mut settings) = playing(sample_layout());
        reduce(&mut session, GameEvent::BallOutOfBounds, &settings);
        reduce(&mut session, GameEvent::SettingsOpened, &settings);
        assert_eq!(session.resume_to, Some(Resume::Relaunch));

        settings.set_ball_speed(2.0);
        assert!(
            reduce(
                &mut session,
                GameEvent::SettingsChanged(SettingChange::BallSpeed),
                &settings
            )
            .is_empty()
        );

        // The relaunch picks the new speed up
        reduce(&mut session, GameEvent::TogglePause, &settings);
        let effects = reduce(&mut session, GameEvent::RelaunchDue, &settings);
        assert!(effects.contains(&Effect::SetBallVelocity(Vec2::new(400.0, -400.0))));
    }

    #[test]
    fn test_paddle_width_change_while_paused() {
        let (mut session, mut settings) = playing(sample_layout());
        reduce(&mut session, GameEvent::PointerMove { x: 800.0 }, &settings);
        reduce(&mut session, GameEvent::SettingsOpened, &settings);

        settings.set_paddle_width(260.0, 800.0);
        let effects = reduce(
            &mut session,
            GameEvent::SettingsChanged(SettingChange::PaddleWidth),
            &settings,
        );
        assert!(effects.contains(&Effect::ResizePaddle { width: 260.0 }));
        assert!(effects.contains(&Effect::MovePaddle { x: 670.0 }));
        assert_eq!(session.paddle_x, 670.0);

        reduce(&mut session, GameEvent::TogglePause, &settings);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.paddle_x, 670.0);
    }

    #[test]
    fn test_rescale_velocity() {
        let v = rescale_velocity(Vec2::new(3.0, -4.0), 200.0, 1.5).unwrap();
        assert!((v.length() - 300.0).abs() < 0.01);
        assert!((v.normalize() - Vec2::new(0.6, -0.8)).length() < 0.001);
        assert_eq!(rescale_velocity(Vec2::ZERO, 200.0, 2.0), None);
    }

    #[test]
    fn test_sound_effects_gated_by_setting() {
        let (mut session, mut settings) = playing(sample_layout());
        let effects = reduce(&mut session, GameEvent::PaddleHit, &settings);
        assert_eq!(effects, vec![Effect::Play(SoundEffect::BallHit)]);

        settings.sound_enabled = false;
        let effects = reduce(
            &mut session,
            GameEvent::SettingsChanged(SettingChange::Sound),
            &settings,
        );
        assert_eq!(effects, vec![Effect::SetMuted(true)]);
        assert!(reduce(&mut session, GameEvent::PaddleHit, &settings).is_empty());
    }

    #[test]
    fn test_resize_reclamps_paddle_but_not_bricks() {
        let (mut session, settings) = playing(sample_layout());
        let before: Vec<BrickSpec> = session.bricks.values().map(|b| b.spec.clone()).collect();
        reduce(&mut session, GameEvent::PointerMove { x: 750.0 }, &settings);

        let effects = reduce(
            &mut session,
            GameEvent::Resize(Viewport::new(400.0, 600.0)),
            &settings,
        );
        assert!(effects.contains(&Effect::ResizeWorld(Viewport::new(400.0, 600.0))));
        assert_eq!(session.paddle_x, 350.0);
        let after: Vec<BrickSpec> = session.bricks.values().map(|b| b.spec.clone()).collect();
        assert_eq!(before, after);
    }

    proptest! {
        #[test]
        fn prop_score_is_order_independent(seed in any::<u64>()) {
            let layout = sample_layout();
            let expected: u64 = layout
                .bricks
                .iter()
                .map(|b| brick_points(layout.total_rows, b.row_index))
                .sum();

            let (mut session, settings) = playing(layout);
            let mut ids: Vec<BrickId> = session.bricks.keys().copied().collect();
            // Deterministic shuffle driven by the seed
            let mut state = seed | 1;
            for i in (1..ids.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let j = (state % (i as u64 + 1)) as usize;
                ids.swap(i, j);
            }
            for id in ids {
                reduce(&mut session, GameEvent::BrickHit(id), &settings);
            }
            prop_assert_eq!(session.score, expected);
        }
    }
}

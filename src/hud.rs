//! Heads-up display and start-screen overlay
//!
//! `Hud` mirrors what the player sees (life icons, countdown, terminal
//! message) and is updated only from reducer effects, so popping a life icon
//! happens in the same step as the life is lost.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::hex_to_css;
use crate::layout::Layout;
use crate::renderer::shapes;
use crate::renderer::{DrawOp, TextAlign};
use crate::settings::ThemeColors;
use crate::sim::{Effect, GamePhase, Message, Session};

pub const SCORE_FONT_PX: f32 = 20.0;
pub const BANNER_FONT_PX: f32 = 64.0;
pub const WIN_TEXT: &str = "YOU BROKE IT! YOU WIN!";
pub const GAME_OVER_TEXT: &str = "Game Over";

/// Visible HUD state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub life_icons: u32,
    pub countdown: Option<u32>,
    pub message: Option<Message>,
}

impl Hud {
    pub fn new(lives: u32) -> Self {
        Self {
            life_icons: lives,
            countdown: None,
            message: None,
        }
    }

    /// Apply a reducer effect; returns false for effects the HUD ignores
    pub fn apply(&mut self, effect: &Effect) -> bool {
        match effect {
            Effect::PopLifeIcon => {
                self.life_icons = self.life_icons.saturating_sub(1);
            }
            Effect::ShowCountdown(n) => self.countdown = Some(*n),
            Effect::HideCountdown => self.countdown = None,
            Effect::ShowMessage(message) => {
                self.countdown = None;
                self.message = Some(*message);
            }
            _ => return false,
        }
        true
    }
}

/// Label of the pause button
pub fn pause_label(phase: GamePhase) -> &'static str {
    if phase == GamePhase::Paused {
        "Play"
    } else {
        "Pause"
    }
}

pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

/// Centre of life icon `i`
pub fn life_icon_center(i: u32, viewport_height: f32) -> Vec2 {
    Vec2::new(20.0 + i as f32 * 30.0, viewport_height - 20.0)
}

/// HUD draw ops, drawn over the playfield
pub fn hud_ops(hud: &Hud, session: &Session, colors: &ThemeColors) -> Vec<DrawOp> {
    let vw = session.viewport.width;
    let vh = session.viewport.height;
    let mut ops = Vec::new();

    for i in 0..hud.life_icons {
        ops.push(shapes::ball(life_icon_center(i, vh)));
    }

    ops.push(shapes::text(
        score_text(session.score),
        Vec2::new(vw - 150.0, vh - 30.0),
        SCORE_FONT_PX,
        colors.hud_text,
        TextAlign::TopLeft,
    ));

    if let Some(n) = hud.countdown {
        ops.push(shapes::text(
            n.to_string(),
            Vec2::new(vw / 2.0, vh - 140.0),
            BANNER_FONT_PX,
            colors.hud_text_muted,
            TextAlign::Center,
        ));
    }

    match hud.message {
        Some(Message::GameOver) => ops.push(shapes::text(
            GAME_OVER_TEXT,
            Vec2::new(vw / 2.0, vh - 100.0),
            BANNER_FONT_PX,
            GAME_OVER_COLOR,
            TextAlign::Center,
        )),
        Some(Message::Win) => ops.push(shapes::text(
            WIN_TEXT,
            Vec2::new(vw / 2.0, vh / 2.0),
            BANNER_FONT_PX,
            colors.hud_text_muted,
            TextAlign::Center,
        )),
        None => {}
    }

    ops
}

/// Absolutely positioned brick on the start screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayBrick {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    /// CSS `#rrggbb`
    pub background: String,
}

impl OverlayBrick {
    /// Inline CSS for the brick's `div`
    pub fn style(&self) -> String {
        format!(
            "left:{}px;top:{}px;width:{}px;height:{}px;background-color:{};\
             display:flex;justify-content:center;align-items:center;\
             margin:0;line-height:1;box-sizing:border-box",
            self.left, self.top, self.width, self.height, self.background
        )
    }
}

/// Start-screen bricks, styled like the in-game ones
pub fn overlay_bricks(layout: &Layout) -> Vec<OverlayBrick> {
    layout
        .bricks
        .iter()
        .map(|b| OverlayBrick {
            left: b.x,
            top: b.y,
            width: b.width,
            height: BRICK_HEIGHT,
            text: b.text.clone(),
            background: hex_to_css(b.color),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::layout::{LayoutParams, TextElement, compute_layout};
    use crate::settings::Theme;

    #[test]
    fn test_hud_tracks_effects() {
        let mut hud = Hud::new(5);
        assert!(hud.apply(&Effect::ShowCountdown(3)));
        assert_eq!(hud.countdown, Some(3));
        assert!(hud.apply(&Effect::HideCountdown));
        assert_eq!(hud.countdown, None);
        assert!(hud.apply(&Effect::PopLifeIcon));
        assert_eq!(hud.life_icons, 4);
        assert!(!hud.apply(&Effect::ResetBall));
    }

    #[test]
    fn test_life_icons_never_underflow() {
        let mut hud = Hud::new(1);
        hud.apply(&Effect::PopLifeIcon);
        hud.apply(&Effect::PopLifeIcon);
        assert_eq!(hud.life_icons, 0);
    }

    #[test]
    fn test_hud_ops_positions() {
        let session = Session::new(Viewport::new(800.0, 600.0), 0);
        let mut hud = Hud::new(3);
        hud.apply(&Effect::ShowCountdown(2));
        let ops = hud_ops(&hud, &session, &Theme::Light.colors());

        // 3 icons + score + countdown
        assert_eq!(ops.len(), 5);
        assert_eq!(
            ops[1],
            shapes::ball(Vec2::new(50.0, 580.0))
        );
        assert_eq!(
            ops[3],
            shapes::text("Score: 0", Vec2::new(650.0, 570.0), 20.0, 0x000000, TextAlign::TopLeft)
        );
        assert_eq!(
            ops[4],
            shapes::text("2", Vec2::new(400.0, 460.0), 64.0, 0x4b5563, TextAlign::Center)
        );
    }

    #[test]
    fn test_game_over_banner_is_red() {
        let session = Session::new(Viewport::new(800.0, 600.0), 0);
        let mut hud = Hud::new(0);
        hud.apply(&Effect::ShowMessage(Message::GameOver));
        let ops = hud_ops(&hud, &session, &Theme::Dark.colors());
        assert_eq!(
            ops.last(),
            Some(&shapes::text(
                "Game Over",
                Vec2::new(400.0, 500.0),
                64.0,
                0xFF0000,
                TextAlign::Center
            ))
        );
    }

    #[test]
    fn test_pause_label() {
        assert_eq!(pause_label(GamePhase::Paused), "Play");
        assert_eq!(pause_label(GamePhase::Playing), "Pause");
    }

    #[test]
    fn test_overlay_bricks_mirror_layout() {
        let layout = compute_layout(
            &[TextElement::new("hello world")],
            Viewport::new(400.0, 300.0),
            &LayoutParams::default(),
        );
        let overlay = overlay_bricks(&layout);
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay[0].background, "#f44336");
        assert_eq!(overlay[0].left, 10.0);
        assert_eq!(overlay[0].top, 10.0);
        assert!(overlay[0].style().contains("background-color:#f44336"));
    }
}

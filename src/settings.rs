//! Game settings and preferences
//!
//! Only the theme is persisted; everything else lives for the tab.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::KeyValueStore;

/// Display theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Anything unrecognised falls back to the default theme
    pub fn sanitize(stored: Option<&str>) -> Self {
        stored.and_then(Theme::from_str).unwrap_or_default()
    }

    pub fn colors(&self) -> ThemeColors {
        match self {
            Theme::Light => ThemeColors {
                background: 0xffffff,
                hud_text: 0x000000,
                hud_text_muted: 0x4b5563,
            },
            Theme::Dark => ThemeColors {
                background: 0x111111,
                hud_text: 0xffffff,
                hud_text_muted: 0xa9a9a9,
            },
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "resume_breaker_theme";

    /// Read the stored theme; storage failures yield the default
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(value) => Theme::sanitize(value.as_deref()),
            Err(e) => {
                log::warn!("Theme unavailable ({}), using default", e);
                Theme::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        if let Err(e) = store.set(Self::STORAGE_KEY, self.as_str()) {
            log::warn!("Theme not saved: {}", e);
        }
    }
}

/// Colors (0xRRGGBB) the HUD and background use for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: u32,
    pub hud_text: u32,
    pub hud_text_muted: u32,
}

/// Which setting a live update touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    Sound,
    BallColor,
    PaddleColor,
    PaddleWidth,
    BallSpeed,
    Theme,
}

/// Player-adjustable settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub sound_enabled: bool,
    /// 0xRRGGBB
    pub ball_color: u32,
    /// 0xRRGGBB
    pub paddle_color: u32,
    /// Paddle width in pixels
    pub paddle_width: f32,
    /// Multiplier applied to the base ball speed
    pub ball_speed: f32,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            ball_color: BALL_COLOR,
            paddle_color: PADDLE_COLOR,
            paddle_width: PADDLE_WIDTH,
            ball_speed: 1.0,
            theme: Theme::Light,
        }
    }
}

impl Settings {
    /// Defaults plus the persisted theme
    pub fn load(store: &impl KeyValueStore) -> Self {
        Self {
            theme: Theme::load(store),
            ..Self::default()
        }
    }

    /// Widest paddle allowed for a viewport (a third of its width)
    pub fn max_paddle_width(viewport_width: f32) -> f32 {
        (viewport_width / 3.0).floor().max(0.0)
    }

    /// Clamp a requested width into `[40, vw/3]`
    ///
    /// The third-of-viewport cap wins on viewports too narrow for the
    /// minimum. Non-finite input falls back to the default width.
    pub fn bound_paddle_width(width: f32, viewport_width: f32) -> f32 {
        let max = Self::max_paddle_width(viewport_width);
        let width = if width.is_finite() { width } else { PADDLE_WIDTH };
        width.clamp(MIN_PADDLE_WIDTH.min(max), max)
    }

    pub fn set_paddle_width(&mut self, width: f32, viewport_width: f32) {
        self.paddle_width = Self::bound_paddle_width(width, viewport_width);
    }

    pub fn set_ball_speed(&mut self, speed: f32) {
        self.ball_speed = if speed.is_finite() {
            speed.clamp(MIN_BALL_SPEED, MAX_BALL_SPEED)
        } else {
            1.0
        };
    }

    /// Ball speed as shown next to the slider
    pub fn ball_speed_label(&self) -> String {
        format!("{:.1}", self.ball_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_theme_sanitize() {
        assert_eq!(Theme::sanitize(Some("dark")), Theme::Dark);
        assert_eq!(Theme::sanitize(Some("light")), Theme::Light);
        assert_eq!(Theme::sanitize(Some("DARK")), Theme::Light);
        assert_eq!(Theme::sanitize(Some("<script>")), Theme::Light);
        assert_eq!(Theme::sanitize(None), Theme::Light);
    }

    #[test]
    fn test_theme_round_trips_through_store() {
        let mut store = MemoryStore::new();
        assert_eq!(Theme::load(&store), Theme::Light);
        Theme::Dark.save(&mut store);
        assert_eq!(Theme::load(&store), Theme::Dark);
        assert_eq!(Settings::load(&store).theme, Theme::Dark);
    }

    #[test]
    fn test_theme_storage_failure_uses_default() {
        let mut store = MemoryStore::unavailable();
        Theme::Dark.save(&mut store);
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn test_dark_theme_colors() {
        let colors = Theme::Dark.colors();
        assert_eq!(colors.background, 0x111111);
        assert_eq!(colors.hud_text, 0xffffff);
    }

    #[test]
    fn test_paddle_width_bounded_by_third_of_viewport() {
        let mut settings = Settings::default();
        settings.set_paddle_width(500.0, 900.0);
        assert_eq!(settings.paddle_width, 300.0);
        settings.set_paddle_width(5.0, 900.0);
        assert_eq!(settings.paddle_width, MIN_PADDLE_WIDTH);
        settings.set_paddle_width(150.0, 1000.0);
        assert_eq!(settings.paddle_width, 150.0);
    }

    #[test]
    fn test_paddle_width_cap_on_narrow_viewport() {
        let mut settings = Settings::default();
        settings.set_paddle_width(100.0, 90.0);
        assert_eq!(settings.paddle_width, 30.0);
        settings.set_paddle_width(5.0, 90.0);
        assert_eq!(settings.paddle_width, 30.0);
        assert_eq!(Settings::max_paddle_width(0.0), 0.0);
    }

    #[test]
    fn test_paddle_width_rejects_non_finite() {
        let mut settings = Settings::default();
        let width: f32 = "NaN".parse().unwrap();
        settings.set_paddle_width(width, 900.0);
        assert_eq!(settings.paddle_width, PADDLE_WIDTH);
        settings.set_paddle_width(f32::INFINITY, 900.0);
        assert_eq!(settings.paddle_width, PADDLE_WIDTH);
        settings.set_paddle_width(f32::NAN, 150.0);
        assert_eq!(settings.paddle_width, 50.0);
    }

    #[test]
    fn test_ball_speed_bounded() {
        let mut settings = Settings::default();
        settings.set_ball_speed(5.0);
        assert_eq!(settings.ball_speed, MAX_BALL_SPEED);
        settings.set_ball_speed(0.0);
        assert_eq!(settings.ball_speed, MIN_BALL_SPEED);
        settings.set_ball_speed(f32::NAN);
        assert_eq!(settings.ball_speed, 1.0);
        settings.set_ball_speed(1.5);
        assert_eq!(settings.ball_speed_label(), "1.5");
    }
}

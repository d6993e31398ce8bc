//! Generated ball and paddle textures
//!
//! Both are pure functions of the settings. `TextureCache` keys each texture
//! by a hash of the settings it depends on and only rasterises again when
//! that hash changes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec2;

use super::TextureKind;
use super::vertex::{Rgba, colors};
use crate::consts::*;
use crate::settings::Settings;

/// Gradient stop: offset in 0..=1 and an RGBA color
type Stop = (f32, [f32; 4]);

const BALL_STOPS: [Stop; 4] = [
    (0.0, [1.0, 1.0, 1.0, 0.9]),
    (0.2, [1.0, 1.0, 1.0, 0.3]),
    (0.4, [0.0, 0.0, 0.0, 0.0]),
    (1.0, [0.0, 0.0, 0.0, 0.3]),
];

const PADDLE_STOPS: [Stop; 4] = [
    (0.0, [1.0, 1.0, 1.0, 0.8]),
    (0.2, [1.0, 1.0, 1.0, 0.2]),
    (0.5, [0.0, 0.0, 0.0, 0.0]),
    (1.0, [0.0, 0.0, 0.0, 0.3]),
];

/// Highlight focal point offset, as a fraction of the radius
const BALL_FOCAL_OFFSET: f32 = 0.3;
const PADDLE_BORDER_ALPHA: f32 = 0.2;

/// A rasterised texture
#[derive(Debug, Clone, PartialEq)]
pub struct RasterDescriptor {
    pub width: u32,
    pub height: u32,
    /// Row-major pixels
    pub pixels: Vec<Rgba>,
}

impl RasterDescriptor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; (width * height) as usize],
        }
    }

    /// Raw RGBA bytes for `ImageData`
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    fn blend(&mut self, x: u32, y: u32, src: [f32; 4]) {
        let idx = (y * self.width + x) as usize;
        if let Some(px) = self.pixels.get_mut(idx) {
            *px = px.over(src);
        }
    }
}

/// Sample a gradient at `t`, padding with the end stops
fn sample_stops(stops: &[Stop], t: f32) -> [f32; 4] {
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            let f = if span > 0.0 { (t - t0) / span } else { 1.0 };
            return std::array::from_fn(|i| c0[i] + (c1[i] - c0[i]) * f);
        }
    }
    stops.last().map_or([0.0; 4], |s| s.1)
}

/// Gradient parameter of a two-circle radial gradient whose start circle has
/// zero radius at `focal` and whose end circle is (`center`, `radius`)
fn radial_t(p: Vec2, focal: Vec2, center: Vec2, radius: f32) -> f32 {
    let d = center - focal;
    let q = p - focal;
    let a = d.length_squared() - radius * radius;
    let qd = q.dot(d);
    let c = q.length_squared();

    if a.abs() < f32::EPSILON {
        // Focal point on the end circle
        return if qd.abs() < f32::EPSILON { 0.0 } else { c / (2.0 * qd) };
    }
    let disc = (qd * qd - a * c).max(0.0);
    (qd - disc.sqrt()) / a
}

fn with_alpha(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}

/// Ball: shaded disc in the ball color
pub fn ball_texture(settings: &Settings) -> RasterDescriptor {
    let size = BALL_SIZE as u32;
    let mut raster = RasterDescriptor::new(size, size);

    let radius = BALL_RADIUS;
    let center = Vec2::splat(radius);
    let focal = center - Vec2::splat(radius * BALL_FOCAL_OFFSET);
    let base = Rgba::from_hex(settings.ball_color, 1.0).to_f32();

    for y in 0..size {
        for x in 0..size {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            // Anti-aliased edge
            let coverage = (radius - p.distance(center) + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }

            raster.blend(x, y, with_alpha([base[0], base[1], base[2]], coverage));

            let t = radial_t(p, focal, center, radius).clamp(0.0, 1.0);
            let mut shade = sample_stops(&BALL_STOPS, t);
            shade[3] *= coverage;
            raster.blend(x, y, shade);
        }
    }

    raster
}

/// Paddle: bevelled bar in the paddle color
pub fn paddle_texture(settings: &Settings) -> RasterDescriptor {
    let width = settings.paddle_width.round().max(1.0) as u32;
    let height = PADDLE_HEIGHT as u32;
    let mut raster = RasterDescriptor::new(width, height);
    let base = Rgba::from_hex(settings.paddle_color, 1.0).to_f32();

    for y in 0..height {
        let shade = sample_stops(&PADDLE_STOPS, (y as f32 + 0.5) / height as f32);
        for x in 0..width {
            raster.blend(x, y, base);
            raster.blend(x, y, shade);

            // 1px stroke centred on the outline covers half of each edge pixel
            let on_edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_edge {
                raster.blend(x, y, with_alpha(colors::BLACK, PADDLE_BORDER_ALPHA * 0.5));
            }
        }
    }

    raster
}

/// Hash of the settings a texture depends on
pub fn texture_key(kind: TextureKind, settings: &Settings) -> u64 {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    match kind {
        TextureKind::Ball => settings.ball_color.hash(&mut hasher),
        TextureKind::Paddle => {
            settings.paddle_color.hash(&mut hasher);
            settings.paddle_width.round().to_bits().hash(&mut hasher);
        }
    }
    hasher.finish()
}

#[derive(Debug, Clone)]
struct Entry {
    key: u64,
    raster: RasterDescriptor,
}

impl Entry {
    fn build(kind: TextureKind, settings: &Settings) -> Self {
        let raster = match kind {
            TextureKind::Ball => ball_texture(settings),
            TextureKind::Paddle => paddle_texture(settings),
        };
        Self {
            key: texture_key(kind, settings),
            raster,
        }
    }
}

/// Generated textures, rebuilt only when their settings change
#[derive(Debug, Clone)]
pub struct TextureCache {
    ball: Entry,
    paddle: Entry,
    /// Bumped on every rebuild so backends know to re-upload
    generation: u64,
}

impl TextureCache {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ball: Entry::build(TextureKind::Ball, settings),
            paddle: Entry::build(TextureKind::Paddle, settings),
            generation: 0,
        }
    }

    pub fn get(&self, kind: TextureKind) -> &RasterDescriptor {
        match kind {
            TextureKind::Ball => &self.ball.raster,
            TextureKind::Paddle => &self.paddle.raster,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rebuild `kind` if its settings changed; returns true when rebuilt
    pub fn refresh(&mut self, kind: TextureKind, settings: &Settings) -> bool {
        let key = texture_key(kind, settings);
        let entry = match kind {
            TextureKind::Ball => &mut self.ball,
            TextureKind::Paddle => &mut self.paddle,
        };
        if entry.key == key {
            return false;
        }
        *entry = Entry::build(kind, settings);
        self.generation += 1;
        log::debug!("Rebuilt {:?} texture", kind);
        true
    }
}

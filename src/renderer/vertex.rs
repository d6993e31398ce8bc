//! Pixel type for generated textures

use bytemuck::{Pod, Zeroable};

use crate::rgb_channels;

/// 8-bit RGBA pixel, straight (non-premultiplied) alpha, as `ImageData` expects
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// From 0xRRGGBB and an alpha in 0..=1
    pub fn from_hex(color: u32, alpha: f32) -> Self {
        let [r, g, b] = rgb_channels(color);
        Self::new(r, g, b, to_byte(alpha))
    }

    /// Channels as 0..=1 floats
    pub fn to_f32(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }

    pub fn from_f32(c: [f32; 4]) -> Self {
        Self::new(to_byte(c[0]), to_byte(c[1]), to_byte(c[2]), to_byte(c[3]))
    }

    /// Source-over composite of `src` on top of `self`
    pub fn over(self, src: [f32; 4]) -> Self {
        let dst = self.to_f32();
        let sa = src[3].clamp(0.0, 1.0);
        let da = dst[3];
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let mix = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / out_a;
        Self::from_f32([
            mix(src[0], dst[0]),
            mix(src[1], dst[1]),
            mix(src[2], dst[2]),
            out_a,
        ])
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Colors for game elements (0..=1 RGBA)
pub mod colors {
    pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
    pub const BLACK: [f32; 3] = [0.0, 0.0, 0.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex(0xf44336, 1.0), Rgba::new(0xf4, 0x43, 0x36, 255));
        assert_eq!(Rgba::from_hex(0x000000, 0.4).a, 102);
    }

    #[test]
    fn test_over_opaque_replaces() {
        let base = Rgba::new(10, 20, 30, 255);
        assert_eq!(base.over([1.0, 1.0, 1.0, 1.0]), Rgba::new(255, 255, 255, 255));
    }

    #[test]
    fn test_over_transparent_keeps() {
        let base = Rgba::new(10, 20, 30, 255);
        assert_eq!(base.over([1.0, 1.0, 1.0, 0.0]), base);
        assert_eq!(Rgba::TRANSPARENT.over([0.0, 0.0, 0.0, 0.0]), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_over_half_blend() {
        let base = Rgba::new(0, 0, 0, 255);
        let out = base.over([1.0, 1.0, 1.0, 0.5]);
        assert_eq!(out.a, 255);
        assert!((i32::from(out.r) - 128).abs() <= 1);
    }

    #[test]
    fn test_pod_layout() {
        let px = [Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)];
        let bytes: &[u8] = bytemuck::cast_slice(&px);
        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}

use bevy::math::Vec2;

use super::texture::Texture;

/// 8-bit sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn gray(v: u8) -> Self {
        Self([v, v, v, 255])
    }

    pub fn alpha(self) -> u8 {
        self.0[3]
    }

    /// Linear blend, truncating each channel like integer color math does.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for (i, c) in out.iter_mut().enumerate() {
            let a = self.0[i] as f32;
            let b = other.0[i] as f32;
            *c = (a + (b - a) * t) as u8;
        }
        Self(out)
    }
}

impl From<Rgba8> for bevy::color::Color {
    fn from(c: Rgba8) -> Self {
        bevy::color::Color::srgba_u8(c.0[0], c.0[1], c.0[2], c.0[3])
    }
}

/// Drawing primitives, addressed in screen pixels (x right, y down).
///
/// Machines only supply geometry and colors; a backend decides how they end up on screen.
pub trait Renderer {
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba8);

    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba8, width: f32);

    fn line(&mut self, a: Vec2, b: Vec2, color: Rgba8, width: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba8);

    /// Ring of `width` pixels drawn inward from `radius`.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba8, width: f32);

    /// Draws `texture` rotated counter-clockwise (on screen) by `degrees`, centered at `center`.
    fn blit_rotated(&mut self, texture: &Texture, center: Vec2, degrees: f32);

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba8) {
        let max = min + size;
        self.fill_polygon(
            &[min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
            color,
        );
    }
}

/// Wraps any angle in degrees into `[0, 360)`, snapped to 1/100 degree so that
/// `a` and `a + 360` always rasterize identically.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = (degrees as f64).rem_euclid(360.0);
    let snapped = (wrapped * 100.0).round() / 100.0;
    if snapped >= 360.0 {
        0.0
    } else {
        snapped as f32
    }
}

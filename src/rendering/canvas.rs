//! Software raster backend over an `image::RgbaImage`.
//!
//! Coverage is decided per pixel center (no anti-aliasing); colors are blended source-over.

use std::path::Path;

use anyhow::{Context, Result};
use bevy::math::Vec2;
use image::{Rgba, RgbaImage};

use super::renderer::{normalize_degrees, Renderer, Rgba8};
use super::texture::Texture;

#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    crossings: Vec<f32>,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height), crossings: Vec::new() }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn clear(&mut self, color: Rgba8) {
        for px in self.image.pixels_mut() {
            *px = Rgba(color.0);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.width() && y < self.height()).then(|| Rgba8(self.image.get_pixel(x, y).0))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image
            .save(path)
            .with_context(|| format!("write frame {}", path.display()))
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba8) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let sa = color.alpha();
        if sa == 0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        if sa == 255 {
            *dst = Rgba(color.0);
            return;
        }
        let sa = sa as f32 / 255.0;
        let da = dst.0[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        for i in 0..3 {
            let sc = color.0[i] as f32;
            let dc = dst.0[i] as f32;
            dst.0[i] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
        }
        dst.0[3] = (out_a * 255.0).round() as u8;
    }

    /// Fills pixels whose centers fall in `[x0, x1)` on row `y`.
    fn span(&mut self, y: i64, x0: f32, x1: f32, color: Rgba8) {
        let start = ((x0 - 0.5).ceil() as i64).max(0);
        let end = ((x1 - 0.5).ceil() as i64).min(self.width() as i64);
        for x in start..end {
            self.blend(x, y, color);
        }
    }

    fn rows(&self, min_y: f32, max_y: f32) -> std::ops::RangeInclusive<i64> {
        let top = (min_y.floor() as i64).max(0);
        let bottom = (max_y.ceil() as i64).min(self.height() as i64 - 1);
        top..=bottom
    }
}

impl Renderer for Canvas {
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba8) {
        if points.len() < 3 {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let mut crossings = std::mem::take(&mut self.crossings);
        for y in self.rows(min_y, max_y) {
            let yc = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= yc && b.y > yc) || (b.y <= yc && a.y > yc) {
                    let t = (yc - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                self.span(y, pair[0], pair[1], color);
            }
        }
        self.crossings = crossings;
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba8, width: f32) {
        for (i, a) in points.iter().enumerate() {
            self.line(*a, points[(i + 1) % points.len()], color, width);
        }
    }

    fn line(&mut self, a: Vec2, b: Vec2, color: Rgba8, width: f32) {
        let width = width.max(1.0);
        let d = b - a;
        let len = d.length();
        if len < 1e-4 {
            self.fill_circle(a, width * 0.5, color);
            return;
        }
        let n = Vec2::new(-d.y, d.x) / len * (width * 0.5);
        self.fill_polygon(&[a + n, b + n, b - n, a - n], color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba8) {
        let r2 = radius * radius;
        for y in self.rows(center.y - radius, center.y + radius) {
            let dy = y as f32 + 0.5 - center.y;
            let rest = r2 - dy * dy;
            if rest < 0.0 {
                continue;
            }
            let half = rest.sqrt();
            // Span end is exclusive; nudge so the rightmost center on the rim is kept.
            self.span(y, center.x - half, center.x + half + 1e-4, color);
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba8, width: f32) {
        let outer2 = radius * radius;
        let inner = (radius - width.max(1.0)).max(0.0);
        let inner2 = inner * inner;
        let x0 = ((center.x - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(self.width() as i64 - 1);
        for y in self.rows(center.y - radius, center.y + radius) {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let d2 = dx * dx + dy * dy;
                if d2 <= outer2 && d2 > inner2 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn blit_rotated(&mut self, texture: &Texture, center: Vec2, degrees: f32) {
        let (sin, cos) = normalize_degrees(degrees).to_radians().sin_cos();
        let (tw, th) = (texture.width() as f32, texture.height() as f32);
        let half = Vec2::new(tw, th) * 0.5;
        let reach = half.length().ceil();
        let x0 = ((center.x - reach).floor() as i64).max(0);
        let x1 = ((center.x + reach).ceil() as i64).min(self.width() as i64 - 1);
        let source = texture.image();
        for y in self.rows(center.y - reach, center.y + reach) {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                // Inverse of a counter-clockwise (screen) rotation in a y-down frame.
                let u = dx * cos - dy * sin + half.x;
                let v = dx * sin + dy * cos + half.y;
                if u < 0.0 || v < 0.0 || u >= tw || v >= th {
                    continue;
                }
                let texel = source.get_pixel(u as u32, v as u32).0;
                self.blend(x, y, Rgba8(texel));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8::rgb(255, 0, 0);

    #[test]
    fn fill_rect_covers_exact_pixels() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(Vec2::new(2.0, 3.0), Vec2::new(4.0, 2.0), RED);
        let painted: Vec<(u32, u32)> = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == Some(RED))
            .collect();
        assert_eq!(painted.len(), 8);
        assert!(painted.contains(&(2, 3)) && painted.contains(&(5, 4)));
    }

    #[test]
    fn translucent_fill_blends_over_opaque() {
        let mut canvas = Canvas::new(4, 4);
        canvas.clear(Rgba8::rgb(0, 0, 0));
        canvas.fill_circle(Vec2::new(2.0, 2.0), 2.0, Rgba8::rgba(255, 255, 255, 51));
        let px = canvas.pixel(2, 2).unwrap();
        assert_eq!(px, Rgba8::rgb(51, 51, 51));
    }

    #[test]
    fn ring_leaves_center_untouched() {
        let mut canvas = Canvas::new(21, 21);
        canvas.stroke_circle(Vec2::new(10.5, 10.5), 10.0, RED, 2.0);
        assert_eq!(canvas.pixel(10, 10), Some(Rgba8::TRANSPARENT));
        assert_eq!(canvas.pixel(10, 1), Some(RED));
    }

    #[test]
    fn wide_line_is_wider_than_thin_line() {
        let count = |width: f32| {
            let mut canvas = Canvas::new(40, 40);
            canvas.line(Vec2::new(5.0, 20.0), Vec2::new(35.0, 20.0), RED, width);
            canvas.as_raw().chunks(4).filter(|px| px == &RED.0).count()
        };
        assert!(count(8.0) > 3 * count(1.0));
    }

    #[test]
    fn blit_wraps_full_turns() {
        let texture = Texture::paint(9, 5, |c| {
            c.fill_rect(Vec2::ZERO, Vec2::new(3.0, 5.0), RED);
            c.fill_rect(Vec2::new(3.0, 0.0), Vec2::new(6.0, 5.0), Rgba8::rgb(0, 0, 255));
        });
        let draw = |degrees: f32| {
            let mut canvas = Canvas::new(20, 20);
            canvas.blit_rotated(&texture, Vec2::new(10.0, 10.0), degrees);
            canvas.into_image()
        };
        assert_eq!(draw(33.3), draw(393.3));
        assert_eq!(draw(-90.0), draw(270.0));
        assert_ne!(draw(0.0), draw(90.0));
    }

    #[test]
    fn blit_quarter_turn_moves_left_edge_to_bottom() {
        let texture =
            Texture::paint(10, 10, |c| c.fill_rect(Vec2::ZERO, Vec2::new(2.0, 10.0), RED));
        let mut canvas = Canvas::new(10, 10);
        canvas.blit_rotated(&texture, Vec2::new(5.0, 5.0), 90.0);
        // Counter-clockwise on screen: the left column ends up along the bottom edge.
        assert_eq!(canvas.pixel(5, 9), Some(RED));
        assert_ne!(canvas.pixel(0, 5), Some(RED));
    }
}

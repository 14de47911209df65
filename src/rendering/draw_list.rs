use bevy::math::Vec2;

use super::renderer::{Renderer, Rgba8};
use super::texture::Texture;

/// One recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillPolygon { points: Vec<Vec2>, color: Rgba8 },
    StrokePolygon { points: Vec<Vec2>, color: Rgba8, width: f32 },
    Line { a: Vec2, b: Vec2, color: Rgba8, width: f32 },
    FillCircle { center: Vec2, radius: f32, color: Rgba8 },
    StrokeCircle { center: Vec2, radius: f32, color: Rgba8, width: f32 },
    Blit { size: (u32, u32), center: Vec2, degrees: f32 },
}

/// Renderer that only records what it is asked to draw.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Rgba8, f32)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line { a, b, color, width } => Some((a, b, color, width)),
            _ => None,
        })
    }

    pub fn blits(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Blit { center, degrees, .. } => Some((center, degrees)),
            _ => None,
        })
    }
}

impl Renderer for DrawList {
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba8) {
        self.commands.push(DrawCommand::FillPolygon { points: points.to_vec(), color });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgba8, width: f32) {
        self.commands.push(DrawCommand::StrokePolygon { points: points.to_vec(), color, width });
    }

    fn line(&mut self, a: Vec2, b: Vec2, color: Rgba8, width: f32) {
        self.commands.push(DrawCommand::Line { a, b, color, width });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba8) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba8, width: f32) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, color, width });
    }

    fn blit_rotated(&mut self, texture: &Texture, center: Vec2, degrees: f32) {
        self.commands.push(DrawCommand::Blit {
            size: (texture.width(), texture.height()),
            center,
            degrees,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fill_rect_records_a_quad() {
        let mut list = DrawList::new();
        list.fill_rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Rgba8::gray(9));
        match &list.commands[..] {
            [DrawCommand::FillPolygon { points, .. }] => {
                assert_eq!(points[2], Vec2::new(4.0, 6.0));
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }
}

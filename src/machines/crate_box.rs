use bevy::math::Vec2;

use super::lever::{AnchorSource, LeverAnchor};
use super::{box_corners, Drawable};
use crate::physics::{
    moment_for_box, BodyDef, ColliderHandle, Geometry, RigidBodyHandle, ShapeDef, Space,
};
use crate::rendering::{palette, Renderer};

/// Crate size grows with mass.
pub const CRATE_SIZE_MULTIPLIER: f32 = 10.0;

/// Wooden crate whose size is derived from its mass.
pub struct Crate {
    body: RigidBodyHandle,
    shape: ColliderHandle,
    mass: f32,
}

impl Crate {
    pub fn new(space: &mut Space, position: Vec2, mass: f32) -> Self {
        let extent = 2.0 * mass * CRATE_SIZE_MULTIPLIER;
        let (body, shape) = space.register_shape(
            BodyDef::dynamic(mass, moment_for_box(mass, extent, extent)).at(position),
            ShapeDef::new(Geometry::Box { width: extent, height: extent })
                .elasticity(0.6)
                .friction(0.8),
        );
        Self { body, shape, mass }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn shape(&self) -> ColliderHandle {
        self.shape
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Half the edge length: `mass * 10`.
    pub fn size(&self) -> f32 {
        self.mass * CRATE_SIZE_MULTIPLIER
    }

    /// Full edge length handed to the box shape.
    pub fn extent(&self) -> f32 {
        2.0 * self.size()
    }
}

impl AnchorSource for Crate {
    fn lever_anchor(&self, space: &Space) -> Option<LeverAnchor> {
        let pose = space.pose(self.body)?;
        Some(LeverAnchor { position: pose.position, half_size: self.size() })
    }
}

impl Drawable for Crate {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        let Some(pose) = space.pose(self.body) else { return };
        let pts = box_corners(pose, self.extent(), self.extent());
        renderer.fill_polygon(&pts, palette::DARK_BROWN);
        renderer.stroke_polygon(&pts, palette::BROWN, 2.0);
        renderer.line(pts[0], pts[2], palette::CRATE_X, 3.0);
        renderer.line(pts[1], pts[3], palette::CRATE_X, 3.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::{DrawCommand, DrawList};

    #[test]
    fn size_tracks_mass() {
        let mut space = Space::default();
        for mass in [0.5, 1.0, 2.0, 3.5] {
            let c = Crate::new(&mut space, Vec2::ZERO, mass);
            assert_eq!(c.size(), 10.0 * mass);
            assert_eq!(c.extent(), 2.0 * c.size());
            let half = space.shape_half_extents(c.shape()).unwrap();
            assert!((half - Vec2::splat(c.size())).length() < 1e-3, "{half:?}");
        }
    }

    #[test]
    fn draw_is_box_outline_and_cross() {
        let mut space = Space::default();
        let c = Crate::new(&mut space, Vec2::new(100.0, 100.0), 1.0);
        let mut list = DrawList::new();
        c.draw(&space, &mut list);
        assert!(matches!(list.commands[0], DrawCommand::FillPolygon { .. }));
        assert_eq!(list.lines().filter(|l| l.3 == 3.0).count(), 2);
    }
}

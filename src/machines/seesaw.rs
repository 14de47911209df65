use anyhow::Result;
use bevy::log::debug;
use bevy::math::Vec2;

use super::{box_corners, Drawable};
use crate::physics::{
    moment_for_box, BodyDef, ColliderHandle, Geometry, JointDef, RigidBodyHandle, ShapeDef, Space,
};
use crate::rendering::{palette, Renderer};

pub const SEESAW_MASS: f32 = 15.0;
/// Rotation bound either side of rest: 35 degrees.
pub const SEESAW_LIMIT: f32 = 35.0 * std::f32::consts::PI / 180.0;
const STRIPES: usize = 6;

/// Steel plank pinned at its center, swinging within ±35°.
pub struct Seesaw {
    body: RigidBodyHandle,
    shape: ColliderHandle,
    width: f32,
    height: f32,
}

impl Seesaw {
    pub fn new(space: &mut Space, position: Vec2, width: f32, height: f32) -> Result<Self> {
        let moment = moment_for_box(SEESAW_MASS, width, height);
        let (body, shape) = space.register_shape(
            BodyDef::dynamic(SEESAW_MASS, moment).at(position),
            ShapeDef::new(Geometry::Box { width, height })
                .elasticity(0.4)
                .friction(0.8),
        );
        // Both joints or neither: without the limit this is just a pendulum.
        space.attach(
            body,
            &[
                JointDef::Pin { anchor: position, body_anchor: Vec2::ZERO },
                JointDef::RotaryLimit { min: -SEESAW_LIMIT, max: SEESAW_LIMIT },
            ],
        )?;
        debug!(target: "space", "seesaw at {position} ({width}x{height})");
        Ok(Self { body, shape, width, height })
    }

    /// Default 10 x 150 plank.
    pub fn standard(space: &mut Space, position: Vec2) -> Result<Self> {
        Self::new(space, position, 10.0, 150.0)
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn shape(&self) -> ColliderHandle {
        self.shape
    }
}

impl Drawable for Seesaw {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        let Some(pose) = space.pose(self.body) else { return };
        let c = box_corners(pose, self.width, self.height);
        for i in 0..STRIPES {
            let frac = i as f32 / (STRIPES - 1) as f32;
            let color = palette::SEESAW.lerp(palette::STEEL_HIGHLIGHT, frac);
            renderer.line(c[0].lerp(c[1], frac), c[3].lerp(c[2], frac), color, 3.0);
        }
        renderer.stroke_polygon(&c, palette::SEESAW_EDGE, 2.0);
        renderer.fill_circle(pose.position.trunc(), 10.0, palette::SEESAW_PIVOT);
    }
}

use bevy::math::Vec2;

use super::{box_corners, Drawable};
use crate::physics::{
    moment_for_box, BodyDef, ColliderHandle, Geometry, RigidBodyHandle, ShapeDef, Space,
};
use crate::rendering::{palette, Renderer};

pub const DOMINO_MASS: f32 = 10.0;
pub const DOMINO_WIDTH: f32 = 15.0;
pub const DOMINO_HEIGHT: f32 = 100.0;

pub struct Domino {
    body: RigidBodyHandle,
    shape: ColliderHandle,
    width: f32,
    height: f32,
}

impl Domino {
    /// Standard 15 x 100 domino.
    pub fn new(space: &mut Space, position: Vec2) -> Self {
        Self::sized(space, position, DOMINO_WIDTH, DOMINO_HEIGHT)
    }

    pub fn sized(space: &mut Space, position: Vec2, width: f32, height: f32) -> Self {
        let moment = moment_for_box(DOMINO_MASS, width, height);
        let (body, shape) = space.register_shape(
            BodyDef::dynamic(DOMINO_MASS, moment).at(position),
            ShapeDef::new(Geometry::Box { width, height })
                .elasticity(0.4)
                .friction(0.8),
        );
        Self { body, shape, width, height }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn shape(&self) -> ColliderHandle {
        self.shape
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Drawable for Domino {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        let Some(pose) = space.pose(self.body) else { return };
        let corners = box_corners(pose, self.width, self.height);
        renderer.fill_polygon(&corners, palette::DOMINO);
        renderer.stroke_polygon(&corners, palette::DOMINO_EDGE, 2.0);
    }
}

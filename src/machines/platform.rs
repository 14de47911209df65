use bevy::math::Vec2;
use rand::Rng;

use super::{box_corners, Drawable};
use crate::physics::{BodyDef, ColliderHandle, Geometry, RigidBodyHandle, ShapeDef, Space};
use crate::rendering::{palette, Renderer, Rgba8};

const SPECKLE_COUNT: usize = 18;
const SPECKLE_PADDING: f32 = 2.0;

/// Texture dot in the platform's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speckle {
    pub offset: Vec2,
    pub color: Rgba8,
    pub radius: f32,
}

/// Static concrete slab.
pub struct Platform {
    body: RigidBodyHandle,
    shape: ColliderHandle,
    length: f32,
    thickness: f32,
    speckles: Vec<Speckle>,
}

impl Platform {
    /// `angle` is in degrees.
    pub fn new(
        space: &mut Space,
        position: Vec2,
        length: f32,
        thickness: f32,
        angle: f32,
    ) -> Self {
        let (body, shape) = space.register_shape(
            BodyDef::fixed().at(position).rotated(angle.to_radians()),
            ShapeDef::new(Geometry::Box { width: length, height: thickness })
                .elasticity(0.4)
                .friction(0.8),
        );
        Self {
            body,
            shape,
            length,
            thickness,
            speckles: generate_speckles(length, thickness, &mut rand::thread_rng()),
        }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn shape(&self) -> ColliderHandle {
        self.shape
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn speckles(&self) -> &[Speckle] {
        &self.speckles
    }
}

fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        (lo + hi) * 0.5
    }
}

pub fn generate_speckles(length: f32, thickness: f32, rng: &mut impl Rng) -> Vec<Speckle> {
    let (hx, hy) = (length * 0.5 - SPECKLE_PADDING, thickness * 0.5 - SPECKLE_PADDING);
    (0..SPECKLE_COUNT)
        .map(|_| {
            let offset = Vec2::new(uniform(rng, -hx, hx), uniform(rng, -hy, hy));
            let level = rng.gen_range(130..=180);
            let color = palette::speckle_color(rng.gen_bool(0.7), level);
            let radius = rng.gen_range(1..=2) as f32;
            Speckle { offset, color, radius }
        })
        .collect()
}

impl Drawable for Platform {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        let Some(pose) = space.pose(self.body) else { return };
        let corners = box_corners(pose, self.length, self.thickness);
        renderer.fill_polygon(&corners, palette::SEESAW);
        let rot = Vec2::from_angle(pose.angle);
        for speckle in &self.speckles {
            let at = (pose.position + rot.rotate(speckle.offset)).trunc();
            renderer.fill_circle(at, speckle.radius, speckle.color);
        }
        renderer.stroke_polygon(&corners, palette::SEESAW_EDGE, 2.0);
    }
}

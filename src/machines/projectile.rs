use std::f32::consts::TAU;

use bevy::math::Vec2;
use rand::Rng;

use super::{draw_textured, Drawable};
use crate::physics::{
    moment_for_circle, BodyDef, ColliderHandle, Geometry, RigidBodyHandle, ShapeDef, Space,
};
use crate::rendering::{palette, Renderer, Texture};

pub const PROJECTILE_RADIUS: f32 = 18.5;
pub const PROJECTILE_MASS: f32 = 100.0;

/// Heavy rock, usually thrown by the catapult.
pub struct Projectile {
    body: RigidBodyHandle,
    shape: ColliderHandle,
    radius: f32,
    texture: Texture,
    /// Set by whoever watches ground contacts; never touched here.
    pub on_ground: bool,
}

impl Projectile {
    pub fn new(space: &mut Space, position: Vec2) -> Self {
        Self::with_radius(space, position, PROJECTILE_RADIUS)
    }

    pub fn with_radius(space: &mut Space, position: Vec2, radius: f32) -> Self {
        let moment = moment_for_circle(PROJECTILE_MASS, 0.0, radius, Vec2::ZERO);
        let (body, shape) = space.register_shape(
            BodyDef::dynamic(PROJECTILE_MASS, moment).at(position),
            ShapeDef::new(Geometry::Circle { radius })
                .density(1.0)
                .elasticity(0.4)
                .friction(0.8),
        );
        Self {
            body,
            shape,
            radius,
            texture: paint_rock(radius, &mut rand::thread_rng()),
            on_ground: false,
        }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn shape(&self) -> ColliderHandle {
        self.shape
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

/// Gray rock with a dark rim, speckles and a few cracks.
pub fn paint_rock(radius: f32, rng: &mut impl Rng) -> Texture {
    let side = (radius * 2.0) as u32;
    Texture::paint(side, side, |c| {
        let center = Vec2::splat(radius);
        c.fill_circle(center, radius, palette::ROCK);
        c.stroke_circle(center, radius, palette::ROCK_EDGE, 2.0);
        for _ in 0..12 {
            let dir = Vec2::from_angle(rng.gen_range(0.0..TAU));
            let dist = rng.gen_range(0.0..radius * 0.8);
            c.fill_circle((center + dir * dist).trunc(), 1.0, palette::ROCK_SPECKLE);
        }
        for _ in 0..3 {
            let start = rng.gen_range(0.0..TAU);
            let end = start + rng.gen_range(0.5..5.0);
            c.line(
                center + Vec2::from_angle(start) * radius * 0.4,
                center + Vec2::from_angle(end) * radius * 0.8,
                palette::ROCK_CRACK,
                2.0,
            );
        }
    })
}

impl Drawable for Projectile {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        draw_textured(space, self.body, &self.texture, renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::Rgba8;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rock_texture_stays_inside_its_disc() {
        let texture = paint_rock(PROJECTILE_RADIUS, &mut StdRng::seed_from_u64(7));
        assert_eq!(texture.width(), 37);
        let corner = Rgba8(texture.image().get_pixel(0, 0).0);
        assert_eq!(corner, Rgba8::TRANSPARENT);
        let middle = Rgba8(texture.image().get_pixel(18, 18).0);
        assert_eq!(middle.alpha(), 255);
    }

    #[test]
    fn new_projectile_starts_airborne() {
        let mut space = Space::default();
        let rock = Projectile::new(&mut space, Vec2::new(10.0, 10.0));
        assert!(!rock.on_ground);
        assert!(space.contains_shape(rock.shape()));
    }
}

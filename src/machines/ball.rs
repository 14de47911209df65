use bevy::math::Vec2;

use super::{draw_textured, Drawable};
use crate::physics::{
    moment_for_circle, BodyDef, CollisionType, ColliderHandle, Geometry, RigidBodyHandle,
    ShapeDef, Space,
};
use crate::rendering::{palette, Renderer, Texture};

pub const BALL_RADIUS: f32 = 15.0;
pub const BALL_MASS: f32 = 10.0;

/// Bouncy red ball.
pub struct Ball {
    body: RigidBodyHandle,
    shape: ColliderHandle,
    radius: f32,
    texture: Texture,
}

impl Ball {
    pub fn new(space: &mut Space, position: Vec2) -> Self {
        Self::with_radius(space, position, BALL_RADIUS)
    }

    pub fn with_radius(space: &mut Space, position: Vec2, radius: f32) -> Self {
        let moment = moment_for_circle(BALL_MASS, 0.0, radius, Vec2::ZERO);
        let (body, shape) = space.register_shape(
            BodyDef::dynamic(BALL_MASS, moment).at(position),
            ShapeDef::new(Geometry::Circle { radius })
                .elasticity(1.0)
                .friction(0.5)
                .collision_type(CollisionType::GENERIC),
        );
        Self {
            body,
            shape,
            radius,
            texture: paint_ball(radius),
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

fn paint_ball(radius: f32) -> Texture {
    let side = (radius * 2.0) as u32;
    Texture::paint(side, side, |c| {
        let center = Vec2::splat(radius);
        c.fill_circle(center, radius, palette::BALL);
        c.stroke_circle(center, radius, palette::BALL_EDGE, 2.0);
        c.fill_circle(
            Vec2::splat(radius - 4.0),
            (radius / 3.0).floor(),
            palette::BALL_HIGHLIGHT,
        );
    })
}

impl Drawable for Ball {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        draw_textured(space, self.body, &self.texture, renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::DrawList;

    #[test]
    fn ball_is_tagged_generic() {
        let mut space = Space::default();
        let ball = Ball::new(&mut space, Vec2::new(50.0, 50.0));
        assert_eq!(space.collision_type(ball.shape()), Some(CollisionType::GENERIC));
        assert_eq!(ball.texture().width(), 30);
    }

    #[test]
    fn draw_blits_texture_against_body_angle() {
        let mut space = Space::default();
        let ball = Ball::new(&mut space, Vec2::new(50.7, 20.2));
        space.set_pose(
            ball.body(),
            crate::physics::Pose { position: Vec2::new(50.7, 20.2), angle: 0.5 },
        );
        let mut list = DrawList::new();
        ball.draw(&space, &mut list);
        let blits: Vec<_> = list.blits().collect();
        assert_eq!(blits.len(), 1);
        assert_eq!(blits[0].0, Vec2::new(50.0, 20.0));
        assert!((blits[0].1 + 0.5f32.to_degrees()).abs() < 1e-4);
    }
}

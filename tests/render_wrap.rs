//! Rotated textures rasterize the same at `θ` and `θ + 2π`.
use std::f32::consts::TAU;

use bevy::math::Vec2;
use contraptions::machines::{Ball, Drawable, Projectile};
use contraptions::physics::{Pose, RigidBodyHandle, Space};
use contraptions::rendering::{palette, Canvas};

fn frame_at(space: &mut Space, body: RigidBodyHandle, draw: &dyn Drawable, angle: f32) -> Vec<u8> {
    space.set_pose(body, Pose { position: Vec2::new(60.0, 40.0), angle });
    let mut canvas = Canvas::new(120, 80);
    canvas.clear(palette::BACKGROUND);
    draw.draw(space, &mut canvas);
    canvas.as_raw().to_vec()
}

#[test]
fn ball_wraps_full_turns() {
    let mut space = Space::default();
    let ball = Ball::new(&mut space, Vec2::new(60.0, 40.0));
    for theta in [0.3, 2.0, -2.5] {
        let a = frame_at(&mut space, ball.body(), &ball, theta);
        let b = frame_at(&mut space, ball.body(), &ball, theta + TAU);
        assert!(a == b, "frames differ at {theta}");
    }
}

#[test]
fn projectile_wraps_full_turns_and_actually_rotates() {
    let mut space = Space::default();
    let rock = Projectile::new(&mut space, Vec2::new(60.0, 40.0));
    let a = frame_at(&mut space, rock.body(), &rock, 0.3);
    let b = frame_at(&mut space, rock.body(), &rock, 0.3 + TAU);
    assert!(a == b);
    let c = frame_at(&mut space, rock.body(), &rock, 0.3 + TAU / 4.0);
    assert!(a != c, "a quarter turn must change the rock texture");
}

#[test]
fn ball_frame_is_painted_around_its_center() {
    let mut space = Space::default();
    let ball = Ball::new(&mut space, Vec2::new(60.0, 40.0));
    space.set_pose(ball.body(), Pose { position: Vec2::new(60.0, 40.0), angle: 0.0 });
    let mut canvas = Canvas::new(120, 80);
    canvas.clear(palette::BACKGROUND);
    ball.draw(&space, &mut canvas);
    assert_eq!(canvas.pixel(60, 50), Some(palette::BALL));
    assert_eq!(canvas.pixel(5, 5), Some(palette::BACKGROUND));
}

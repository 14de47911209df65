use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use bevy::math::Vec2;
use contraptions::machines::Ball;
use contraptions::physics::{BodyDef, CollisionType, Geometry, ShapeDef, Space};

const DT: f32 = 1.0 / 60.0;

fn bouncy_lever_floor(space: &mut Space) {
    space.register_shape(
        BodyDef::fixed().at(Vec2::new(100.0, 120.0)),
        ShapeDef::new(Geometry::Box { width: 300.0, height: 10.0 })
            .elasticity(1.0)
            .collision_type(CollisionType::LEVER),
    );
}

fn count_lever_hits(space: &mut Space, respond: bool) -> Arc<AtomicU32> {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    space.on_contact_begin(
        CollisionType::GENERIC,
        CollisionType::LEVER,
        Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            respond
        }),
    );
    hits
}

#[test]
fn refusing_ball_falls_through_lever() {
    let mut space = Space::default();
    let hits = count_lever_hits(&mut space, false);
    bouncy_lever_floor(&mut space);
    let ball = Ball::new(&mut space, Vec2::new(100.0, 0.0));

    for step in 0..90 {
        space.step(DT);
        let vy = space.velocity(ball.body()).unwrap().y;
        assert!(vy > 0.0, "step {step}: bounced with vy = {vy}");
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(space.pose(ball.body()).unwrap().position.y > 200.0);
}

#[test]
fn accepting_ball_bounces_off_lever() {
    let mut space = Space::default();
    let hits = count_lever_hits(&mut space, true);
    bouncy_lever_floor(&mut space);
    let ball = Ball::new(&mut space, Vec2::new(100.0, 0.0));

    let mut rose = false;
    for _ in 0..60 {
        space.step(DT);
        rose |= space.velocity(ball.body()).unwrap().y < 0.0;
    }
    assert!(rose, "elastic contact sends the ball back up");
    assert!(hits.load(Ordering::SeqCst) >= 1);
    assert!(space.pose(ball.body()).unwrap().position.y < 120.0);
}

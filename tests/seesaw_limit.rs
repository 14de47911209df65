use bevy::math::Vec2;
use contraptions::machines::seesaw::SEESAW_LIMIT;
use contraptions::machines::{Crate, Seesaw};
use contraptions::physics::Space;

#[test]
fn angle_stays_within_limit_under_spin() {
    let mut space = Space::default();
    let seesaw = Seesaw::standard(&mut space, Vec2::new(200.0, 200.0)).unwrap();
    let mut max_seen = 0.0f32;
    for step in 0..600 {
        if step % 60 == 0 {
            let spin = if (step / 60) % 2 == 0 { 10.0 } else { -10.0 };
            space.set_angular_velocity(seesaw.body(), spin);
        }
        space.step(1.0 / 60.0);
        let angle = space.pose(seesaw.body()).unwrap().angle;
        max_seen = max_seen.max(angle.abs());
        assert!(angle.abs() <= SEESAW_LIMIT + 0.05, "step {step}: angle {angle}");
    }
    assert!(max_seen > SEESAW_LIMIT * 0.5, "seesaw should actually swing, max {max_seen}");
}

#[test]
fn pivot_stays_put_under_load() {
    let mut space = Space::default();
    let pivot = Vec2::new(300.0, 300.0);
    let seesaw = Seesaw::standard(&mut space, pivot).unwrap();
    // Heavy crate dropped onto the top end.
    Crate::new(&mut space, Vec2::new(310.0, 150.0), 3.0);
    for _ in 0..240 {
        space.step(1.0 / 60.0);
        let pose = space.pose(seesaw.body()).unwrap();
        assert!(pose.angle.abs() <= SEESAW_LIMIT + 0.05);
    }
    let pose = space.pose(seesaw.body()).unwrap();
    assert!(pose.position.distance(pivot) < 2.0, "{pose:?}");
}

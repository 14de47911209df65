//! Lever holders are placed from where the load and effort sit at build time.
use bevy::math::Vec2;
use contraptions::machines::{Crate, Drawable, Lever, LeverParams};
use contraptions::physics::{Pose, Space};
use contraptions::rendering::DrawList;

fn scenario(space: &mut Space) -> (Crate, Crate, Lever) {
    let load = Crate::new(space, Vec2::new(100.0, 100.0), 2.0);
    let effort = Crate::new(space, Vec2::new(300.0, 100.0), 1.0);
    let params = LeverParams {
        pivot: Vec2::new(200.0, 100.0),
        length: 300.0,
        thickness: 10.0,
        mass: 10.0,
    };
    let lever = Lever::between(space, params, &load, &effort).expect("lever");
    (load, effort, lever)
}

#[test]
fn holders_bracket_load_and_effort() {
    let mut space = Space::default();
    let (load, effort, lever) = scenario(&mut space);
    assert_eq!(load.size(), 20.0);
    assert_eq!(effort.size(), 10.0);
    assert_eq!(lever.holder_x(2), Some(-75.0));
    assert_eq!(lever.holder_x(3), Some(85.0));
}

#[test]
fn moving_the_load_leaves_holders_in_place() {
    let mut space = Space::default();
    let (load, _effort, lever) = scenario(&mut space);
    let before: Vec<_> = (1..=4).map(|n| lever.holder_x(n)).collect();

    space.set_pose(load.body(), Pose { position: Vec2::new(160.0, 40.0), angle: 0.3 });
    for _ in 0..10 {
        space.step(1.0 / 60.0);
    }
    let mut frame = DrawList::new();
    lever.draw(&space, &mut frame);
    assert_eq!(frame.lines().count(), 10, "shadow + color for beam and four holders");

    let after: Vec<_> = (1..=4).map(|n| lever.holder_x(n)).collect();
    assert_eq!(before, after);
    assert_eq!(lever.anchors().0.position, Vec2::new(100.0, 100.0));
}

#[test]
fn lever_refuses_missing_anchor() {
    let mut space = Space::default();
    let load = Crate::new(&mut space, Vec2::new(100.0, 100.0), 2.0);
    let effort = Crate::new(&mut space, Vec2::new(300.0, 100.0), 1.0);
    space.deregister(load.body());
    let bodies = space.body_count();

    let result = Lever::between(&mut space, LeverParams::default(), &load, &effort);
    assert!(result.is_err());
    assert_eq!(space.body_count(), bodies, "nothing registered on failure");
    assert_eq!(space.joint_count(), 0);
}

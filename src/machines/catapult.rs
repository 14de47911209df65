use anyhow::Result;
use bevy::log::debug;
use bevy::math::Vec2;

use super::segments::{SegmentBody, SegmentSpec, ShapeRole};
use super::Drawable;
use crate::physics::{moment_for_segment, BodyDef, JointDef, RigidBodyHandle, Space};
use crate::rendering::{palette, Renderer};

pub const CATAPULT_MASS: f32 = 500.0;
pub const LAUNCH_SPIN: f32 = 46.0;
const BASE_WIDTH: f32 = 80.0;
const BASE_HEIGHT: f32 = 20.0;

/// Spinning arm with two stoppers near its tip, pinned at `pivot`.
pub struct Catapult {
    arm: SegmentBody,
    pivot: Vec2,
    stick_length: f32,
    stick_thickness: f32,
}

impl Catapult {
    /// Builds the arm already spinning at `launch_spin` rad/s.
    pub fn new(
        space: &mut Space,
        pivot: Vec2,
        stick_length: f32,
        stick_thickness: f32,
        launch_spin: f32,
    ) -> Result<Self> {
        let (l, t) = (stick_length, stick_thickness);
        let moment = moment_for_segment(CATAPULT_MASS, Vec2::ZERO, Vec2::new(-l, 0.0), t);
        let specs = [
            SegmentSpec::new(ShapeRole::Arm, Vec2::ZERO, Vec2::new(-l, 0.0), t).surface(0.8, 0.0),
            SegmentSpec::new(
                ShapeRole::TipStopper,
                Vec2::new(-l, 0.0),
                Vec2::new(-l - 15.0, -25.0),
                t,
            )
            .surface(0.5, 0.2),
            SegmentSpec::new(
                ShapeRole::InnerStopper,
                Vec2::new(-l + 20.0, 0.0),
                Vec2::new(-l + 35.0, -25.0),
                t,
            )
            .surface(0.5, 0.2),
        ];
        let arm = SegmentBody::register(
            space,
            BodyDef::dynamic(CATAPULT_MASS, moment).at(pivot).spinning(launch_spin),
            &specs,
        );
        space.attach(arm.body(), &[JointDef::Pivot { anchor: pivot }])?;
        debug!(target: "space", "catapult at {pivot} (arm {l}x{t}, spin {launch_spin})");
        Ok(Self { arm, pivot, stick_length, stick_thickness })
    }

    /// Default 150 x 5 arm with the standard launch spin.
    pub fn standard(space: &mut Space, pivot: Vec2) -> Result<Self> {
        Self::new(space, pivot, 150.0, 5.0, LAUNCH_SPIN)
    }

    /// Sets the arm spinning again, e.g. after it came to rest.
    pub fn launch(&self, space: &mut Space, spin: f32) -> bool {
        space.set_angular_velocity(self.arm.body(), spin)
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.arm.body()
    }

    pub fn segments(&self) -> &SegmentBody {
        &self.arm
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    pub fn stick_length(&self) -> f32 {
        self.stick_length
    }

    /// World position of the arm's free end.
    pub fn tip(&self, space: &Space) -> Option<Vec2> {
        self.arm.world_endpoints(space, ShapeRole::Arm).map(|(_, b)| b)
    }

    fn draw_base(&self, renderer: &mut dyn Renderer) {
        let p = self.pivot;
        let min = Vec2::new(p.x - (BASE_WIDTH / 2.0).floor(), p.y - (BASE_HEIGHT / 2.0).floor());
        let size = Vec2::new(BASE_WIDTH, BASE_HEIGHT);
        renderer.fill_rect(min - 2.0, size + 4.0, palette::BASE_BORDER);
        renderer.fill_rect(min, size, palette::BROWN);
        let third = (BASE_WIDTH / 3.0).floor();
        for dx in [-third - 1.0, 0.0, third] {
            let bolt = Vec2::new(p.x + dx, min.y + BASE_HEIGHT - 16.0);
            renderer.fill_circle(bolt, 4.0, palette::GRAY);
        }
        for dx in [-30.0, 30.0] {
            let hub = Vec2::new(p.x + dx, p.y + 15.0);
            renderer.fill_circle(hub, 10.0, palette::DARK_GRAY);
            renderer.fill_circle(hub, 7.0, palette::GRAY);
            renderer.fill_circle(hub, 3.0, palette::WHEEL_BOLT);
        }
    }
}

impl Drawable for Catapult {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        let t = self.stick_thickness;
        self.arm.draw_strokes(space, renderer, (palette::ARM_SHADOW, t + 5.0), t + 3.0, |role| {
            match role {
                ShapeRole::Arm => palette::BROWN,
                _ => palette::DARK_BROWN,
            }
        });
        self.draw_base(renderer);
        if let Some(tip) = self.tip(space) {
            renderer.fill_circle(tip, 5.0, palette::ARM_TIP);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::DrawList;

    #[test]
    fn arm_starts_spinning_on_one_body() {
        let mut space = Space::default();
        let catapult = Catapult::standard(&mut space, Vec2::new(300.0, 400.0)).unwrap();
        assert_eq!(space.body_count(), 1);
        assert_eq!(space.shape_count(), 3);
        assert_eq!(space.joint_count(), 1);
        assert_eq!(space.angular_velocity(catapult.body()), Some(LAUNCH_SPIN));
        assert_eq!(catapult.segments().len(), 3);
    }

    #[test]
    fn pivot_holds_while_arm_turns() {
        let mut space = Space::default();
        let pivot = Vec2::new(300.0, 400.0);
        let catapult = Catapult::standard(&mut space, pivot).unwrap();
        for _ in 0..30 {
            space.step(1.0 / 60.0);
        }
        let pose = space.pose(catapult.body()).unwrap();
        assert!(pose.position.distance(pivot) < 1.0, "{pose:?}");
        assert!(pose.angle.abs() > 0.1);
    }

    #[test]
    fn every_segment_gets_shadow_then_color() {
        let mut space = Space::default();
        let catapult = Catapult::standard(&mut space, Vec2::new(300.0, 400.0)).unwrap();
        let mut list = DrawList::new();
        catapult.draw(&space, &mut list);
        let lines: Vec<_> = list.lines().collect();
        assert_eq!(lines.len(), 6);
        for pair in lines.chunks(2) {
            assert_eq!(pair[0].3, 10.0);
            assert_eq!(pair[0].2, palette::ARM_SHADOW);
            assert_eq!(pair[1].3, 8.0);
        }
        assert_eq!(lines[1].2, palette::BROWN);
        assert_eq!(lines[3].2, palette::DARK_BROWN);
    }

    #[test]
    fn launch_resets_spin() {
        let mut space = Space::default();
        let catapult =
            Catapult::new(&mut space, Vec2::new(300.0, 400.0), 150.0, 5.0, 0.0).unwrap();
        assert_eq!(space.angular_velocity(catapult.body()), Some(0.0));
        assert!(catapult.launch(&mut space, -12.0));
        assert_eq!(space.angular_velocity(catapult.body()), Some(-12.0));
    }

    #[test]
    fn failed_pivot_leaves_nothing_registered() {
        let mut space = Space::default();
        assert!(Catapult::standard(&mut space, Vec2::NAN).is_err());
        assert_eq!(space.body_count(), 0);
        assert_eq!(space.shape_count(), 0);
        assert_eq!(space.joint_count(), 0);
    }
}

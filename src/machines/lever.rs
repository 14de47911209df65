//! Lever: an off-center beam on a pivot with four holder posts.
//!
//! Holders 2 and 3 bracket the load and effort objects. Their offsets are computed once from
//! [`LeverAnchor`] snapshots; moving the objects later does not move the holders.

use anyhow::{bail, ensure, Context, Result};
use bevy::log::debug;
use bevy::math::Vec2;

use super::segments::{SegmentBody, SegmentSpec, ShapeRole};
use super::Drawable;
use crate::physics::{moment_for_segment, BodyDef, CollisionType, JointDef, RigidBodyHandle, Space};
use crate::rendering::{palette, Renderer};

pub const LEVER_LEFT_RATIO: f32 = 0.4;
pub const LEVER_RIGHT_RATIO: f32 = 0.6;
/// Gap between a holder and the object it brackets.
const HOLDER_GAP: f32 = 5.0;
/// Holder 4 sits at a fixed distance from the left tip.
const LAST_HOLDER_OFFSET: f32 = 355.0;
const HOLDER_TOP: f32 = 5.0;
const HOLDER_BOTTOM: f32 = -20.0;

/// Where a bracketed object sat when the lever was built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeverAnchor {
    pub position: Vec2,
    /// Half the object's width.
    pub half_size: f32,
}

/// Anything a lever can bracket.
pub trait AnchorSource {
    /// `None` when the object is not (or no longer) in the space.
    fn lever_anchor(&self, space: &Space) -> Option<LeverAnchor>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeverParams {
    pub pivot: Vec2,
    pub length: f32,
    pub thickness: f32,
    pub mass: f32,
}

impl Default for LeverParams {
    fn default() -> Self {
        Self { pivot: Vec2::ZERO, length: 300.0, thickness: 10.0, mass: 10.0 }
    }
}

pub struct Lever {
    beam: SegmentBody,
    params: LeverParams,
    load: LeverAnchor,
    effort: LeverAnchor,
}

impl Lever {
    /// Reads the current load and effort positions from the space and builds the lever.
    pub fn between(
        space: &mut Space,
        params: LeverParams,
        load: &impl AnchorSource,
        effort: &impl AnchorSource,
    ) -> Result<Self> {
        let Some(load) = load.lever_anchor(space) else {
            bail!("lever load is not registered in the space");
        };
        let effort = effort
            .lever_anchor(space)
            .context("lever effort is not registered in the space")?;
        Self::new(space, params, load, effort)
    }

    pub fn new(
        space: &mut Space,
        params: LeverParams,
        load: LeverAnchor,
        effort: LeverAnchor,
    ) -> Result<Self> {
        let LeverParams { pivot, length, thickness, mass } = params;
        ensure!(length > 0.0 && thickness > 0.0, "lever needs a positive length and thickness");
        ensure!(mass > 0.0, "lever mass must be positive, got {mass}");
        ensure!(
            load.position.is_finite() && effort.position.is_finite(),
            "lever anchors must have finite positions"
        );

        let left = length * LEVER_LEFT_RATIO;
        let right = length * LEVER_RIGHT_RATIO;
        let (beam_a, beam_b) = (Vec2::new(-left, 0.0), Vec2::new(right, 0.0));
        let moment = moment_for_segment(mass, beam_a, beam_b, thickness);

        let holder = |n: u8, x: f32, radius: f32| {
            SegmentSpec::new(
                ShapeRole::Holder(n),
                Vec2::new(x, HOLDER_TOP),
                Vec2::new(x, HOLDER_BOTTOM),
                radius,
            )
            .surface(0.5, 0.2)
        };
        let load_x = load.position.x - pivot.x;
        let effort_x = effort.position.x - pivot.x;
        let specs = [
            SegmentSpec::new(ShapeRole::Beam, beam_a, beam_b, thickness)
                .surface(0.8, 0.0)
                .tagged(CollisionType::LEVER),
            holder(1, -left - HOLDER_GAP, thickness),
            holder(2, load_x + load.half_size + HOLDER_GAP, thickness),
            holder(3, effort_x - effort.half_size - HOLDER_GAP, thickness),
            holder(4, -left + LAST_HOLDER_OFFSET, thickness - 5.0).tagged(CollisionType::LEVER),
        ];

        let beam = SegmentBody::register(space, BodyDef::dynamic(mass, moment).at(pivot), &specs);
        space.attach(beam.body(), &[JointDef::Pivot { anchor: pivot }])?;
        debug!(
            target: "space",
            "lever at {pivot}: holders at x = {:?}",
            specs[1..].iter().map(|s| s.a.x).collect::<Vec<_>>()
        );
        Ok(Self { beam, params, load, effort })
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.beam.body()
    }

    pub fn params(&self) -> LeverParams {
        self.params
    }

    pub fn segments(&self) -> &SegmentBody {
        &self.beam
    }

    /// Anchor snapshots taken at construction.
    pub fn anchors(&self) -> (LeverAnchor, LeverAnchor) {
        (self.load, self.effort)
    }

    /// Local x of holder `n` (1 to 4).
    pub fn holder_x(&self, n: u8) -> Option<f32> {
        self.beam.get(ShapeRole::Holder(n)).map(|s| s.spec.a.x)
    }
}

impl Drawable for Lever {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        let t = self.params.thickness;
        let shadow = (palette::DARK_BROWN, t + 5.0);
        self.beam.draw_strokes(space, renderer, shadow, t + 3.0, |_| palette::BROWN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(x: f32, half: f32) -> LeverAnchor {
        LeverAnchor { position: Vec2::new(x, 100.0), half_size: half }
    }

    #[test]
    fn holders_bracket_anchors() {
        let mut space = Space::default();
        let params = LeverParams { pivot: Vec2::new(200.0, 100.0), ..Default::default() };
        let lever =
            Lever::new(&mut space, params, anchor(100.0, 20.0), anchor(300.0, 10.0)).unwrap();
        assert_eq!(lever.holder_x(1), Some(-125.0));
        assert_eq!(lever.holder_x(2), Some(-75.0));
        assert_eq!(lever.holder_x(3), Some(85.0));
        assert_eq!(lever.holder_x(4), Some(235.0));
        assert_eq!(space.shape_count(), 5);
        assert_eq!(space.joint_count(), 1);
    }

    #[test]
    fn beam_and_last_holder_carry_lever_type() {
        let mut space = Space::default();
        let params = LeverParams::default();
        let lever =
            Lever::new(&mut space, params, anchor(-50.0, 10.0), anchor(50.0, 10.0)).unwrap();
        let type_of = |role| space.collision_type(lever.segments().get(role).unwrap().shape);
        assert_eq!(type_of(ShapeRole::Beam), Some(CollisionType::LEVER));
        assert_eq!(type_of(ShapeRole::Holder(4)), Some(CollisionType::LEVER));
        assert_eq!(type_of(ShapeRole::Holder(2)), Some(CollisionType::NONE));
        let last = lever.segments().get(ShapeRole::Holder(4)).unwrap();
        assert_eq!(last.spec.radius, 5.0);
    }

    #[test]
    fn bad_geometry_is_rejected_before_registration() {
        let mut space = Space::default();
        let params = LeverParams { length: 0.0, ..Default::default() };
        assert!(Lever::new(&mut space, params, anchor(0.0, 1.0), anchor(1.0, 1.0)).is_err());
        assert_eq!(space.body_count(), 0);
    }

    #[test]
    fn failed_pivot_joint_rolls_back_beam() {
        let mut space = Space::default();
        let params = LeverParams { pivot: Vec2::new(f32::NAN, 100.0), ..Default::default() };
        assert!(Lever::new(&mut space, params, anchor(0.0, 1.0), anchor(1.0, 1.0)).is_err());
        assert_eq!(space.body_count(), 0);
        assert_eq!(space.shape_count(), 0);
        assert_eq!(space.joint_count(), 0);
    }

    #[test]
    fn thin_lever_clamps_last_holder() {
        let mut space = Space::default();
        let params = LeverParams { thickness: 3.0, ..Default::default() };
        let lever =
            Lever::new(&mut space, params, anchor(-50.0, 10.0), anchor(50.0, 10.0)).unwrap();
        let last = lever.segments().get(ShapeRole::Holder(4)).unwrap();
        assert_eq!(last.spec.radius, 0.0);
        assert!(space.contains_shape(last.shape));
    }
}

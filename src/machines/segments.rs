//! One dynamic body carrying several named segment shapes (catapult arm, lever beam and holders).

use bevy::math::Vec2;
use smallvec::SmallVec;

use crate::physics::{
    BodyDef, CollisionType, ColliderHandle, Geometry, RigidBodyHandle, ShapeDef, Space,
};
use crate::rendering::{Renderer, Rgba8};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeRole {
    Arm,
    /// Stopper hanging off the arm tip.
    TipStopper,
    /// Stopper a little before the tip.
    InnerStopper,
    Beam,
    /// Lever holders, numbered 1 to 4 from the left tip.
    Holder(u8),
}

/// Segment shape to attach, in the body's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSpec {
    pub role: ShapeRole,
    pub a: Vec2,
    pub b: Vec2,
    pub radius: f32,
    pub friction: f32,
    pub elasticity: f32,
    pub collision_type: CollisionType,
}

impl SegmentSpec {
    pub fn new(role: ShapeRole, a: Vec2, b: Vec2, radius: f32) -> Self {
        Self {
            role,
            a,
            b,
            radius: radius.max(0.0),
            friction: 0.0,
            elasticity: 0.0,
            collision_type: CollisionType::NONE,
        }
    }

    pub fn surface(mut self, friction: f32, elasticity: f32) -> Self {
        self.friction = friction;
        self.elasticity = elasticity;
        self
    }

    pub fn tagged(mut self, collision_type: CollisionType) -> Self {
        self.collision_type = collision_type;
        self
    }

    fn shape_def(&self) -> ShapeDef {
        ShapeDef::new(Geometry::Segment { a: self.a, b: self.b, radius: self.radius })
            .friction(self.friction)
            .elasticity(self.elasticity)
            .collision_type(self.collision_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleShape {
    pub spec: SegmentSpec,
    pub shape: ColliderHandle,
}

/// Body plus its role-keyed segment shapes.
#[derive(Debug, Clone)]
pub struct SegmentBody {
    body: RigidBodyHandle,
    segments: SmallVec<[RoleShape; 5]>,
}

impl SegmentBody {
    pub fn register(space: &mut Space, body: BodyDef, specs: &[SegmentSpec]) -> Self {
        let registered = space.register(body, specs.iter().map(SegmentSpec::shape_def));
        let segments = specs
            .iter()
            .zip(registered.shapes.iter())
            .map(|(spec, shape)| RoleShape { spec: *spec, shape: *shape })
            .collect();
        Self { body: registered.body, segments }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn get(&self, role: ShapeRole) -> Option<&RoleShape> {
        self.segments.iter().find(|s| s.spec.role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleShape> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Endpoints of a segment in world space at the body's current pose.
    pub fn world_endpoints(&self, space: &Space, role: ShapeRole) -> Option<(Vec2, Vec2)> {
        let seg = self.get(role)?;
        Some((
            space.local_to_world(self.body, seg.spec.a)?,
            space.local_to_world(self.body, seg.spec.b)?,
        ))
    }

    /// Wide shadow stroke under a narrower colored stroke, per segment.
    pub fn draw_strokes(
        &self,
        space: &Space,
        renderer: &mut dyn Renderer,
        shadow: (Rgba8, f32),
        width: f32,
        color: impl Fn(ShapeRole) -> Rgba8,
    ) {
        for seg in &self.segments {
            let Some((a, b)) = self.world_endpoints(space, seg.spec.role) else { return };
            renderer.line(a, b, shadow.0, shadow.1);
            renderer.line(a, b, color(seg.spec.role), width);
        }
    }
}

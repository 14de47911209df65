//! `Space`: the single shared physics registry every machine registers into.
//!
//! Wraps a rapier pipeline the same way a standalone simulation world does (explicit sets,
//! explicit step), but in screen coordinates: x right, y down, units in pixels.

use anyhow::{bail, Result};
use bevy::log::{debug, trace};
use bevy::math::Vec2;
use bevy::prelude::Resource;
use bevy_rapier2d::rapier::prelude::*;
use smallvec::SmallVec;

use super::contact::{
    CollisionType, ContactCommands, ContactDispatch, ContactHandler, ContactRule, EventQueue,
    HandlerId,
};
use crate::core::config::PhysicsConfig;

/// Position and rotation (radians) of a body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    Dynamic { mass: f32, moment: f32 },
    Static,
}

/// Everything needed to create one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub angular_velocity: f32,
}

impl BodyDef {
    pub fn dynamic(mass: f32, moment: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic { mass, moment },
            position: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
        }
    }

    pub fn fixed() -> Self {
        Self {
            kind: BodyKind::Static,
            position: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn spinning(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }
}

/// Collision geometry in the body's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Circle { radius: f32 },
    /// Axis-aligned box centered on the body origin (full width/height).
    Box { width: f32, height: f32 },
    /// Rounded segment; `radius` is the half thickness.
    Segment { a: Vec2, b: Vec2, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDef {
    pub geometry: Geometry,
    pub friction: f32,
    pub elasticity: f32,
    pub sensor: bool,
    pub collision_type: CollisionType,
    /// Extra mass from area; `None` leaves the body's explicit mass untouched.
    pub density: Option<f32>,
}

impl ShapeDef {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            friction: 0.0,
            elasticity: 0.0,
            sensor: false,
            collision_type: CollisionType::NONE,
            density: None,
        }
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    pub fn collision_type(mut self, collision_type: CollisionType) -> Self {
        self.collision_type = collision_type;
        self
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }

    fn build(&self) -> Collider {
        let builder = match self.geometry {
            Geometry::Circle { radius } => ColliderBuilder::ball(radius),
            Geometry::Box { width, height } => ColliderBuilder::cuboid(width * 0.5, height * 0.5),
            Geometry::Segment { a, b, radius } if radius <= 0.0 => {
                ColliderBuilder::segment(point![a.x, a.y], point![b.x, b.y])
            }
            Geometry::Segment { a, b, radius } => {
                ColliderBuilder::capsule_from_endpoints(point![a.x, a.y], point![b.x, b.y], radius)
            }
        };
        let mut builder = builder
            .friction(self.friction)
            .restitution(self.elasticity)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .restitution_combine_rule(CoefficientCombineRule::Multiply)
            .density(self.density.unwrap_or(0.0))
            .sensor(self.sensor)
            .user_data(self.collision_type.user_data());
        if self.sensor || self.collision_type != CollisionType::NONE {
            let (events, hooks) = contact_flags(self.sensor);
            builder = builder.active_events(events).active_hooks(hooks);
        }
        builder.build()
    }
}

/// Sensors report through collision events, solid shapes through the solver-contact hook.
fn contact_flags(sensor: bool) -> (ActiveEvents, ActiveHooks) {
    if sensor {
        (ActiveEvents::COLLISION_EVENTS, ActiveHooks::empty())
    } else {
        (ActiveEvents::empty(), ActiveHooks::MODIFY_SOLVER_CONTACTS)
    }
}

/// Handles produced by one atomic registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registered {
    pub body: RigidBodyHandle,
    pub shapes: SmallVec<[ColliderHandle; 5]>,
}

impl Registered {
    /// First (or only) shape; `None` for a shapeless body.
    pub fn shape(&self) -> Option<ColliderHandle> {
        self.shapes.first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointDef {
    /// Rotation-only anchor at a world point.
    Pivot { anchor: Vec2 },
    /// Locks the body's local `body_anchor` onto the world point `anchor`; rotation stays free.
    Pin { anchor: Vec2, body_anchor: Vec2 },
    /// Bounds the body's rotation relative to the static frame.
    RotaryLimit { min: f32, max: f32 },
}

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[derive(Resource)]
pub struct Space {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    static_body: RigidBodyHandle,
    events: EventQueue,
    dispatch: ContactDispatch,
    next_handler: u64,
    time: Real,
}

impl Default for Space {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

impl Space {
    pub fn new(cfg: &PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1.0 / cfg.step_hz.max(1.0);
        integration_parameters.length_unit = cfg.pixels_per_meter.max(1.0);

        let mut bodies = RigidBodySet::new();
        let static_body = bodies.insert(RigidBodyBuilder::fixed().build());

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, cfg.gravity_y],
            integration_parameters,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            static_body,
            events: EventQueue::default(),
            dispatch: ContactDispatch::default(),
            next_handler: 0,
            time: 0.0,
        }
    }

    /// Static frame that joints anchor to.
    pub fn static_body(&self) -> RigidBodyHandle {
        self.static_body
    }

    /// Seconds simulated so far.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Adds one body and all of its shapes in a single call.
    pub fn register<I>(&mut self, def: BodyDef, shapes: I) -> Registered
    where
        I: IntoIterator<Item = ShapeDef>,
    {
        let builder = match def.kind {
            BodyKind::Dynamic { mass, moment } => RigidBodyBuilder::dynamic()
                .additional_mass_properties(MassProperties::new(point![0.0, 0.0], mass, moment)),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let body = builder
            .translation(to_na(def.position))
            .rotation(def.angle)
            .angvel(def.angular_velocity)
            .build();
        let body = self.bodies.insert(body);
        let shapes: SmallVec<[ColliderHandle; 5]> = shapes
            .into_iter()
            .map(|shape| {
                self.colliders
                    .insert_with_parent(shape.build(), body, &mut self.bodies)
            })
            .collect();
        trace!(target: "space", "registered body {:?} with {} shape(s)", body, shapes.len());
        Registered { body, shapes }
    }

    /// Single-shape registration.
    pub fn register_shape(
        &mut self,
        def: BodyDef,
        shape: ShapeDef,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.register(def, []).body;
        let shape = self
            .colliders
            .insert_with_parent(shape.build(), body, &mut self.bodies);
        (body, shape)
    }

    /// Joins `body` to the static frame.
    pub fn add_joint(
        &mut self,
        body: RigidBodyHandle,
        joint: JointDef,
    ) -> Result<ImpulseJointHandle> {
        let Some(rb) = self.bodies.get(body) else {
            bail!("cannot attach {joint:?}: body {body:?} is not registered");
        };
        let finite = match joint {
            JointDef::Pivot { anchor } => anchor.is_finite(),
            JointDef::Pin { anchor, body_anchor } => anchor.is_finite() && body_anchor.is_finite(),
            JointDef::RotaryLimit { min, max } => !min.is_nan() && !max.is_nan(),
        };
        if !finite {
            bail!("cannot attach {joint:?}: non-finite parameters");
        }
        let body_origin = *rb.translation();
        let data: GenericJoint = match joint {
            JointDef::Pivot { anchor } => {
                let local = rb.position().inverse_transform_point(&point![anchor.x, anchor.y]);
                RevoluteJointBuilder::new()
                    .local_anchor1(point![anchor.x, anchor.y])
                    .local_anchor2(local)
                    .build()
                    .into()
            }
            JointDef::Pin { anchor, body_anchor } => RevoluteJointBuilder::new()
                .local_anchor1(point![anchor.x, anchor.y])
                .local_anchor2(point![body_anchor.x, body_anchor.y])
                .build()
                .into(),
            JointDef::RotaryLimit { min, max } => {
                if min > max {
                    bail!("rotary limit range is empty: [{min}, {max}]");
                }
                GenericJointBuilder::new(JointAxesMask::empty())
                    .limits(JointAxis::AngX, [min, max])
                    .local_anchor1(point![body_origin.x, body_origin.y])
                    .local_anchor2(point![0.0, 0.0])
                    .build()
            }
        };
        Ok(self.impulse_joints.insert(self.static_body, body, data, true))
    }

    /// Adds every joint in `joints` to `body`. On the first failure the body is deregistered
    /// along with any joint already added, so a half-built machine never stays in the space.
    pub fn attach(
        &mut self,
        body: RigidBodyHandle,
        joints: &[JointDef],
    ) -> Result<SmallVec<[ImpulseJointHandle; 2]>> {
        let mut handles = SmallVec::new();
        for joint in joints {
            match self.add_joint(body, *joint) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    self.deregister(body);
                    return Err(err);
                }
            }
        }
        Ok(handles)
    }

    /// Removes a body together with its shapes and joints. Returns `false` if it was
    /// already gone, which is never an error.
    pub fn deregister(&mut self, body: RigidBodyHandle) -> bool {
        if body == self.static_body {
            return false;
        }
        let removed = self
            .bodies
            .remove(
                body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some();
        if removed {
            trace!(target: "space", "deregistered body {:?}", body);
        }
        removed
    }

    pub fn deregister_shape(&mut self, shape: ColliderHandle) -> bool {
        self.colliders
            .remove(shape, &mut self.islands, &mut self.bodies, true)
            .is_some()
    }

    pub fn contains_body(&self, body: RigidBodyHandle) -> bool {
        self.bodies.contains(body)
    }

    pub fn contains_shape(&self, shape: ColliderHandle) -> bool {
        self.colliders.contains(shape)
    }

    /// Registered bodies, excluding the static frame.
    pub fn body_count(&self) -> usize {
        self.bodies.len() - 1
    }

    pub fn shape_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    pub fn pose(&self, body: RigidBodyHandle) -> Option<Pose> {
        self.bodies.get(body).map(|rb| Pose {
            position: from_na(rb.translation()),
            angle: rb.rotation().angle(),
        })
    }

    pub fn local_to_world(&self, body: RigidBodyHandle, local: Vec2) -> Option<Vec2> {
        self.bodies.get(body).map(|rb| {
            let p = rb.position() * point![local.x, local.y];
            Vec2::new(p.x, p.y)
        })
    }

    pub fn world_to_local(&self, body: RigidBodyHandle, world: Vec2) -> Option<Vec2> {
        self.bodies.get(body).map(|rb| {
            let p = rb.position().inverse_transform_point(&point![world.x, world.y]);
            Vec2::new(p.x, p.y)
        })
    }

    pub fn angular_velocity(&self, body: RigidBodyHandle) -> Option<f32> {
        self.bodies.get(body).map(|rb| rb.angvel())
    }

    pub fn velocity(&self, body: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(body).map(|rb| from_na(rb.linvel()))
    }

    pub fn set_pose(&mut self, body: RigidBodyHandle, pose: Pose) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else { return false };
        rb.set_translation(to_na(pose.position), true);
        rb.set_rotation(Rotation::new(pose.angle), true);
        true
    }

    pub fn set_velocity(&mut self, body: RigidBodyHandle, velocity: Vec2) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else { return false };
        rb.set_linvel(to_na(velocity), true);
        true
    }

    pub fn set_angular_velocity(&mut self, body: RigidBodyHandle, angular_velocity: f32) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else { return false };
        rb.set_angvel(angular_velocity, true);
        true
    }

    pub fn apply_impulse(&mut self, body: RigidBodyHandle, impulse: Vec2) -> bool {
        let Some(rb) = self.bodies.get_mut(body) else { return false };
        rb.apply_impulse(to_na(impulse), true);
        true
    }

    pub fn collision_type(&self, shape: ColliderHandle) -> Option<CollisionType> {
        self.colliders
            .get(shape)
            .map(|c| CollisionType::from_user_data(c.user_data))
    }

    pub fn set_collision_type(
        &mut self,
        shape: ColliderHandle,
        collision_type: CollisionType,
    ) -> bool {
        let Some(collider) = self.colliders.get_mut(shape) else { return false };
        collider.user_data = collision_type.user_data();
        let (events, hooks) = contact_flags(collider.is_sensor());
        collider.set_active_events(events);
        collider.set_active_hooks(hooks);
        true
    }

    /// Half extents of the shape's bounding box in its own frame.
    pub fn shape_half_extents(&self, shape: ColliderHandle) -> Option<Vec2> {
        self.colliders
            .get(shape)
            .map(|c| from_na(&c.shape().compute_local_aabb().half_extents()))
    }

    pub fn is_sensor(&self, shape: ColliderHandle) -> Option<bool> {
        self.colliders.get(shape).map(|c| c.is_sensor())
    }

    /// Calls `handler` whenever a shape tagged `first` starts touching a shape tagged `second`.
    pub fn on_contact_begin(
        &mut self,
        first: CollisionType,
        second: CollisionType,
        handler: ContactHandler,
    ) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.dispatch.add_rule(ContactRule { id, first, second, handler });
        debug!(
            target: "space",
            "contact handler {:?} registered for ({}, {})", id, first.0, second.0
        );
        id
    }

    pub fn remove_contact_handler(&mut self, id: HandlerId) -> bool {
        self.dispatch.remove_rule(id)
    }

    pub fn contact_handler_count(&self) -> usize {
        self.dispatch.rule_count()
    }

    /// Touching pairs whose physical response a handler refused.
    pub fn suppressed_pair_count(&self) -> usize {
        self.dispatch.suppressed_count()
    }

    /// Advances the simulation by `dt` seconds and dispatches begin-of-contact handlers.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &self.dispatch,
            &self.events,
        );
        self.time += dt;
        self.dispatch_contacts();
    }

    fn dispatch_contacts(&mut self) {
        for event in self.events.drain() {
            if let CollisionEvent::Started(c1, c2, flags) = event {
                if flags.contains(CollisionEventFlags::SENSOR) {
                    self.dispatch.begin_sensor(&self.colliders, c1, c2);
                }
            }
        }
        self.dispatch.release_separated(&self.narrow_phase);
        let commands = self.dispatch.take_commands();
        self.apply(commands);
    }

    fn apply(&mut self, commands: ContactCommands) {
        for shape in commands.shapes {
            self.deregister_shape(shape);
        }
        for body in commands.bodies {
            self.deregister(body);
        }
        for id in commands.retired {
            self.remove_contact_handler(id);
        }
    }
}

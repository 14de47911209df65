//! Collision-type tagging and begin-of-contact rules.
//!
//! Rapier reports raw collider pairs; this module maps them onto integer collision types
//! (stored in each collider's `user_data`) and routes the start of a contact to every
//! handler registered for that pair of types. Solid pairs are routed from the solver-contact
//! hook so a refusal applies to the very first contact step; sensor pairs are routed from
//! the collision events drained after the step.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bevy_rapier2d::rapier::prelude::*;

/// Integer tag selecting which contact rules apply to a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct CollisionType(pub u32);

impl CollisionType {
    /// Untagged shapes (crates, platforms, dominoes, catapult parts).
    pub const NONE: Self = Self(0);
    /// Generic dynamic object.
    pub const GENERIC: Self = Self(1);
    /// Lever beam and its last holder.
    pub const LEVER: Self = Self(2);
    /// Trigger sensor.
    pub const TRIGGER: Self = Self(99);

    pub(crate) fn from_user_data(data: u128) -> Self {
        Self(data as u32)
    }

    pub(crate) fn user_data(self) -> u128 {
        self.0 as u128
    }
}

/// Identifies a registered contact handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub(crate) u64);

/// Begin-of-contact data handed to a handler.
/// `shape_a` always carries the handler's first collision type, `shape_b` the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub shape_a: ColliderHandle,
    pub shape_b: ColliderHandle,
    pub body_a: Option<RigidBodyHandle>,
    pub body_b: Option<RigidBodyHandle>,
    /// At least one of the shapes is a sensor.
    pub sensor: bool,
}

/// Mutations requested from inside a handler. They are applied once every handler for
/// the current step has run, so a handler never observes a half-updated space.
#[derive(Debug, Default)]
pub struct ContactCommands {
    current: Option<HandlerId>,
    pub(crate) bodies: Vec<RigidBodyHandle>,
    pub(crate) shapes: Vec<ColliderHandle>,
    pub(crate) retired: Vec<HandlerId>,
}

impl ContactCommands {
    pub fn deregister_body(&mut self, body: RigidBodyHandle) {
        self.bodies.push(body);
    }

    pub fn deregister_shape(&mut self, shape: ColliderHandle) {
        self.shapes.push(shape);
    }

    /// Unregister the handler that is currently running.
    pub fn retire(&mut self) {
        if let Some(id) = self.current {
            self.retired.push(id);
        }
    }

    pub(crate) fn set_current(&mut self, id: HandlerId) {
        self.current = Some(id);
    }

    pub(crate) fn is_retired(&self, id: HandlerId) -> bool {
        self.retired.contains(&id)
    }
}

/// Returns `false` to suppress the physical response for the pair.
pub type ContactHandler = Box<dyn FnMut(&Contact, &mut ContactCommands) -> bool + Send + Sync>;

pub(crate) struct ContactRule {
    pub(crate) id: HandlerId,
    pub(crate) first: CollisionType,
    pub(crate) second: CollisionType,
    pub(crate) handler: ContactHandler,
}

impl ContactRule {
    /// Orders the pair as `(first, second)` if the rule applies to it.
    pub(crate) fn orient(
        &self,
        (c1, t1): (ColliderHandle, CollisionType),
        (c2, t2): (ColliderHandle, CollisionType),
    ) -> Option<(ColliderHandle, ColliderHandle)> {
        if t1 == self.first && t2 == self.second {
            Some((c1, c2))
        } else if t2 == self.first && t1 == self.second {
            Some((c2, c1))
        } else {
            None
        }
    }
}

/// Collision events raised while rapier steps; drained right after the step.
#[derive(Default)]
pub(crate) struct EventQueue {
    events: Mutex<Vec<CollisionEvent>>,
}

impl EventQueue {
    pub(crate) fn drain(&self) -> Vec<CollisionEvent> {
        let mut guard = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for EventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

type PairKey = ((u32, u32), (u32, u32));

fn pair_key(a: ColliderHandle, b: ColliderHandle) -> PairKey {
    let (a, b) = (a.into_raw_parts(), b.into_raw_parts());
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Routing state for one pair that is currently touching.
#[derive(Debug, Clone, Copy)]
struct Touching {
    shapes: (ColliderHandle, ColliderHandle),
    respond: bool,
}

#[derive(Default)]
struct DispatchState {
    rules: Vec<ContactRule>,
    touching: HashMap<PairKey, Touching>,
    commands: ContactCommands,
}

impl DispatchState {
    /// Runs every live rule matching the pair. Returns `false` if any handler refused the
    /// physical response.
    fn begin(
        &mut self,
        colliders: &ColliderSet,
        c1: ColliderHandle,
        c2: ColliderHandle,
        sensor: bool,
    ) -> bool {
        let tag = |c: ColliderHandle| {
            colliders
                .get(c)
                .map(|c| CollisionType::from_user_data(c.user_data))
        };
        let (Some(t1), Some(t2)) = (tag(c1), tag(c2)) else {
            return true;
        };
        let parent = |c: ColliderHandle| colliders.get(c).and_then(|c| c.parent());
        let mut respond = true;
        for rule in self.rules.iter_mut() {
            if self.commands.is_retired(rule.id) {
                continue;
            }
            let Some((a, b)) = rule.orient((c1, t1), (c2, t2)) else {
                continue;
            };
            let contact = Contact {
                shape_a: a,
                shape_b: b,
                body_a: parent(a),
                body_b: parent(b),
                sensor,
            };
            self.commands.set_current(rule.id);
            respond &= (rule.handler)(&contact, &mut self.commands);
        }
        respond
    }
}

/// Owns the contact rules and decides, from inside the rapier step, whether a solid pair
/// gets a physical response. The decision made on the first contact step holds until the
/// narrow phase stops reporting contact points for the pair.
#[derive(Default)]
pub(crate) struct ContactDispatch {
    state: Mutex<DispatchState>,
}

impl ContactDispatch {
    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut DispatchState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add_rule(&mut self, rule: ContactRule) {
        self.state_mut().rules.push(rule);
    }

    pub(crate) fn remove_rule(&mut self, id: HandlerId) -> bool {
        let rules = &mut self.state_mut().rules;
        let before = rules.len();
        rules.retain(|rule| rule.id != id);
        rules.len() != before
    }

    pub(crate) fn rule_count(&self) -> usize {
        self.lock().rules.len()
    }

    /// Sensors never reach the solver, so their begin comes from the collision event.
    pub(crate) fn begin_sensor(
        &mut self,
        colliders: &ColliderSet,
        c1: ColliderHandle,
        c2: ColliderHandle,
    ) {
        self.state_mut().begin(colliders, c1, c2, true);
    }

    /// Forgets every pair the narrow phase no longer reports as touching, so the next
    /// contact between them runs the handlers again.
    pub(crate) fn release_separated(&mut self, narrow_phase: &NarrowPhase) {
        self.state_mut().touching.retain(|_, touching| {
            let (a, b) = touching.shapes;
            narrow_phase
                .contact_pair(a, b)
                .is_some_and(|pair| pair.has_any_active_contact)
        });
    }

    pub(crate) fn take_commands(&mut self) -> ContactCommands {
        std::mem::take(&mut self.state_mut().commands)
    }

    /// Touching pairs whose response is currently suppressed.
    pub(crate) fn suppressed_count(&self) -> usize {
        self.lock()
            .touching
            .values()
            .filter(|touching| !touching.respond)
            .count()
    }
}

impl PhysicsHooks for ContactDispatch {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        if context.solver_contacts.is_empty() {
            return;
        }
        let (c1, c2) = (context.collider1, context.collider2);
        let key = pair_key(c1, c2);
        let mut state = self.lock();
        let known = state.touching.get(&key).map(|touching| touching.respond);
        let respond = match known {
            Some(respond) => respond,
            None => {
                let respond = state.begin(context.colliders, c1, c2, false);
                let touching = Touching { shapes: (c1, c2), respond };
                state.touching.insert(key, touching);
                respond
            }
        };
        if !respond {
            context.solver_contacts.clear();
        }
    }
}

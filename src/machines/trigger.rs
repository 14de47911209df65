//! One-shot sensor zone.
//!
//! A trigger starts `Active`. The first begin-of-contact between its sensor and a shape of
//! the target collision type runs the callback, removes the trigger from the space and
//! leaves it `Removed` for good. [`Trigger::remove`] does the same teardown without a
//! contact and is safe to call any number of times.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use bevy::log::{error, info};
use bevy::math::Vec2;

use super::{box_corners, Drawable};
use crate::physics::{
    BodyDef, CollisionType, ColliderHandle, Contact, ContactCommands, Geometry, HandlerId, Pose,
    RigidBodyHandle, ShapeDef, Space,
};
use crate::rendering::{palette, Renderer};

/// User hook run when the trigger fires. An `Err` is logged; the trigger is removed either way.
pub type TriggerCallback =
    Box<dyn FnMut(&Contact, &mut ContactCommands) -> Result<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Active,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerParams {
    /// Top-left corner of the zone.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    /// Collision type that sets the trigger off.
    pub target: CollisionType,
}

impl Default for TriggerParams {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            width: 40.0,
            height: 20.0,
            target: CollisionType::GENERIC,
        }
    }
}

impl TriggerParams {
    pub fn at(position: Vec2) -> Self {
        Self { position, ..Default::default() }
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height) * 0.5
    }
}

struct TriggerCore {
    state: TriggerState,
    fired: u32,
    callback: Option<TriggerCallback>,
}

pub struct Trigger {
    core: Arc<Mutex<TriggerCore>>,
    params: TriggerParams,
    body: RigidBodyHandle,
    shape: ColliderHandle,
    handler: HandlerId,
}

fn lock(core: &Mutex<TriggerCore>) -> MutexGuard<'_, TriggerCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Trigger {
    pub fn new(
        space: &mut Space,
        params: TriggerParams,
        callback: Option<TriggerCallback>,
    ) -> Self {
        let (body, shape) = space.register_shape(
            BodyDef::fixed().at(params.center()),
            ShapeDef::new(Geometry::Box { width: params.width, height: params.height })
                .sensor()
                .collision_type(CollisionType::TRIGGER),
        );
        let core = Arc::new(Mutex::new(TriggerCore {
            state: TriggerState::Active,
            fired: 0,
            callback,
        }));

        let shared = Arc::clone(&core);
        let handler = space.on_contact_begin(
            params.target,
            CollisionType::TRIGGER,
            Box::new(move |contact, commands| {
                if contact.shape_b != shape {
                    // Another trigger's sensor; its own handler decides.
                    return true;
                }
                let mut core = lock(&shared);
                if core.state == TriggerState::Removed {
                    return false;
                }
                core.state = TriggerState::Removed;
                core.fired += 1;
                commands.deregister_body(body);
                commands.retire();
                if let Some(callback) = core.callback.as_mut() {
                    if let Err(e) = callback(contact, commands) {
                        error!(target: "trigger", "trigger {:?} callback failed: {e:#}", body);
                    }
                }
                info!(target: "trigger", "trigger {:?} fired", body);
                false
            }),
        );
        Self { core, params, body, shape, handler }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn shape(&self) -> ColliderHandle {
        self.shape
    }

    pub fn params(&self) -> TriggerParams {
        self.params
    }

    pub fn state(&self) -> TriggerState {
        lock(&self.core).state
    }

    pub fn is_active(&self) -> bool {
        self.state() == TriggerState::Active
    }

    /// How many times the callback path ran (0 or 1).
    pub fn fired(&self) -> u32 {
        lock(&self.core).fired
    }

    /// Detaches the trigger without waiting for a contact. Returns `false` if it was
    /// already removed.
    pub fn remove(&self, space: &mut Space) -> bool {
        {
            let mut core = lock(&self.core);
            if core.state == TriggerState::Removed {
                return false;
            }
            core.state = TriggerState::Removed;
        }
        space.deregister(self.body);
        space.remove_contact_handler(self.handler);
        info!(target: "trigger", "trigger {:?} removed", self.body);
        true
    }

    /// Debug outline of the zone while it is still live.
    pub fn draw_outline(&self, renderer: &mut dyn Renderer) {
        if !self.is_active() {
            return;
        }
        let pose = Pose { position: self.params.center(), angle: 0.0 };
        let corners = box_corners(pose, self.params.width, self.params.height);
        renderer.stroke_polygon(&corners, palette::TRIGGER_OUTLINE, 1.0);
    }
}

impl Drawable for Trigger {
    /// Triggers are invisible.
    fn draw(&self, _space: &Space, _renderer: &mut dyn Renderer) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::DrawList;

    #[test]
    fn sensor_is_centered_on_its_box() {
        let mut space = Space::default();
        let trigger = Trigger::new(&mut space, TriggerParams::at(Vec2::new(100.0, 50.0)), None);
        let pose = space.pose(trigger.body()).unwrap();
        assert_eq!(pose.position, Vec2::new(120.0, 60.0));
        assert_eq!(space.is_sensor(trigger.shape()), Some(true));
        assert_eq!(space.collision_type(trigger.shape()), Some(CollisionType::TRIGGER));
    }

    #[test]
    fn manual_remove_is_idempotent() {
        let mut space = Space::default();
        let trigger = Trigger::new(&mut space, TriggerParams::default(), None);
        assert_eq!(space.contact_handler_count(), 1);
        assert!(trigger.remove(&mut space));
        assert!(!trigger.remove(&mut space));
        assert_eq!(trigger.state(), TriggerState::Removed);
        assert!(!space.contains_body(trigger.body()));
        assert_eq!(space.contact_handler_count(), 0);
        assert_eq!(trigger.fired(), 0);
    }

    #[test]
    fn outline_only_while_active() {
        let mut space = Space::default();
        let trigger = Trigger::new(&mut space, TriggerParams::default(), None);
        let mut list = DrawList::new();
        trigger.draw(&space, &mut list);
        assert!(list.is_empty());
        trigger.draw_outline(&mut list);
        assert_eq!(list.len(), 1);
        trigger.remove(&mut space);
        list.clear();
        trigger.draw_outline(&mut list);
        assert!(list.is_empty());
    }
}

//! The machine kinds: primitive bodies, composite mechanisms and triggers.
//!
//! Every machine registers its body and shapes into the shared [`Space`] in one call at
//! construction and afterwards only reads its pose back for drawing.

pub mod ball;
pub mod catapult;
pub mod crate_box;
pub mod domino;
pub mod lever;
pub mod platform;
pub mod projectile;
pub mod seesaw;
pub mod segments;
pub mod trigger;

use bevy::math::Vec2;
use bevy::prelude::Component;
use serde::Serialize;

use crate::physics::{Pose, RigidBodyHandle, Space};
use crate::rendering::{Renderer, Texture};

pub use ball::Ball;
pub use catapult::Catapult;
pub use crate_box::Crate;
pub use domino::Domino;
pub use lever::{AnchorSource, Lever, LeverAnchor, LeverParams};
pub use platform::{Platform, Speckle};
pub use projectile::Projectile;
pub use seesaw::Seesaw;
pub use segments::{SegmentBody, SegmentSpec, ShapeRole};
pub use trigger::{Trigger, TriggerCallback, TriggerParams, TriggerState};

/// Emits drawing primitives for the machine's current pose.
pub trait Drawable {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer);
}

/// Back-to-front paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrawLayer {
    Scenery,
    Mechanism,
    Body,
    Overlay,
}

/// ECS wrapper so every machine can live on an entity.
#[derive(Component)]
pub enum Machine {
    Ball(Ball),
    Crate(Crate),
    Domino(Domino),
    Platform(Platform),
    Projectile(Projectile),
    Catapult(Catapult),
    Lever(Lever),
    Seesaw(Seesaw),
    Trigger(Trigger),
}

impl Machine {
    pub fn kind(&self) -> &'static str {
        match self {
            Machine::Ball(_) => "ball",
            Machine::Crate(_) => "crate",
            Machine::Domino(_) => "domino",
            Machine::Platform(_) => "platform",
            Machine::Projectile(_) => "projectile",
            Machine::Catapult(_) => "catapult",
            Machine::Lever(_) => "lever",
            Machine::Seesaw(_) => "seesaw",
            Machine::Trigger(_) => "trigger",
        }
    }

    pub fn layer(&self) -> DrawLayer {
        match self {
            Machine::Platform(_) => DrawLayer::Scenery,
            Machine::Catapult(_) | Machine::Lever(_) | Machine::Seesaw(_) => DrawLayer::Mechanism,
            Machine::Trigger(_) => DrawLayer::Overlay,
            _ => DrawLayer::Body,
        }
    }

    pub fn body(&self) -> RigidBodyHandle {
        match self {
            Machine::Ball(m) => m.body(),
            Machine::Crate(m) => m.body(),
            Machine::Domino(m) => m.body(),
            Machine::Platform(m) => m.body(),
            Machine::Projectile(m) => m.body(),
            Machine::Catapult(m) => m.body(),
            Machine::Lever(m) => m.body(),
            Machine::Seesaw(m) => m.body(),
            Machine::Trigger(m) => m.body(),
        }
    }

    /// Pose record, or `None` once the body has left the space.
    pub fn snapshot(&self, space: &Space) -> Option<BodySnapshot> {
        let pose = space.pose(self.body())?;
        Some(BodySnapshot {
            kind: self.kind(),
            x: pose.position.x,
            y: pose.position.y,
            angle: pose.angle,
        })
    }
}

impl Drawable for Machine {
    fn draw(&self, space: &Space, renderer: &mut dyn Renderer) {
        match self {
            Machine::Ball(m) => m.draw(space, renderer),
            Machine::Crate(m) => m.draw(space, renderer),
            Machine::Domino(m) => m.draw(space, renderer),
            Machine::Platform(m) => m.draw(space, renderer),
            Machine::Projectile(m) => m.draw(space, renderer),
            Machine::Catapult(m) => m.draw(space, renderer),
            Machine::Lever(m) => m.draw(space, renderer),
            Machine::Seesaw(m) => m.draw(space, renderer),
            Machine::Trigger(m) => m.draw(space, renderer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub kind: &'static str,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

/// Corners of a `width` x `height` box centered on `pose`, in the order
/// top-left, top-right, bottom-right, bottom-left of the unrotated box.
pub(crate) fn box_corners(pose: Pose, width: f32, height: f32) -> [Vec2; 4] {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let rot = Vec2::from_angle(pose.angle);
    [
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ]
    .map(|corner| pose.position + rot.rotate(corner))
}

/// Blits a pre-rendered texture at the body's pose. Screen rotation runs opposite to the
/// body angle, and the center snaps to whole pixels.
pub(crate) fn draw_textured(
    space: &Space,
    body: RigidBodyHandle,
    texture: &Texture,
    renderer: &mut dyn Renderer,
) {
    let Some(pose) = space.pose(body) else { return };
    let center = pose.position.trunc();
    renderer.blit_rotated(texture, center, -pose.angle.to_degrees());
}

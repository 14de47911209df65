pub mod contact;
pub mod mass;
pub mod space;

pub use bevy_rapier2d::rapier::prelude::{ColliderHandle, ImpulseJointHandle, RigidBodyHandle};
pub use contact::{CollisionType, Contact, ContactCommands, ContactHandler, HandlerId};
pub use mass::{moment_for_box, moment_for_circle, moment_for_segment};
pub use space::{BodyDef, BodyKind, Geometry, JointDef, Pose, Registered, ShapeDef, Space};

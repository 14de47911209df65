pub mod app;
pub mod core;
pub mod machines;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::game::ContraptionsPlugin;
pub use crate::core::config::{ContraptionsConfig, PhysicsConfig, WindowConfig};
pub use machines::{Drawable, Machine};
pub use physics::Space;
pub use rendering::{Canvas, Renderer};

pub mod config;

pub use config::{
    CatapultConfig, ContraptionsConfig, DebugConfig, PhysicsConfig, SceneConfig, WindowConfig,
};

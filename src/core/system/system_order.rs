//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. PrePhysics (input, pause toggles, scene rebuilds) in Update
//! 2. PhysicsStep (one `Space::step` per FixedUpdate tick)
//! 3. Draw (machines rasterized into the frame canvas)
//! 4. Present (canvas uploaded to the on-screen image)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PhysicsStepSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DrawSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PresentSet;

pub mod game;
pub mod input;
pub mod present;
pub mod scene;
pub mod simulation;
pub mod state;

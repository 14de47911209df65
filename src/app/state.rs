use bevy::prelude::*;

/// Whether the simulation advances.
/// Running <-> Paused, toggled from the keyboard.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum SimState {
    #[default]
    Running,
    Paused,
}

impl SimState {
    pub fn toggled(self) -> Self {
        match self {
            SimState::Running => SimState::Paused,
            SimState::Paused => SimState::Running,
        }
    }
}

use bevy::prelude::*;

use crate::app::scene::{LaunchRequests, ResetScene};
use crate::app::state::SimState;
#[cfg(feature = "debug")]
use crate::core::config::ContraptionsConfig;
use crate::core::system::PrePhysicsSet;

/// P pauses, R rebuilds the scene, Space relaunches the catapult.
pub struct SceneInputPlugin;

impl Plugin for SceneInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, scene_input_system.in_set(PrePhysicsSet));
        #[cfg(feature = "debug")]
        app.add_systems(Update, debug_toggle_system.in_set(PrePhysicsSet));
    }
}

pub fn scene_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<SimState>>,
    mut next: ResMut<NextState<SimState>>,
    mut resets: EventWriter<ResetScene>,
    launches: Res<LaunchRequests>,
) {
    if keys.just_pressed(KeyCode::KeyP) {
        let target = state.get().toggled();
        info!(target: "scene", "simulation {:?}", target);
        next.set(target);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        resets.write(ResetScene);
    }
    if keys.just_pressed(KeyCode::Space) {
        launches.request();
    }
}

/// F1 shows or hides trigger zones.
#[cfg(feature = "debug")]
pub fn debug_toggle_system(keys: Res<ButtonInput<KeyCode>>, mut cfg: ResMut<ContraptionsConfig>) {
    if keys.just_pressed(KeyCode::F1) {
        cfg.debug.draw_triggers = !cfg.debug.draw_triggers;
        let state = if cfg.debug.draw_triggers { "on" } else { "off" };
        info!(target: "scene", "trigger outlines {state}");
    }
}

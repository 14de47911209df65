// This file is part of Contraptions.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::app::input::SceneInputPlugin;
use crate::app::present::PresentPlugin;
use crate::app::scene::ScenePlugin;
use crate::app::simulation::MachinesPlugin;

/// Everything the windowed app needs on top of `DefaultPlugins`.
pub struct ContraptionsPlugin;

impl Plugin for ContraptionsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((MachinesPlugin, ScenePlugin, SceneInputPlugin, PresentPlugin));
    }
}

use bevy::prelude::*;

use crate::app::state::SimState;
use crate::core::config::ContraptionsConfig;
use crate::core::system::{DrawSet, PhysicsStepSet, PrePhysicsSet, PresentSet};
use crate::machines::{Drawable, Machine};
use crate::physics::Space;
use crate::rendering::{palette, Canvas};

/// Software frame the machines are drawn into every `Update`.
#[derive(Resource)]
pub struct FrameCanvas(pub Canvas);

/// Spawn position within the scene; ties within a draw layer paint in this order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnIndex(pub u32);

pub struct MachinesPlugin;

impl Plugin for MachinesPlugin {
    fn build(&self, app: &mut App) {
        let cfg = app
            .world()
            .get_resource::<ContraptionsConfig>()
            .cloned()
            .unwrap_or_default();
        app.insert_resource(Space::new(&cfg.physics))
            .insert_resource(FrameCanvas(Canvas::new(
                cfg.window.width.max(1.0) as u32,
                cfg.window.height.max(1.0) as u32,
            )))
            .insert_resource(Time::<Fixed>::from_hz(cfg.physics.step_hz.max(1.0) as f64))
            .init_state::<SimState>()
            .configure_sets(
                Update,
                (PrePhysicsSet, DrawSet.after(PrePhysicsSet), PresentSet.after(DrawSet)),
            )
            .add_systems(
                FixedUpdate,
                step_space
                    .in_set(PhysicsStepSet)
                    .run_if(in_state(SimState::Running)),
            )
            .add_systems(Update, (despawn_detached, draw_machines).chain().in_set(DrawSet));
    }
}

pub fn step_space(mut space: ResMut<Space>, cfg: Res<ContraptionsConfig>) {
    space.step(cfg.physics.dt());
}

/// Drops machines whose body has left the space (fired triggers).
pub fn despawn_detached(
    mut commands: Commands,
    space: Res<Space>,
    machines: Query<(Entity, &Machine)>,
) {
    for (entity, machine) in &machines {
        if !space.contains_body(machine.body()) {
            debug!(target: "space", "{} left the space; despawning {entity}", machine.kind());
            commands.entity(entity).despawn();
        }
    }
}

pub fn draw_machines(
    space: Res<Space>,
    cfg: Res<ContraptionsConfig>,
    machines: Query<(&Machine, &SpawnIndex)>,
    mut canvas: ResMut<FrameCanvas>,
) {
    let ordered = machines.iter().map(|(m, i)| (m, i.0));
    render_machines(&space, ordered, &mut canvas.0, cfg.debug.draw_triggers);
}

/// Clears `canvas` and paints every machine back to front.
pub fn render_machines<'a>(
    space: &Space,
    machines: impl IntoIterator<Item = (&'a Machine, u32)>,
    canvas: &mut Canvas,
    draw_triggers: bool,
) {
    let mut ordered: Vec<_> = machines.into_iter().collect();
    ordered.sort_by_key(|(m, index)| (m.layer(), *index));
    canvas.clear(palette::BACKGROUND);
    for (machine, _) in &ordered {
        machine.draw(space, canvas);
    }
    if draw_triggers {
        for (machine, _) in &ordered {
            if let Machine::Trigger(trigger) = machine {
                trigger.draw_outline(canvas);
            }
        }
    }
}

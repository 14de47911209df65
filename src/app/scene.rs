//! The demo contraption: a lever with two crates, a ball dropping through a trigger,
//! dominoes, a seesaw and a catapult loaded with a rock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Result;
use bevy::prelude::*;
use serde::Serialize;

use crate::app::simulation::{render_machines, SpawnIndex};
use crate::core::config::ContraptionsConfig;
use crate::core::system::PhysicsStepSet;
use crate::machines::{
    Ball, BodySnapshot, Catapult, Crate, Domino, Lever, LeverParams, Machine, Platform, Projectile,
    Seesaw, Trigger, TriggerCallback, TriggerParams,
};
use crate::physics::Space;
use crate::rendering::Canvas;

fn v((x, y): (f32, f32)) -> Vec2 {
    Vec2::new(x, y)
}

/// Catapult launches requested from outside the physics step (trigger callbacks, keyboard).
#[derive(Resource, Clone, Default)]
pub struct LaunchRequests(Arc<AtomicU32>);

impl LaunchRequests {
    pub fn request(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn take(&self) -> u32 {
        self.0.swap(0, Ordering::SeqCst)
    }
}

/// A built scene that is not (yet) part of an ECS world.
pub struct DemoScene {
    pub space: Space,
    pub machines: Vec<Machine>,
    pub launches: LaunchRequests,
    launch_spin: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub time: f32,
    pub bodies: Vec<BodySnapshot>,
}

pub fn build_demo_scene(cfg: &ContraptionsConfig) -> Result<DemoScene> {
    let sc = &cfg.scene;
    let mut space = Space::new(&cfg.physics);
    let launches = LaunchRequests::default();
    let mut machines = Vec::new();

    let width = cfg.window.width;
    machines.push(Machine::Platform(Platform::new(
        &mut space,
        Vec2::new(width * 0.5, sc.ground_y),
        width,
        20.0,
        0.0,
    )));
    let ramp = Platform::new(&mut space, v(sc.ramp), 140.0, 12.0, sc.ramp_angle);
    machines.push(Machine::Platform(ramp));

    // Crates first: the lever snapshots where they sit.
    let beam_top = sc.lever_pivot.1 - sc.lever_thickness;
    let load_size = sc.load_mass * crate::machines::crate_box::CRATE_SIZE_MULTIPLIER;
    let effort_size = sc.effort_mass * crate::machines::crate_box::CRATE_SIZE_MULTIPLIER;
    let load_at = Vec2::new(sc.load_x, beam_top - load_size);
    let effort_at = Vec2::new(sc.effort_x, beam_top - effort_size);
    let load = Crate::new(&mut space, load_at, sc.load_mass);
    let effort = Crate::new(&mut space, effort_at, sc.effort_mass);
    let lever = Lever::between(
        &mut space,
        LeverParams {
            pivot: v(sc.lever_pivot),
            length: sc.lever_length,
            thickness: sc.lever_thickness,
            ..Default::default()
        },
        &load,
        &effort,
    )?;
    machines.push(Machine::Lever(lever));
    machines.push(Machine::Crate(load));
    machines.push(Machine::Crate(effort));

    machines.push(Machine::Seesaw(Seesaw::standard(&mut space, v(sc.seesaw))?));

    let domino_y = sc.ground_y - 10.0 - crate::machines::domino::DOMINO_HEIGHT * 0.5;
    for i in 0..sc.domino_count {
        let x = sc.domino_start_x + i as f32 * sc.domino_spacing;
        machines.push(Machine::Domino(Domino::new(&mut space, Vec2::new(x, domino_y))));
    }

    let cat = &cfg.catapult;
    machines.push(Machine::Catapult(Catapult::new(
        &mut space,
        v(cat.pivot),
        cat.stick_length,
        cat.stick_thickness,
        cat.launch_spin,
    )?));
    machines.push(Machine::Projectile(Projectile::new(&mut space, v(sc.projectile))));
    machines.push(Machine::Ball(Ball::new(&mut space, v(sc.ball))));

    let requests = launches.clone();
    let on_trigger: TriggerCallback = Box::new(move |_contact, _commands| {
        info!(target: "scene", "ball crossed the trigger; relaunching the catapult");
        requests.request();
        Ok(())
    });
    machines.push(Machine::Trigger(Trigger::new(
        &mut space,
        TriggerParams::at(v(sc.trigger)),
        Some(on_trigger),
    )));

    info!(
        target: "scene",
        "demo scene built: {} machines, {} bodies, {} joints",
        machines.len(),
        space.body_count(),
        space.joint_count()
    );
    Ok(DemoScene { space, machines, launches, launch_spin: cat.launch_spin })
}

/// Applies pending launch requests to every catapult. Returns how many were pending.
pub fn launch_pending<'a>(
    space: &mut Space,
    requests: &LaunchRequests,
    machines: impl IntoIterator<Item = &'a Machine>,
    spin: f32,
) -> u32 {
    let pending = requests.take();
    if pending == 0 {
        return 0;
    }
    for machine in machines {
        if let Machine::Catapult(catapult) = machine {
            catapult.launch(space, spin);
        }
    }
    pending
}

impl DemoScene {
    pub fn step(&mut self, dt: f32) {
        self.space.step(dt);
        launch_pending(&mut self.space, &self.launches, &self.machines, self.launch_spin);
    }

    pub fn render(&self, canvas: &mut Canvas, draw_triggers: bool) {
        let ordered = self.machines.iter().zip(0u32..);
        render_machines(&self.space, ordered, canvas, draw_triggers);
    }

    /// Poses of every machine still in the space.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            time: self.space.time(),
            bodies: self.machines.iter().filter_map(|m| m.snapshot(&self.space)).collect(),
        }
    }
}

/// Sent to throw the current scene away and build a fresh one.
#[derive(Event, Debug, Default, Clone, Copy)]
pub struct ResetScene;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ResetScene>()
            .init_resource::<LaunchRequests>()
            .add_systems(Startup, spawn_scene)
            .add_systems(Update, rebuild_scene)
            .add_systems(FixedUpdate, service_launches.after(PhysicsStepSet));
    }
}

fn install(commands: &mut Commands, cfg: &ContraptionsConfig) {
    match build_demo_scene(cfg) {
        Ok(scene) => {
            commands.insert_resource(scene.space);
            commands.insert_resource(scene.launches);
            for (machine, index) in scene.machines.into_iter().zip(0u32..) {
                commands.spawn((machine, SpawnIndex(index)));
            }
        }
        Err(e) => {
            error!(target: "scene", "failed to build demo scene: {e:#}");
            commands.insert_resource(Space::new(&cfg.physics));
        }
    }
}

pub fn spawn_scene(mut commands: Commands, cfg: Res<ContraptionsConfig>) {
    install(&mut commands, &cfg);
}

pub fn rebuild_scene(
    mut commands: Commands,
    mut events: EventReader<ResetScene>,
    cfg: Res<ContraptionsConfig>,
    machines: Query<Entity, With<Machine>>,
) {
    if events.read().count() == 0 {
        return;
    }
    for entity in &machines {
        commands.entity(entity).despawn();
    }
    info!(target: "scene", "resetting scene");
    install(&mut commands, &cfg);
}

pub fn service_launches(
    mut space: ResMut<Space>,
    requests: Res<LaunchRequests>,
    cfg: Res<ContraptionsConfig>,
    machines: Query<&Machine>,
) {
    let launched = launch_pending(&mut space, &requests, &machines, cfg.catapult.launch_spin);
    if launched > 0 {
        debug!(target: "scene", "serviced {launched} launch request(s)");
    }
}

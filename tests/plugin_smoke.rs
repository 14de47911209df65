use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use contraptions::app::scene::{ResetScene, ScenePlugin};
use contraptions::app::simulation::{FrameCanvas, MachinesPlugin};
use contraptions::app::state::SimState;
use contraptions::rendering::palette;
use contraptions::{ContraptionsConfig, Machine, Space};

fn app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(ContraptionsConfig::default())
        .add_plugins((MachinesPlugin, ScenePlugin));
    app
}

fn machine_count(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&Machine>().iter(world).count()
}

#[test]
fn scene_spawns_and_draws() {
    let mut app = app();
    app.update();
    app.update();
    assert_eq!(machine_count(&mut app), 15);
    assert_eq!(app.world().resource::<Space>().joint_count(), 4);
    let canvas = &app.world().resource::<FrameCanvas>().0;
    assert_eq!((canvas.width(), canvas.height()), (800, 600));
    assert_eq!(canvas.pixel(400, 20), Some(palette::BACKGROUND));
}

#[test]
fn reset_rebuilds_the_scene() {
    let mut app = app();
    app.update();
    app.world_mut().send_event(ResetScene);
    app.update();
    app.update();
    assert_eq!(machine_count(&mut app), 15);
    assert_eq!(app.world().resource::<Space>().body_count(), 15);
}

#[test]
fn pausing_freezes_space_time() {
    let mut app = app();
    app.update();
    app.world_mut().resource_mut::<NextState<SimState>>().set(SimState::Paused);
    app.update();
    let before = app.world().resource::<Space>().time();
    for _ in 0..5 {
        std::thread::sleep(std::time::Duration::from_millis(20));
        app.update();
    }
    assert_eq!(app.world().resource::<Space>().time(), before);
}

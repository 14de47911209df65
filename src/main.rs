use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use contraptions::app::scene::build_demo_scene;
use contraptions::{Canvas, ContraptionsConfig, ContraptionsPlugin};

const DEFAULT_CONFIG: &str = "assets/config/contraptions.ron";

#[derive(Parser, Debug)]
#[command(name = "contraptions", about = "Levers, catapults and seesaws on rapier2d")]
struct Cli {
    /// RON config file; repeat to layer overrides (later files win).
    #[arg(long = "config", value_name = "PATH")]
    configs: Vec<PathBuf>,
    /// Run without a window.
    #[arg(long)]
    headless: bool,
    /// Physics steps to run in headless mode.
    #[arg(long, default_value_t = 600)]
    steps: u32,
    /// Write the last headless frame as PNG.
    #[arg(long, value_name = "PNG")]
    frame: Option<PathBuf>,
    /// Write body poses after the last headless step as JSON.
    #[arg(long, value_name = "JSON")]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = if cli.configs.is_empty() {
        vec![PathBuf::from(DEFAULT_CONFIG)]
    } else {
        cli.configs.clone()
    };
    let (cfg, used, errors) = ContraptionsConfig::load_layered(&paths);

    let mut app = App::new();
    if cli.headless {
        app.add_plugins(LogPlugin::default());
    } else {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }));
    }
    for path in &used {
        info!(target: "config", "loaded {path}");
    }
    for e in &errors {
        warn!(target: "config", "{e}");
    }
    for w in cfg.validate() {
        warn!(target: "config", "{w}");
    }

    if cli.headless {
        return run_headless(&cfg, &cli);
    }
    app.insert_resource(cfg).add_plugins(ContraptionsPlugin).run();
    Ok(())
}

fn run_headless(cfg: &ContraptionsConfig, cli: &Cli) -> Result<()> {
    let mut scene = build_demo_scene(cfg)?;
    let dt = cfg.physics.dt();
    for _ in 0..cli.steps {
        scene.step(dt);
    }
    println!(
        "simulated {:.2}s in {} steps: {} bodies, {} shapes, {} joints",
        scene.space.time(),
        cli.steps,
        scene.space.body_count(),
        scene.space.shape_count(),
        scene.space.joint_count()
    );
    if let Some(path) = &cli.frame {
        let (width, height) = (cfg.window.width.max(1.0), cfg.window.height.max(1.0));
        let mut canvas = Canvas::new(width as u32, height as u32);
        scene.render(&mut canvas, cfg.debug.draw_triggers);
        canvas.save_png(path)?;
        println!("frame written to {}", path.display());
    }
    if let Some(path) = &cli.snapshot {
        let json = serde_json::to_string_pretty(&scene.snapshot())?;
        fs::write(path, json).with_context(|| format!("write snapshot {}", path.display()))?;
        println!("snapshot written to {}", path.display());
    }
    Ok(())
}

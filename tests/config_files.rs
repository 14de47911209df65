use std::io::Write;

use contraptions::ContraptionsConfig;
use tempfile::NamedTempFile;

fn ron_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(body.as_bytes()).expect("write");
    file
}

#[test]
fn shipped_config_matches_defaults() {
    let cfg = ContraptionsConfig::load_from_file("assets/config/contraptions.ron").expect("load");
    assert_eq!(cfg, ContraptionsConfig::default());
    assert!(cfg.validate().is_empty());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let (cfg, err) = ContraptionsConfig::load_or_default("does/not/exist.ron");
    assert_eq!(cfg, ContraptionsConfig::default());
    assert!(err.unwrap().contains("read config"));
}

#[test]
fn layered_files_override_key_by_key() {
    let base = ron_file("(physics: (gravity_y: 500.0, step_hz: 120.0), scene: (domino_count: 3))");
    let overlay = ron_file("(physics: (gravity_y: 700.0), debug: (draw_triggers: true))");
    let (cfg, used, errors) = ContraptionsConfig::load_layered([base.path(), overlay.path()]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 2);
    assert_eq!(cfg.physics.gravity_y, 700.0);
    assert_eq!(cfg.physics.step_hz, 120.0);
    assert_eq!(cfg.scene.domino_count, 3);
    assert!(cfg.debug.draw_triggers);
}

#[test]
fn broken_layer_is_reported_and_skipped() {
    let good = ron_file("(catapult: (launch_spin: 12.0))");
    let bad = ron_file("(catapult: (launch_spin: ");
    let (cfg, used, errors) = ContraptionsConfig::load_layered([good.path(), bad.path()]);
    assert_eq!(used.len(), 1);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("parse error"));
    assert_eq!(cfg.catapult.launch_spin, 12.0);
}

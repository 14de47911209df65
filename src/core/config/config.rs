use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            title: "Contraptions".into(),
        }
    }
}

/// Screen-space physics: +y points down, lengths are pixels.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_y: f32,
    pub pixels_per_meter: f32,
    pub step_hz: f32,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: 900.0,
            pixels_per_meter: 50.0,
            step_hz: 60.0,
        }
    }
}
impl PhysicsConfig {
    pub fn dt(&self) -> f32 {
        1.0 / self.step_hz.max(1.0)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CatapultConfig {
    pub pivot: (f32, f32),
    pub stick_length: f32,
    pub stick_thickness: f32,
    /// Angular velocity (rad/s) the arm starts with.
    pub launch_spin: f32,
}
impl Default for CatapultConfig {
    fn default() -> Self {
        Self {
            pivot: (640.0, 470.0),
            stick_length: 150.0,
            stick_thickness: 5.0,
            launch_spin: 46.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub ground_y: f32,
    pub ball: (f32, f32),
    pub load_mass: f32,
    pub effort_mass: f32,
    pub load_x: f32,
    pub effort_x: f32,
    pub lever_pivot: (f32, f32),
    pub lever_length: f32,
    pub lever_thickness: f32,
    pub seesaw: (f32, f32),
    pub projectile: (f32, f32),
    pub domino_count: usize,
    pub domino_start_x: f32,
    pub domino_spacing: f32,
    pub ramp: (f32, f32),
    /// Ramp tilt in degrees.
    pub ramp_angle: f32,
    /// Top-left corner of the demo trigger.
    pub trigger: (f32, f32),
}
impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground_y: 590.0,
            ball: (110.0, 40.0),
            load_mass: 2.0,
            effort_mass: 1.0,
            load_x: 100.0,
            effort_x: 300.0,
            lever_pivot: (200.0, 420.0),
            lever_length: 300.0,
            lever_thickness: 10.0,
            seesaw: (470.0, 300.0),
            projectile: (505.0, 445.0),
            domino_count: 5,
            domino_start_x: 250.0,
            domino_spacing: 45.0,
            ramp: (720.0, 150.0),
            ramp_angle: 20.0,
            trigger: (90.0, 160.0),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DebugConfig {
    /// Outline live trigger zones (normally invisible).
    pub draw_triggers: bool,
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ContraptionsConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub catapult: CatapultConfig,
    pub scene: SceneConfig,
    pub debug: DebugConfig,
}

impl ContraptionsConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Merges every readable file in order (later keys win) and returns
    /// `(config, used_paths, errors)`. Unreadable files are skipped.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        if let Some((_, ev)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                            merge_value(ev, v);
                            continue;
                        }
                        bm.insert(k, v);
                    }
                }
                (b, o) => *b = o,
            }
        }
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (Self::default(), used, errors);
        };
        match val.into_rust::<Self>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!("failed to deserialize merged config; using defaults: {e}"));
                (Self::default(), used, errors)
            }
        }
    }

    /// Non-fatal sanity warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.physics.step_hz <= 0.0 {
            w.push(format!("physics.step_hz {} must be > 0; clamped to 1", self.physics.step_hz));
        } else if self.physics.step_hz < 30.0 {
            w.push(format!(
                "physics.step_hz {} is low; fast bodies may tunnel through thin shapes",
                self.physics.step_hz
            ));
        }
        if self.physics.pixels_per_meter <= 0.0 {
            w.push("physics.pixels_per_meter must be > 0".into());
        }
        if self.physics.gravity_y < 0.0 {
            w.push(format!(
                "physics.gravity_y is negative ({}); +y points down on screen so bodies will rise",
                self.physics.gravity_y
            ));
        }
        if self.catapult.stick_length <= 0.0 || self.catapult.stick_thickness <= 0.0 {
            w.push("catapult stick dimensions must be > 0".into());
        }
        if self.scene.load_mass <= 0.0 || self.scene.effort_mass <= 0.0 {
            w.push("scene crate masses must be > 0".into());
        }
        if self.scene.lever_length <= 0.0 {
            w.push("scene.lever_length must be > 0".into());
        }
        if self.scene.lever_thickness < 5.0 {
            w.push(format!(
                "scene.lever_thickness {} < 5; the last holder collapses to a zero-radius segment",
                self.scene.lever_thickness
            ));
        }
        if self.scene.domino_count > 64 {
            w.push(format!("scene.domino_count {} is very large", self.scene.domino_count));
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg: ContraptionsConfig =
            ron::from_str("(physics: (gravity_y: 500.0), scene: (domino_count: 2))").unwrap();
        assert_eq!(cfg.physics.gravity_y, 500.0);
        assert_eq!(cfg.physics.step_hz, 60.0);
        assert_eq!(cfg.scene.domino_count, 2);
        assert_eq!(cfg.catapult.launch_spin, 46.0);
    }

    #[test]
    fn layered_merge_adds_keys_missing_from_the_base() {
        use std::io::Write;
        let mut base = tempfile::NamedTempFile::new().expect("tmp file");
        let mut overlay = tempfile::NamedTempFile::new().expect("tmp file");
        writeln!(base, "(physics: (gravity_y: 400.0))").unwrap();
        writeln!(overlay, "(physics: (step_hz: 90.0), catapult: (launch_spin: 5.0))").unwrap();
        let (cfg, used, errors) =
            ContraptionsConfig::load_layered([base.path(), overlay.path()]);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(used.len(), 2);
        assert_eq!(cfg.physics.gravity_y, 400.0);
        assert_eq!(cfg.physics.step_hz, 90.0);
        assert_eq!(cfg.catapult.launch_spin, 5.0);
    }

    #[test]
    fn defaults_validate_clean() {
        assert!(ContraptionsConfig::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_upward_gravity_and_thin_lever() {
        let mut cfg = ContraptionsConfig::default();
        cfg.physics.gravity_y = -900.0;
        cfg.scene.lever_thickness = 3.0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2, "{warnings:?}");
    }
}

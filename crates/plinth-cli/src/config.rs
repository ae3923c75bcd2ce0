//! Layered configuration
//!
//! Precedence, highest wins:
//! 1. Environment variables (`PLINTH_PLACEMENT_OFFSET`, `PLINTH_ORBIT_SPEED`,
//!    `PLINTH_FETCH_TIMEOUT_SECS`, `PLINTH_EXPORT_DIR`)
//! 2. Project-local: `.plinth/config.toml`
//! 3. Global: `~/.plinth/config.toml`
//! 4. Built-in defaults
//!
//! Every file field is optional, so a file only overrides what it names.

use anyhow::{Context, Result};
use plinth_camera::CameraPose;
use plinth_core::Vec3;
use plinth_export::ExportFormat;
use plinth_scene::PlinthSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementSection {
    pub offset: Option<[f32; 3]>,
    pub drag_plane_height: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSection {
    pub default_position: Option<[f32; 3]>,
    pub default_target: Option<[f32; 3]>,
    pub top_down_height: Option<f32>,
    pub top_down_pan_speed: Option<f32>,
    pub zoom_step: Option<f32>,
    pub zoom_min: Option<f32>,
    pub zoom_max: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitSection {
    pub speed: Option<f32>,
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub height_offset: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchSection {
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSection {
    pub output_dir: Option<PathBuf>,
    pub default_format: Option<String>,
}

/// One config file as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlinthConfigFile {
    #[serde(default)]
    pub placement: PlacementSection,
    #[serde(default)]
    pub camera: CameraSection,
    #[serde(default)]
    pub orbit: OrbitSection,
    #[serde(default)]
    pub fetch: FetchSection,
    #[serde(default)]
    pub export: ExportSection,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PlinthConfig {
    pub settings: PlinthSettings,
    pub output_dir: PathBuf,
    pub default_format: ExportFormat,
}

impl Default for PlinthConfig {
    fn default() -> Self {
        Self::resolve(PlinthConfigFile::default())
    }
}

impl PlinthConfig {
    /// Load with layered precedence: defaults < global < project < env vars
    pub fn load() -> Result<Self> {
        let global = Self::global_config_path();
        let project = PathBuf::from(".plinth/config.toml");
        let layers: Vec<&Path> = global.iter().map(PathBuf::as_path).chain([project.as_path()]).collect();
        Self::load_layers(&layers, |key| std::env::var(key).ok())
    }

    /// Merge `paths` in order, skipping missing files, then apply env
    /// overrides read through `env`
    pub fn load_layers(paths: &[&Path], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = PlinthConfigFile::default();
        for path in paths {
            if !path.exists() {
                continue;
            }
            let layer = Self::load_file(path)?;
            log::debug!("Merging config from {}", path.display());
            Self::merge_into(&mut config, layer);
        }
        Self::apply_env_overrides(&mut config, env);
        Ok(Self::resolve(config))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".plinth").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<PlinthConfigFile> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    fn merge_into(base: &mut PlinthConfigFile, overlay: PlinthConfigFile) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        let PlinthConfigFile {
            placement,
            camera,
            orbit,
            fetch,
            export,
        } = overlay;

        take(&mut base.placement.offset, placement.offset);
        take(&mut base.placement.drag_plane_height, placement.drag_plane_height);

        take(&mut base.camera.default_position, camera.default_position);
        take(&mut base.camera.default_target, camera.default_target);
        take(&mut base.camera.top_down_height, camera.top_down_height);
        take(&mut base.camera.top_down_pan_speed, camera.top_down_pan_speed);
        take(&mut base.camera.zoom_step, camera.zoom_step);
        take(&mut base.camera.zoom_min, camera.zoom_min);
        take(&mut base.camera.zoom_max, camera.zoom_max);

        take(&mut base.orbit.speed, orbit.speed);
        take(&mut base.orbit.min_distance, orbit.min_distance);
        take(&mut base.orbit.max_distance, orbit.max_distance);
        take(&mut base.orbit.height_offset, orbit.height_offset);

        take(&mut base.fetch.timeout_secs, fetch.timeout_secs);

        take(&mut base.export.output_dir, export.output_dir);
        take(&mut base.export.default_format, export.default_format);
    }

    fn apply_env_overrides(config: &mut PlinthConfigFile, env: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = env("PLINTH_PLACEMENT_OFFSET") {
            match parse_triple(&raw) {
                Some(offset) => config.placement.offset = Some(offset),
                None => log::warn!("Ignoring PLINTH_PLACEMENT_OFFSET='{}': expected x,y,z", raw),
            }
        }
        if let Some(raw) = env("PLINTH_ORBIT_SPEED") {
            match raw.trim().parse() {
                Ok(speed) => config.orbit.speed = Some(speed),
                Err(_) => log::warn!("Ignoring PLINTH_ORBIT_SPEED='{}': not a number", raw),
            }
        }
        if let Some(raw) = env("PLINTH_FETCH_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => config.fetch.timeout_secs = Some(secs),
                Err(_) => log::warn!("Ignoring PLINTH_FETCH_TIMEOUT_SECS='{}': not a number", raw),
            }
        }
        if let Some(dir) = env("PLINTH_EXPORT_DIR") {
            config.export.output_dir = Some(PathBuf::from(dir));
        }
    }

    /// Fill unset fields from the built-in defaults
    fn resolve(file: PlinthConfigFile) -> Self {
        let mut settings = PlinthSettings::default();

        if let Some(offset) = file.placement.offset {
            settings.placement_offset = Vec3::from_array(offset);
        }
        if let Some(height) = file.placement.drag_plane_height {
            settings.drag_plane_height = height;
        }

        let pose = settings.default_pose;
        settings.default_pose = CameraPose::new(
            file.camera.default_position.map_or(pose.position, Vec3::from_array),
            file.camera.default_target.map_or(pose.target, Vec3::from_array),
        );
        let top_down = &mut settings.top_down;
        top_down.height = file.camera.top_down_height.unwrap_or(top_down.height);
        top_down.pan_speed = file.camera.top_down_pan_speed.unwrap_or(top_down.pan_speed);
        let zoom = &mut settings.zoom;
        zoom.step = file.camera.zoom_step.unwrap_or(zoom.step);
        zoom.min = file.camera.zoom_min.unwrap_or(zoom.min);
        zoom.max = file.camera.zoom_max.unwrap_or(zoom.max);

        let orbit = &mut settings.orbit;
        orbit.speed = file.orbit.speed.unwrap_or(orbit.speed);
        orbit.min_distance = file.orbit.min_distance.unwrap_or(orbit.min_distance);
        orbit.max_distance = file.orbit.max_distance.unwrap_or(orbit.max_distance);
        orbit.height_offset = file.orbit.height_offset.unwrap_or(orbit.height_offset);

        if let Some(secs) = file.fetch.timeout_secs {
            settings.fetch_timeout = Duration::from_secs(secs);
        }

        Self {
            settings,
            output_dir: file.export.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            default_format: file
                .export
                .default_format
                .as_deref()
                .map(ExportFormat::from_name)
                .unwrap_or_default(),
        }
    }
}

/// Parse "x,y,z"
pub fn parse_triple(s: &str) -> Option<[f32; 3]> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<_>>()?;
    <[f32; 3]>::try_from(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("plinth_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = PlinthConfig::load_layers(&[], no_env).unwrap();
        assert_eq!(config.settings, PlinthSettings::default());
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.default_format, ExportFormat::Gltf);
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let missing = std::env::temp_dir().join(format!("plinth_missing_{}.toml", uuid::Uuid::new_v4()));
        let config = PlinthConfig::load_layers(&[missing.as_path()], no_env).unwrap();
        assert_eq!(config, PlinthConfig::default());
    }

    #[test]
    fn test_layer_precedence() {
        let global = temp_config(
            r#"
[placement]
offset = [1.0, 0.0, 1.0]
drag_plane_height = 0.5

[orbit]
speed = 0.002
max_distance = 30.0

[export]
default_format = "stl"
"#,
        );
        let project = temp_config(
            r#"
[orbit]
speed = 0.008

[fetch]
timeout_secs = 5
"#,
        );
        let env: HashMap<&str, &str> = [("PLINTH_PLACEMENT_OFFSET", "2, 0, -2")].into();

        let config = PlinthConfig::load_layers(&[global.as_path(), project.as_path()], |k| {
            env.get(k).map(|v| v.to_string())
        })
        .unwrap();

        // env beats global
        assert_eq!(config.settings.placement_offset, Vec3::new(2.0, 0.0, -2.0));
        // global survives where nothing overrides it
        assert_eq!(config.settings.drag_plane_height, 0.5);
        assert_eq!(config.settings.orbit.max_distance, 30.0);
        assert_eq!(config.default_format, ExportFormat::Stl);
        // project beats global
        assert_eq!(config.settings.orbit.speed, 0.008);
        assert_eq!(config.settings.fetch_timeout, Duration::from_secs(5));
        // untouched defaults
        assert_eq!(config.settings.orbit.min_distance, 5.0);
        assert_eq!(config.settings.zoom.max, 15.0);

        cleanup(&global);
        cleanup(&project);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("PLINTH_PLACEMENT_OFFSET", "1,2"),
            ("PLINTH_ORBIT_SPEED", "fast"),
            ("PLINTH_EXPORT_DIR", "out/scenes"),
        ]
        .into();
        let config = PlinthConfig::load_layers(&[], |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.settings.placement_offset, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(config.settings.orbit.speed, 0.005);
        assert_eq!(config.output_dir, PathBuf::from("out/scenes"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_config("[orbit]\nspeed = \"fast\"\n");
        let err = PlinthConfig::load_layers(&[path.as_path()], no_env).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        cleanup(&path);
    }

    #[test]
    fn test_parse_triple() {
        assert_eq!(parse_triple("1, 2.5,-3"), Some([1.0, 2.5, -3.0]));
        assert_eq!(parse_triple("1,2"), None);
        assert_eq!(parse_triple("a,b,c"), None);
    }
}

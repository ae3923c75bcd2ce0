//! Compose a scene file and export it

use crate::config::PlinthConfig;
use anyhow::{Context, Result};
use plinth_export::{export_scene, ExportFormat, ExportOptions};
use plinth_scene::{Composition, SceneContext, ScenePolicy};
use std::path::PathBuf;

pub struct ComposeArgs {
    pub scene: String,
    pub format: Option<String>,
    pub out: Option<String>,
    pub include_room: bool,
}

pub fn run(args: ComposeArgs, config: &PlinthConfig) -> Result<()> {
    let composition = Composition::load(&args.scene)
        .with_context(|| format!("Failed to load composition '{}'", args.scene))?;
    let format = args
        .format
        .as_deref()
        .map(ExportFormat::from_name)
        .unwrap_or(config.default_format);
    let out_dir = args.out.map(PathBuf::from).unwrap_or_else(|| config.output_dir.clone());

    let mut scene = SceneContext::new(ScenePolicy::default(), config.settings.clone());
    // Each load already honors the fetch timeout; leave room for retries
    let wait = config.settings.fetch_timeout * 4;
    let ids = composition
        .apply(&mut scene, wait)
        .with_context(|| format!("Failed to compose '{}'", composition.scene.name))?;

    let placeholders = ids
        .iter()
        .filter_map(|id| scene.registry().get(id))
        .filter(|o| o.placeholder)
        .count();
    if placeholders > 0 {
        log::warn!("{} of {} models failed to load and were replaced by placeholders", placeholders, ids.len());
    }

    let options = ExportOptions {
        include_room: args.include_room,
    };
    let mut announce = |f: ExportFormat| println!("Exporting '{}' as {}...", composition.scene.name, f);
    let document = export_scene(scene.registry(), format, options, Some(&mut announce))
        .context("Export failed")?;
    let path = document.save(&out_dir)?;

    println!("Composed {} objects", ids.len());
    println!("Wrote {} ({} bytes)", path.display(), document.len());
    scene.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_starter_file_writes_export() {
        let dir = std::env::temp_dir().join(format!("plinth_compose_{}", uuid::Uuid::new_v4()));
        let scene_path = dir.join("studio.toml");
        let out = dir.join("out");
        crate::commands::init::run(&scene_path.to_string_lossy(), false).unwrap();

        let args = ComposeArgs {
            scene: scene_path.to_string_lossy().into_owned(),
            format: Some("obj".to_string()),
            out: Some(out.to_string_lossy().into_owned()),
            include_room: true,
        };
        run(args, &PlinthConfig::default()).unwrap();

        let written = std::fs::read_to_string(out.join("scene.obj")).unwrap();
        let blocks: Vec<&str> = written.lines().filter(|l| l.starts_with("o ")).collect();
        assert_eq!(blocks, vec!["o Crate_crate", "o Room_room-model"]);
        assert!(!out.join("scene.obj.part").exists());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_compose_missing_file_fails() {
        let missing = std::env::temp_dir().join(format!("plinth_missing_{}.toml", uuid::Uuid::new_v4()));
        let args = ComposeArgs {
            scene: missing.to_string_lossy().into_owned(),
            format: None,
            out: None,
            include_room: false,
        };
        assert!(run(args, &PlinthConfig::default()).is_err());
    }
}

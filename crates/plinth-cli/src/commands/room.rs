//! Generate a room shell and export it

use crate::config::PlinthConfig;
use anyhow::{Context, Result};
use plinth_export::{export_scene, ExportFormat, ExportOptions};
use plinth_scene::{RoomParams, RoomStyle, SceneContext, ScenePolicy};
use std::path::PathBuf;

pub struct RoomArgs {
    pub length: f32,
    pub width: f32,
    pub height: f32,
    pub style: String,
    pub format: Option<String>,
    pub out: Option<String>,
}

pub fn run(args: RoomArgs, config: &PlinthConfig) -> Result<()> {
    let style = RoomStyle::from(args.style.as_str());
    let params = RoomParams::new(args.length, args.width, args.height, style);

    let mut scene = SceneContext::new(ScenePolicy::room_only(), config.settings.clone());
    scene.generate_room(params).context("Invalid room dimensions")?;

    let format = args
        .format
        .as_deref()
        .map(ExportFormat::from_name)
        .unwrap_or(config.default_format);
    let document = export_scene(
        scene.registry(),
        format,
        ExportOptions { include_room: true },
        None,
    )?;
    let out_dir = args.out.map(PathBuf::from).unwrap_or_else(|| config.output_dir.clone());
    let path = document.save(&out_dir)?;

    println!(
        "Generated {} room {}x{}x{}",
        style, args.length, args.width, args.height
    );
    println!("Wrote {} ({} bytes)", path.display(), document.len());
    Ok(())
}

//! Starter composition file

use anyhow::{bail, Result};
use plinth_scene::Composition;
use std::path::Path;

pub fn run(path: &str, force: bool) -> Result<()> {
    let path = Path::new(path);
    if path.exists() && !force {
        bail!("'{}' already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    Composition::starter(name).save(path)?;

    println!("Created composition '{}'", path.display());
    println!("Next: plinth compose {}", path.display());
    Ok(())
}

//! Load one model and report what it contains

use anyhow::{Context, Result};
use plinth_import::{Fetcher, LoadRequest, ModelLoader, SourceFormat};
use serde::Serialize;

#[derive(Serialize)]
struct PartReport {
    name: String,
    vertices: usize,
    triangles: usize,
    has_normals: bool,
    material: Option<String>,
    color: String,
    bounds: Option<[[f32; 3]; 2]>,
}

#[derive(Serialize)]
struct ModelReport {
    source: String,
    format: SourceFormat,
    vertices: usize,
    triangles: usize,
    materials_bound: bool,
    sha256: Option<String>,
    bounds: Option<[[f32; 3]; 2]>,
    parts: Vec<PartReport>,
}

pub struct InspectArgs {
    pub model: String,
    pub format: Option<String>,
    pub material: Option<String>,
    pub json: bool,
}

pub fn run(args: InspectArgs, fetcher: Fetcher) -> Result<()> {
    let format = SourceFormat::resolve(args.format.as_deref(), &args.model);
    let request = LoadRequest {
        label: args.model.clone(),
        source_url: args.model.clone(),
        material_url: args.material,
        format,
    };
    let model = ModelLoader::new(fetcher)
        .load(&request)
        .with_context(|| format!("Failed to load '{}'", args.model))?;

    let report = ModelReport {
        source: args.model,
        format: model.format,
        vertices: model.vertex_count(),
        triangles: model.triangle_count(),
        materials_bound: model.materials_bound,
        sha256: model.source_hash.map(|h| h.to_hex()),
        bounds: model.bounds().map(|b| [b.min.to_array(), b.max.to_array()]),
        parts: model
            .parts
            .iter()
            .map(|p| PartReport {
                name: p.name.clone(),
                vertices: p.positions.len(),
                triangles: p.triangle_count(),
                has_normals: p.has_normals(),
                material: p.material.name.clone(),
                color: format!("#{:06x}", p.material.color.to_hex()),
                bounds: p.bounds().map(|b| [b.min.to_array(), b.max.to_array()]),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} ({})", report.source, report.format);
    println!("  Vertices:  {}", report.vertices);
    println!("  Triangles: {}", report.triangles);
    if let Some([min, max]) = report.bounds {
        println!("  Bounds:    {:?} .. {:?}", min, max);
    }
    if report.materials_bound {
        println!("  Materials: bound from sidecar");
    }
    println!("  Parts:");
    for part in &report.parts {
        println!(
            "    {} - {} tris, {} {}",
            part.name,
            part.triangles,
            part.material.as_deref().unwrap_or("(default)"),
            part.color
        );
    }
    Ok(())
}

//! glTF/GLB importer
//!
//! Every triangle primitive reachable from the default scene becomes one
//! `MeshPart`. Node transforms are accumulated down the hierarchy and
//! stored on the part, so the model keeps its authored layout.

use crate::format::SourceFormat;
use crate::types::{ImportedModel, MeshPart, PartMaterial};
use plinth_core::{Color, Mat4, PlinthError, Result};
use std::path::Path;

/// Decode a glTF payload.
///
/// A local path lets relative buffer URIs resolve next to the file; remote
/// payloads must be self-contained (GLB or embedded data URIs).
pub fn import_gltf(bytes: &[u8], local_path: Option<&Path>) -> Result<ImportedModel> {
    let (document, buffers, _images) = match local_path {
        Some(path) => gltf::import(path),
        None => gltf::import_slice(bytes),
    }
    .map_err(|e| PlinthError::Import(format!("Failed to import glTF: {}", e)))?;

    let mut parts = Vec::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&node, Mat4::IDENTITY, &buffers, &mut parts);
            }
        }
        None => {
            // No scene: take the meshes as they are
            for mesh in document.meshes() {
                collect_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut parts);
            }
        }
    }

    Ok(ImportedModel {
        format: SourceFormat::Gltf,
        parts,
        materials_bound: document.materials().next().is_some(),
        source_hash: None,
    })
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshPart>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        collect_mesh(&mesh, world, buffers, out);
    }
    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

fn collect_mesh(
    mesh: &gltf::Mesh,
    local: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshPart>,
) {
    let mesh_name = mesh
        .name()
        .map(String::from)
        .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!(
                "Skipping {:?} primitive {} of {}",
                primitive.mode(),
                primitive.index(),
                mesh_name
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .map(|iter| iter.collect())
            .unwrap_or_default();
        if positions.is_empty() {
            continue;
        }

        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|iter| iter.collect())
            .unwrap_or_default();

        let indices: Vec<u32> = reader
            .read_indices()
            .map(|iter| iter.into_u32().collect())
            .unwrap_or_else(|| (0..positions.len() as u32).collect());

        let material = primitive.material();
        let [r, g, b, a] = material.pbr_metallic_roughness().base_color_factor();

        let name = if mesh.primitives().len() > 1 {
            format!("{}_{}", mesh_name, primitive.index())
        } else {
            mesh_name.clone()
        };
        let mut part = MeshPart::new(name, positions, indices);
        part.normals = normals;
        part.local = local;
        part.material = PartMaterial {
            name: material.name().map(String::from),
            color: Color::new(r, g, b, a),
            double_sided: material.double_sided(),
        };
        out.push(part);
    }
}

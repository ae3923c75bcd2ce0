//! OBJ + MTL importer

use crate::format::SourceFormat;
use crate::types::{ImportedModel, MeshPart, PartMaterial};
use plinth_core::{Color, PlinthError, Result};

/// A material library sidecar, validated on parse
pub struct MaterialLibrary {
    bytes: Vec<u8>,
    count: usize,
}

impl MaterialLibrary {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let (materials, _) = tobj::load_mtl_buf(&mut reader)
            .map_err(|e| PlinthError::Import(format!("Failed to parse MTL: {}", e)))?;
        Ok(Self {
            bytes: bytes.to_vec(),
            count: materials.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn load(&self) -> tobj::MTLLoadResult {
        let mut reader = self.bytes.as_slice();
        tobj::load_mtl_buf(&mut reader)
    }
}

/// Decode an OBJ payload, binding `materials` to `usemtl` groups when given
pub fn import_obj(bytes: &[u8], materials: Option<&MaterialLibrary>) -> Result<ImportedModel> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    // Every mtllib reference resolves to the sidecar. One is injected so
    // files without their own mtllib line still bind their usemtl groups.
    let source = match materials {
        Some(_) => [SIDECAR_MTLLIB, bytes].concat(),
        None => bytes.to_vec(),
    };
    let mut reader = source.as_slice();
    let (models, loaded) = tobj::load_obj_buf(&mut reader, &options, |_| match materials {
        Some(lib) => lib.load(),
        None => Err(tobj::LoadError::OpenFileFailed),
    })
    .map_err(|e| PlinthError::Import(format!("Failed to parse OBJ: {}", e)))?;
    let loaded = loaded.unwrap_or_default();

    let mut bound = false;
    let parts = models
        .into_iter()
        .enumerate()
        .map(|(i, model)| {
            let mesh = model.mesh;
            let name = if model.name.is_empty() {
                format!("group_{}", i)
            } else {
                model.name
            };
            let material = mesh
                .material_id
                .and_then(|id| loaded.get(id))
                .map(part_material);
            bound |= material.is_some();

            let mut part = MeshPart::new(name, to_triples(&mesh.positions), mesh.indices);
            part.normals = to_triples(&mesh.normals);
            part.material = material.unwrap_or_default();
            part
        })
        .collect();

    Ok(ImportedModel {
        format: SourceFormat::Obj,
        parts,
        materials_bound: bound,
        source_hash: None,
    })
}

const SIDECAR_MTLLIB: &[u8] = b"mtllib sidecar.mtl\n";

fn part_material(mtl: &tobj::Material) -> PartMaterial {
    let [r, g, b] = mtl.diffuse.unwrap_or([0.8; 3]);
    PartMaterial {
        name: Some(mtl.name.clone()),
        color: Color::new(r, g, b, mtl.dissolve.unwrap_or(1.0)),
        double_sided: false,
    }
}

fn to_triples(flat: &[f32]) -> Vec<[f32; 3]> {
    flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

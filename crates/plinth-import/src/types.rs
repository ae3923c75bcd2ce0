//! Import result types

use crate::format::SourceFormat;
use plinth_core::{Aabb, Color, ContentHash, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Surface appearance of one mesh part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartMaterial {
    pub name: Option<String>,
    pub color: Color,
    #[serde(default)]
    pub double_sided: bool,
}

impl Default for PartMaterial {
    fn default() -> Self {
        Self {
            name: None,
            color: Color::NEUTRAL,
            double_sided: false,
        }
    }
}

impl PartMaterial {
    pub fn solid(color: Color) -> Self {
        Self {
            name: None,
            color,
            double_sided: false,
        }
    }
}

/// One triangle mesh of a model (an OBJ group, a glTF primitive, an STL body)
#[derive(Debug, Clone)]
pub struct MeshPart {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals, empty when the source has none
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indices into `positions`
    pub indices: Vec<u32>,
    pub material: PartMaterial,
    /// Transform from part space into model space
    pub local: Mat4,
}

impl MeshPart {
    pub fn new(name: impl Into<String>, positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            positions,
            normals: Vec::new(),
            indices,
            material: PartMaterial::default(),
            local: Mat4::IDENTITY,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounds in model space (after `local`)
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_positions(&self.positions).map(|b| b.transformed(&self.local))
    }

    /// Iterate triangles as vertex position triples in part space.
    /// Indices that point past the vertex buffer are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let get = |i: u32| self.positions.get(i as usize).map(|p| Vec3::from_array(*p));
            Some([get(tri[0])?, get(tri[1])?, get(tri[2])?])
        })
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.positions.len()
    }
}

/// A decoded model ready to be placed
#[derive(Debug, Clone)]
pub struct ImportedModel {
    pub format: SourceFormat,
    pub parts: Vec<MeshPart>,
    /// Whether a material library was bound to the parts
    pub materials_bound: bool,
    /// Hash of the primary source bytes
    pub source_hash: Option<ContentHash>,
}

impl ImportedModel {
    pub fn bounds(&self) -> Option<Aabb> {
        self.parts
            .iter()
            .filter_map(|p| p.bounds())
            .reduce(|a, b| a.union(&b))
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.triangle_count()).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.positions.len()).sum()
    }

    /// True when no part has at least one triangle
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangles_skip_bad_indices() {
        let part = MeshPart::new(
            "tri",
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2, 0, 1, 9],
        );
        assert_eq!(part.triangle_count(), 2);
        assert_eq!(part.triangles().count(), 1);
    }

    #[test]
    fn test_model_bounds_use_local_transform() {
        let mut part = MeshPart::new(
            "tri",
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        );
        part.local = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let model = ImportedModel {
            format: SourceFormat::Obj,
            parts: vec![part],
            materials_bound: false,
            source_hash: None,
        };
        let b = model.bounds().unwrap();
        assert_eq!(b.min, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(model.triangle_count(), 1);
        assert!(!model.is_empty());
    }
}

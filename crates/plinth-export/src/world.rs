//! Exportable geometry in world space

use crate::exporter::ExportOptions;
use plinth_core::{transform_direction, Mat4, Vec3};
use plinth_import::MeshPart;
use plinth_scene::{ModelRegistry, PlacedObject};

/// Objects to export in registry order, with the room last when included.
/// Disposed meshes are skipped.
pub fn exportable_objects<'a>(
    registry: &'a ModelRegistry,
    options: &ExportOptions,
) -> Vec<&'a PlacedObject> {
    let room = registry
        .room()
        .filter(|_| options.include_room)
        .map(|r| &r.object);
    registry
        .objects()
        .iter()
        .chain(room)
        .filter(|o| !o.mesh.is_disposed() && !o.mesh.parts().is_empty())
        .collect()
}

/// One part baked into world space
#[derive(Debug, Clone)]
pub struct WorldMesh {
    pub positions: Vec<Vec3>,
    /// Empty when the part has no normals
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl WorldMesh {
    /// Bake `part` with its owner's world matrix
    pub fn bake(object_world: &Mat4, part: &MeshPart) -> Self {
        let mat = *object_world * part.local;
        let positions = part
            .positions
            .iter()
            .map(|p| mat.transform_point3(Vec3::from_array(*p)))
            .collect();
        let normals = if part.has_normals() {
            part.normals
                .iter()
                .map(|n| transform_direction(&mat, Vec3::from_array(*n)))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            positions,
            normals,
            indices: part.indices.clone(),
        }
    }

    /// Triangles as vertex triples, in index order. Out-of-range indices
    /// drop their triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let get = |i: u32| self.positions.get(i as usize).copied();
            Some([get(tri[0])?, get(tri[1])?, get(tri[2])?])
        })
    }
}

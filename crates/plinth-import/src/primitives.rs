//! Synthesized meshes: the default cube, the failure placeholder and room shells

use crate::types::{MeshPart, PartMaterial};

/// Corner indices of each face, wound counter-clockwise seen from outside
const FACES: [([usize; 4], [f32; 3]); 6] = [
    ([0, 3, 2, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
    ([0, 4, 7, 3], [-1.0, 0.0, 0.0]),
    ([5, 1, 2, 6], [1.0, 0.0, 0.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([3, 7, 6, 2], [0.0, 1.0, 0.0]),
];

/// Axis-aligned box centered on the origin with flat per-face normals
/// (24 vertices, 12 triangles)
pub fn box_part(
    name: impl Into<String>,
    width: f32,
    height: f32,
    depth: f32,
    material: PartMaterial,
) -> MeshPart {
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
    let corners = [
        [-hw, -hh, -hd],
        [hw, -hh, -hd],
        [hw, hh, -hd],
        [-hw, hh, -hd],
        [-hw, -hh, hd],
        [hw, -hh, hd],
        [hw, hh, hd],
        [-hw, hh, hd],
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    for (quad, normal) in FACES {
        for corner in quad {
            positions.push(corners[corner]);
            normals.push(normal);
        }
    }

    let indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect();

    let mut part = MeshPart::new(name, positions, indices);
    part.normals = normals;
    part.material = material;
    part
}

/// Unit cube
pub fn unit_cube(name: impl Into<String>, material: PartMaterial) -> MeshPart {
    box_part(name, 1.0, 1.0, 1.0, material)
}

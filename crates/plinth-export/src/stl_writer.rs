//! ASCII STL writer
//!
//! Every part is baked to world space and de-indexed into one flat list of
//! coordinates. Each complete group of nine floats becomes a facet; facet
//! normals are written as zero and left for the reader to recompute.

use crate::world::WorldMesh;
use plinth_scene::PlacedObject;
use std::fmt::Write;

pub fn write_stl(objects: &[&PlacedObject]) -> String {
    let mut coords: Vec<f32> = Vec::new();
    for object in objects {
        let world = object.world_matrix();
        for part in object.mesh.parts() {
            let baked = WorldMesh::bake(&world, part);
            for triangle in baked.triangles() {
                for vertex in triangle {
                    coords.extend_from_slice(&vertex.to_array());
                }
            }
        }
    }
    write_facets(&coords)
}

/// Format a flat coordinate list. A trailing partial facet is dropped.
pub(crate) fn write_facets(coords: &[f32]) -> String {
    let mut out = String::from("solid scene\n");
    for facet in coords.chunks_exact(9) {
        out.push_str("  facet normal 0 0 0\n    outer loop\n");
        for v in facet.chunks_exact(3) {
            let _ = writeln!(out, "      vertex {} {} {}", v[0], v[1], v[2]);
        }
        out.push_str("    endloop\n  endfacet\n");
    }
    out.push_str("endsolid scene\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_facet_dropped() {
        let coords: Vec<f32> = (0..13).map(|i| i as f32).collect();
        let out = write_facets(&coords);
        assert_eq!(out.matches("facet normal").count(), 1);
        assert!(out.contains("vertex 6 7 8"));
        assert!(!out.contains(" 9 10 11"));
    }

    #[test]
    fn test_empty_is_header_and_footer() {
        assert_eq!(write_facets(&[]), "solid scene\nendsolid scene\n");
    }

    #[test]
    fn test_shortest_float_formatting() {
        let out = write_facets(&[0.1, -2.5, 1e-3, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert!(out.contains("vertex 0.1 -2.5 0.001"));
    }
}

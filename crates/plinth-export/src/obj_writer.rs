//! Wavefront OBJ writer: one `o` block per object, world-space vertices

use crate::world::WorldMesh;
use plinth_scene::PlacedObject;
use std::fmt::Write;

pub fn write_obj(objects: &[&PlacedObject]) -> String {
    let mut out = String::from("# Plinth scene export\n");
    // OBJ indices are 1-based and global across the file
    let mut vertex_base = 1u32;

    for object in objects {
        let world = object.world_matrix();
        let _ = writeln!(out, "o {}", object_label(object));
        for part in object.mesh.parts() {
            let baked = WorldMesh::bake(&world, part);
            for p in &baked.positions {
                let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
            }
            let with_normals = !baked.normals.is_empty();
            for n in &baked.normals {
                let _ = writeln!(out, "vn {} {} {}", n.x, n.y, n.z);
            }
            for tri in baked.indices.chunks_exact(3) {
                if tri.iter().any(|&i| i as usize >= baked.positions.len()) {
                    continue;
                }
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i + vertex_base);
                if with_normals {
                    let _ = writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}");
                } else {
                    let _ = writeln!(out, "f {a} {b} {c}");
                }
            }
            vertex_base += baked.positions.len() as u32;
        }
    }
    out
}

/// Name line for an object; whitespace would split the `o` statement
fn object_label(object: &PlacedObject) -> String {
    let name: String = object
        .name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}_{}", name, object.id)
}

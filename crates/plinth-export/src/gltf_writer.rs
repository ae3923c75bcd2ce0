//! glTF 2.0 JSON writer
//!
//! Layout: one node per object carrying its TRS, with a child node per
//! part. Each part gets its own mesh, material and accessors. All binary
//! data lives in one buffer, embedded as a base64 data URI.

use base64::Engine;
use gltf::json;
use gltf::json::validation::Checked::Valid;
use gltf::json::validation::USize64;
use plinth_core::{Aabb, Mat4, PlinthError, Result};
use plinth_import::MeshPart;
use plinth_scene::PlacedObject;
use std::collections::BTreeMap;

const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Binary payload shared by every accessor
#[derive(Default)]
struct BufferBuilder {
    bytes: Vec<u8>,
    views: Vec<(usize, usize, json::buffer::Target)>,
}

impl BufferBuilder {
    fn push_f32(&mut self, values: &[[f32; 3]]) -> usize {
        let offset = self.bytes.len();
        for v in values {
            for c in v {
                self.bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        self.views
            .push((offset, self.bytes.len() - offset, json::buffer::Target::ArrayBuffer));
        self.views.len() - 1
    }

    fn push_u32(&mut self, values: &[u32]) -> usize {
        let offset = self.bytes.len();
        for v in values {
            self.bytes.extend_from_slice(&v.to_le_bytes());
        }
        self.views.push((
            offset,
            self.bytes.len() - offset,
            json::buffer::Target::ElementArrayBuffer,
        ));
        self.views.len() - 1
    }
}

pub fn write_gltf(objects: &[&PlacedObject]) -> Result<Vec<u8>> {
    let mut root = json::Root::default();
    let mut buffer = BufferBuilder::default();
    // Accessors are created after the buffer is complete; remember them here
    let mut pending: Vec<PendingPart> = Vec::new();
    let mut object_nodes = Vec::with_capacity(objects.len());

    for object in objects {
        let mut children = Vec::new();
        for (index, part) in object.mesh.parts().iter().enumerate() {
            if part.positions.is_empty() || part.indices.len() < 3 {
                continue;
            }
            pending.push(PendingPart::new(part, &mut buffer));
            children.push((format!("{}-{}", object.id, index), part.local));
        }
        object_nodes.push((object, children));
    }

    let buffer_index = root.push(json::Buffer {
        byte_length: USize64::from(buffer.bytes.len()),
        name: None,
        uri: Some(format!(
            "{}{}",
            DATA_URI_PREFIX,
            base64::engine::general_purpose::STANDARD.encode(&buffer.bytes)
        )),
        extensions: Default::default(),
        extras: Default::default(),
    });
    let view_indices: Vec<json::Index<json::buffer::View>> = buffer
        .views
        .iter()
        .map(|&(offset, length, target)| {
            root.push(json::buffer::View {
                buffer: buffer_index,
                byte_length: USize64::from(length),
                byte_offset: Some(USize64::from(offset)),
                byte_stride: None,
                name: None,
                target: Some(Valid(target)),
                extensions: Default::default(),
                extras: Default::default(),
            })
        })
        .collect();

    let mut meshes = pending
        .into_iter()
        .map(|part| part.into_mesh(&mut root, &view_indices))
        .collect::<Vec<_>>()
        .into_iter();

    let mut scene_nodes = Vec::with_capacity(object_nodes.len());
    for (object, children) in object_nodes {
        let child_nodes = children
            .into_iter()
            .filter_map(|(name, local)| {
                let mesh = meshes.next()?;
                Some(root.push(json::Node {
                    mesh: Some(mesh),
                    name: Some(name),
                    matrix: (local != Mat4::IDENTITY).then(|| local.to_cols_array()),
                    ..empty_node()
                }))
            })
            .collect::<Vec<_>>();

        let t = &object.transform;
        let q = t.quaternion();
        scene_nodes.push(root.push(json::Node {
            name: Some(object.name.clone()),
            children: (!child_nodes.is_empty()).then_some(child_nodes),
            translation: Some(t.position.to_array()),
            rotation: Some(json::scene::UnitQuaternion([q.x, q.y, q.z, q.w])),
            scale: Some(t.scale.to_array()),
            ..empty_node()
        }));
    }

    let scene = root.push(json::Scene {
        name: Some("scene".to_string()),
        nodes: scene_nodes,
        extensions: Default::default(),
        extras: Default::default(),
    });
    root.scene = Some(scene);
    root.asset.generator = Some(format!("plinth {}", env!("CARGO_PKG_VERSION")));

    json::serialize::to_vec_pretty(&root).map_err(|e| {
        log::error!("glTF serialization failed: {}", e);
        PlinthError::Export(format!("glTF serialization failed: {}", e))
    })
}

/// A part whose data is already in the buffer
struct PendingPart {
    name: String,
    positions: usize,
    normals: Option<usize>,
    indices: usize,
    vertex_count: usize,
    index_count: usize,
    bounds: Option<Aabb>,
    material: json::Material,
}

impl PendingPart {
    fn new(part: &MeshPart, buffer: &mut BufferBuilder) -> Self {
        let positions = buffer.push_f32(&part.positions);
        let normals = part.has_normals().then(|| buffer.push_f32(&part.normals));
        let indices = buffer.push_u32(&part.indices);
        Self {
            name: part.name.clone(),
            positions,
            normals,
            indices,
            vertex_count: part.positions.len(),
            index_count: part.indices.len(),
            bounds: Aabb::from_positions(&part.positions),
            material: material(part),
        }
    }

    fn into_mesh(
        self,
        root: &mut json::Root,
        views: &[json::Index<json::buffer::View>],
    ) -> json::Index<json::Mesh> {
        let (min, max) = match self.bounds {
            Some(b) => (Some(b.min.to_array()), Some(b.max.to_array())),
            None => (None, None),
        };
        let positions = root.push(accessor(
            views[self.positions],
            self.vertex_count,
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec3,
            min.map(|m| json::Value::from(m.to_vec())),
            max.map(|m| json::Value::from(m.to_vec())),
        ));
        let normals = self.normals.map(|view| {
            root.push(accessor(
                views[view],
                self.vertex_count,
                json::accessor::ComponentType::F32,
                json::accessor::Type::Vec3,
                None,
                None,
            ))
        });
        let indices = root.push(accessor(
            views[self.indices],
            self.index_count,
            json::accessor::ComponentType::U32,
            json::accessor::Type::Scalar,
            None,
            None,
        ));
        let material = root.push(self.material);

        let mut attributes = BTreeMap::new();
        attributes.insert(Valid(json::mesh::Semantic::Positions), positions);
        if let Some(normals) = normals {
            attributes.insert(Valid(json::mesh::Semantic::Normals), normals);
        }

        root.push(json::Mesh {
            name: Some(self.name),
            primitives: vec![json::mesh::Primitive {
                attributes,
                indices: Some(indices),
                material: Some(material),
                mode: Valid(json::mesh::Mode::Triangles),
                targets: None,
                extensions: Default::default(),
                extras: Default::default(),
            }],
            weights: None,
            extensions: Default::default(),
            extras: Default::default(),
        })
    }
}

fn accessor(
    view: json::Index<json::buffer::View>,
    count: usize,
    component: json::accessor::ComponentType,
    kind: json::accessor::Type,
    min: Option<json::Value>,
    max: Option<json::Value>,
) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(view),
        byte_offset: None,
        count: USize64::from(count),
        component_type: Valid(json::accessor::GenericComponentType(component)),
        type_: Valid(kind),
        min,
        max,
        name: None,
        normalized: false,
        sparse: None,
        extensions: Default::default(),
        extras: Default::default(),
    }
}

fn material(part: &MeshPart) -> json::Material {
    let color = part.material.color;
    let alpha_mode = if color.a < 1.0 {
        json::material::AlphaMode::Blend
    } else {
        json::material::AlphaMode::Opaque
    };
    json::Material {
        name: part.material.name.clone(),
        alpha_mode: Valid(alpha_mode),
        double_sided: part.material.double_sided,
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_factor: json::material::PbrBaseColorFactor(color.to_array()),
            metallic_factor: json::material::StrengthFactor(0.0),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn empty_node() -> json::Node {
    json::Node {
        camera: None,
        children: None,
        matrix: None,
        mesh: None,
        name: None,
        rotation: None,
        scale: None,
        translation: None,
        skin: None,
        weights: None,
        extensions: Default::default(),
        extras: Default::default(),
    }
}

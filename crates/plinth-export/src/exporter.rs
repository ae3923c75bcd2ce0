//! Export entry point

use crate::document::ExportDocument;
use crate::format::ExportFormat;
use crate::gltf_writer::write_gltf;
use crate::obj_writer::write_obj;
use crate::stl_writer::write_stl;
use crate::world::exportable_objects;
use plinth_core::{PlinthError, Result};
use plinth_scene::ModelRegistry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Export the room shell along with the movable objects
    #[serde(default)]
    pub include_room: bool,
}

/// Serialize the scene into one document.
///
/// Fails with [`PlinthError::EmptyScene`] before anything else happens when
/// there is nothing to export. `on_start` fires once the scene is known to
/// be non-empty.
pub fn export_scene(
    registry: &ModelRegistry,
    format: ExportFormat,
    options: ExportOptions,
    on_start: Option<&mut dyn FnMut(ExportFormat)>,
) -> Result<ExportDocument> {
    let objects = exportable_objects(registry, &options);
    if objects.is_empty() {
        log::warn!("Export as {} skipped: nothing to export", format);
        return Err(PlinthError::EmptyScene);
    }
    if let Some(hook) = on_start {
        hook(format);
    }

    log::info!("Exporting {} objects as {}", objects.len(), format);
    let bytes = match format {
        ExportFormat::Gltf => write_gltf(&objects)?,
        ExportFormat::Obj => write_obj(&objects).into_bytes(),
        ExportFormat::Stl => write_stl(&objects).into_bytes(),
    };
    let document = ExportDocument::new(format, bytes);
    log::info!("Exported {} ({} bytes)", document.file_name, document.len());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_core::{Transform, Vec3};
    use plinth_import::MeshPart;
    use plinth_scene::{
        MeshHandle, ModelDescriptor, PlacedObject, RoomParams, RoomStyle, Scale, SceneContext,
    };
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(10);

    /// Unit cube with 8 shared corners and 12 triangles
    fn indexed_cube() -> MeshPart {
        let positions = vec![
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ];
        let indices = vec![
            0, 2, 1, 0, 3, 2, // back
            4, 5, 6, 4, 6, 7, // front
            0, 1, 5, 0, 5, 4, // bottom
            3, 6, 2, 3, 7, 6, // top
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        MeshPart::new("cube", positions, indices)
    }

    fn scene_with_box() -> SceneContext {
        let mut scene = SceneContext::default();
        scene
            .load_now(ModelDescriptor::default().with_id("box"), Scale::default(), WAIT)
            .unwrap();
        scene
    }

    #[test]
    fn test_empty_scene_fails_without_hook() {
        let registry = ModelRegistry::new();
        let mut fired = false;
        let mut hook = |_: ExportFormat| fired = true;
        for format in [ExportFormat::Gltf, ExportFormat::Obj, ExportFormat::Stl] {
            let result = export_scene(&registry, format, ExportOptions::default(), Some(&mut hook));
            assert!(matches!(result, Err(PlinthError::EmptyScene)));
        }
        assert!(!fired);
        assert_eq!(
            PlinthError::EmptyScene.to_string(),
            "no exportable models in the scene"
        );
    }

    #[test]
    fn test_stl_unit_cube_has_36_vertices() {
        let mut registry = ModelRegistry::new();
        let cube = PlacedObject {
            id: "cube".into(),
            name: "Cube".to_string(),
            transform: Transform::IDENTITY,
            mesh: MeshHandle::new(vec![indexed_cube()], registry.tracker()),
            descriptor: ModelDescriptor::default(),
            placeholder: false,
        };
        registry.insert(cube);

        let doc = export_scene(&registry, ExportFormat::Stl, ExportOptions::default(), None).unwrap();
        let text = doc.as_text().unwrap();
        let vertex_lines = text
            .lines()
            .filter(|l| l.trim_start().starts_with("vertex "))
            .count();
        assert_eq!(vertex_lines, 36);
        assert_eq!(text.matches("facet normal 0 0 0").count(), 12);
        assert_eq!(text.lines().next(), Some("solid scene"));
        assert_eq!(text.lines().last(), Some("endsolid scene"));
        assert_eq!(doc.file_name, "scene.stl");
        registry.clear();
    }

    #[test]
    fn test_hook_receives_format() {
        let scene = scene_with_box();
        let mut seen = Vec::new();
        let mut hook = |f: ExportFormat| seen.push(f);
        export_scene(scene.registry(), ExportFormat::Obj, ExportOptions::default(), Some(&mut hook))
            .unwrap();
        assert_eq!(seen, vec![ExportFormat::Obj]);
    }

    #[test]
    fn test_room_only_exported_on_request() {
        let mut scene = SceneContext::default();
        scene
            .generate_room(RoomParams::new(4.0, 4.0, 3.0, RoomStyle::Modern))
            .unwrap();

        let result = export_scene(scene.registry(), ExportFormat::Obj, ExportOptions::default(), None);
        assert!(matches!(result, Err(PlinthError::EmptyScene)));

        let doc = export_scene(
            scene.registry(),
            ExportFormat::Obj,
            ExportOptions { include_room: true },
            None,
        )
        .unwrap();
        assert!(doc.as_text().unwrap().contains("o Room_room-model"));
    }

    #[test]
    fn test_obj_is_in_world_space() {
        let scene = scene_with_box();
        let doc = export_scene(scene.registry(), ExportFormat::Obj, ExportOptions::default(), None)
            .unwrap();
        let text = doc.as_text().unwrap();
        // The box sits at the placement offset (5, 0, 5)
        assert!(text.contains("v 4.5 -0.5 4.5\n"));
        assert!(text.contains("v 5.5 0.5 5.5\n"));
    }

    #[test]
    fn test_gltf_carries_object_transform() {
        let mut scene = scene_with_box();
        scene.select(&"box".into()).unwrap();
        scene.set_scale(Scale::PerAxis(Vec3::new(1.0, 2.0, 3.0)), false).unwrap();

        let doc = export_scene(scene.registry(), ExportFormat::Gltf, ExportOptions::default(), None)
            .unwrap();
        assert_eq!(doc.mime, "model/gltf+json");
        let json: serde_json::Value = serde_json::from_slice(&doc.bytes).unwrap();
        let root_node = json["scenes"][0]["nodes"][0].as_u64().unwrap() as usize;
        assert_eq!(json["nodes"][root_node]["translation"], serde_json::json!([5.0, 0.0, 5.0]));
        assert_eq!(json["nodes"][root_node]["scale"], serde_json::json!([1.0, 2.0, 3.0]));
    }
}

//! Plinth Export - Scene serialization
//!
//! Writes the placed objects of a [`plinth_scene::ModelRegistry`] as a
//! single document:
//! - glTF 2.0 JSON with an embedded buffer
//! - Wavefront OBJ text, world space
//! - ASCII STL triangle soup, world space

mod document;
mod exporter;
mod format;
mod gltf_writer;
mod obj_writer;
mod stl_writer;
mod world;

pub use document::ExportDocument;
pub use exporter::{export_scene, ExportOptions};
pub use format::ExportFormat;
pub use world::{exportable_objects, WorldMesh};

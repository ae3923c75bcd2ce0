//! Plinth Import - Model fetching and decoding
//!
//! Turns a source URL (http(s) or local path) into an [`ImportedModel`]:
//! - OBJ with an optional MTL sidecar (via `tobj`)
//! - glTF 2.0 / GLB (via `gltf`)
//! - STL, ASCII or binary
//!
//! Also synthesizes the box meshes used for default cubes, failure
//! placeholders and generated room shells.

mod fetch;
mod format;
mod gltf_import;
mod loader;
mod obj_import;
mod primitives;
mod stl_import;
mod types;

pub use fetch::{Fetcher, SourceLocation};
pub use format::SourceFormat;
pub use gltf_import::import_gltf;
pub use loader::{LoadRequest, ModelLoader};
pub use obj_import::{import_obj, MaterialLibrary};
pub use primitives::{box_part, unit_cube};
pub use stl_import::import_stl;
pub use types::{ImportedModel, MeshPart, PartMaterial};

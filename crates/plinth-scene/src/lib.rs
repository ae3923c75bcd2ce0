//! Plinth Scene - Scene registry and interaction
//!
//! [`SceneContext`] is the value a host owns per scene. It places loaded
//! models, keeps the room shell, resolves pointer input into selection and
//! drags, switches view modes and drives the auto-orbit walkthrough.
//! Composition files describe a whole scene in TOML.

mod composition;
mod context;
mod descriptor;
mod hooks;
mod loading;
mod mesh;
mod registry;
mod room;
mod selection;
mod settings;
mod transform;

pub use composition::{Composition, CompositionMeta, ObjectEntry, RoomEntry};
pub use context::{SceneContext, PLACEHOLDER_COLOR, PLACEHOLDER_OPACITY};
pub use descriptor::{ModelDescriptor, Scale, DEFAULT_MODEL_NAME};
pub use hooks::SceneHooks;
pub use loading::{CompletedLoad, LoadQueue, LoadTicket};
pub use mesh::{MeshHandle, ResourceTracker};
pub use registry::{Hit, ModelRegistry, PartKey, PlacedObject, RoomShell, RoomSource};
pub use room::{RoomParams, RoomStyle};
pub use selection::{SelectedTransform, Selection};
pub use settings::{PlinthSettings, ScenePolicy};
pub use transform::{RotationMode, TransformController};

//! Composition files: a room plus a list of placed models, in TOML
//!
//! ```toml
//! [scene]
//! name = "Living room"
//!
//! [room.generate]
//! length = 8.0
//! width = 6.0
//! height = 3.0
//! style = "modern"
//!
//! [[objects]]
//! id = "sofa"
//! source_url = "models/sofa.obj"
//! material_url = "models/sofa.mtl"
//! scale = 1.5
//! position = [2.0, 0.0, -1.0]
//! rotation = [0.0, 90.0, 0.0]
//! ```

use crate::context::SceneContext;
use crate::descriptor::{ModelDescriptor, Scale};
use crate::registry::RoomSource;
use crate::room::{RoomParams, RoomStyle};
use plinth_core::{round_to, ObjectId, PlinthError, Result, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub scene: CompositionMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionMeta {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// The room: either a model to load or dimensions to generate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate: Option<RoomParams>,
}

/// One placed model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    #[serde(flatten)]
    pub model: ModelDescriptor,
    #[serde(default)]
    pub scale: Scale,
    /// Defaults to the placement offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    /// Degrees, XYZ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
}

impl ObjectEntry {
    pub fn new(model: ModelDescriptor) -> Self {
        Self {
            model,
            scale: Scale::default(),
            position: None,
            rotation: None,
        }
    }
}

impl Composition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scene: CompositionMeta {
                name: name.into(),
                version: default_version(),
                description: None,
            },
            room: None,
            objects: Vec::new(),
        }
    }

    /// A small example written by `plinth init`
    pub fn starter(name: impl Into<String>) -> Self {
        let mut composition = Self::new(name);
        composition.scene.description = Some("Starter composition".to_string());
        composition.room = Some(RoomEntry {
            source_url: None,
            material_url: None,
            format: None,
            scale: Scale::default(),
            generate: Some(RoomParams::new(8.0, 6.0, 3.0, RoomStyle::Modern)),
        });
        composition.objects.push(ObjectEntry {
            position: Some(Vec3::new(0.0, 0.5, 0.0)),
            ..ObjectEntry::new(ModelDescriptor::default().with_id("crate").with_name("Crate"))
        });
        composition
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Capture what a scene currently holds
    pub fn from_scene(scene: &SceneContext, name: impl Into<String>) -> Self {
        let mut composition = Self::new(name);
        let registry = scene.registry();

        composition.room = registry.room().map(|room| match &room.source {
            RoomSource::Generated(params) => RoomEntry {
                source_url: None,
                material_url: None,
                format: None,
                scale: Scale::default(),
                generate: Some(*params),
            },
            RoomSource::Loaded => RoomEntry {
                source_url: room.object.descriptor.source_url.clone(),
                material_url: room.object.descriptor.material_url.clone(),
                format: room.object.descriptor.format.clone(),
                scale: Scale::PerAxis(room.object.transform.scale),
                generate: None,
            },
        });

        composition.objects = registry
            .objects()
            .iter()
            .map(|object| {
                let degrees = object.transform.rotation_degrees();
                ObjectEntry {
                    model: object.descriptor.clone(),
                    scale: Scale::PerAxis(object.transform.scale),
                    position: Some(object.transform.position),
                    rotation: Some(Vec3::new(
                        round_to(degrees.x, 3),
                        round_to(degrees.y, 3),
                        round_to(degrees.z, 3),
                    )),
                }
            })
            .collect();
        composition
    }

    /// Load everything into `scene`, waiting up to `timeout` for the loads.
    /// Returns the placed object ids in file order.
    pub fn apply(&self, scene: &mut SceneContext, timeout: Duration) -> Result<Vec<ObjectId>> {
        if let Some(room) = &self.room {
            match (&room.generate, &room.source_url) {
                (Some(params), _) => scene.generate_room(*params)?,
                (None, Some(url)) => {
                    scene.load_room(url.clone(), room.material_url.clone(), room.scale);
                }
                (None, None) => {
                    return Err(PlinthError::Config(
                        "room needs either source_url or generate".to_string(),
                    ))
                }
            }
        }

        // Ids are fixed up front so each entry can find its object afterwards
        let mut taken = HashSet::new();
        let mut requested = Vec::with_capacity(self.objects.len());
        for entry in &self.objects {
            let mut model = entry.model.clone();
            let wanted = model.id.take().unwrap_or_else(ObjectId::generate);
            if wanted.is_room() {
                return Err(PlinthError::Config(format!(
                    "object id '{}' is reserved for the room",
                    wanted
                )));
            }
            let id = (1..)
                .map(|n| if n == 1 { wanted.clone() } else { wanted.with_suffix(n) })
                .find(|candidate| taken.insert(candidate.clone()))
                .unwrap_or_else(ObjectId::generate);
            model.id = Some(id.clone());
            scene.request_load(model, entry.scale);
            requested.push(id);
        }

        let placed: HashMap<ObjectId, ObjectId> = scene.finish_loads(timeout)?.into_iter().collect();

        let mut ids = Vec::with_capacity(requested.len());
        for (entry, id) in self.objects.iter().zip(requested) {
            let id = placed
                .get(&id)
                .cloned()
                .ok_or_else(|| PlinthError::ObjectNotFound(id.to_string()))?;
            if let Some(position) = entry.position {
                scene.set_position(&id, position)?;
            }
            if let Some(degrees) = entry.rotation {
                scene.set_rotation_of(&id, degrees)?;
            }
            ids.push(id);
        }
        log::info!(
            "Composed '{}': {} objects{}",
            self.scene.name,
            ids.len(),
            if self.room.is_some() { " and a room" } else { "" }
        );
        Ok(ids)
    }
}

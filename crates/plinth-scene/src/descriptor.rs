//! Model descriptors and scale requests

use plinth_core::{ObjectId, PlinthError, Result, Vec3};
use plinth_import::SourceFormat;
use serde::{Deserialize, Serialize};

/// Generic display name for objects whose source gives none
pub const DEFAULT_MODEL_NAME: &str = "Model";

/// Describes a model to place: where to fetch it and how to label it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Model location; without one a default cube is synthesized
    #[serde(default, alias = "modelUrl", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Optional MTL sidecar for OBJ models
    #[serde(default, alias = "mtlUrl", skip_serializing_if = "Option::is_none")]
    pub material_url: Option<String>,
    /// Explicit format name, overrides the URL extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ModelDescriptor {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: Some(source_url.into()),
            ..Default::default()
        }
    }

    /// Descriptor for the room slot
    pub fn room(source_url: impl Into<String>) -> Self {
        Self::new(source_url).with_id(ObjectId::room()).with_name("Room")
    }

    pub fn with_id(mut self, id: impl Into<ObjectId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_material(mut self, material_url: impl Into<String>) -> Self {
        self.material_url = Some(material_url.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn is_room(&self) -> bool {
        self.id.as_ref().is_some_and(ObjectId::is_room)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }

    /// Format to decode with, `None` when there is no source to decode
    pub fn resolved_format(&self) -> Option<SourceFormat> {
        let url = self.source_url.as_deref()?;
        Some(SourceFormat::resolve(self.format.as_deref(), url))
    }
}

/// A uniform or per-axis scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scale {
    Uniform(f32),
    PerAxis(Vec3),
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Uniform(1.0)
    }
}

impl Scale {
    /// Resolve into per-axis factors. With `force_uniform`, a per-axis
    /// request collapses to the mean of its three values.
    ///
    /// Fails when any resulting factor is not a finite positive number.
    pub fn resolve(&self, force_uniform: bool) -> Result<Vec3> {
        let factors = match *self {
            Scale::Uniform(s) => Vec3::splat(s),
            Scale::PerAxis(v) => {
                check_positive(v)?;
                if force_uniform {
                    Vec3::splat((v.x + v.y + v.z) / 3.0)
                } else {
                    v
                }
            }
        };
        check_positive(factors)?;
        Ok(factors)
    }

    /// Per-axis factors as given
    pub fn to_vec3(&self) -> Result<Vec3> {
        self.resolve(false)
    }
}

fn check_positive(v: Vec3) -> Result<()> {
    if v.is_finite() && v.cmpgt(Vec3::ZERO).all() {
        Ok(())
    } else {
        Err(PlinthError::InvalidTransform(format!(
            "scale must be greater than 0 on every axis, got {}",
            v
        )))
    }
}

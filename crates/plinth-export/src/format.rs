//! Export targets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Gltf,
    Obj,
    Stl,
}

impl ExportFormat {
    /// Parse a user-supplied name; anything unrecognized exports as glTF
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown export format '{}', using gltf", name);
            Self::Gltf
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gltf => "gltf",
            Self::Obj => "obj",
            Self::Stl => "stl",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Gltf => "scene.gltf",
            Self::Obj => "scene.obj",
            Self::Stl => "scene.stl",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Gltf => "model/gltf+json",
            Self::Obj | Self::Stl => "text/plain",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gltf" => Ok(Self::Gltf),
            "obj" => Ok(Self::Obj),
            "stl" => Ok(Self::Stl),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

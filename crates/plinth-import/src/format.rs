//! Source format resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three model families the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Polygon mesh with an optional MTL sidecar
    Obj,
    /// glTF 2.0, JSON or binary
    Gltf,
    /// Raw triangle mesh
    Stl,
}

impl SourceFormat {
    /// Infer from a URL or path extension, ignoring query string, fragment and case
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        ext.parse().ok()
    }

    /// Explicit format wins, then the extension, then OBJ
    pub fn resolve(explicit: Option<&str>, url: &str) -> Self {
        if let Some(name) = explicit {
            match name.parse() {
                Ok(format) => return format,
                Err(_) => log::warn!("Unknown model format '{}', inferring from '{}'", name, url),
            }
        }
        Self::from_url(url).unwrap_or_else(|| {
            log::debug!("No known extension on '{}', loading as OBJ", url);
            Self::Obj
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Gltf => "gltf",
            Self::Stl => "stl",
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "obj" => Ok(Self::Obj),
            "gltf" | "glb" => Ok(Self::Gltf),
            "stl" => Ok(Self::Stl),
            other => Err(format!("unknown model format: {}", other)),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_extensions() {
        assert_eq!(SourceFormat::from_url("chair.OBJ"), Some(SourceFormat::Obj));
        assert_eq!(SourceFormat::from_url("/m/sofa.glb"), Some(SourceFormat::Gltf));
        assert_eq!(
            SourceFormat::from_url("https://cdn.example.com/a/b.gltf?sig=1#x"),
            Some(SourceFormat::Gltf)
        );
        assert_eq!(SourceFormat::from_url("part.stl"), Some(SourceFormat::Stl));
        assert_eq!(SourceFormat::from_url("https://example.com.v2/model"), None);
        assert_eq!(SourceFormat::from_url("scan.ply"), None);
    }

    #[test]
    fn test_explicit_format_wins() {
        assert_eq!(SourceFormat::resolve(Some("stl"), "thing.obj"), SourceFormat::Stl);
        assert_eq!(SourceFormat::resolve(Some("GLB"), "thing"), SourceFormat::Gltf);
    }

    #[test]
    fn test_unknown_falls_back_to_obj() {
        assert_eq!(SourceFormat::resolve(None, "scan.ply"), SourceFormat::Obj);
        assert_eq!(SourceFormat::resolve(None, "no_extension"), SourceFormat::Obj);
        assert_eq!(SourceFormat::resolve(Some("fbx"), "scan.xyz"), SourceFormat::Obj);
        assert_eq!(SourceFormat::resolve(Some("fbx"), "room.stl"), SourceFormat::Stl);
    }
}

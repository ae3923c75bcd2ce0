//! Format-dispatching model loader

use crate::fetch::{Fetcher, SourceLocation};
use crate::format::SourceFormat;
use crate::gltf_import::import_gltf;
use crate::obj_import::{import_obj, MaterialLibrary};
use crate::stl_import::import_stl;
use crate::types::ImportedModel;
use plinth_core::{ContentHash, PlinthError, Result};

/// What to load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// Used in log lines, usually the object id
    pub label: String,
    pub source_url: String,
    pub material_url: Option<String>,
    pub format: SourceFormat,
}

/// Fetches and decodes models. Blocking; run it off the frame thread.
#[derive(Clone, Default)]
pub struct ModelLoader {
    fetcher: Fetcher,
}

impl ModelLoader {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Load a model. A broken material sidecar only costs the materials;
    /// anything wrong with the model itself is an error.
    pub fn load(&self, request: &LoadRequest) -> Result<ImportedModel> {
        log::info!(
            "Loading {} as {} from {}",
            request.label,
            request.format,
            request.source_url
        );

        let materials = match (&request.material_url, request.format) {
            (Some(url), SourceFormat::Obj) => self.load_sidecar(&request.label, url),
            (Some(_), format) => {
                log::debug!("Ignoring material sidecar for {} model {}", format, request.label);
                None
            }
            (None, _) => None,
        };

        let bytes = self.fetcher.fetch(&request.source_url)?;
        let hash = ContentHash::from_bytes(&bytes);

        let mut model = match request.format {
            SourceFormat::Obj => import_obj(&bytes, materials.as_ref())?,
            SourceFormat::Stl => import_stl(&bytes)?,
            SourceFormat::Gltf => {
                let location = SourceLocation::classify(&request.source_url);
                import_gltf(&bytes, location.local_path())?
            }
        };

        if model.is_empty() {
            return Err(PlinthError::Import(format!(
                "{} contains no triangles",
                request.source_url
            )));
        }

        model.source_hash = Some(hash);
        log::debug!(
            "Decoded {}: {} parts, {} triangles, content {}",
            request.label,
            model.parts.len(),
            model.triangle_count(),
            hash
        );
        Ok(model)
    }

    fn load_sidecar(&self, label: &str, url: &str) -> Option<MaterialLibrary> {
        let parsed = self
            .fetcher
            .fetch(url)
            .and_then(|bytes| MaterialLibrary::parse(&bytes));
        match parsed {
            Ok(lib) => {
                log::debug!("Material library for {}: {} materials", label, lib.len());
                Some(lib)
            }
            Err(e) => {
                log::warn!(
                    "Material sidecar for {} failed to load, continuing without materials: {}",
                    label,
                    e
                );
                None
            }
        }
    }
}

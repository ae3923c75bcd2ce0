//! Serialized export output

use crate::format::ExportFormat;
use plinth_core::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A finished export: file name, MIME type and contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ExportDocument {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            file_name: format.file_name().to_string(),
            mime: format.mime().to_string(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Contents as text; every format here is textual
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Write into `dir` under [`Self::file_name`]. The data goes to a
    /// `.part` file first and is renamed into place once complete.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let target = dir.join(&self.file_name);
        let staging = dir.join(format!("{}.part", self.file_name));

        if let Err(e) = fs::write(&staging, &self.bytes) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        log::info!("Wrote {} ({} bytes)", target.display(), self.bytes.len());
        Ok(target)
    }
}

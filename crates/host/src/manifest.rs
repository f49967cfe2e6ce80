//! Packet manifest for metadata and file locations.

use std::path::{Path, PathBuf};

use questpack_core::QuestContent;
use serde::{Deserialize, Serialize};

use crate::error::{PacketError, Result};

/// Default manifest file name.
pub const MANIFEST_NAME: &str = "packet.json";

/// Packet manifest containing metadata and file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketManifest {
    /// Packet metadata.
    pub packet: PacketMetadata,

    /// Path to a quest content table (relative to the manifest), read by
    /// `validate` and `simulate`. The component carries its own compiled-in
    /// table; this file is never passed to it nor compared against it.
    #[serde(default)]
    pub content: Option<String>,
}

/// Packet metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketMetadata {
    /// Packet name.
    pub name: String,

    /// Packet version.
    pub version: String,

    /// Packet description.
    #[serde(default)]
    pub description: Option<String>,

    /// Packet author.
    #[serde(default)]
    pub author: Option<String>,

    /// Path to the WASM component (relative to manifest).
    #[serde(default = "default_wasm_path")]
    pub wasm: String,
}

fn default_wasm_path() -> String {
    "packet.wasm".to_string()
}

impl PacketManifest {
    /// Loads a manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PacketError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a manifest from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self =
            serde_json::from_str(json).map_err(|e| PacketError::ManifestError(e.to_string()))?;

        if manifest.packet.name.trim().is_empty() {
            return Err(PacketError::ManifestError(
                "packet.name must not be empty".to_string(),
            ));
        }

        Ok(manifest)
    }

    /// Converts the manifest to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PacketError::ManifestError(e.to_string()))
    }

    /// Creates a minimal manifest with just name and version.
    pub fn minimal(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            packet: PacketMetadata::new(name, version),
            content: None,
        }
    }

    /// Sets the content table path.
    pub fn with_content(mut self, path: impl Into<String>) -> Self {
        self.content = Some(path.into());
        self
    }

    /// Resolves the component path against the manifest directory.
    pub fn wasm_path(&self, manifest_dir: &Path) -> PathBuf {
        manifest_dir.join(&self.packet.wasm)
    }

    /// Resolves the content table path against the manifest directory.
    pub fn content_path(&self, manifest_dir: &Path) -> Option<PathBuf> {
        self.content.as_ref().map(|path| manifest_dir.join(path))
    }

    /// Loads the content table, or the built-in one when none is declared.
    pub fn load_content(&self, manifest_dir: &Path) -> Result<QuestContent> {
        match self.content_path(manifest_dir) {
            Some(path) => Ok(QuestContent::from_file(&path)?),
            None => Ok(QuestContent::default()),
        }
    }
}

impl PacketMetadata {
    /// Creates new packet metadata.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            author: None,
            wasm: default_wasm_path(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

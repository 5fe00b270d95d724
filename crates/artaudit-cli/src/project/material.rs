//! Material documents (`*.mat.json`).
//!
//! ```json
//! {
//!   "name": "Crate",
//!   "shader": "Standard",
//!   "textures": { "_MainTex": "Textures/crate_albedo.png", "_OcclusionMap": null },
//!   "floats": { "_Metallic": 0.5 }
//! }
//! ```
//!
//! Texture paths are relative to the document's directory.

use super::{probe_texture, Project, ProjectError};
use artaudit_lint::{MaterialHandle, MaterialStore};
use artaudit_rules::{MaterialMetadata, SlotBinding, TextureSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File suffix of material documents.
pub const MATERIAL_EXTENSION: &str = ".mat.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialDocument {
    pub name: String,
    #[serde(default)]
    pub shader: String,
    /// Texture property -> texture path; `null` marks an unbound slot.
    #[serde(default)]
    pub textures: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub floats: BTreeMap<String, f32>,
}

impl MaterialDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: "Standard".to_string(),
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, property: impl Into<String>, path: impl Into<String>) -> Self {
        self.textures.insert(property.into(), Some(path.into()));
        self
    }

    pub fn with_float(mut self, property: impl Into<String>, value: f32) -> Self {
        self.floats.insert(property.into(), value);
        self
    }

    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = fs::read_to_string(path).map_err(|e| ProjectError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| ProjectError::json(path, e))
    }

    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ProjectError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ProjectError::json(path, e))?;
        fs::write(path, json).map_err(|e| ProjectError::io(path, e))
    }

    /// Bound texture path of a property, if any.
    pub fn texture(&self, property: &str) -> Option<&str> {
        self.textures.get(property).and_then(|t| t.as_deref())
    }

    /// Builds evaluator metadata, probing each bound slot texture on disk.
    ///
    /// `document_path` is the document's filesystem path; texture paths
    /// resolve against its directory.
    pub fn metadata(&self, asset_path: &str, document_path: &Path) -> MaterialMetadata {
        let base = document_path.parent().unwrap_or(Path::new(""));
        let mut metadata = MaterialMetadata::new(asset_path);

        for slot in TextureSlot::ALL {
            let Some(texture_path) = self.texture(slot.texture_property()) else {
                continue;
            };
            let resolved = base.join(texture_path);
            let info = probe_texture(&resolved);
            if info.is_none() {
                tracing::warn!(
                    "{}: {} texture '{}' could not be probed",
                    asset_path,
                    slot.label(),
                    resolved.display()
                );
            }

            metadata = metadata.with_binding(SlotBinding {
                slot,
                texture_name: texture_name(texture_path),
                texture_path: texture_path.to_string(),
                info,
            });
        }

        metadata
    }
}

fn texture_name(texture_path: &str) -> String {
    Path::new(texture_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| texture_path.to_string())
}

impl MaterialHandle for MaterialDocument {
    fn clear_texture(&mut self, property: &str) -> bool {
        self.textures
            .get_mut(property)
            .and_then(Option::take)
            .is_some()
    }

    fn set_float(&mut self, property: &str, value: f32) {
        self.floats.insert(property.to_string(), value);
    }
}

/// Material store backed by the asset tree.
#[derive(Debug, Clone)]
pub struct ProjectMaterials {
    root: PathBuf,
}

impl ProjectMaterials {
    pub fn new(project: &Project) -> Self {
        Self {
            root: project.root().to_path_buf(),
        }
    }
}

impl MaterialStore for ProjectMaterials {
    type Material = MaterialDocument;
    type Error = ProjectError;

    fn load(&mut self, asset_path: &str) -> Result<MaterialDocument, ProjectError> {
        MaterialDocument::load(&self.root.join(asset_path))
    }

    fn save(&mut self, asset_path: &str, material: &MaterialDocument) -> Result<(), ProjectError> {
        material.save(&self.root.join(asset_path))
    }
}

//! Asset metadata consumed by the evaluator.
//!
//! The host gathers these records (from disk, from an importer, ...) and the
//! evaluator only ever reads them.

use crate::settings::ModelImportSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class of asset a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Material,
    Texture,
    Model,
    Audio,
}

impl AssetKind {
    /// All asset kinds, in audit order.
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Material,
        AssetKind::Texture,
        AssetKind::Model,
        AssetKind::Audio,
    ];
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetKind::Material => "material",
            AssetKind::Texture => "texture",
            AssetKind::Model => "model",
            AssetKind::Audio => "audio",
        };
        f.write_str(name)
    }
}

/// Material texture slots inspected by the small-map heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureSlot {
    Albedo,
    Metallic,
    Roughness,
    Occlusion,
}

impl TextureSlot {
    /// All slots, in evaluation order.
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::Albedo,
        TextureSlot::Metallic,
        TextureSlot::Roughness,
        TextureSlot::Occlusion,
    ];

    /// Material property holding the slot's texture.
    pub fn texture_property(self) -> &'static str {
        match self {
            TextureSlot::Albedo => "_MainTex",
            TextureSlot::Metallic => "_MetallicGlossMap",
            TextureSlot::Roughness => "_RoughnessMap",
            TextureSlot::Occlusion => "_OcclusionMap",
        }
    }

    /// Human-readable map name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            TextureSlot::Albedo => "Albedo",
            TextureSlot::Metallic => "Metallic",
            TextureSlot::Roughness => "Roughness",
            TextureSlot::Occlusion => "Occlusion",
        }
    }

    /// Looks up the slot bound to a material texture property.
    pub fn from_property(property: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.texture_property() == property)
    }
}

/// Probed facts about a texture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    /// Size of the source file in bytes.
    pub file_size: u64,
    /// Normalized extension, lowercase with a leading dot (".png").
    pub extension: String,
}

/// A texture bound to a material slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotBinding {
    pub slot: TextureSlot,
    /// Texture name (file stem).
    pub texture_name: String,
    /// Texture path relative to the asset root.
    pub texture_path: String,
    /// `None` when the texture file could not be probed.
    pub info: Option<TextureInfo>,
}

/// A material and the textures bound to its slots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialMetadata {
    /// Material path relative to the asset root.
    pub path: String,
    pub bindings: Vec<SlotBinding>,
}

impl MaterialMetadata {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bindings: Vec::new(),
        }
    }

    /// Builder method to bind a texture to a slot.
    pub fn with_binding(mut self, binding: SlotBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Returns the binding for a slot, if any.
    pub fn binding(&self, slot: TextureSlot) -> Option<&SlotBinding> {
        self.bindings.iter().find(|b| b.slot == slot)
    }
}

/// A texture about to be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureImport {
    pub path: String,
    /// File name without extension.
    pub file_stem: String,
    /// Normalized extension (".png").
    pub extension: String,
    /// `None` when the image dimensions could not be read.
    pub dimensions: Option<(u32, u32)>,
}

impl TextureImport {
    /// Builds the record from a path, leaving dimensions unknown.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let (file_stem, extension) = split_path(&path);
        Self {
            path,
            file_stem,
            extension,
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }
}

/// Per-mesh statistics of an imported model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshStats {
    pub name: String,
    pub triangle_count: u32,
    pub vertex_count: u32,
    /// Whether the mesh carries a second UV channel.
    pub has_uv2: bool,
}

/// A model about to be imported.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelImport {
    pub path: String,
    pub settings: ModelImportSettings,
    pub meshes: Vec<MeshStats>,
}

impl ModelImport {
    pub fn new(path: impl Into<String>, settings: ModelImportSettings) -> Self {
        Self {
            path: path.into(),
            settings,
            meshes: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: MeshStats) -> Self {
        self.meshes.push(mesh);
        self
    }
}

/// An audio clip about to be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioImport {
    pub path: String,
    /// Normalized extension (".wav").
    pub extension: String,
}

impl AudioImport {
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let (_, extension) = split_path(&path);
        Self { path, extension }
    }
}

/// Normalizes an extension to lowercase with a leading dot.
///
/// Accepts `"PNG"`, `".png"` or `"png"`. An empty input stays empty.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return String::new();
    }
    format!(".{}", trimmed.to_lowercase())
}

fn split_path(path: &str) -> (String, String) {
    let p = Path::new(path);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let ext = p
        .extension()
        .and_then(|s| s.to_str())
        .map(normalize_extension)
        .unwrap_or_default();
    (stem, ext)
}

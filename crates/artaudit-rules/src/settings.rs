//! Import-setting values.
//!
//! These mirror the knobs an asset importer exposes. The evaluator derives a
//! corrected set of values for each imported asset; the host decides whether
//! to persist them.

use serde::{Deserialize, Serialize};

/// How a texture is interpreted by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureImporterType {
    #[default]
    Default,
    NormalMap,
    Gui,
    Sprite,
    Cursor,
    Cookie,
    Lightmap,
    DirectionalLightmap,
    Shadowmask,
    SingleChannel,
}

/// Texture compression mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureCompression {
    Uncompressed,
    #[default]
    Compressed,
    CompressedHq,
    CompressedLq,
}

/// Texture import settings derived for one texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureImportSettings {
    pub texture_type: TextureImporterType,
    pub srgb: bool,
    pub compression: TextureCompression,
    pub crunched: bool,
    /// Compression quality, 0-100.
    pub compression_quality: u8,
}

impl Default for TextureImportSettings {
    fn default() -> Self {
        Self {
            texture_type: TextureImporterType::Default,
            srgb: true,
            compression: TextureCompression::Compressed,
            crunched: true,
            compression_quality: 50,
        }
    }
}

/// Rig type configured on a model importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    None,
    Legacy,
    #[default]
    Generic,
    Human,
}

/// Mesh compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshCompression {
    #[default]
    Off,
    Low,
    Medium,
    High,
}

/// Model import settings, as stored in a model's import sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelImportSettings {
    pub global_scale: f32,
    pub optimize_mesh_vertices: bool,
    pub generate_secondary_uv: bool,
    pub generate_colliders: bool,
    pub animation_type: AnimationType,
    pub mesh_compression: MeshCompression,
}

impl Default for ModelImportSettings {
    fn default() -> Self {
        Self {
            global_scale: 1.0,
            optimize_mesh_vertices: true,
            generate_secondary_uv: false,
            generate_colliders: false,
            animation_type: AnimationType::Generic,
            mesh_compression: MeshCompression::Off,
        }
    }
}

/// How an audio clip is loaded at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioLoadType {
    #[default]
    DecompressOnLoad,
    CompressedInMemory,
    Streaming,
}

/// Audio codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCompressionFormat {
    Pcm,
    #[default]
    Vorbis,
    Adpcm,
}

/// Sample-rate handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRateSetting {
    #[default]
    PreserveSampleRate,
    OptimizeSampleRate,
    OverrideSampleRate,
}

/// Audio import settings derived for one clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioImportSettings {
    pub load_type: AudioLoadType,
    pub preload_audio_data: bool,
    pub compression_format: AudioCompressionFormat,
    /// Compression quality, 0.0-1.0.
    pub quality: f32,
    pub sample_rate_setting: SampleRateSetting,
}

impl Default for AudioImportSettings {
    fn default() -> Self {
        Self {
            load_type: AudioLoadType::DecompressOnLoad,
            preload_audio_data: true,
            compression_format: AudioCompressionFormat::Vorbis,
            quality: 0.5,
            sample_rate_setting: SampleRateSetting::PreserveSampleRate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_settings_partial_json() {
        let settings: ModelImportSettings =
            serde_json::from_str(r#"{"global_scale": 2.0, "animation_type": "human"}"#).unwrap();
        assert_eq!(settings.global_scale, 2.0);
        assert_eq!(settings.animation_type, AnimationType::Human);
        assert!(settings.optimize_mesh_vertices);
        assert_eq!(settings.mesh_compression, MeshCompression::Off);
    }

    #[test]
    fn test_enum_serialization() {
        let json = serde_json::to_string(&TextureImporterType::NormalMap).unwrap();
        assert_eq!(json, "\"normal_map\"");
        let json = serde_json::to_string(&AudioLoadType::DecompressOnLoad).unwrap();
        assert_eq!(json, "\"decompress_on_load\"");
    }
}

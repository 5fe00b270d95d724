//! Import-setting derivation.
//!
//! Given an imported asset and the rule set, produce the settings the
//! importer should apply. Findings are reported separately by the rules in
//! [`crate::rules`]; derivation never fails.

use crate::rules::AssetData;
use artaudit_rules::{
    AudioCompressionFormat, AudioImport, AudioImportSettings, AudioLoadType, MeshCompression,
    ModelImport, ModelImportSettings, RuleSet, SampleRateSetting, TextureCompression,
    TextureImport, TextureImportSettings, TextureImporterType,
};
use serde::{Deserialize, Serialize};

/// Broad audio classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioProfile {
    Music,
    Sfx,
}

/// Settings derived for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedSettings {
    Texture(TextureImportSettings),
    Model(ModelImportSettings),
    Audio(AudioImportSettings),
}

/// Derives import settings for an asset. Materials have none.
pub fn derive_settings(asset: &AssetData, rules: &RuleSet) -> Option<DerivedSettings> {
    match asset {
        AssetData::Material(_) => None,
        AssetData::Texture(texture) => Some(DerivedSettings::Texture(texture_settings(texture, rules))),
        AssetData::Model(model) => Some(DerivedSettings::Model(model_settings(model, rules))),
        AssetData::Audio(clip) => Some(DerivedSettings::Audio(audio_settings(clip, rules))),
    }
}

/// First matching type rule decides type and sRGB; unmatched textures get
/// the importer defaults.
pub fn texture_settings(texture: &TextureImport, rules: &RuleSet) -> TextureImportSettings {
    let (texture_type, srgb) = match rules.matching_type_rule(&texture.file_stem) {
        Some(rule) => (rule.texture_type, rule.srgb),
        None => (TextureImporterType::Default, true),
    };

    TextureImportSettings {
        texture_type,
        srgb,
        compression: TextureCompression::Compressed,
        crunched: true,
        compression_quality: rules.texture_compression_quality,
    }
}

pub fn model_settings(model: &ModelImport, rules: &RuleSet) -> ModelImportSettings {
    ModelImportSettings {
        global_scale: rules.required_model_scale,
        optimize_mesh_vertices: true,
        generate_secondary_uv: lightmap_uvs_requested(model, rules),
        mesh_compression: MeshCompression::High,
        ..model.settings.clone()
    }
}

/// True when lightmap UVs are generated after import correction.
pub fn lightmap_uvs_requested(model: &ModelImport, rules: &RuleSet) -> bool {
    model.settings.generate_secondary_uv || rules.is_static_geometry(&model.path)
}

/// Classification by the generic music marker alone.
pub fn generic_audio_profile(path: &str, rules: &RuleSet) -> AudioProfile {
    let marker = &rules.audio_markers.music;
    if !marker.is_empty() && path.contains(marker.as_str()) {
        AudioProfile::Music
    } else {
        AudioProfile::Sfx
    }
}

/// Classification by explicit tokens. SFX tokens are checked first.
pub fn token_audio_profile(path: &str, rules: &RuleSet) -> Option<AudioProfile> {
    let has_any = |tokens: &[String]| tokens.iter().any(|t| !t.is_empty() && path.contains(t.as_str()));

    if has_any(&rules.audio_markers.sfx_tokens) {
        Some(AudioProfile::Sfx)
    } else if has_any(&rules.audio_markers.music_tokens) {
        Some(AudioProfile::Music)
    } else {
        None
    }
}

pub fn audio_settings(clip: &AudioImport, rules: &RuleSet) -> AudioImportSettings {
    let generic = match generic_audio_profile(&clip.path, rules) {
        AudioProfile::Music => AudioImportSettings {
            load_type: AudioLoadType::Streaming,
            preload_audio_data: false,
            ..AudioImportSettings::default()
        },
        AudioProfile::Sfx => AudioImportSettings::default(),
    };

    match token_audio_profile(&clip.path, rules) {
        Some(AudioProfile::Sfx) => AudioImportSettings {
            compression_format: AudioCompressionFormat::Adpcm,
            quality: 0.8,
            load_type: AudioLoadType::DecompressOnLoad,
            sample_rate_setting: SampleRateSetting::OptimizeSampleRate,
            ..generic
        },
        Some(AudioProfile::Music) => AudioImportSettings {
            compression_format: AudioCompressionFormat::Vorbis,
            quality: 0.5,
            load_type: AudioLoadType::Streaming,
            sample_rate_setting: SampleRateSetting::PreserveSampleRate,
            ..generic
        },
        None => generic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artaudit_rules::AnimationType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_texture_settings_first_rule_wins() {
        let rules = RuleSet::default();
        // Matches both _Normal and _Albedo; _Normal comes first.
        let texture = TextureImport::from_path("Art/Rock_Normal_Albedo.png");
        let settings = texture_settings(&texture, &rules);
        assert_eq!(settings.texture_type, TextureImporterType::NormalMap);
        assert!(!settings.srgb);
    }

    #[test]
    fn test_texture_settings_defaults_when_unmatched() {
        let rules = RuleSet {
            texture_compression_quality: 75,
            ..RuleSet::default()
        };
        let settings = texture_settings(&TextureImport::from_path("Art/Rock.png"), &rules);
        assert_eq!(
            settings,
            TextureImportSettings {
                texture_type: TextureImporterType::Default,
                srgb: true,
                compression: TextureCompression::Compressed,
                crunched: true,
                compression_quality: 75,
            }
        );
    }

    #[test]
    fn test_texture_type_match_is_case_sensitive() {
        let settings = texture_settings(
            &TextureImport::from_path("Art/rock_normal.png"),
            &RuleSet::default(),
        );
        assert_eq!(settings.texture_type, TextureImporterType::Default);
    }

    #[test]
    fn test_model_settings_corrections() {
        let rules = RuleSet::default();
        let model = ModelImport::new(
            "Art/LevelGeometry/Bridge.fbx",
            ModelImportSettings {
                global_scale: 0.01,
                optimize_mesh_vertices: false,
                animation_type: AnimationType::None,
                ..Default::default()
            },
        );

        let settings = model_settings(&model, &rules);
        assert_eq!(settings.global_scale, 1.0);
        assert!(settings.optimize_mesh_vertices);
        assert!(settings.generate_secondary_uv);
        assert_eq!(settings.mesh_compression, MeshCompression::High);
        assert_eq!(settings.animation_type, AnimationType::None);
    }

    #[test]
    fn test_audio_generic_music_streams() {
        let settings = audio_settings(&AudioImport::from_path("Audio/Music/Theme.ogg"), &RuleSet::default());
        assert_eq!(settings.load_type, AudioLoadType::Streaming);
        assert!(!settings.preload_audio_data);
        assert_eq!(settings.compression_format, AudioCompressionFormat::Vorbis);
    }

    #[test]
    fn test_audio_sfx_token() {
        let settings = audio_settings(&AudioImport::from_path("Audio/Door_SFX.wav"), &RuleSet::default());
        assert_eq!(
            settings,
            AudioImportSettings {
                load_type: AudioLoadType::DecompressOnLoad,
                preload_audio_data: true,
                compression_format: AudioCompressionFormat::Adpcm,
                quality: 0.8,
                sample_rate_setting: SampleRateSetting::OptimizeSampleRate,
            }
        );
    }

    #[test]
    fn test_audio_token_profile_wins_over_generic() {
        // Lives under a Music folder but is explicitly tagged as SFX.
        let clip = AudioImport::from_path("Audio/Music/Stinger_SFX.wav");
        let rules = RuleSet::default();
        assert_eq!(generic_audio_profile(&clip.path, &rules), AudioProfile::Music);
        assert_eq!(token_audio_profile(&clip.path, &rules), Some(AudioProfile::Sfx));

        let settings = audio_settings(&clip, &rules);
        assert_eq!(settings.load_type, AudioLoadType::DecompressOnLoad);
        assert_eq!(settings.compression_format, AudioCompressionFormat::Adpcm);
    }

    #[test]
    fn test_audio_untagged_defaults() {
        let settings = audio_settings(&AudioImport::from_path("Audio/Footstep.wav"), &RuleSet::default());
        assert_eq!(settings, AudioImportSettings::default());
    }

    #[test]
    fn test_derive_settings_dispatch() {
        let rules = RuleSet::default();
        let clip = AudioImport::from_path("Audio/Footstep.wav");
        assert!(matches!(
            derive_settings(&AssetData::Audio(&clip), &rules),
            Some(DerivedSettings::Audio(_))
        ));

        let material = artaudit_rules::MaterialMetadata::new("Materials/Rock.mat.json");
        assert_eq!(derive_settings(&AssetData::Material(&material), &rules), None);
    }
}

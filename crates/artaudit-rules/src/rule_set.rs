//! The rule set driving every audit check.
//!
//! A rule set is loaded once per run and passed by reference to the
//! evaluator. A missing or malformed configuration never aborts a run:
//! [`RuleSet::load_or_default`] logs the problem and falls back to the
//! built-in defaults.

use crate::error::RulesError;
use crate::metadata::{normalize_extension, TextureSlot};
use crate::settings::TextureImporterType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the rule set, looked up at the asset root.
pub const RULES_FILE_NAME: &str = "ProjectValidationRules.json";

/// Assigns a texture type and color space to textures whose name contains
/// a substring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureTypeRule {
    /// Case-sensitive substring of the file stem (e.g. "_Normal").
    pub name_contains: String,
    pub texture_type: TextureImporterType,
    #[serde(default = "default_true")]
    pub srgb: bool,
}

impl TextureTypeRule {
    pub fn new(name_contains: impl Into<String>, texture_type: TextureImporterType, srgb: bool) -> Self {
        Self {
            name_contains: name_contains.into(),
            texture_type,
            srgb,
        }
    }

    /// Returns true if the rule applies to the given file stem.
    pub fn matches(&self, file_stem: &str) -> bool {
        !self.name_contains.is_empty() && file_stem.contains(&self.name_contains)
    }
}

/// Naming convention enforced below a folder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConventionRule {
    /// Folder the rule covers, relative to the asset root ("Art/Characters").
    pub folder_path: String,
    /// Required prefix (e.g. "CH_"); empty means no requirement.
    pub required_prefix: String,
    /// Required suffix (e.g. "_Mesh"); empty means no requirement.
    pub required_suffix: String,
    /// Check directory names instead of file names.
    pub applies_to_folders: bool,
}

impl NamingConventionRule {
    /// Returns true if `name` satisfies the prefix and suffix requirements.
    pub fn accepts(&self, name: &str) -> bool {
        name.starts_with(&self.required_prefix) && name.ends_with(&self.required_suffix)
    }

    /// Returns the portion of `asset_path` below the rule's folder, or `None`
    /// if the path lies outside it.
    pub fn relative_to_folder<'a>(&self, asset_path: &'a str) -> Option<&'a str> {
        let folder = self.folder_path.trim_end_matches('/');
        if folder.is_empty() {
            return Some(asset_path);
        }
        asset_path
            .strip_prefix(folder)
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

/// Minimum byte sizes below which a ≥1024×1024 map looks like a flat
/// placeholder, keyed by source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotThresholds {
    pub png: Option<u64>,
    pub jpeg: Option<u64>,
    pub bmp: Option<u64>,
}

impl SlotThresholds {
    pub const fn new(png: Option<u64>, jpeg: Option<u64>, bmp: Option<u64>) -> Self {
        Self { png, jpeg, bmp }
    }

    /// Returns the threshold for an extension, if that format is covered.
    pub fn for_extension(&self, ext: &str) -> Option<u64> {
        match normalize_extension(ext).as_str() {
            ".png" => self.png,
            ".jpg" | ".jpeg" => self.jpeg,
            ".bmp" => self.bmp,
            _ => None,
        }
    }
}

/// Small-map thresholds per material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmallMapThresholds {
    pub albedo: SlotThresholds,
    pub metallic: SlotThresholds,
    pub roughness: SlotThresholds,
    pub occlusion: SlotThresholds,
}

impl SmallMapThresholds {
    pub fn for_slot(&self, slot: TextureSlot) -> &SlotThresholds {
        match slot {
            TextureSlot::Albedo => &self.albedo,
            TextureSlot::Metallic => &self.metallic,
            TextureSlot::Roughness => &self.roughness,
            TextureSlot::Occlusion => &self.occlusion,
        }
    }
}

const KIB: u64 = 1024;

impl Default for SmallMapThresholds {
    fn default() -> Self {
        let color = SlotThresholds::new(Some(20 * KIB), Some(40 * KIB), Some(16_000 * KIB));
        Self {
            albedo: color,
            metallic: SlotThresholds::new(Some(60 * KIB), Some(60 * KIB), Some(60 * KIB)),
            roughness: color,
            occlusion: color,
        }
    }
}

/// Path substrings that classify audio clips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioMarkers {
    /// Generic marker: any path containing it is treated as music.
    pub music: String,
    /// Explicit SFX tokens ("_SFX", "SFX_").
    pub sfx_tokens: Vec<String>,
    /// Explicit music tokens ("_Music", "Music_").
    pub music_tokens: Vec<String>,
}

impl Default for AudioMarkers {
    fn default() -> Self {
        Self {
            music: "Music".to_string(),
            sfx_tokens: vec!["_SFX".to_string(), "SFX_".to_string()],
            music_tokens: vec!["_Music".to_string(), "Music_".to_string()],
        }
    }
}

/// Declarative thresholds and name-matching rules for an audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    // General
    pub allowed_texture_extensions: Vec<String>,
    pub allowed_audio_extensions: Vec<String>,
    pub model_extensions: Vec<String>,

    // Textures
    pub texture_type_rules: Vec<TextureTypeRule>,
    pub enforce_power_of_two_texture_sizes: bool,
    pub max_texture_size: u32,
    pub texture_compression_quality: u8,
    pub small_map_thresholds: SmallMapThresholds,

    // Models
    pub required_model_scale: f32,
    pub allow_generate_colliders: bool,
    pub max_triangles_for_prop: u32,
    pub max_vertices_for_character: u32,
    pub static_geometry_markers: Vec<String>,
    pub character_marker: String,
    pub prop_marker: String,

    // Audio
    pub audio_markers: AudioMarkers,

    // Naming
    pub naming_rules: Vec<NamingConventionRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            allowed_texture_extensions: strings(&[".png", ".jpg", ".jpeg"]),
            allowed_audio_extensions: strings(&[".wav", ".ogg"]),
            model_extensions: strings(&[".fbx", ".obj", ".blend", ".gltf", ".glb"]),
            texture_type_rules: vec![
                TextureTypeRule::new("_Normal", TextureImporterType::NormalMap, false),
                TextureTypeRule::new("_Mask", TextureImporterType::Default, false),
                TextureTypeRule::new("_Albedo", TextureImporterType::Default, true),
            ],
            enforce_power_of_two_texture_sizes: true,
            max_texture_size: 2048,
            texture_compression_quality: 50,
            small_map_thresholds: SmallMapThresholds::default(),
            required_model_scale: 1.0,
            allow_generate_colliders: false,
            max_triangles_for_prop: 5000,
            max_vertices_for_character: 10000,
            static_geometry_markers: strings(&["StaticProp", "LevelGeometry"]),
            character_marker: "Character".to_string(),
            prop_marker: "Prop".to_string(),
            audio_markers: AudioMarkers::default(),
            naming_rules: Vec::new(),
        }
    }
}

impl RuleSet {
    /// Location of the rule set for an asset root.
    pub fn default_path(asset_root: &Path) -> PathBuf {
        asset_root.join(RULES_FILE_NAME)
    }

    /// Reads a rule set from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RulesError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                RulesError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&content).map_err(|source| RulesError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a rule set from JSON text. Missing fields take default values.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Reads a rule set, substituting the defaults if it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(rules) => {
                tracing::debug!("loaded rule set from {}", path.display());
                rules
            }
            Err(e) => {
                tracing::error!("{}; using the default rule set", e);
                Self::default()
            }
        }
    }

    /// Writes the rule set as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), RulesError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// First texture type rule matching the file stem. Later matches are
    /// never considered.
    pub fn matching_type_rule(&self, file_stem: &str) -> Option<&TextureTypeRule> {
        self.texture_type_rules.iter().find(|r| r.matches(file_stem))
    }

    pub fn allows_texture_extension(&self, ext: &str) -> bool {
        contains_extension(&self.allowed_texture_extensions, ext)
    }

    pub fn allows_audio_extension(&self, ext: &str) -> bool {
        contains_extension(&self.allowed_audio_extensions, ext)
    }

    pub fn is_model_extension(&self, ext: &str) -> bool {
        contains_extension(&self.model_extensions, ext)
    }

    /// Returns true if the path names static level geometry.
    pub fn is_static_geometry(&self, path: &str) -> bool {
        self.static_geometry_markers
            .iter()
            .any(|m| !m.is_empty() && path.contains(m.as_str()))
    }

    /// Returns true if the path names a character (and not a prop).
    pub fn is_character(&self, path: &str) -> bool {
        !self.character_marker.is_empty()
            && path.contains(&self.character_marker)
            && (self.prop_marker.is_empty() || !path.contains(&self.prop_marker))
    }
}

fn contains_extension(list: &[String], ext: &str) -> bool {
    let ext = normalize_extension(ext);
    !ext.is_empty() && list.iter().any(|allowed| normalize_extension(allowed) == ext)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_matching_type_rule_wins() {
        let rules = RuleSet {
            texture_type_rules: vec![
                TextureTypeRule::new("_Normal", TextureImporterType::NormalMap, false),
                TextureTypeRule::new("Rock", TextureImporterType::Sprite, true),
            ],
            ..RuleSet::default()
        };

        let rule = rules.matching_type_rule("Rock_Normal").unwrap();
        assert_eq!(rule.texture_type, TextureImporterType::NormalMap);
        assert!(!rule.srgb);
    }

    #[test]
    fn test_type_rule_is_case_sensitive() {
        let rules = RuleSet::default();
        assert!(rules.matching_type_rule("crate_normal").is_none());
        assert!(rules.matching_type_rule("Crate_Normal").is_some());
    }

    #[test]
    fn test_extension_checks_normalize() {
        let rules = RuleSet::default();
        assert!(rules.allows_texture_extension("PNG"));
        assert!(rules.allows_texture_extension(".jpeg"));
        assert!(!rules.allows_texture_extension(".tga"));
        assert!(rules.allows_audio_extension(".OGG"));
        assert!(!rules.allows_audio_extension(".mp3"));
        assert!(!rules.allows_audio_extension(""));
    }

    #[test]
    fn test_slot_thresholds_by_extension() {
        let thresholds = SmallMapThresholds::default();
        let albedo = thresholds.for_slot(TextureSlot::Albedo);
        assert_eq!(albedo.for_extension(".png"), Some(20 * 1024));
        assert_eq!(albedo.for_extension("JPG"), Some(40 * 1024));
        assert_eq!(albedo.for_extension(".tga"), None);
        let metallic = thresholds.for_slot(TextureSlot::Metallic);
        assert_eq!(metallic.for_extension(".bmp"), Some(60 * 1024));
    }

    #[test]
    fn test_character_detection_excludes_props() {
        let rules = RuleSet::default();
        assert!(rules.is_character("Art/Characters/Hero.fbx"));
        assert!(!rules.is_character("Art/CharacterProps/Sword.fbx"));
        assert!(!rules.is_character("Art/Env/Rock.fbx"));
    }

    #[test]
    fn test_naming_rule_folder_scope() {
        let rule = NamingConventionRule {
            folder_path: "Art/Characters/".to_string(),
            required_prefix: "CH_".to_string(),
            ..Default::default()
        };
        assert_eq!(rule.relative_to_folder("Art/Characters/CH_Hero.fbx"), Some("CH_Hero.fbx"));
        assert_eq!(rule.relative_to_folder("Art/CharactersOld/Hero.fbx"), None);
        assert!(rule.accepts("CH_Hero"));
        assert!(!rule.accepts("Hero"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let rules = RuleSet::from_json(r#"{"max_texture_size": 4096}"#).unwrap();
        assert_eq!(rules.max_texture_size, 4096);
        assert_eq!(rules.allowed_audio_extensions, vec![".wav", ".ogg"]);
        assert_eq!(rules.small_map_thresholds, SmallMapThresholds::default());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let rules = RuleSet::load_or_default(&tmp.path().join(RULES_FILE_NAME));
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn test_load_or_default_on_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(RULES_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(RuleSet::load(&path), Err(RulesError::Parse { .. })));
        assert_eq!(RuleSet::load_or_default(&path), RuleSet::default());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(RULES_FILE_NAME);
        let rules = RuleSet {
            max_triangles_for_prop: 1200,
            ..RuleSet::default()
        };
        rules.save(&path).unwrap();
        assert_eq!(RuleSet::load(&path).unwrap(), rules);
    }
}

//! artaudit rule set library.
//!
//! This crate holds the declarative side of the asset audit: the rule set
//! that drives every check, the import-setting values the evaluator derives,
//! and the asset metadata records supplied by the host.
//!
//! # Example
//!
//! ```
//! use artaudit_rules::{RuleSet, TextureSlot};
//!
//! let rules = RuleSet::default();
//! assert_eq!(rules.max_texture_size, 2048);
//!
//! // Metallic maps at 1024x1024 should weigh at least 60 KiB as PNG.
//! let threshold = rules.small_map_thresholds.for_slot(TextureSlot::Metallic);
//! assert_eq!(threshold.for_extension(".png"), Some(60 * 1024));
//! ```
//!
//! # Modules
//!
//! - [`rule_set`]: The rule set and its loading/fallback behavior
//! - [`settings`]: Import-setting values (texture type, audio load type, ...)
//! - [`metadata`]: Read-only asset metadata consumed by the evaluator
//! - [`error`]: Configuration errors

pub mod error;
pub mod metadata;
pub mod rule_set;
pub mod settings;

pub use error::RulesError;
pub use metadata::{
    normalize_extension, AssetKind, AudioImport, MaterialMetadata, MeshStats, ModelImport,
    SlotBinding, TextureImport, TextureInfo, TextureSlot,
};
pub use rule_set::{
    AudioMarkers, NamingConventionRule, RuleSet, SlotThresholds, SmallMapThresholds,
    TextureTypeRule, RULES_FILE_NAME,
};
pub use settings::{
    AnimationType, AudioCompressionFormat, AudioImportSettings, AudioLoadType,
    MeshCompression, ModelImportSettings, SampleRateSetting, TextureCompression,
    TextureImportSettings, TextureImporterType,
};

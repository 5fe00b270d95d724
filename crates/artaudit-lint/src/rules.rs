//! Audit rule trait and asset-class rule modules.

use crate::report::{Finding, Severity};
use artaudit_rules::{AssetKind, AudioImport, MaterialMetadata, ModelImport, RuleSet, TextureImport};

pub mod audio;
pub mod material;
pub mod model;
pub mod naming;
pub mod texture;

/// Metadata of one asset under audit.
#[derive(Debug, Clone, Copy)]
pub enum AssetData<'a> {
    Material(&'a MaterialMetadata),
    Texture(&'a TextureImport),
    Model(&'a ModelImport),
    Audio(&'a AudioImport),
}

impl AssetData<'_> {
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetData::Material(_) => AssetKind::Material,
            AssetData::Texture(_) => AssetKind::Texture,
            AssetData::Model(_) => AssetKind::Model,
            AssetData::Audio(_) => AssetKind::Audio,
        }
    }

    /// Asset path relative to the asset root.
    pub fn path(&self) -> &str {
        match self {
            AssetData::Material(m) => &m.path,
            AssetData::Texture(t) => &t.path,
            AssetData::Model(m) => &m.path,
            AssetData::Audio(a) => &a.path,
        }
    }
}

/// A rule that inspects asset metadata and reports findings.
///
/// Rules are pure: the same metadata and rule set always yield the same
/// findings.
pub trait AuditRule: Send + Sync {
    /// Unique identifier (e.g., "texture/power-of-two", "model/scale").
    fn id(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Which asset kinds this rule applies to.
    fn applies_to(&self) -> &[AssetKind];

    /// Severity of the findings this rule usually reports.
    fn default_severity(&self) -> Severity;

    /// Run the check, return findings.
    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding>;
}

//! Material texture-slot rules.
//!
//! A high-resolution map whose file is tiny for its size is most likely a
//! flat placeholder (all black metallic, all white occlusion, ...). Byte size
//! per format stands in for pixel inspection.

use crate::remediation::Remediation;
use crate::report::{Finding, Severity};
use crate::rules::{AssetData, AuditRule};
use artaudit_rules::{AssetKind, RuleSet, TextureSlot};

/// Maps below this resolution are never flagged.
pub const MIN_SUSPICIOUS_DIMENSION: u32 = 1024;

/// Returns all material rules.
pub fn all_rules() -> Vec<Box<dyn AuditRule>> {
    TextureSlot::ALL
        .into_iter()
        .map(|slot| Box::new(SmallMapRule { slot }) as Box<dyn AuditRule>)
        .collect()
}

/// Rule: material/small-<slot>-map
/// Flags a ≥1024×1024 map whose file is below the slot's size threshold.
pub struct SmallMapRule {
    pub slot: TextureSlot,
}

impl SmallMapRule {
    fn suggestion(&self) -> &'static str {
        match self.slot {
            TextureSlot::Albedo => {
                "Review the albedo texture; if it is a flat color, replace it with the material's base color."
            }
            TextureSlot::Metallic => {
                "Consider removing metallic map if material is non-metallic, or replacing with a 1x1 black texture."
            }
            TextureSlot::Roughness => {
                "Consider removing roughness map and using the scalar smoothness value, or replacing with a 1x1 flat texture."
            }
            TextureSlot::Occlusion => {
                "Consider removing AO map, or replacing with a 1x1 white texture."
            }
        }
    }

    fn remediation(&self) -> Option<Remediation> {
        match self.slot {
            TextureSlot::Albedo => None,
            TextureSlot::Metallic => Some(Remediation::remove_metallic_map()),
            TextureSlot::Roughness => Some(Remediation::remove_roughness_map()),
            TextureSlot::Occlusion => Some(Remediation::remove_occlusion_map()),
        }
    }
}

impl AuditRule for SmallMapRule {
    fn id(&self) -> &'static str {
        match self.slot {
            TextureSlot::Albedo => "material/small-albedo-map",
            TextureSlot::Metallic => "material/small-metallic-map",
            TextureSlot::Roughness => "material/small-roughness-map",
            TextureSlot::Occlusion => "material/small-occlusion-map",
        }
    }

    fn description(&self) -> &'static str {
        match self.slot {
            TextureSlot::Albedo => "Albedo map is suspiciously small for its resolution",
            TextureSlot::Metallic => "Metallic map is suspiciously small for its resolution",
            TextureSlot::Roughness => "Roughness map is suspiciously small for its resolution",
            TextureSlot::Occlusion => "Occlusion map is suspiciously small for its resolution",
        }
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Material]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Material(material) = asset else {
            return vec![];
        };
        let Some(binding) = material.binding(self.slot) else {
            return vec![];
        };
        let Some(info) = &binding.info else {
            tracing::debug!(
                "skipping {} slot of {}: texture '{}' could not be probed",
                self.slot.label(),
                material.path,
                binding.texture_path
            );
            return vec![];
        };

        if info.width < MIN_SUSPICIOUS_DIMENSION || info.height < MIN_SUSPICIOUS_DIMENSION {
            return vec![];
        }

        let threshold = rules
            .small_map_thresholds
            .for_slot(self.slot)
            .for_extension(&info.extension);
        match threshold {
            Some(min_bytes) if info.file_size < min_bytes => {}
            _ => return vec![],
        }

        let finding = Finding::new(
            self.id(),
            &material.path,
            self.default_severity(),
            format!(
                "{} map '{}' ({}x{}) is suspiciously small ({}KB) for its resolution. Likely uniform/empty.",
                self.slot.label(),
                binding.texture_name,
                info.width,
                info.height,
                info.file_size / 1024
            ),
            self.suggestion(),
        );

        vec![match self.remediation() {
            Some(fix) => finding.with_fix(fix),
            None => finding,
        }]
    }
}

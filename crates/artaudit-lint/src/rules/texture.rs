//! Texture import rules.

use crate::report::{Finding, Severity};
use crate::rules::{AssetData, AuditRule};
use artaudit_rules::{AssetKind, RuleSet};

/// Returns all texture rules.
pub fn all_rules() -> Vec<Box<dyn AuditRule>> {
    vec![
        // Error-level rules
        Box::new(ExtensionRule),
        // Warning-level rules
        Box::new(PowerOfTwoRule),
        Box::new(MaxSizeRule),
        Box::new(NoTypeRule),
    ]
}

fn is_power_of_two(n: u32) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Rule: texture/extension
/// Texture source format is not in the allowed list.
pub struct ExtensionRule;

impl AuditRule for ExtensionRule {
    fn id(&self) -> &'static str {
        "texture/extension"
    }

    fn description(&self) -> &'static str {
        "Texture source format is not allowed"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Texture]
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Texture(texture) = asset else {
            return vec![];
        };
        if rules.allows_texture_extension(&texture.extension) {
            return vec![];
        }

        let allowed = rules.allowed_texture_extensions.join(", ");
        vec![Finding::new(
            self.id(),
            &texture.path,
            self.default_severity(),
            format!(
                "Texture '{}' is not in an allowed format ({}).",
                texture.path, allowed
            ),
            format!("Re-export the texture as one of: {}.", allowed),
        )]
    }
}

/// Rule: texture/power-of-two
/// Width or height is not a power of two.
pub struct PowerOfTwoRule;

impl AuditRule for PowerOfTwoRule {
    fn id(&self) -> &'static str {
        "texture/power-of-two"
    }

    fn description(&self) -> &'static str {
        "Texture dimensions are not power-of-two"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Texture]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Texture(texture) = asset else {
            return vec![];
        };
        if !rules.enforce_power_of_two_texture_sizes {
            return vec![];
        }
        let Some((width, height)) = texture.dimensions else {
            return vec![];
        };

        if is_power_of_two(width) && is_power_of_two(height) {
            return vec![];
        }

        vec![Finding::new(
            self.id(),
            &texture.path,
            self.default_severity(),
            format!(
                "Texture '{}' size ({}x{}) is not a power of two. This can lead to inefficient compression and mipmap generation.",
                texture.path, width, height
            ),
            "Resize to 256, 512, 1024, 2048, etc.",
        )]
    }
}

/// Rule: texture/max-size
/// Width or height exceeds the configured maximum.
pub struct MaxSizeRule;

impl AuditRule for MaxSizeRule {
    fn id(&self) -> &'static str {
        "texture/max-size"
    }

    fn description(&self) -> &'static str {
        "Texture exceeds the maximum allowed size"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Texture]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Texture(texture) = asset else {
            return vec![];
        };
        let Some((width, height)) = texture.dimensions else {
            return vec![];
        };

        if width <= rules.max_texture_size && height <= rules.max_texture_size {
            return vec![];
        }

        vec![Finding::new(
            self.id(),
            &texture.path,
            self.default_severity(),
            format!(
                "Texture '{}' size ({}x{}) exceeds max allowed size ({}).",
                texture.path, width, height, rules.max_texture_size
            ),
            format!(
                "Downscale the source to at most {}x{}.",
                rules.max_texture_size, rules.max_texture_size
            ),
        )]
    }
}

/// Rule: texture/no-type-rule
/// No texture type rule matches the file name; importer defaults apply.
pub struct NoTypeRule;

impl AuditRule for NoTypeRule {
    fn id(&self) -> &'static str {
        "texture/no-type-rule"
    }

    fn description(&self) -> &'static str {
        "No texture type rule matches the file name"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Texture]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Texture(texture) = asset else {
            return vec![];
        };
        if rules.matching_type_rule(&texture.file_stem).is_some() {
            return vec![];
        }

        vec![Finding::new(
            self.id(),
            &texture.path,
            self.default_severity(),
            format!(
                "No specific texture type rule found for '{}'. Defaulting to 'Default' type and sRGB true.",
                texture.path
            ),
            "Rename the texture to follow a known suffix (e.g. _Normal, _Mask) or add a texture type rule.",
        )]
    }
}

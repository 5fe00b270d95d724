//! Audio import rules.

use crate::import::{generic_audio_profile, token_audio_profile};
use crate::report::{Finding, Severity};
use crate::rules::{AssetData, AuditRule};
use artaudit_rules::{AssetKind, RuleSet};

/// Returns all audio rules.
pub fn all_rules() -> Vec<Box<dyn AuditRule>> {
    vec![
        // Error-level rules
        Box::new(ExtensionRule),
        // Info-level rules
        Box::new(AmbiguousProfileRule),
    ]
}

/// Rule: audio/extension
/// Container format is not in the allowed list.
pub struct ExtensionRule;

impl AuditRule for ExtensionRule {
    fn id(&self) -> &'static str {
        "audio/extension"
    }

    fn description(&self) -> &'static str {
        "Audio container format is not allowed"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Audio]
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Audio(clip) = asset else {
            return vec![];
        };
        if rules.allows_audio_extension(&clip.extension) {
            return vec![];
        }

        let allowed = rules.allowed_audio_extensions.join(", ");
        vec![Finding::new(
            self.id(),
            &clip.path,
            self.default_severity(),
            format!(
                "Audio file '{}' is not in an allowed format ({}).",
                clip.path, allowed
            ),
            format!("Convert the clip to one of: {}.", allowed),
        )]
    }
}

/// Rule: audio/ambiguous-profile
/// The path's explicit token contradicts the generic music marker.
pub struct AmbiguousProfileRule;

impl AuditRule for AmbiguousProfileRule {
    fn id(&self) -> &'static str {
        "audio/ambiguous-profile"
    }

    fn description(&self) -> &'static str {
        "Explicit audio token contradicts the folder classification"
    }

    fn applies_to(&self) -> &[AssetKind] {
        &[AssetKind::Audio]
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, asset: &AssetData, rules: &RuleSet) -> Vec<Finding> {
        let AssetData::Audio(clip) = asset else {
            return vec![];
        };
        let Some(token) = token_audio_profile(&clip.path, rules) else {
            return vec![];
        };
        let generic = generic_audio_profile(&clip.path, rules);
        if token == generic {
            return vec![];
        }

        vec![Finding::new(
            self.id(),
            &clip.path,
            self.default_severity(),
            format!(
                "Audio file '{}' is classified as {:?} by its path but tagged {:?}. Using {:?} settings.",
                clip.path, generic, token, token
            ),
            "Move the clip or rename it so folder and tag agree.",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artaudit_rules::AudioImport;

    fn run(rule: &dyn AuditRule, path: &str) -> Vec<Finding> {
        let clip = AudioImport::from_path(path);
        rule.check(&AssetData::Audio(&clip), &RuleSet::default())
    }

    #[test]
    fn test_extension_rule() {
        let findings = run(&ExtensionRule, "Audio/Theme.mp3");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Error);
        assert!(findings[0].message().contains(".wav, .ogg"));

        assert!(run(&ExtensionRule, "Audio/Theme.OGG").is_empty());
    }

    #[test]
    fn test_ambiguous_profile_rule() {
        let findings = run(&AmbiguousProfileRule, "Audio/Music/Stinger_SFX.wav");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Info);

        // Token agrees with the folder.
        assert!(run(&AmbiguousProfileRule, "Audio/Music/Theme_Music.ogg").is_empty());
        // No token at all.
        assert!(run(&AmbiguousProfileRule, "Audio/Music/Theme.ogg").is_empty());
    }
}

//! Remediation applier.
//!
//! Fixable findings carry a [`Remediation`] naming the exact slot and target
//! value, so the applier never inspects message text. The applier does not
//! verify its own effect: callers re-run the audit afterwards.

use crate::report::{Finding, Report};
use artaudit_rules::TextureSlot;
use serde::{Deserialize, Serialize};

/// Scalar material property reset to a fixed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarReset {
    pub property: String,
    pub value: f32,
}

impl ScalarReset {
    pub fn new(property: impl Into<String>, value: f32) -> Self {
        Self {
            property: property.into(),
            value,
        }
    }
}

/// A corrective mutation of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Remediation {
    /// Unbind the slot's texture and optionally reset a scalar.
    RemoveMap {
        slot: TextureSlot,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reset: Option<ScalarReset>,
    },
    /// Set a scalar property.
    SetScalar { property: String, value: f32 },
}

impl Remediation {
    /// Removal of a metallic map; metallic goes to 0.
    pub fn remove_metallic_map() -> Self {
        Remediation::RemoveMap {
            slot: TextureSlot::Metallic,
            reset: Some(ScalarReset::new("_Metallic", 0.0)),
        }
    }

    /// Removal of an occlusion map; strength goes to 1.
    pub fn remove_occlusion_map() -> Self {
        Remediation::RemoveMap {
            slot: TextureSlot::Occlusion,
            reset: Some(ScalarReset::new("_OcclusionStrength", 1.0)),
        }
    }

    /// Removal of a roughness map, leaving scalars untouched.
    pub fn remove_roughness_map() -> Self {
        Remediation::RemoveMap {
            slot: TextureSlot::Roughness,
            reset: None,
        }
    }

    /// Short action label for presentation.
    pub fn label(&self) -> String {
        match self {
            Remediation::RemoveMap { slot, .. } => format!("Clean {} map", slot.label()),
            Remediation::SetScalar { property, value } => format!("Set {} = {}", property, value),
        }
    }
}

/// Write access to one material.
pub trait MaterialHandle {
    /// Unbinds the texture held in a property. Returns false if nothing was bound.
    fn clear_texture(&mut self, property: &str) -> bool;

    /// Sets a scalar property, adding it if absent.
    fn set_float(&mut self, property: &str, value: f32);
}

/// Loads and saves materials by asset path.
pub trait MaterialStore {
    type Material: MaterialHandle;
    type Error: std::fmt::Display;

    fn load(&mut self, asset_path: &str) -> Result<Self::Material, Self::Error>;

    fn save(&mut self, asset_path: &str, material: &Self::Material) -> Result<(), Self::Error>;
}

/// Result of applying one finding's remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    Applied,
    /// The finding carries no remediation.
    Noop,
}

/// Applies a finding's remediation to an already-loaded material.
pub fn apply_fix<M: MaterialHandle + ?Sized>(finding: &Finding, material: &mut M) -> FixOutcome {
    let Some(fix) = finding.fix() else {
        return FixOutcome::Noop;
    };

    match fix {
        Remediation::RemoveMap { slot, reset } => {
            if !material.clear_texture(slot.texture_property()) {
                tracing::debug!(
                    "{} slot of {} was already empty",
                    slot.label(),
                    finding.asset_path()
                );
            }
            if let Some(reset) = reset {
                material.set_float(&reset.property, reset.value);
            }
        }
        Remediation::SetScalar { property, value } => material.set_float(property, *value),
    }

    tracing::info!("{} for {}", fix.label(), finding.asset_path());
    FixOutcome::Applied
}

/// Loads the finding's material from the store, applies the fix, and saves it.
///
/// Findings without a remediation never touch the store.
pub fn fix_finding<S: MaterialStore>(finding: &Finding, store: &mut S) -> Result<FixOutcome, S::Error> {
    if !finding.is_fixable() {
        return Ok(FixOutcome::Noop);
    }
    let mut material = store.load(finding.asset_path())?;
    let outcome = apply_fix(finding, &mut material);
    store.save(finding.asset_path(), &material)?;
    Ok(outcome)
}

/// Outcome of a batch remediation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemediationSummary {
    pub applied: Vec<Finding>,
    pub unresolved: Vec<Finding>,
}

/// Applies every fixable finding in the report.
///
/// Iterates a snapshot of the findings, so callers may rebuild the report
/// while fixes are written. Store failures are logged and the finding stays
/// unresolved.
pub fn apply_all<S: MaterialStore>(report: &Report, store: &mut S) -> RemediationSummary {
    let snapshot: Vec<Finding> = report.findings().to_vec();
    let mut summary = RemediationSummary::default();

    for finding in snapshot {
        match fix_finding(&finding, store) {
            Ok(FixOutcome::Applied) => summary.applied.push(finding),
            Ok(FixOutcome::Noop) => summary.unresolved.push(finding),
            Err(e) => {
                tracing::error!("failed to fix {}: {}", finding.asset_path(), e);
                summary.unresolved.push(finding);
            }
        }
    }

    summary
}

//! Model metadata scaffolding.
//!
//! Every model under the asset root gets a JSON record at
//! `ModelData/<stem>_ModelData.json` next to it. Records are created on first
//! sight and refreshed afterwards; user-authored fields are never
//! overwritten.

use crate::project::{gltf_materials, Project, ProjectError};
use artaudit_rules::{AssetKind, RuleSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Folder created beside each model for its record.
pub const MODEL_DATA_DIR: &str = "ModelData";

/// `last_modified_date` format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("model path has no file name: {0}")]
    NoFileStem(PathBuf),
}

fn default_author() -> String {
    "Unknown".to_string()
}

/// Persistent metadata for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadataRecord {
    /// Nil or missing ids are replaced on the next scaffold.
    #[serde(default)]
    pub model_id: Uuid,
    pub model_name: String,
    pub model_path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub main_albedo_texture: Option<String>,
    #[serde(default)]
    pub is_audited: bool,
    #[serde(default)]
    pub last_modified_date: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub internal_notes: String,
}

impl ModelMetadataRecord {
    pub fn new(model_name: impl Into<String>, model_path: impl Into<String>) -> Self {
        Self {
            model_id: Uuid::new_v4(),
            model_name: model_name.into(),
            model_path: model_path.into(),
            description: String::new(),
            materials: Vec::new(),
            main_albedo_texture: None,
            is_audited: false,
            last_modified_date: String::new(),
            author: default_author(),
            tags: Vec::new(),
            internal_notes: String::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = fs::read_to_string(path).map_err(|e| ProjectError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| ProjectError::json(path, e))
    }

    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ProjectError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ProjectError::json(path, e))?;
        fs::write(path, json).map_err(|e| ProjectError::io(path, e))
    }
}

/// Whether a record was created or refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldOutcome {
    Created(PathBuf),
    Updated(PathBuf),
}

impl ScaffoldOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ScaffoldOutcome::Created(p) | ScaffoldOutcome::Updated(p) => p,
        }
    }
}

/// Results of scaffolding every model under the root.
#[derive(Debug, Default)]
pub struct ScaffoldSummary {
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    /// Model asset path and error message.
    pub failed: Vec<(String, String)>,
}

/// Record location for a model file.
pub fn record_path(model: &Path) -> Result<PathBuf, ScaffoldError> {
    let stem = model
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ScaffoldError::NoFileStem(model.to_path_buf()))?;
    let dir = model.parent().unwrap_or(Path::new(""));
    Ok(dir
        .join(MODEL_DATA_DIR)
        .join(format!("{}_ModelData.json", stem)))
}

/// Creates or refreshes the record of one model.
pub fn scaffold_model(
    project: &Project,
    model: &Path,
    timestamp: &str,
) -> Result<ScaffoldOutcome, ScaffoldError> {
    let path = record_path(model)?;
    let asset_path = project.asset_path(model);

    let existing = if path.exists() {
        Some(ModelMetadataRecord::load(&path)?)
    } else {
        None
    };
    let created = existing.is_none();

    let mut record = existing.unwrap_or_else(|| {
        let name = model
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        ModelMetadataRecord::new(name, asset_path.clone())
    });

    if record.model_id.is_nil() {
        record.model_id = Uuid::new_v4();
    }
    record.model_path = asset_path;
    record.last_modified_date = timestamp.to_string();

    match gltf_materials(model) {
        Ok(materials) => {
            record.main_albedo_texture = materials
                .iter()
                .find_map(|m| m.base_color_texture.clone());
            record.materials = Vec::new();
            for material in materials {
                if !record.materials.contains(&material.name) {
                    record.materials.push(material.name);
                }
            }
        }
        Err(e) => {
            tracing::warn!(
                "materials of {} not collected: {}",
                record.model_path,
                e
            );
        }
    }

    record.save(&path)?;

    if created {
        tracing::info!("created model metadata for {}", record.model_path);
        Ok(ScaffoldOutcome::Created(path))
    } else {
        tracing::info!("updated model metadata for {}", record.model_path);
        Ok(ScaffoldOutcome::Updated(path))
    }
}

/// Scaffolds every model under the root. Failures are collected, not fatal.
pub fn scaffold_all(project: &Project, rules: &RuleSet) -> ScaffoldSummary {
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let mut summary = ScaffoldSummary::default();

    for model in project.files_of_kind(AssetKind::Model, rules) {
        match scaffold_model(project, &model, &timestamp) {
            Ok(ScaffoldOutcome::Created(path)) => summary.created.push(path),
            Ok(ScaffoldOutcome::Updated(path)) => summary.updated.push(path),
            Err(e) => {
                tracing::error!("scaffolding {} failed: {}", model.display(), e);
                summary
                    .failed
                    .push((project.asset_path(&model), e.to_string()));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_record_path() {
        assert_eq!(
            record_path(Path::new("Art/Props/Barrel.fbx")).unwrap(),
            PathBuf::from("Art/Props/ModelData/Barrel_ModelData.json")
        );
    }

    #[test]
    fn test_record_json_field_names() {
        let record = ModelMetadataRecord::new("Barrel", "Art/Barrel.fbx");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["modelName"], "Barrel");
        assert_eq!(json["author"], "Unknown");
        assert_eq!(json["isAudited"], false);
        assert!(json["mainAlbedoTexture"].is_null());
    }

    #[test]
    fn test_create_then_update_preserves_user_fields() {
        let tmp = TempDir::new().unwrap();
        let project = Project::open(tmp.path()).unwrap();
        let model = tmp.path().join("Barrel.fbx");
        fs::write(&model, b"Kaydara FBX Binary").unwrap();

        let created = scaffold_model(&project, &model, "2024-01-01 10:00:00").unwrap();
        assert!(matches!(created, ScaffoldOutcome::Created(_)));

        let mut record = ModelMetadataRecord::load(created.path()).unwrap();
        assert_eq!(record.model_name, "Barrel");
        assert!(record.materials.is_empty());
        record.author = "Ana".to_string();
        record.tags = vec!["prop".to_string()];
        record.is_audited = true;
        record.save(created.path()).unwrap();

        let updated = scaffold_model(&project, &model, "2024-02-02 12:30:00").unwrap();
        assert!(matches!(updated, ScaffoldOutcome::Updated(_)));

        let refreshed = ModelMetadataRecord::load(updated.path()).unwrap();
        assert_eq!(refreshed.model_id, record.model_id);
        assert_eq!(refreshed.author, "Ana");
        assert_eq!(refreshed.tags, vec!["prop".to_string()]);
        assert!(refreshed.is_audited);
        assert_eq!(refreshed.last_modified_date, "2024-02-02 12:30:00");
    }

    #[test]
    fn test_nil_or_missing_id_is_regenerated() {
        let tmp = TempDir::new().unwrap();
        let project = Project::open(tmp.path()).unwrap();
        let model = tmp.path().join("Barrel.fbx");
        fs::write(&model, b"Kaydara FBX Binary").unwrap();
        let path = record_path(&model).unwrap();

        let mut record = ModelMetadataRecord::new("Barrel", "Barrel.fbx");
        record.model_id = Uuid::nil();
        record.description = "Oak barrel".to_string();
        record.save(&path).unwrap();

        scaffold_model(&project, &model, "2024-01-01 10:00:00").unwrap();
        let refreshed = ModelMetadataRecord::load(&path).unwrap();
        assert!(!refreshed.model_id.is_nil());
        assert_eq!(refreshed.description, "Oak barrel");

        fs::write(&path, r#"{ "modelName": "Barrel", "modelPath": "Barrel.fbx" }"#).unwrap();
        let outcome = scaffold_model(&project, &model, "2024-01-01 10:00:00").unwrap();
        assert!(matches!(outcome, ScaffoldOutcome::Updated(_)));
        assert!(!ModelMetadataRecord::load(&path).unwrap().model_id.is_nil());
    }

    #[test]
    fn test_corrupt_record_is_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let project = Project::open(tmp.path()).unwrap();
        let model = tmp.path().join("Barrel.obj");
        fs::write(&model, b"o Barrel").unwrap();

        let path = record_path(&model).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ broken").unwrap();

        assert!(scaffold_model(&project, &model, "2024-01-01 10:00:00").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ broken");
    }

    #[test]
    fn test_scaffold_all_uses_timestamp_format() {
        let tmp = TempDir::new().unwrap();
        let project = Project::open(tmp.path()).unwrap();
        fs::write(tmp.path().join("Rock.blend"), b"BLENDER").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"not a model").unwrap();

        let summary = scaffold_all(&project, &RuleSet::default());
        assert_eq!(summary.created.len(), 1);
        assert!(summary.failed.is_empty());

        let record = ModelMetadataRecord::load(&summary.created[0]).unwrap();
        assert!(
            chrono::NaiveDateTime::parse_from_str(&record.last_modified_date, TIMESTAMP_FORMAT)
                .is_ok()
        );
    }
}

//! Import sidecars: `<asset>.import.json` holds an asset's importer settings.

use super::ProjectError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const SIDECAR_SUFFIX: &str = ".import.json";

pub fn sidecar_path(asset: &Path) -> PathBuf {
    let mut name = asset.file_name().map(OsString::from).unwrap_or_default();
    name.push(SIDECAR_SUFFIX);
    asset.with_file_name(name)
}

/// Reads an asset's sidecar. `Ok(None)` when the asset has none.
pub fn read_sidecar<T: DeserializeOwned>(asset: &Path) -> Result<Option<T>, ProjectError> {
    let path = sidecar_path(asset);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|e| ProjectError::io(&path, e))?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| ProjectError::json(&path, e))
}

/// Writes an asset's sidecar, replacing any previous one.
pub fn write_sidecar<T: Serialize>(asset: &Path, settings: &T) -> Result<PathBuf, ProjectError> {
    let path = sidecar_path(asset);
    let json = serde_json::to_string_pretty(settings).map_err(|e| ProjectError::json(&path, e))?;
    fs::write(&path, json).map_err(|e| ProjectError::io(&path, e))?;
    Ok(path)
}

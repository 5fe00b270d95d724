//! Filesystem host for an asset tree.
//!
//! Walks the asset root, classifies files, and gathers the metadata records
//! the evaluator consumes. Unreadable assets are logged and reported with
//! whatever metadata could be collected; they never abort a scan.

mod material;
mod model;
mod sidecar;
mod texture;

pub use material::{MaterialDocument, ProjectMaterials, MATERIAL_EXTENSION};
pub use model::{gltf_materials, mesh_stats, model_import, GltfMaterial};
pub(crate) use model::image_label;
pub use sidecar::{read_sidecar, sidecar_path, write_sidecar, SIDECAR_SUFFIX};
pub use texture::{probe_texture, texture_import};

use artaudit_lint::AssetData;
use artaudit_rules::{normalize_extension, AssetKind, AudioImport, MaterialMetadata, ModelImport, RuleSet, TextureImport};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File name of the batch audit report, written beside the asset root.
pub const REPORT_FILE_NAME: &str = "AuditReport.json";

/// Image formats treated as textures even when the rule set disallows them.
const IMAGE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".tga", ".bmp", ".psd", ".tif", ".tiff", ".gif", ".exr", ".hdr",
];

/// Audio formats treated as clips even when the rule set disallows them.
const AUDIO_EXTENSIONS: &[&str] = &[".wav", ".ogg", ".mp3", ".aif", ".aiff", ".flac", ".m4a"];

/// Errors from the filesystem host.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("asset root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse glTF {path}: {source}")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
}

impl ProjectError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ProjectError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        ProjectError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Metadata for every asset found under the root, grouped by kind.
#[derive(Debug, Clone, Default)]
pub struct AssetInventory {
    pub materials: Vec<MaterialMetadata>,
    pub textures: Vec<TextureImport>,
    pub models: Vec<ModelImport>,
    pub audio: Vec<AudioImport>,
}

impl AssetInventory {
    /// All assets in audit order: materials, textures, models, audio.
    pub fn assets(&self) -> impl Iterator<Item = AssetData<'_>> {
        self.materials
            .iter()
            .map(AssetData::Material)
            .chain(self.textures.iter().map(AssetData::Texture))
            .chain(self.models.iter().map(AssetData::Model))
            .chain(self.audio.iter().map(AssetData::Audio))
    }

    pub fn len(&self) -> usize {
        self.materials.len() + self.textures.len() + self.models.len() + self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An asset tree on disk.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Opens the asset root. The directory must exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ProjectError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ProjectError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Default location of the rule set.
    pub fn rules_path(&self) -> PathBuf {
        RuleSet::default_path(&self.root)
    }

    /// Batch report location: the asset root's parent directory. Roots
    /// ending in `.` or `..` are resolved first so the parent is real.
    pub fn report_path(&self) -> PathBuf {
        let root = match self.root.components().next_back() {
            Some(Component::Normal(_)) => self.root.clone(),
            _ => std::fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone()),
        };
        match root.parent() {
            Some(parent) => parent.join(REPORT_FILE_NAME),
            None => root.join(REPORT_FILE_NAME),
        }
    }

    /// Resolves an asset path (relative to the root) to a filesystem path.
    pub fn resolve(&self, asset_path: &str) -> PathBuf {
        self.root.join(asset_path)
    }

    /// Asset path of a file under the root, with forward slashes.
    pub fn asset_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Every regular file under the root, sorted, hidden entries skipped.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();

        // Sort for deterministic output
        files.sort();
        files
    }

    /// Files of one asset kind.
    pub fn files_of_kind(&self, kind: AssetKind, rules: &RuleSet) -> Vec<PathBuf> {
        self.files()
            .into_iter()
            .filter(|p| classify(p, rules) == Some(kind))
            .collect()
    }

    /// Gathers metadata for every asset under the root.
    pub fn scan(&self, rules: &RuleSet) -> AssetInventory {
        let mut inventory = AssetInventory::default();

        for path in self.files() {
            match classify(&path, rules) {
                Some(AssetKind::Material) => match MaterialDocument::load(&path) {
                    Ok(doc) => inventory
                        .materials
                        .push(doc.metadata(&self.asset_path(&path), &path)),
                    Err(e) => tracing::warn!("skipping material: {}", e),
                },
                Some(AssetKind::Texture) => inventory.textures.push(texture_import(self, &path)),
                Some(AssetKind::Model) => inventory.models.push(model_import(self, &path)),
                Some(AssetKind::Audio) => inventory
                    .audio
                    .push(AudioImport::from_path(self.asset_path(&path))),
                None => {}
            }
        }

        tracing::info!(
            "scanned {}: {} material(s), {} texture(s), {} model(s), {} audio clip(s)",
            self.root.display(),
            inventory.materials.len(),
            inventory.textures.len(),
            inventory.models.len(),
            inventory.audio.len()
        );
        inventory
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

/// Classifies a file by name. Import sidecars and other JSON documents are
/// not assets.
pub fn classify(path: &Path, rules: &RuleSet) -> Option<AssetKind> {
    let name = path.file_name()?.to_str()?.to_lowercase();
    if name.ends_with(MATERIAL_EXTENSION) {
        return Some(AssetKind::Material);
    }

    let ext = normalize_extension(path.extension()?.to_str()?);
    if rules.is_model_extension(&ext) {
        Some(AssetKind::Model)
    } else if rules.allows_texture_extension(&ext) || IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Texture)
    } else if rules.allows_audio_extension(&ext) || AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Audio)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify() {
        let rules = RuleSet::default();
        let kind = |p: &str| classify(Path::new(p), &rules);

        assert_eq!(kind("Art/Rock.mat.json"), Some(AssetKind::Material));
        assert_eq!(kind("Art/Rock_Albedo.PNG"), Some(AssetKind::Texture));
        assert_eq!(kind("Art/Rock_Albedo.tga"), Some(AssetKind::Texture));
        assert_eq!(kind("Art/Rock.glb"), Some(AssetKind::Model));
        assert_eq!(kind("Audio/Theme.mp3"), Some(AssetKind::Audio));
        assert_eq!(kind("Art/Rock.glb.import.json"), None);
        assert_eq!(kind("ProjectValidationRules.json"), None);
        assert_eq!(kind("README"), None);
    }

    #[test]
    fn test_open_requires_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            Project::open(&file),
            Err(ProjectError::NotADirectory(_))
        ));
        assert!(Project::open(tmp.path()).is_ok());
    }

    #[test]
    fn test_report_path_is_beside_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("Assets");
        fs::create_dir(&root).unwrap();

        let project = Project::open(&root).unwrap();
        assert_eq!(project.report_path(), tmp.path().join(REPORT_FILE_NAME));
    }

    #[test]
    fn test_report_path_resolves_dot_roots() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("Assets");
        fs::create_dir_all(root.join("Props")).unwrap();

        let project = Project::open(root.join("Props").join("..")).unwrap();
        let expected = fs::canonicalize(tmp.path()).unwrap().join(REPORT_FILE_NAME);
        assert_eq!(project.report_path(), expected);

        // Relative roots keep a relative parent.
        let project = Project {
            root: PathBuf::from("Assets"),
        };
        assert_eq!(project.report_path(), PathBuf::from(REPORT_FILE_NAME));
    }

    #[test]
    fn test_asset_path_uses_forward_slashes() {
        let tmp = TempDir::new().unwrap();
        let project = Project::open(tmp.path()).unwrap();
        let path = tmp.path().join("Art").join("Props").join("Barrel.fbx");
        assert_eq!(project.asset_path(&path), "Art/Props/Barrel.fbx");
    }

    #[test]
    fn test_files_skip_hidden_entries() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git").join("clip.wav"), b"x").unwrap();
        fs::write(tmp.path().join("clip.wav"), b"x").unwrap();

        let project = Project::open(tmp.path()).unwrap();
        let files = project.files();
        assert_eq!(files, vec![tmp.path().join("clip.wav")]);
    }

    #[test]
    fn test_scan_groups_by_kind() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("Audio")).unwrap();
        fs::write(root.join("Audio").join("Theme.mp3"), b"ID3").unwrap();
        fs::write(root.join("Audio").join("Step.wav"), b"RIFF").unwrap();
        fs::write(root.join("notes.txt"), b"hello").unwrap();

        let project = Project::open(root).unwrap();
        let inventory = project.scan(&RuleSet::default());
        assert_eq!(inventory.audio.len(), 2);
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.audio[0].path, "Audio/Step.wav");
    }
}

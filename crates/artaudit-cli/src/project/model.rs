//! Model metadata: importer settings from the sidecar, mesh statistics and
//! materials from glTF documents.

use super::{read_sidecar, Project, ProjectError};
use artaudit_rules::{MeshStats, ModelImport, ModelImportSettings};
use std::path::Path;

/// A glTF material and the image behind its base color texture.
#[derive(Debug, Clone, PartialEq)]
pub struct GltfMaterial {
    pub name: String,
    /// Image name (or URI) of the base color texture.
    pub base_color_texture: Option<String>,
    /// Index of the base color image in the document.
    pub base_color_image: Option<usize>,
}

fn is_gltf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "gltf" | "glb"))
        .unwrap_or(false)
}

fn open_gltf(path: &Path) -> Result<gltf::Gltf, ProjectError> {
    gltf::Gltf::open(path).map_err(|source| ProjectError::Gltf {
        path: path.to_path_buf(),
        source,
    })
}

fn clamp_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Per-mesh triangle and vertex counts. Only accessor counts are read, so
/// external buffers need not be present.
pub fn mesh_stats(path: &Path) -> Result<Vec<MeshStats>, ProjectError> {
    let gltf = open_gltf(path)?;

    let stats = gltf
        .document
        .meshes()
        .map(|mesh| {
            let mut triangle_count = 0usize;
            let mut vertex_count = 0usize;
            let mut has_uv2 = true;

            for primitive in mesh.primitives() {
                let positions = primitive
                    .get(&gltf::Semantic::Positions)
                    .map(|a| a.count())
                    .unwrap_or(0);
                vertex_count = vertex_count.saturating_add(positions);

                // Non-indexed geometry: count from position accessor
                triangle_count = triangle_count.saturating_add(match primitive.indices() {
                    Some(indices) => indices.count() / 3,
                    None => positions / 3,
                });

                if primitive.get(&gltf::Semantic::TexCoords(1)).is_none() {
                    has_uv2 = false;
                }
            }

            MeshStats {
                name: mesh
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("mesh_{}", mesh.index())),
                triangle_count: clamp_count(triangle_count),
                vertex_count: clamp_count(vertex_count),
                has_uv2,
            }
        })
        .collect();

    Ok(stats)
}

pub(crate) fn image_label(image: &gltf::Image) -> String {
    if let Some(name) = image.name() {
        return name.to_string();
    }
    match image.source() {
        gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => uri.to_string(),
        _ => format!("image_{}", image.index()),
    }
}

/// Materials of a glTF document, in document order.
pub fn gltf_materials(path: &Path) -> Result<Vec<GltfMaterial>, ProjectError> {
    let gltf = open_gltf(path)?;

    let materials = gltf
        .document
        .materials()
        .map(|material| {
            let image = material
                .pbr_metallic_roughness()
                .base_color_texture()
                .map(|info| info.texture().source());

            GltfMaterial {
                name: material
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("material_{}", material.index().unwrap_or(0))),
                base_color_texture: image.as_ref().map(image_label),
                base_color_image: image.as_ref().map(|i| i.index()),
            }
        })
        .collect();

    Ok(materials)
}

/// Model import metadata. A malformed sidecar or unparsable glTF is logged
/// and the model is audited with what remains.
pub fn model_import(project: &Project, path: &Path) -> ModelImport {
    let asset_path = project.asset_path(path);

    let settings = match read_sidecar::<ModelImportSettings>(path) {
        Ok(Some(settings)) => settings,
        Ok(None) => ModelImportSettings::default(),
        Err(e) => {
            tracing::warn!("ignoring import settings of {}: {}", asset_path, e);
            ModelImportSettings::default()
        }
    };

    let mut import = ModelImport::new(asset_path, settings);
    if !is_gltf(path) {
        tracing::debug!("{}: mesh statistics need a glTF source", import.path);
        return import;
    }

    match mesh_stats(path) {
        Ok(meshes) => import.meshes = meshes,
        Err(e) => tracing::warn!("{}", e),
    }
    import
}

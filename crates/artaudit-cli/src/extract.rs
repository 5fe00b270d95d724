//! Embedded asset extraction.
//!
//! Writes the images embedded in a GLB/glTF (buffer views and `data:` URIs)
//! to `ExtractedAssets/` beside the model, plus one material document per
//! glTF material pointing at the extracted files. Images referenced by
//! external URI are already separate files and are left alone.

use crate::project::{image_label, MaterialDocument, MATERIAL_EXTENSION};
use artaudit_rules::TextureSlot;
use base64::Engine;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Folder created beside the model for extracted files.
pub const EXTRACTED_DIR: &str = "ExtractedAssets";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to load glTF {path}: {source}")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Progress notifications, delivered in order on the calling thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractProgress {
    Started { images: usize, materials: usize },
    Extracted { path: PathBuf },
    Failed { name: String, reason: String },
    Finished { extracted: usize, failed: usize },
}

#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub images: Vec<PathBuf>,
    pub materials: Vec<PathBuf>,
    pub failed: usize,
}

struct EmbeddedImage {
    index: usize,
    label: String,
    mime_type: Option<String>,
    source: EmbeddedSource,
}

enum EmbeddedSource {
    View { buffer: usize, offset: usize, length: usize },
    DataUri(String),
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        _ => None,
    }
}

/// Splits a `data:<mime>;base64,<payload>` URI.
fn parse_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, payload))
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

/// Claims `stem` in `used`, falling back to `<stem>_<index>` (and a counter
/// beyond that) when the name is taken.
fn unique_stem(used: &mut HashSet<String>, stem: String, index: usize) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut candidate = format!("{}_{}", stem, index);
    let mut n = 1;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}_{}_{}", stem, index, n);
        n += 1;
    }
    candidate
}

fn view_bytes(
    buffers: &[gltf::buffer::Data],
    buffer: usize,
    offset: usize,
    length: usize,
) -> Option<&[u8]> {
    let end = offset.checked_add(length)?;
    buffers.get(buffer)?.get(offset..end)
}

fn embedded_images(document: &gltf::Document) -> Vec<EmbeddedImage> {
    document
        .images()
        .filter_map(|image| {
            let (source, mime_type) = match image.source() {
                gltf::image::Source::View { view, mime_type } => (
                    EmbeddedSource::View {
                        buffer: view.buffer().index(),
                        offset: view.offset(),
                        length: view.length(),
                    },
                    Some(mime_type.to_string()),
                ),
                gltf::image::Source::Uri { uri, mime_type } if uri.starts_with("data:") => (
                    EmbeddedSource::DataUri(uri.to_string()),
                    mime_type.map(str::to_string),
                ),
                gltf::image::Source::Uri { uri, .. } => {
                    tracing::debug!("image {} references external file {}", image.index(), uri);
                    return None;
                }
            };
            Some(EmbeddedImage {
                index: image.index(),
                label: image_label(&image),
                mime_type,
                source,
            })
        })
        .collect()
}

/// Extracts embedded images and material documents from a model.
///
/// Per-asset failures are reported through `progress` and counted; only a
/// model that cannot be loaded, or an output folder that cannot be created,
/// is an error.
pub fn extract_embedded(
    model: &Path,
    mut progress: impl FnMut(&ExtractProgress),
) -> Result<ExtractSummary, ExtractError> {
    let gltf_err = |source: gltf::Error| ExtractError::Gltf {
        path: model.to_path_buf(),
        source,
    };
    let gltf::Gltf { document, blob } = gltf::Gltf::open(model).map_err(gltf_err)?;

    let images = embedded_images(&document);
    let mut summary = ExtractSummary::default();
    progress(&ExtractProgress::Started {
        images: images.len(),
        materials: document.materials().count(),
    });

    let out_dir = model
        .parent()
        .unwrap_or(Path::new(""))
        .join(EXTRACTED_DIR);
    fs::create_dir_all(&out_dir).map_err(|source| ExtractError::Io {
        path: out_dir.clone(),
        source,
    })?;

    let needs_buffers = images
        .iter()
        .any(|i| matches!(i.source, EmbeddedSource::View { .. }));
    let buffers = if needs_buffers {
        gltf::import_buffers(&document, model.parent(), blob).map_err(gltf_err)?
    } else {
        Vec::new()
    };

    // Image index -> extracted file name
    let mut extracted: HashMap<usize, String> = HashMap::new();
    let mut used_names: HashSet<String> = HashSet::new();

    for image in &images {
        let bytes: Result<Vec<u8>, String> = match &image.source {
            EmbeddedSource::View {
                buffer,
                offset,
                length,
            } => view_bytes(&buffers, *buffer, *offset, *length)
                .map(<[u8]>::to_vec)
                .ok_or_else(|| "buffer view out of range".to_string()),
            EmbeddedSource::DataUri(uri) => match parse_data_uri(uri) {
                Some((_, payload)) => base64::engine::general_purpose::STANDARD
                    .decode(payload)
                    .map_err(|e| format!("invalid base64 payload: {}", e)),
                None => Err("unsupported data URI".to_string()),
            },
        };

        let mime = image.mime_type.clone().or_else(|| match &image.source {
            EmbeddedSource::DataUri(uri) => parse_data_uri(uri).map(|(m, _)| m.to_string()),
            EmbeddedSource::View { .. } => None,
        });
        let Some(ext) = mime.as_deref().and_then(extension_for_mime) else {
            summary.failed += 1;
            progress(&ExtractProgress::Failed {
                name: image.label.clone(),
                reason: format!("unsupported image type {:?}", mime),
            });
            continue;
        };

        let bytes = match bytes {
            Ok(b) => b,
            Err(reason) => {
                summary.failed += 1;
                progress(&ExtractProgress::Failed {
                    name: image.label.clone(),
                    reason,
                });
                continue;
            }
        };

        let stem = unique_stem(&mut used_names, sanitize_file_name(&image.label), image.index);
        let file_name = format!("{}.{}", stem, ext);
        let path = out_dir.join(&file_name);

        match fs::write(&path, &bytes) {
            Ok(()) => {
                tracing::info!("extracted {} to {}", image.label, path.display());
                extracted.insert(image.index, file_name);
                progress(&ExtractProgress::Extracted { path: path.clone() });
                summary.images.push(path);
            }
            Err(e) => {
                summary.failed += 1;
                progress(&ExtractProgress::Failed {
                    name: image.label.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let mut material_names: HashSet<String> = HashSet::new();
    for (i, material) in document.materials().enumerate() {
        let name = material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("material_{}", i));
        let pbr = material.pbr_metallic_roughness();

        let mut doc = MaterialDocument::new(name.clone())
            .with_float("_Metallic", pbr.metallic_factor())
            .with_float("_Glossiness", 1.0 - pbr.roughness_factor());

        let bound = |index: usize| extracted.get(&index).cloned();
        if let Some(file) = pbr
            .base_color_texture()
            .and_then(|t| bound(t.texture().source().index()))
        {
            doc = doc.with_texture(TextureSlot::Albedo.texture_property(), file);
        }
        if let Some(file) = pbr
            .metallic_roughness_texture()
            .and_then(|t| bound(t.texture().source().index()))
        {
            doc = doc.with_texture(TextureSlot::Metallic.texture_property(), file);
        }
        if let Some(occlusion) = material.occlusion_texture() {
            doc = doc.with_float("_OcclusionStrength", occlusion.strength());
            if let Some(file) = bound(occlusion.texture().source().index()) {
                doc = doc.with_texture(TextureSlot::Occlusion.texture_property(), file);
            }
        }

        let stem = unique_stem(&mut material_names, sanitize_file_name(&name), i);
        let path = out_dir.join(format!("{}{}", stem, MATERIAL_EXTENSION));
        match doc.save(&path) {
            Ok(()) => {
                progress(&ExtractProgress::Extracted { path: path.clone() });
                summary.materials.push(path);
            }
            Err(e) => {
                summary.failed += 1;
                progress(&ExtractProgress::Failed {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    progress(&ExtractProgress::Finished {
        extracted: summary.images.len() + summary.materials.len(),
        failed: summary.failed,
    });
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_data_uri() {
        assert_eq!(
            parse_data_uri("data:image/png;base64,AAAA"),
            Some(("image/png", "AAAA"))
        );
        assert_eq!(parse_data_uri("data:image/png,raw"), None);
        assert_eq!(parse_data_uri("textures/a.png"), None);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("a/b:c"), "a_b_c");
        assert_eq!(sanitize_file_name("crate_albedo"), "crate_albedo");
    }

    #[test]
    fn test_extract_data_uri_images() {
        let tmp = TempDir::new().unwrap();
        let payload = base64::engine::general_purpose::STANDARD.encode(b"\x89PNG fake");
        let gltf = format!(
            r#"{{"asset":{{"version":"2.0"}},
                "images":[
                    {{"name":"crate_albedo","uri":"data:image/png;base64,{payload}"}},
                    {{"uri":"external.png"}},
                    {{"uri":"data:image/gif;base64,{payload}"}}
                ],
                "textures":[{{"source":0}}],
                "materials":[{{"name":"Crate","pbrMetallicRoughness":{{"baseColorTexture":{{"index":0}},"metallicFactor":0.0}}}}]}}"#
        );
        let model = tmp.path().join("Crate.gltf");
        fs::write(&model, gltf).unwrap();

        let mut events = Vec::new();
        let summary = extract_embedded(&model, |e| events.push(e.clone())).unwrap();

        let out = tmp.path().join(EXTRACTED_DIR);
        assert_eq!(summary.images, vec![out.join("crate_albedo.png")]);
        assert_eq!(summary.materials, vec![out.join("Crate.mat.json")]);
        assert_eq!(summary.failed, 1);
        assert_eq!(fs::read(out.join("crate_albedo.png")).unwrap(), b"\x89PNG fake");

        let doc = MaterialDocument::load(&out.join("Crate.mat.json")).unwrap();
        assert_eq!(doc.texture("_MainTex"), Some("crate_albedo.png"));
        assert_eq!(doc.floats["_Metallic"], 0.0);

        assert_eq!(
            events.first(),
            Some(&ExtractProgress::Started {
                images: 2,
                materials: 1
            })
        );
        assert!(matches!(events[2], ExtractProgress::Failed { .. }));
        assert_eq!(
            events.last(),
            Some(&ExtractProgress::Finished {
                extracted: 2,
                failed: 1
            })
        );
    }

    #[test]
    fn test_unique_stem() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem(&mut used, "Crate".to_string(), 0), "Crate");
        assert_eq!(unique_stem(&mut used, "Crate".to_string(), 1), "Crate_1");
        used.insert("Crate_2".to_string());
        assert_eq!(unique_stem(&mut used, "Crate".to_string(), 2), "Crate_2_1");
    }

    #[test]
    fn test_same_named_materials_get_distinct_files() {
        let tmp = TempDir::new().unwrap();
        let gltf = r#"{"asset":{"version":"2.0"},
            "materials":[
                {"name":"Crate","pbrMetallicRoughness":{"metallicFactor":0.25}},
                {"name":"Crate","pbrMetallicRoughness":{"metallicFactor":0.75}}
            ]}"#;
        let model = tmp.path().join("Crates.gltf");
        fs::write(&model, gltf).unwrap();

        let summary = extract_embedded(&model, |_| {}).unwrap();

        let out = tmp.path().join(EXTRACTED_DIR);
        assert_eq!(
            summary.materials,
            vec![out.join("Crate.mat.json"), out.join("Crate_1.mat.json")]
        );
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
        let first = MaterialDocument::load(&out.join("Crate.mat.json")).unwrap();
        let second = MaterialDocument::load(&out.join("Crate_1.mat.json")).unwrap();
        assert_eq!(first.floats["_Metallic"], 0.25);
        assert_eq!(second.floats["_Metallic"], 0.75);
    }

    #[test]
    fn test_view_bytes_bounds() {
        let buffers = vec![gltf::buffer::Data(vec![1, 2, 3, 4, 5, 6, 7, 8])];
        assert_eq!(view_bytes(&buffers, 0, 2, 3), Some(&[3u8, 4, 5][..]));
        assert_eq!(view_bytes(&buffers, 0, 4, 8), None);
        assert_eq!(view_bytes(&buffers, 0, 4, usize::MAX), None);
        assert_eq!(view_bytes(&buffers, 1, 0, 1), None);
    }

    #[test]
    fn test_unloadable_model_is_error() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("Broken.glb");
        fs::write(&model, b"nope").unwrap();
        assert!(matches!(
            extract_embedded(&model, |_| {}),
            Err(ExtractError::Gltf { .. })
        ));
    }
}

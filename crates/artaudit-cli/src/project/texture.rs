use super::Project;
use artaudit_rules::{normalize_extension, TextureImport, TextureInfo};
use std::fs;
use std::path::Path;

/// Reads a texture's pixel dimensions and byte size. `None` if the file is
/// missing or its header cannot be decoded.
pub fn probe_texture(path: &Path) -> Option<TextureInfo> {
    let file_size = fs::metadata(path).ok()?.len();
    let (width, height) = match image::image_dimensions(path) {
        Ok(dims) => dims,
        Err(e) => {
            tracing::debug!("cannot read dimensions of {}: {}", path.display(), e);
            return None;
        }
    };
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(normalize_extension)
        .unwrap_or_default();

    Some(TextureInfo {
        width,
        height,
        file_size,
        extension,
    })
}

/// Texture import metadata. Unreadable dimensions are left unknown so the
/// size checks are skipped.
pub fn texture_import(project: &Project, path: &Path) -> TextureImport {
    let import = TextureImport::from_path(project.asset_path(path));
    match image::image_dimensions(path) {
        Ok((width, height)) => import.with_dimensions(width, height),
        Err(e) => {
            tracing::warn!(
                "could not read dimensions of {}; size checks skipped: {}",
                import.path,
                e
            );
            import
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufWriter;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        let file = fs::File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_image_data(&vec![127u8; (width * height * 3) as usize])
            .unwrap();
    }

    #[test]
    fn test_probe_reads_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Crate_Albedo.PNG");
        write_png(&path, 32, 16);

        let info = probe_texture(&path).unwrap();
        assert_eq!((info.width, info.height), (32, 16));
        assert_eq!(info.extension, ".png");
        assert_eq!(info.file_size, fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_probe_missing_or_garbage() {
        let dir = TempDir::new().unwrap();
        assert!(probe_texture(&dir.path().join("missing.png")).is_none());

        let garbage = dir.path().join("garbage.png");
        fs::write(&garbage, b"not an image").unwrap();
        assert!(probe_texture(&garbage).is_none());
    }

    #[test]
    fn test_texture_import_without_dimensions() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("Assets");
        fs::create_dir_all(root.join("Textures")).unwrap();
        let good = root.join("Textures/Rock.png");
        let bad = root.join("Textures/Broken.tga");
        write_png(&good, 64, 64);
        fs::write(&bad, b"truncated").unwrap();

        let project = Project::open(&root).unwrap();
        let rock = texture_import(&project, &good);
        assert_eq!(rock.path, "Textures/Rock.png");
        assert_eq!(rock.dimensions, Some((64, 64)));

        let broken = texture_import(&project, &bad);
        assert_eq!(broken.path, "Textures/Broken.tga");
        assert_eq!(broken.dimensions, None);
    }
}

//! Test fixture utilities for creating synthetic asset trees.

use artaudit_cli::project::{MaterialDocument, Project};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace holding an `Assets` root.
///
/// The report is written beside the root, so the root is a subdirectory of
/// the temp dir rather than the temp dir itself.
pub struct ProjectFixture {
    pub dir: TempDir,
    pub root: PathBuf,
}

impl ProjectFixture {
    /// Create a new empty asset root.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path().join("Assets");
        fs::create_dir_all(&root).expect("Failed to create asset root");
        Self { dir, root }
    }

    /// Get the asset root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Asset root as a string, for command entry points.
    pub fn root_str(&self) -> &str {
        self.root.to_str().expect("temp path is not UTF-8")
    }

    pub fn project(&self) -> Project {
        Project::open(&self.root).expect("Failed to open asset root")
    }

    /// Path of an asset relative to the root.
    pub fn asset(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write raw bytes to an asset, creating parent folders.
    pub fn add_file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.asset(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create asset folder");
        }
        fs::write(&path, contents).expect("Failed to write asset");
        path
    }

    /// Write a single-color RGB PNG. Flat images compress to a few KB at
    /// any resolution.
    pub fn add_flat_png(&self, relative: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
        self.add_file(relative, &flat_png(width, height, rgb))
    }

    /// Write a PNG of pseudo-random noise, which does not compress.
    pub fn add_noise_png(&self, relative: &str, width: u32, height: u32) -> PathBuf {
        self.add_file(relative, &noise_png(width, height))
    }

    pub fn add_material(&self, relative: &str, doc: &MaterialDocument) -> PathBuf {
        let path = self.asset(relative);
        doc.save(&path).expect("Failed to write material");
        path
    }

    pub fn load_material(&self, relative: &str) -> MaterialDocument {
        MaterialDocument::load(&self.asset(relative)).expect("Failed to load material")
    }

    /// Write a GLB holding one triangle mesh and a material whose base color
    /// and occlusion textures point at an image embedded in the binary chunk.
    pub fn add_glb(&self, relative: &str, image_png: &[u8]) -> PathBuf {
        self.add_file(relative, &glb_with_embedded_image(image_png))
    }

    /// Read and parse a JSON file.
    pub fn read_json(&self, path: &Path) -> serde_json::Value {
        let text = fs::read_to_string(path).expect("Failed to read JSON file");
        serde_json::from_str(&text).expect("Invalid JSON")
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_rgb(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("Failed to write PNG header");
        writer.write_image_data(data).expect("Failed to write PNG data");
    }
    bytes
}

pub fn flat_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
    encode_rgb(width, height, &data)
}

pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    // xorshift32
    let mut state: u32 = 0x9E37_79B9;
    let data: Vec<u8> = (0..width * height * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    encode_rgb(width, height, &data)
}

/// Offset of the embedded image inside the binary chunk.
const IMAGE_OFFSET: usize = 68;

/// Builds a GLB: one indexed triangle with two UV sets, a material named
/// `CrateMat`, and an embedded PNG named `crate_albedo`.
pub fn glb_with_embedded_image(image_png: &[u8]) -> Vec<u8> {
    let buffer_len = IMAGE_OFFSET + image_png.len();
    let json = format!(
        r#"{{"asset":{{"version":"2.0"}},
"meshes":[{{"name":"Crate","primitives":[{{"attributes":{{"POSITION":0,"TEXCOORD_0":2,"TEXCOORD_1":2}},"indices":1,"material":0}}]}}],
"materials":[{{"name":"CrateMat","pbrMetallicRoughness":{{"baseColorTexture":{{"index":0}},"metallicFactor":0.0,"roughnessFactor":0.25}},"occlusionTexture":{{"index":0,"strength":0.5}}}}],
"textures":[{{"source":0}}],
"images":[{{"name":"crate_albedo","bufferView":3,"mimeType":"image/png"}}],
"accessors":[
{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","max":[1,1,0],"min":[0,0,0]}},
{{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}},
{{"bufferView":2,"componentType":5126,"count":3,"type":"VEC2"}}],
"bufferViews":[
{{"buffer":0,"byteLength":36,"byteOffset":0}},
{{"buffer":0,"byteLength":6,"byteOffset":36}},
{{"buffer":0,"byteLength":24,"byteOffset":44}},
{{"buffer":0,"byteLength":{image_len},"byteOffset":{IMAGE_OFFSET}}}],
"buffers":[{{"byteLength":{buffer_len}}}]}}"#,
        image_len = image_png.len(),
    );

    let mut bin = Vec::with_capacity(buffer_len);
    for v in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in v {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    for uv in [[0.0f32, 0.0], [1.0, 0.0], [0.0, 1.0]] {
        for c in uv {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    debug_assert_eq!(bin.len(), IMAGE_OFFSET);
    bin.extend_from_slice(image_png);
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let mut json_bytes = json.into_bytes();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }

    let total_len = 12 + 8 + json_bytes.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total_len);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_len as u32).to_le_bytes());
    glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    glb.extend_from_slice(&json_bytes);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E_4942u32.to_le_bytes());
    glb.extend_from_slice(&bin);
    glb
}

// model_loader.rs - Asynchronous loading of the decorative scene model
//
// The model is opaque to this crate: it is read as bytes and handed to the
// scene sink. Parsing belongs to the renderer.

use std::path::{Path, PathBuf};

use crate::error_handling::AssetError;

/// Container format, sniffed from the file contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Binary glTF (`glTF` magic)
    Glb,
    /// JSON glTF
    Gltf,
    Unknown,
}

impl ModelFormat {
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"glTF") {
            return ModelFormat::Glb;
        }
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        if first == Some(&b'{') {
            ModelFormat::Gltf
        } else {
            ModelFormat::Unknown
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub name: String,
    pub path: PathBuf,
    pub format: ModelFormat,
    pub bytes: Vec<u8>,
}

impl ModelAsset {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Read a model file
pub async fn load_model(path: &Path) -> Result<ModelAsset, AssetError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AssetError::Io { path: path.to_path_buf(), source })?;
    if bytes.is_empty() {
        return Err(AssetError::Empty { path: path.to_path_buf() });
    }

    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("model")
        .to_string();
    let format = ModelFormat::sniff(&bytes);
    if format == ModelFormat::Unknown {
        log::warn!("Model {} is not recognizable glTF; passing it through as-is", path.display());
    }

    Ok(ModelAsset {
        name,
        path: path.to_path_buf(),
        format,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff() {
        assert_eq!(ModelFormat::sniff(b"glTF\x02\x00\x00\x00"), ModelFormat::Glb);
        assert_eq!(ModelFormat::sniff(b"  \n{\"asset\":{}}"), ModelFormat::Gltf);
        assert_eq!(ModelFormat::sniff(b"solid cube"), ModelFormat::Unknown);
    }

    #[tokio::test]
    async fn test_load_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.gltf");
        std::fs::write(&path, r#"{"asset": {"version": "2.0"}}"#).unwrap();

        let model = load_model(&path).await.unwrap();
        assert_eq!(model.name, "test");
        assert_eq!(model.format, ModelFormat::Gltf);
        assert!(model.size_bytes() > 0);
    }

    #[tokio::test]
    async fn test_missing_and_empty_models_fail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.glb");
        assert!(matches!(load_model(&missing).await, Err(AssetError::Io { .. })));

        let empty = dir.path().join("empty.glb");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(load_model(&empty).await, Err(AssetError::Empty { .. })));
    }
}

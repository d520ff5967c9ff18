use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("File not found ({0})")]
    FileNotFound(PathBuf),

    #[error("Decode error ({0})")]
    Decode(PathBuf),

    #[error("Image load error ({0}): {1}")]
    Image(PathBuf, image::ImageError),

    #[error("Unknown error ({0}): {1}")]
    Unknown(PathBuf, String),
}

impl AssetError {
    pub fn from_io_error(error: std::io::Error, path: &Path) -> Self {
        match error {
            err if err.kind() == std::io::ErrorKind::NotFound => {
                Self::FileNotFound(path.to_path_buf())
            }
            err => Self::Unknown(path.to_path_buf(), err.kind().to_string()),
        }
    }
}

pub trait AssetFileSystem {
    fn load(&self, path: &Path) -> Result<Vec<u8>, AssetError>;
}

pub struct PlatformFileSystem {
    root: PathBuf,
}

impl PlatformFileSystem {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl AssetFileSystem for PlatformFileSystem {
    fn load(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        std::fs::read(self.root.join(path)).map_err(|err| AssetError::from_io_error(err, path))
    }
}

/// Loads the files the pet needs (sprite sheets, music, config) relative to a single root.
#[derive(Clone)]
pub struct AssetLoader {
    file_system: Arc<dyn AssetFileSystem>,
}

impl AssetLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_file_system(Arc::new(PlatformFileSystem::new(root)))
    }

    pub fn with_file_system(file_system: Arc<dyn AssetFileSystem>) -> Self {
        Self { file_system }
    }

    pub fn load_raw(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, AssetError> {
        self.file_system.load(path.as_ref())
    }

    pub fn load_text(&self, path: impl AsRef<Path>) -> Result<String, AssetError> {
        let path = path.as_ref();
        String::from_utf8(self.load_raw(path)?).map_err(|_| AssetError::Decode(path.to_path_buf()))
    }

    /// Decode an image, guessing the format from its contents.
    pub fn load_image(&self, path: impl AsRef<Path>) -> Result<image::RgbaImage, AssetError> {
        let path = path.as_ref();
        let data = self.load_raw(path)?;
        image::load_from_memory(&data)
            .map(|image| image.to_rgba8())
            .map_err(|err| AssetError::Image(path.to_path_buf(), err))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct TestFileSystem {
        files: HashMap<PathBuf, Vec<u8>>,
    }

    impl AssetFileSystem for TestFileSystem {
        fn load(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
            match self.files.get(path) {
                None => Err(AssetError::FileNotFound(path.to_path_buf())),
                Some(data) => Ok(data.clone()),
            }
        }
    }

    fn loader_with(files: &[(&str, Vec<u8>)]) -> AssetLoader {
        let files = files
            .iter()
            .map(|(name, data)| (PathBuf::from(name), data.clone()))
            .collect();
        AssetLoader::with_file_system(Arc::new(TestFileSystem { files }))
    }

    #[test]
    fn asset_error_from_io_error() {
        let error = AssetError::from_io_error(
            std::io::Error::new(std::io::ErrorKind::NotFound, "not_found"),
            &PathBuf::from("abc"),
        );

        assert!(matches!(error, AssetError::FileNotFound(path) if path == PathBuf::from("abc")));

        let error = AssetError::from_io_error(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission_denied"),
            &PathBuf::from("abc"),
        );
        assert!(matches!(error, AssetError::Unknown(path, _) if path == PathBuf::from("abc")));
    }

    #[test]
    fn load_text() {
        let assets = loader_with(&[("animation.json", b"{}".to_vec())]);
        assert_eq!(assets.load_text("animation.json").unwrap(), "{}");

        assert!(matches!(
            assets.load_text("missing.json"),
            Err(AssetError::FileNotFound(path)) if path == PathBuf::from("missing.json")
        ));
    }

    #[test]
    fn load_text_rejects_invalid_utf8() {
        let assets = loader_with(&[("bad.json", vec![0xff, 0xfe, 0x00])]);
        assert!(matches!(assets.load_text("bad.json"), Err(AssetError::Decode(_))));
    }

    #[test]
    fn load_image() {
        let mut encoded = std::io::Cursor::new(Vec::new());
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
            .write_to(&mut encoded, image::ImageFormat::Png)
            .unwrap();

        let assets = loader_with(&[("sheet.png", encoded.into_inner())]);
        let image = assets.load_image("sheet.png").unwrap();
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.get_pixel(3, 1), &image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn load_image_rejects_garbage() {
        let assets = loader_with(&[("sheet.png", b"not an image".to_vec())]);
        assert!(matches!(
            assets.load_image("sheet.png"),
            Err(AssetError::Image(path, _)) if path == PathBuf::from("sheet.png")
        ));
    }
}

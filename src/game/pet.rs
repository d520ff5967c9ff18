use std::path::Path;

use glam::UVec2;
use tracing::{debug, info};

use crate::engine::assets::{AssetError, AssetLoader};

use super::{
    clip::{Clip, Playlist},
    config::{AnimationFile, ConfigError},
};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Everything loaded from disk before the window opens.
pub struct Pet {
    /// Window title.
    pub name: String,
    pub playlist: Playlist,
    /// Decoded sprite sheet for each clip, in playlist order.
    pub sheets: Vec<image::RgbaImage>,
}

impl Pet {
    /// Parse and validate the animation file at `path`, then decode the sprite sheets through
    /// `assets`.
    pub fn load(
        config: &AssetLoader,
        path: impl AsRef<Path>,
        assets: &AssetLoader,
    ) -> Result<Self, StartupError> {
        let json = config.load_text(path)?;
        Self::from_json(&json, assets)
    }

    pub fn from_json(json: &str, assets: &AssetLoader) -> Result<Self, StartupError> {
        let file = AnimationFile::from_json(json)?;

        if let Ok(json) = serde_json::to_string(&file) {
            debug!("Animation file: {json}");
        }

        let defs = file.clip_defs()?;

        let mut clips = Vec::with_capacity(defs.len());
        let mut sheets = Vec::with_capacity(defs.len());
        for def in defs {
            let sheet = assets.load_image(&def.sheet)?;
            clips.push(Clip::new(def, UVec2::from(sheet.dimensions()))?);
            sheets.push(sheet);
        }

        let playlist = Playlist::new(clips)?;

        info!(
            "Loaded {} with {} clips",
            file.name,
            playlist.clips().len()
        );

        Ok(Self {
            name: file.name,
            playlist,
            sheets,
        })
    }

    /// Size of the first clip's frames, which sets the window size.
    pub fn frame_size(&self) -> UVec2 {
        self.playlist.active_clip().frame_size()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        path::{Path, PathBuf},
        sync::Arc,
    };

    use super::*;
    use crate::engine::assets::AssetFileSystem;

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

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut encoded = std::io::Cursor::new(Vec::new());
        image::RgbaImage::new(width, height)
            .write_to(&mut encoded, image::ImageFormat::Png)
            .unwrap();
        encoded.into_inner()
    }

    fn assets() -> AssetLoader {
        let mut files = HashMap::default();
        files.insert(PathBuf::from("idle.png"), png(200, 50));
        files.insert(PathBuf::from("hop.png"), png(64, 80));
        AssetLoader::with_file_system(Arc::new(TestFileSystem { files }))
    }

    #[test]
    fn load_pet() {
        let json = r#"{
            "Name": "Blob",
            "Snippets": [
                { "SpritesheetName": "idle.png", "Amount": 4, "FrameWidth": 50, "FrameHeight": 50,
                  "LengthSecs": 1.0 },
                { "SpritesheetName": "hop.png", "Amount": 4, "FrameWidth": 32, "FrameHeight": 40,
                  "LengthSecs": 0.5, "WindowAnimation": "jumping", "WindowAnimationFlags": 20 }
            ]
        }"#;

        let pet = Pet::from_json(json, &assets()).unwrap();
        assert_eq!(pet.name, "Blob");
        assert_eq!(pet.playlist.clips().len(), 2);
        assert_eq!(pet.sheets.len(), 2);
        assert_eq!(pet.frame_size(), UVec2::new(50, 50));
        assert_eq!(pet.sheets[1].dimensions(), (64, 80));
    }

    #[test]
    fn missing_sheet_is_an_asset_error() {
        let json = r#"{ "Snippets": [ { "SpritesheetName": "missing.png", "Amount": 1,
            "FrameWidth": 1, "FrameHeight": 1, "LengthSecs": 1.0 } ] }"#;

        assert!(matches!(
            Pet::from_json(json, &assets()),
            Err(StartupError::Asset(AssetError::FileNotFound(_)))
        ));
    }

    #[test]
    fn invalid_clips_are_rejected_before_loading_sheets() {
        // The sheet does not exist, so reaching the loader would be an asset error instead.
        let json = r#"{ "Snippets": [ { "SpritesheetName": "missing.png", "Amount": 1,
            "FrameWidth": 1, "FrameHeight": 1, "LengthSecs": 0.0 } ] }"#;

        assert!(matches!(
            Pet::from_json(json, &assets()),
            Err(StartupError::Config(ConfigError::InvalidDuration { .. }))
        ));
    }

    #[test]
    fn empty_playlist_is_rejected() {
        assert!(matches!(
            Pet::from_json(r#"{ "Name": "x", "Snippets": [] }"#, &assets()),
            Err(StartupError::Config(ConfigError::EmptyPlaylist))
        ));
    }

    #[test]
    fn frames_outside_the_sheet_are_rejected() {
        let json = r#"{ "Snippets": [ { "SpritesheetName": "hop.png", "Amount": 8,
            "FrameWidth": 32, "FrameHeight": 40, "LengthSecs": 1.0 } ] }"#;

        assert!(matches!(
            Pet::from_json(json, &assets()),
            Err(StartupError::Config(ConfigError::FramesOutsideSheet { .. }))
        ));
    }
}

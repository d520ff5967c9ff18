use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::assets::{AssetError, AssetLoader};

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[cfg(feature = "audio")]
    #[error("Audio output error: {0}")]
    Stream(#[from] rodio::StreamError),

    #[cfg(feature = "audio")]
    #[error("Audio playback error: {0}")]
    Play(#[from] rodio::PlayError),

    #[cfg(feature = "audio")]
    #[error("Audio decode error ({0}): {1}")]
    Decode(PathBuf, rodio::decoder::DecoderError),

    #[error("Audio support was not compiled in")]
    Unsupported,
}

/// A looping background music track.
///
/// Playback happens on the audio backend's own thread. [Music::update] has to be called once per
/// frame and restarts the track if the backend ran out of samples.
pub struct Music {
    #[cfg(feature = "audio")]
    player: Option<Player>,
}

#[cfg(feature = "audio")]
struct Player {
    // Dropping the stream stops all output, so it lives as long as the sink.
    _stream: rodio::OutputStream,
    sink: rodio::Sink,
    path: PathBuf,
    data: Vec<u8>,
}

#[cfg(feature = "audio")]
impl Player {
    fn append_looped(&self) -> Result<(), AudioError> {
        let cursor = std::io::Cursor::new(self.data.clone());
        let source = rodio::Decoder::new_looped(cursor)
            .map_err(|err| AudioError::Decode(self.path.clone(), err))?;
        self.sink.append(source);
        Ok(())
    }
}

impl Music {
    /// A track that plays nothing.
    pub fn silent() -> Self {
        Self {
            #[cfg(feature = "audio")]
            player: None,
        }
    }

    #[cfg(feature = "audio")]
    pub fn load(assets: &AssetLoader, path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let data = assets.load_raw(path)?;

        let (stream, handle) = rodio::OutputStream::try_default()?;
        let sink = rodio::Sink::try_new(&handle)?;

        let player = Player {
            _stream: stream,
            sink,
            path: path.to_path_buf(),
            data,
        };
        player.append_looped()?;

        info!("Playing music: {}", path.display());

        Ok(Self {
            player: Some(player),
        })
    }

    #[cfg(not(feature = "audio"))]
    pub fn load(_assets: &AssetLoader, _path: impl AsRef<Path>) -> Result<Self, AudioError> {
        Err(AudioError::Unsupported)
    }

    pub fn is_playing(&self) -> bool {
        #[cfg(feature = "audio")]
        if let Some(ref player) = self.player {
            return !player.sink.empty();
        }

        false
    }

    pub fn update(&mut self) {
        if self.is_playing() {
            return;
        }

        #[cfg(feature = "audio")]
        if let Some(ref player) = self.player {
            warn!("Music stream ran dry, restarting {}", player.path.display());
            if let Err(err) = player.append_looped() {
                warn!("Could not restart music, continuing without it. ({err})");
                self.player = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_music_is_never_playing() {
        let mut music = Music::silent();
        assert!(!music.is_playing());
        music.update();
        assert!(!music.is_playing());
    }
}

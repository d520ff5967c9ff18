use serde::{Deserialize, Serialize};

/// Positional effect applied to the window while a clip plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString)]
pub enum MotionKind {
    /// The window stays at its logical origin.
    #[default]
    #[strum(serialize = "")]
    None,
    /// Two full vertical oscillations per loop.
    #[strum(serialize = "sine wave")]
    SineWave,
    /// A single up-down arc per loop.
    #[strum(serialize = "jumping")]
    Jumping,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not parse animation file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid animation file, no snippets found")]
    EmptyPlaylist,

    #[error("Snippet {index} ({name}): duration must be positive, got {duration}")]
    InvalidDuration {
        index: usize,
        name: String,
        duration: f64,
    },

    #[error("Snippet {index} ({name}): frame count must be positive")]
    InvalidFrameCount { index: usize, name: String },

    #[error("Snippet {index} ({name}): frame size must be positive, got {width}x{height}")]
    InvalidFrameSize {
        index: usize,
        name: String,
        width: u32,
        height: u32,
    },

    #[error("Snippet {index} ({name}): motion amplitude must be finite, got {amplitude}")]
    InvalidAmplitude {
        index: usize,
        name: String,
        amplitude: f32,
    },

    #[error("Snippet {index} ({name}): unknown window animation \"{kind}\"")]
    UnknownMotionKind {
        index: usize,
        name: String,
        kind: String,
    },

    #[error(
        "Snippet {index} ({name}): {frame_count} frames of {frame_width}x{frame_height} do not fit \
         in a {sheet_width}x{sheet_height} sprite sheet"
    )]
    FramesOutsideSheet {
        index: usize,
        name: String,
        frame_count: u32,
        frame_width: u32,
        frame_height: u32,
        sheet_width: u32,
        sheet_height: u32,
    },
}

/// A single snippet as it appears in the animation file.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnippetDef {
    pub spritesheet_name: String,
    pub amount: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub length_secs: f64,
    #[serde(default)]
    pub window_animation: String,
    #[serde(default)]
    pub window_animation_flags: f32,
    #[serde(default)]
    pub loops: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The animation file.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnimationFile {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub snippets: Vec<SnippetDef>,
}

fn default_name() -> String {
    String::from("desk-pet")
}

impl AnimationFile {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate every snippet, returning the clip definitions in playlist order.
    pub fn clip_defs(&self) -> Result<Vec<ClipDef>, ConfigError> {
        if self.snippets.is_empty() {
            return Err(ConfigError::EmptyPlaylist);
        }

        self.snippets
            .iter()
            .enumerate()
            .map(|(index, snippet)| ClipDef::from_snippet(index, snippet))
            .collect()
    }
}

/// Validated, immutable description of a clip.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipDef {
    /// Position of the clip in the animation file, used for error reporting.
    pub index: usize,
    pub name: String,
    pub sheet: String,
    pub frame_count: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Length of a single loop in seconds.
    pub duration: f64,
    pub motion: MotionKind,
    pub amplitude: f32,
    /// Extra cycles to play before the playlist moves on.
    pub loops: u32,
}

impl ClipDef {
    pub fn from_snippet(index: usize, snippet: &SnippetDef) -> Result<Self, ConfigError> {
        let name = snippet
            .name
            .clone()
            .unwrap_or_else(|| snippet.spritesheet_name.clone());

        // Also catches NaN.
        if !(snippet.length_secs > 0.0 && snippet.length_secs.is_finite()) {
            return Err(ConfigError::InvalidDuration {
                index,
                name,
                duration: snippet.length_secs,
            });
        }

        if snippet.amount == 0 {
            return Err(ConfigError::InvalidFrameCount { index, name });
        }

        if snippet.frame_width == 0 || snippet.frame_height == 0 {
            return Err(ConfigError::InvalidFrameSize {
                index,
                name,
                width: snippet.frame_width,
                height: snippet.frame_height,
            });
        }

        if !snippet.window_animation_flags.is_finite() {
            return Err(ConfigError::InvalidAmplitude {
                index,
                name,
                amplitude: snippet.window_animation_flags,
            });
        }

        let Ok(motion) = snippet.window_animation.parse::<MotionKind>() else {
            return Err(ConfigError::UnknownMotionKind {
                index,
                name,
                kind: snippet.window_animation.clone(),
            });
        };

        Ok(Self {
            index,
            name,
            sheet: snippet.spritesheet_name.clone(),
            frame_count: snippet.amount,
            frame_width: snippet.frame_width,
            frame_height: snippet.frame_height,
            duration: snippet.length_secs,
            motion,
            amplitude: snippet.window_animation_flags,
            loops: snippet.loops,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PET: &str = r#"{
        "Name": "Blob",
        "Snippets": [
            {
                "SpritesheetName": "idle.png",
                "Amount": 4,
                "FrameWidth": 50,
                "FrameHeight": 50,
                "LengthSecs": 1.0,
                "WindowAnimation": "sine wave",
                "WindowAnimationFlags": 12.5,
                "Loops": 2
            },
            {
                "SpritesheetName": "hop.png",
                "Amount": 8,
                "FrameWidth": 32,
                "FrameHeight": 40,
                "LengthSecs": 0.5,
                "WindowAnimation": "jumping",
                "Name": "hop"
            }
        ]
    }"#;

    fn snippet() -> SnippetDef {
        SnippetDef {
            spritesheet_name: String::from("sheet.png"),
            amount: 4,
            frame_width: 50,
            frame_height: 50,
            length_secs: 1.0,
            window_animation: String::new(),
            window_animation_flags: 0.0,
            loops: 0,
            name: None,
        }
    }

    #[test]
    fn motion_kind_from_str() {
        assert_eq!("".parse::<MotionKind>().unwrap(), MotionKind::None);
        assert_eq!("sine wave".parse::<MotionKind>().unwrap(), MotionKind::SineWave);
        assert_eq!("jumping".parse::<MotionKind>().unwrap(), MotionKind::Jumping);
        assert!("wobble".parse::<MotionKind>().is_err());
        assert!("Jumping".parse::<MotionKind>().is_err());
    }

    #[test]
    fn parse_animation_file() {
        let file = AnimationFile::from_json(PET).unwrap();
        assert_eq!(file.name, "Blob");

        let defs = file.clip_defs().unwrap();
        assert_eq!(defs.len(), 2);

        assert_eq!(defs[0].name, "idle.png");
        assert_eq!(defs[0].sheet, "idle.png");
        assert_eq!(defs[0].frame_count, 4);
        assert_eq!(defs[0].motion, MotionKind::SineWave);
        assert_eq!(defs[0].amplitude, 12.5);
        assert_eq!(defs[0].loops, 2);

        assert_eq!(defs[1].index, 1);
        assert_eq!(defs[1].name, "hop");
        assert_eq!(defs[1].frame_width, 32);
        assert_eq!(defs[1].frame_height, 40);
        assert_eq!(defs[1].duration, 0.5);
        assert_eq!(defs[1].motion, MotionKind::Jumping);
        assert_eq!(defs[1].amplitude, 0.0);
        assert_eq!(defs[1].loops, 0);
    }

    #[test]
    fn missing_name_uses_default() {
        let file = AnimationFile::from_json(r#"{ "Snippets": [] }"#).unwrap();
        assert_eq!(file.name, "desk-pet");
    }

    #[test]
    fn empty_playlist_is_rejected() {
        let file = AnimationFile::from_json(r#"{ "Name": "x", "Snippets": [] }"#).unwrap();
        assert!(matches!(file.clip_defs(), Err(ConfigError::EmptyPlaylist)));

        let file = AnimationFile::from_json(r#"{ "Name": "x" }"#).unwrap();
        assert!(matches!(file.clip_defs(), Err(ConfigError::EmptyPlaylist)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            AnimationFile::from_json("{ \"Snippets\": [ { \"Amount\": -1 } ] }"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AnimationFile::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut snippet = snippet();
        snippet.length_secs = 0.0;
        assert!(matches!(
            ClipDef::from_snippet(3, &snippet),
            Err(ConfigError::InvalidDuration { index: 3, .. })
        ));

        snippet.length_secs = -1.0;
        assert!(ClipDef::from_snippet(0, &snippet).is_err());

        snippet.length_secs = f64::NAN;
        assert!(ClipDef::from_snippet(0, &snippet).is_err());
    }

    #[test]
    fn zero_frames_are_rejected() {
        let mut snippet = snippet();
        snippet.amount = 0;
        assert!(matches!(
            ClipDef::from_snippet(0, &snippet),
            Err(ConfigError::InvalidFrameCount { .. })
        ));
    }

    #[test]
    fn zero_frame_size_is_rejected() {
        let mut snippet = snippet();
        snippet.frame_width = 0;
        assert!(matches!(
            ClipDef::from_snippet(0, &snippet),
            Err(ConfigError::InvalidFrameSize { width: 0, .. })
        ));

        let mut snippet = self::snippet();
        snippet.frame_height = 0;
        assert!(matches!(
            ClipDef::from_snippet(0, &snippet),
            Err(ConfigError::InvalidFrameSize { height: 0, .. })
        ));
    }

    #[test]
    fn unknown_motion_kind_is_rejected() {
        let mut snippet = snippet();
        snippet.window_animation = String::from("spinning");
        snippet.name = Some(String::from("spin"));
        let err = ClipDef::from_snippet(1, &snippet).unwrap_err();
        assert!(
            matches!(err, ConfigError::UnknownMotionKind { index: 1, ref name, ref kind } if name == "spin" && kind == "spinning")
        );
    }

    #[test]
    fn non_finite_amplitude_is_rejected() {
        let mut snippet = snippet();
        snippet.window_animation_flags = f32::INFINITY;
        assert!(matches!(
            ClipDef::from_snippet(0, &snippet),
            Err(ConfigError::InvalidAmplitude { .. })
        ));
    }

    #[test]
    fn serialize_round_trips_names() {
        let file = AnimationFile::from_json(PET).unwrap();
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"SpritesheetName\":\"idle.png\""));
        assert!(json.contains("\"WindowAnimation\":\"jumping\""));
    }
}

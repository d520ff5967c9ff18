use glam::{IVec2, Vec2};

use crate::engine::window::WindowMover;

use super::{clip::Playlist, drag::DragController, motion, sampler::Rect};

/// Everything the driver needs to know about the outside world for a single frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub delta_time: f64,
    /// Pointer position in screen coordinates.
    pub pointer: Option<Vec2>,
    pub primary_button_down: bool,
    pub focused: bool,
}

impl FrameInput {
    /// The window follows the pointer while the primary button is held on the focused window.
    pub fn is_drag_gesture(&self) -> bool {
        self.primary_button_down && self.focused
    }
}

/// What to draw for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutput {
    /// Index of the clip whose sprite sheet should be drawn.
    pub clip: usize,
    /// Region of the sprite sheet to draw.
    pub source: Rect,
    /// Where the window was moved to.
    pub window_position: IVec2,
    pub is_dragging: bool,
}

/// Drives the playlist and the window position, once per frame.
pub struct PlaybackDriver {
    playlist: Playlist,
    drag: DragController,

    /// Base position of the window. Dragging moves it, motion offsets are applied on top of it.
    origin: Vec2,

    /// Resolution dependent scale for motion amplitudes.
    scale: f32,
}

impl PlaybackDriver {
    pub fn new(playlist: Playlist, origin: Vec2, scale: f32) -> Self {
        Self {
            playlist,
            drag: DragController::default(),
            origin,
            scale,
        }
    }

    #[inline]
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn update(&mut self, input: &FrameInput, window: &mut dyn WindowMover) -> FrameOutput {
        let drag = self.drag.update(input.pointer, input.is_drag_gesture());

        // The animation holds still while being dragged.
        if !drag.is_dragging {
            self.playlist.tick(input.delta_time);
        }

        // Switch before sampling so a new clip always starts on its first frame.
        self.playlist.maybe_advance();

        let clip = self.playlist.active_clip();
        let source = clip.sample();

        let position = if drag.is_dragging {
            self.origin += drag.delta;
            self.origin
        } else {
            let def = clip.def();
            self.origin
                + motion::offset(
                    def.motion,
                    clip.elapsed(),
                    def.duration,
                    def.amplitude,
                    self.scale,
                )
        };

        let window_position = position.round().as_ivec2();
        window.set_window_position(window_position);

        FrameOutput {
            clip: self.playlist.active_index(),
            source,
            window_position,
            is_dragging: drag.is_dragging,
        }
    }
}

use glam::UVec2;
use tracing::debug;

use super::{
    config::{ClipDef, ConfigError},
    sampler::{self, Rect},
};

/// A sprite sheet animation and its playback clock.
#[derive(Debug)]
pub struct Clip {
    def: ClipDef,

    /// Size of the sprite sheet in texels. Zero when the sheet is blank.
    sheet_size: UVec2,

    /// Seconds since the current loop iteration started, always in `[0, duration)`.
    elapsed: f64,
}

impl Clip {
    /// Create a clip for a sprite sheet of `sheet_size` texels. Every frame of the clip has to fit
    /// inside the sheet, unless the sheet is blank.
    pub fn new(def: ClipDef, sheet_size: UVec2) -> Result<Self, ConfigError> {
        let is_blank = sheet_size.x == 0 || sheet_size.y == 0;
        if !is_blank {
            let frame_size = UVec2::new(def.frame_width, def.frame_height);
            // Horizontal offsets repeat within `sheet_width` frames and rows only grow, so those
            // frames plus the last one cover every placement.
            let last = def.frame_count.saturating_sub(1);
            let all_fit = (0..def.frame_count.min(sheet_size.x))
                .chain([last])
                .all(|index| {
                    sampler::frame_rect(index, frame_size, sheet_size.x).fits_in(sheet_size)
                });

            if !all_fit {
                return Err(ConfigError::FramesOutsideSheet {
                    index: def.index,
                    name: def.name,
                    frame_count: def.frame_count,
                    frame_width: def.frame_width,
                    frame_height: def.frame_height,
                    sheet_width: sheet_size.x,
                    sheet_height: sheet_size.y,
                });
            }
        }

        Ok(Self {
            def,
            sheet_size,
            elapsed: 0.0,
        })
    }

    #[inline]
    pub fn def(&self) -> &ClipDef {
        &self.def
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frame_size(&self) -> UVec2 {
        UVec2::new(self.def.frame_width, self.def.frame_height)
    }

    /// Advance the clock and return the number of loop iterations completed.
    fn advance(&mut self, delta_time: f64) -> u32 {
        self.elapsed += delta_time;
        if self.elapsed < self.def.duration {
            return 0;
        }

        // Keep the remainder so motion carries over the loop boundary. The cycle count is derived
        // from the remainder so both always agree.
        let remainder = self.elapsed.rem_euclid(self.def.duration);
        let cycles = ((self.elapsed - remainder) / self.def.duration).round();
        self.elapsed = remainder;
        cycles as u32
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// The sprite sheet rectangle for the current time.
    pub fn sample(&self) -> Rect {
        sampler::sample(
            self.elapsed,
            self.def.duration,
            self.def.frame_count,
            self.frame_size(),
            self.sheet_size.x,
        )
    }
}

/// The clips of a pet, played one after the other.
pub struct Playlist {
    clips: Vec<Clip>,
    active: usize,
    /// Loop iterations the active clip completed since it became active.
    completed_loops: u32,
}

impl Playlist {
    pub fn new(clips: Vec<Clip>) -> Result<Self, ConfigError> {
        if clips.is_empty() {
            return Err(ConfigError::EmptyPlaylist);
        }

        Ok(Self {
            clips,
            active: 0,
            completed_loops: 0,
        })
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn active_clip(&self) -> &Clip {
        &self.clips[self.active]
    }

    /// Advance the active clip's clock by `delta_time` seconds.
    pub fn tick(&mut self, delta_time: f64) {
        let cycles = self.clips[self.active].advance(delta_time);
        self.completed_loops = self.completed_loops.saturating_add(cycles);
    }

    /// Switch to the next clip once the active one played all of its loops. Returns `true` if the
    /// active clip changed.
    pub fn maybe_advance(&mut self) -> bool {
        // Allows `loops + 1` full cycles, the switch happens on the one after.
        let loops = self.active_clip().def.loops;
        if self.completed_loops <= loops.saturating_add(1) {
            return false;
        }

        self.clips[self.active].reset();
        self.completed_loops = 0;
        self.active = (self.active + 1) % self.clips.len();
        self.clips[self.active].reset();

        debug!(
            "Switched to clip {} ({})",
            self.active,
            self.active_clip().def.name
        );

        true
    }
}

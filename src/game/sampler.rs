use glam::UVec2;

/// A rectangle inside a sprite sheet, in texels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub pos: UVec2,
    pub size: UVec2,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            pos: UVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }

    /// Exclusive bottom right corner, `None` if it does not fit in `u32`.
    pub fn max(&self) -> Option<UVec2> {
        Some(UVec2::new(
            self.pos.x.checked_add(self.size.x)?,
            self.pos.y.checked_add(self.size.y)?,
        ))
    }

    pub fn fits_in(&self, size: UVec2) -> bool {
        self.max().is_some_and(|max| max.x <= size.x && max.y <= size.y)
    }
}

/// Frame index for a point in a clip. `elapsed` has to be in `[0, duration)`.
pub fn frame_index(elapsed: f64, duration: f64, frame_count: u32) -> u32 {
    let index = (elapsed / duration * frame_count as f64).floor() as u32;
    // Rounding can push the last instant before `duration` onto `frame_count`.
    index.min(frame_count.saturating_sub(1))
}

/// Location of a frame in a sprite sheet. Frames are laid out left to right and wrap onto the next
/// row of `frame_size.y` texels once a row of `sheet_width` is full.
pub fn frame_rect(index: u32, frame_size: UVec2, sheet_width: u32) -> Rect {
    if sheet_width == 0 {
        // Blank texture, nothing to index into.
        return Rect {
            pos: UVec2::ZERO,
            size: frame_size,
        };
    }

    let offset = index as u64 * frame_size.x as u64;
    let sheet_width = sheet_width as u64;
    let row = u32::try_from(offset / sheet_width).unwrap_or(u32::MAX);

    Rect {
        // Rows past the end of the addressable range saturate, so they never fit a sheet.
        pos: UVec2::new(
            (offset % sheet_width) as u32,
            row.saturating_mul(frame_size.y),
        ),
        size: frame_size,
    }
}

/// The sprite sheet rectangle to show `elapsed` seconds into a clip.
pub fn sample(
    elapsed: f64,
    duration: f64,
    frame_count: u32,
    frame_size: UVec2,
    sheet_width: u32,
) -> Rect {
    frame_rect(
        frame_index(elapsed, duration, frame_count),
        frame_size,
        sheet_width,
    )
}

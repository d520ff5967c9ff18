use std::sync::Arc;

use glam::{IVec2, UVec2};
use winit::window::{Window, WindowAttributes, WindowLevel};

/// Something that can be moved around the screen.
pub trait WindowMover {
    /// Move the top left corner of the window to `position` in physical screen coordinates.
    fn set_window_position(&mut self, position: IVec2);
}

impl WindowMover for Arc<Window> {
    fn set_window_position(&mut self, position: IVec2) {
        self.set_outer_position(winit::dpi::PhysicalPosition::new(position.x, position.y));
    }
}

/// Attributes for a borderless, transparent window that stays on top of everything else.
pub fn overlay_window_attributes(title: &str, size: UVec2) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(title)
        .with_inner_size(winit::dpi::PhysicalSize::new(size.x.max(1), size.y.max(1)))
        .with_transparent(true)
        .with_decorations(false)
        .with_resizable(false)
        .with_window_level(WindowLevel::AlwaysOnTop)
}

/// The on screen position of the window, or `None` if the platform does not expose it.
pub fn outer_position(window: &Window) -> Option<IVec2> {
    window
        .outer_position()
        .ok()
        .map(|winit::dpi::PhysicalPosition { x, y }| IVec2::new(x, y))
}

/// The on screen position of the window client area, or `None` if the platform does not expose
/// it.
pub fn inner_position(window: &Window) -> Option<IVec2> {
    window
        .inner_position()
        .ok()
        .map(|winit::dpi::PhysicalPosition { x, y }| IVec2::new(x, y))
}

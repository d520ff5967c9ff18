use glam::Vec2;
use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Input state sampled once per frame.
#[derive(Default)]
pub struct InputState {
    /// The position of the cursor on screen in physical pixels, taken when the cursor last moved.
    /// Set to `None` if the cursor is not over the client area.
    ///
    /// Moving the window does not change it: the cursor stays where it is on screen.
    pointer_position: Option<Vec2>,

    /// Physical position of the window client area on screen. Kept up to date by the owner of
    /// the window, `WindowEvent::Moved` reports the outer position.
    window_position: Vec2,

    primary_pressed: bool,
    focused: bool,
    close_requested: bool,
}

impl InputState {
    pub(crate) fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved {
                position: winit::dpi::PhysicalPosition { x, y },
                ..
            } => {
                let cursor = Vec2::new(*x as f32, *y as f32);
                self.pointer_position = Some(self.window_position + cursor);
            }

            WindowEvent::CursorLeft { .. } => self.pointer_position = None,

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.primary_pressed = state.is_pressed();
            }

            WindowEvent::Focused(focused) => {
                self.focused = *focused;
                if !focused {
                    // Release events are not delivered to unfocused windows.
                    self.primary_pressed = false;
                }
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                self.close_requested = true;
            }

            WindowEvent::CloseRequested => self.close_requested = true,

            _ => {}
        }
    }

    /// Set the on screen position of the window client area, used to translate the following
    /// cursor positions into screen coordinates.
    pub(crate) fn set_window_position(&mut self, position: Vec2) {
        self.window_position = position;
    }
}

impl InputState {
    /// The last known cursor position in screen coordinates.
    pub fn pointer_position(&self) -> Option<Vec2> {
        self.pointer_position
    }

    pub fn primary_button_down(&self) -> bool {
        self.primary_pressed
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }
}

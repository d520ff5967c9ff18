use super::{input::InputState, renderer::Frame, window::WindowMover};

/// A trait that represents a scene in the engine. It splits each stage of a frame into separate
/// function calls.
#[allow(unused)]
pub trait Scene {
    /// Called when the size of the window surface is changed.
    fn resize(&mut self, width: u32, height: u32) {}

    /// Called each frame with the `delta_time` in seconds since the previous frame and the state
    /// of all input devices. The scene may move the window it is shown in.
    fn update(&mut self, delta_time: f64, input: &InputState, window: &mut dyn WindowMover);

    /// Called to render the frame to the surface.
    fn render(&mut self, frame: &mut Frame);
}

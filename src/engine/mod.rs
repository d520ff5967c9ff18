pub mod assets;
pub mod audio;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod window;

pub mod prelude {
    pub use super::assets::*;
    pub use super::input::*;
    pub use super::renderer::*;
    pub use super::scene::*;
    pub use super::window::*;
    pub use glam::{IVec2, UVec2, Vec2};
}

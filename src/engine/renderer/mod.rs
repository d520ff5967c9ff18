mod render;
mod surface;
mod uniform_buffer;

pub use render::*;
pub use surface::*;
pub use uniform_buffer::*;

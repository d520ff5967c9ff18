pub mod clip;
pub mod config;
pub mod drag;
pub mod driver;
pub mod motion;
pub mod pet;
pub mod sampler;
pub mod scenes;
pub mod sprite_renderer;

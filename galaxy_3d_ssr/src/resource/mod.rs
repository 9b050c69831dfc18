/// Resource module - per-camera textures

pub mod resource_cache;

pub use resource_cache::*;

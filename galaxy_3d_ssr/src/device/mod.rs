/// Device module - host-facing rendering traits and types

pub mod texture;
pub mod material;
pub mod command_list;
pub mod graphics_device;

#[cfg(test)]
pub mod mock_graphics_device;

pub use texture::*;
pub use material::*;
pub use command_list::*;
pub use graphics_device::*;

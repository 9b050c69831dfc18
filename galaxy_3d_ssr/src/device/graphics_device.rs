/// Graphics device trait: texture creation, command submission, capabilities

use std::sync::Arc;
use crate::error::Result;
use crate::device::{Texture, TextureDesc, TextureFormat, CommandList};

/// Graphics API family of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsBackend {
    Vulkan,
    Direct3D11,
    Direct3D12,
    Metal,
    OpenGLCore,
    OpenGLES3,
    /// Software reference device
    Software,
}

impl GraphicsBackend {
    /// Legacy OpenGL family backends
    pub fn is_opengl(&self) -> bool {
        matches!(self, GraphicsBackend::OpenGLCore | GraphicsBackend::OpenGLES3)
    }
}

/// Device counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Textures created since device creation
    pub textures_created: u64,
    /// Command lists submitted
    pub submissions: u64,
    /// Blits executed
    pub blits: u64,
    /// Renderer list draws executed
    pub draws: u64,
}

/// Main graphics device trait
///
/// Implemented by backend-specific devices (e.g., CpuGraphicsDevice).
/// Shared as `Arc<Mutex<dyn GraphicsDevice>>`.
pub trait GraphicsDevice: Send + Sync {
    /// API family
    fn backend(&self) -> GraphicsBackend;

    /// Maximum number of simultaneous color attachments
    fn max_color_attachments(&self) -> u32;

    /// Whether the format can be used as a color or depth render target
    fn supports_render_format(&self, format: TextureFormat) -> bool;

    /// Create a texture
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create an empty command list
    fn create_command_list(&self) -> Result<Box<dyn CommandList>>;

    /// Execute recorded command lists in order
    fn submit(&mut self, commands: &[&dyn CommandList]) -> Result<()>;

    /// Counters for diagnostics
    fn stats(&self) -> DeviceStats;
}

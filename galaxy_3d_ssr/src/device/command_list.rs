/// Command list trait and the render state it records

use std::any::Any;
use std::sync::Arc;
use bitflags::bitflags;
use crate::error::Result;
use crate::device::{Texture, Material, ShaderPass, ShaderKeywords};

// ===== ATTACHMENTS =====

/// What happens to attachment contents when a pass starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    Load,
    Clear,
    DontCare,
}

/// What happens to attachment contents when a pass ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Store,
    DontCare,
}

/// Render target binding with load/store behavior
#[derive(Clone)]
pub struct Attachment {
    pub texture: Arc<dyn Texture>,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
}

impl Attachment {
    pub fn new(texture: &Arc<dyn Texture>, load_op: LoadOp, store_op: StoreOp) -> Self {
        Self { texture: Arc::clone(texture), load_op, store_op }
    }

    /// Contents are read and kept
    pub fn load_store(texture: &Arc<dyn Texture>) -> Self {
        Self::new(texture, LoadOp::Load, StoreOp::Store)
    }

    /// Contents are fully overwritten and kept
    pub fn discard_store(texture: &Arc<dyn Texture>) -> Self {
        Self::new(texture, LoadOp::DontCare, StoreOp::Store)
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("texture", &self.texture.info().name)
            .field("load_op", &self.load_op)
            .field("store_op", &self.store_op)
            .finish()
    }
}

bitflags! {
    /// Which bound attachments a clear touches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

// ===== RENDER STATE =====

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

impl CompareFunction {
    /// Whether an incoming value passes against the stored one
    pub fn passes(&self, incoming: f32, stored: f32) -> bool {
        match self {
            CompareFunction::Never => false,
            CompareFunction::Less => incoming < stored,
            CompareFunction::Equal => incoming == stored,
            CompareFunction::LessEqual => incoming <= stored,
            CompareFunction::Greater => incoming > stored,
            CompareFunction::NotEqual => incoming != stored,
            CompareFunction::GreaterEqual => incoming >= stored,
            CompareFunction::Always => true,
        }
    }
}

/// Face culling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    Off,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    pub write_enabled: bool,
    pub compare: CompareFunction,
}

impl DepthState {
    pub fn new(write_enabled: bool, compare: CompareFunction) -> Self {
        Self { write_enabled, compare }
    }
}

/// Overrides applied to every renderer drawn by a renderer list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStateBlock {
    pub depth: DepthState,
    pub cull: CullMode,
}

impl Default for RenderStateBlock {
    fn default() -> Self {
        Self {
            depth: DepthState::new(true, CompareFunction::LessEqual),
            cull: CullMode::Back,
        }
    }
}

/// Which shader of each renderer is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderTag {
    /// Depth only output
    DepthOnly,
    /// Albedo, specular/occlusion, normal/smoothness outputs
    GBuffer,
}

/// Render queue filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderQueueRange {
    Opaque,
    Transparent,
    All,
}

/// Host renderers drawn in one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererListDesc {
    pub shader_tag: ShaderTag,
    pub queue: RenderQueueRange,
    pub state: RenderStateBlock,
}

impl RendererListDesc {
    pub fn opaque(shader_tag: ShaderTag, state: RenderStateBlock) -> Self {
        Self { shader_tag, queue: RenderQueueRange::Opaque, state }
    }
}

/// Program pass applied by a blit
#[derive(Clone, Copy)]
pub struct ProgramPass<'a> {
    pub material: &'a Arc<dyn Material>,
    pub pass: ShaderPass,
}

impl<'a> ProgramPass<'a> {
    pub fn new(material: &'a Arc<dyn Material>, pass: ShaderPass) -> Self {
        Self { material, pass }
    }
}

// ===== COMMAND LIST TRAIT =====

/// Command list for recording reflection work
///
/// Commands are recorded in order and executed by `GraphicsDevice::submit`.
pub trait CommandList: Send + Sync {
    /// Open a named profiling scope
    fn begin_sample(&mut self, name: &str) -> Result<()>;

    /// Close the innermost profiling scope
    fn end_sample(&mut self) -> Result<()>;

    /// Bind color and depth targets for subsequent clears and draws
    fn set_render_targets(&mut self, colors: &[Attachment], depth: Option<&Attachment>) -> Result<()>;

    /// Clear the bound targets
    fn clear(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32) -> Result<()>;

    /// Draw host renderers into the bound targets
    fn draw_renderers(&mut self, desc: &RendererListDesc) -> Result<()>;

    /// Full-screen copy, optionally through a program pass
    fn blit(
        &mut self,
        source: &Arc<dyn Texture>,
        destination: &Arc<dyn Texture>,
        program: Option<ProgramPass<'_>>,
    ) -> Result<()>;

    /// Rebuild the mip chain from level 0
    fn generate_mips(&mut self, texture: &Arc<dyn Texture>) -> Result<()>;

    /// Upload the uniform block used by subsequent program passes
    fn push_constants(&mut self, data: &[u8]) -> Result<()>;

    /// Enable or disable shader keywords
    fn set_keyword(&mut self, keyword: ShaderKeywords, enabled: bool) -> Result<()>;

    /// Bind a texture under a global shader property name
    fn set_global_texture(&mut self, name: &str, texture: &Arc<dyn Texture>) -> Result<()>;

    /// Unbind a global shader property; programs then read its default
    fn clear_global_texture(&mut self, name: &str) -> Result<()>;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
#[path = "command_list_tests.rs"]
mod tests;

/// Back-face depth pass
///
/// Renders the depth of back faces so the hit test can bound each occluder by
/// its real thickness instead of a constant. Far (cleared) texels mean no back
/// face was drawn there; the resolve falls back to the constant thickness.

use crate::device::{
    Attachment, ClearFlags, CommandList, CompareFunction, CullMode, DepthState, RenderStateBlock,
    RendererListDesc, ShaderKeywords, ShaderTag, TextureDesc, TextureFormat, FilterMode,
};
use crate::error::Result;
use crate::passes::{PassContext, ReflectionPass};
use crate::resource::ResourceSlot;
use crate::schedule::PassKind;

/// Depth the back-face buffer is cleared to
pub const FAR_DEPTH: f32 = 1.0;

#[derive(Debug, Default)]
pub struct ThicknessPass;

impl ThicknessPass {
    pub fn new() -> Self {
        Self
    }

    /// Back-face depth texture: target extent, single-sample
    pub fn back_depth_desc(ctx: &PassContext<'_>) -> TextureDesc {
        let target = ctx.frame.info.target;
        TextureDesc::new(ResourceSlot::BackFaceDepth.global_name(), target.width, target.height, TextureFormat::D32_FLOAT)
            .with_filter(FilterMode::Point)
    }

    /// State overrides for the back-face draw
    pub fn render_state() -> RenderStateBlock {
        RenderStateBlock {
            depth: DepthState::new(true, CompareFunction::LessEqual),
            cull: CullMode::Front,
        }
    }
}

impl ReflectionPass for ThicknessPass {
    fn kind(&self) -> PassKind {
        PassKind::Thickness
    }

    fn setup(&mut self, ctx: &mut PassContext<'_>, cmd: &mut dyn CommandList) -> Result<()> {
        let desc = Self::back_depth_desc(ctx);
        let back_depth = ctx.acquire(ResourceSlot::BackFaceDepth, &desc)?;
        cmd.set_global_texture(ResourceSlot::BackFaceDepth.global_name(), &back_depth)
    }

    fn execute(&mut self, ctx: &mut PassContext<'_>, cmd: &mut dyn CommandList) -> Result<()> {
        if !ctx.config.uses_backface() {
            return cmd.set_keyword(ShaderKeywords::BACKFACE_ENABLED, false);
        }

        let back_depth = ctx.texture(ResourceSlot::BackFaceDepth)?;
        cmd.begin_sample(PassKind::Thickness.profiler_tag())?;
        cmd.set_render_targets(&[], Some(&Attachment::discard_store(&back_depth)))?;
        cmd.clear(ClearFlags::DEPTH, [0.0; 4], FAR_DEPTH)?;
        cmd.draw_renderers(&RendererListDesc::opaque(ShaderTag::DepthOnly, Self::render_state()))?;
        cmd.set_keyword(ShaderKeywords::BACKFACE_ENABLED, true)?;
        cmd.end_sample()
    }
}

#[cfg(test)]
#[path = "thickness_tests.rs"]
mod tests;

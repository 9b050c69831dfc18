/// Forward-path surface attribute buffers
///
/// Forward rendering never writes albedo, specular or normal + smoothness to
/// separate targets. This pass redraws opaque geometry with the `GBuffer` tag
/// into three single-sample targets the resolve can read:
///
/// - `_GBuffer0`: albedo + material flags (sRGB in linear color space)
/// - `_GBuffer1`: specular + occlusion
/// - `_GBuffer2`: normal + smoothness (SNORM, float fallback)
///
/// When the camera depth can be reused the pass primes against it with an
/// `Equal` test, otherwise it renders into a private depth buffer.

use std::sync::Arc;
use crate::device::{
    Attachment, ClearFlags, CommandList, CompareFunction, CullMode, DepthState, FilterMode, LoadOp,
    RenderStateBlock, RendererListDesc, ShaderTag, StoreOp, Texture, TextureDesc, TextureFormat,
};
use crate::error::Result;
use crate::host::{CameraKind, CameraRenderType, ColorSpace};
use crate::passes::{PassContext, ReflectionPass};
use crate::resource::ResourceSlot;
use crate::schedule::PassKind;

/// Attribute buffers are cleared to transparent black
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Depth target selection for the attribute draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthPlan {
    /// Reuse the camera depth, clear color only
    CameraDepth,
    /// Private `_GBuffersDepthTexture`, clear color and depth
    Private,
}

#[derive(Debug, Default)]
pub struct AttributeSynthesisPass;

impl AttributeSynthesisPass {
    pub fn new() -> Self {
        Self
    }

    pub fn albedo_format(color_space: ColorSpace) -> TextureFormat {
        match color_space {
            ColorSpace::Linear => TextureFormat::R8G8B8A8_SRGB,
            ColorSpace::Gamma => TextureFormat::R8G8B8A8_UNORM,
        }
    }

    pub fn specular_format() -> TextureFormat {
        TextureFormat::R8G8B8A8_UNORM
    }

    /// SNORM normals, float when the device cannot render SNORM
    pub fn normals_format(ctx: &PassContext<'_>) -> TextureFormat {
        if ctx.device.supports_render_format(TextureFormat::R8G8B8A8_SNORM) {
            TextureFormat::R8G8B8A8_SNORM
        } else {
            TextureFormat::R16G16B16A16_SFLOAT
        }
    }

    pub fn depth_plan(ctx: &PassContext<'_>) -> DepthPlan {
        let multisampled = ctx.frame.info.target.is_multisampled() || ctx.frame.depth.info().is_multisampled();
        if multisampled || ctx.host.backend.is_opengl() {
            DepthPlan::Private
        } else {
            DepthPlan::CameraDepth
        }
    }

    /// Host normals reused as channel 2
    ///
    /// Scene-view cameras always get their own buffer: the host normals of an
    /// inspection camera may alias another camera's target.
    pub fn shared_normals(ctx: &PassContext<'_>) -> Option<Arc<dyn Texture>> {
        if ctx.frame.info.kind == CameraKind::SceneView {
            return None;
        }
        ctx.frame.normals.clone()
    }

    pub fn render_state(ctx: &PassContext<'_>, plan: DepthPlan) -> RenderStateBlock {
        let info = &ctx.frame.info;
        let depth = match plan {
            DepthPlan::CameraDepth if info.render_type == CameraRenderType::Base || info.clears_depth => {
                DepthState::new(false, CompareFunction::Equal)
            }
            _ => DepthState::new(true, CompareFunction::LessEqual),
        };
        RenderStateBlock { depth, cull: CullMode::Back }
    }

    fn target_desc(ctx: &PassContext<'_>, slot: ResourceSlot, format: TextureFormat) -> TextureDesc {
        let target = ctx.frame.info.target;
        TextureDesc::new(slot.global_name(), target.width, target.height, format).with_filter(FilterMode::Point)
    }

    fn normals_target(ctx: &PassContext<'_>) -> Result<Arc<dyn Texture>> {
        match Self::shared_normals(ctx) {
            Some(normals) => Ok(normals),
            None => ctx.texture(ResourceSlot::GBuffer2),
        }
    }
}

impl ReflectionPass for AttributeSynthesisPass {
    fn kind(&self) -> PassKind {
        PassKind::AttributeSynthesis
    }

    fn setup(&mut self, ctx: &mut PassContext<'_>, cmd: &mut dyn CommandList) -> Result<()> {
        let albedo_desc = Self::target_desc(ctx, ResourceSlot::GBuffer0, Self::albedo_format(ctx.host.color_space));
        let specular_desc = Self::target_desc(ctx, ResourceSlot::GBuffer1, Self::specular_format());
        let albedo = ctx.acquire(ResourceSlot::GBuffer0, &albedo_desc)?;
        let specular = ctx.acquire(ResourceSlot::GBuffer1, &specular_desc)?;

        let normals = match Self::shared_normals(ctx) {
            Some(normals) => normals,
            None => {
                let desc = Self::target_desc(ctx, ResourceSlot::GBuffer2, Self::normals_format(ctx));
                ctx.acquire(ResourceSlot::GBuffer2, &desc)?
            }
        };

        if Self::depth_plan(ctx) == DepthPlan::Private {
            let desc = Self::target_desc(ctx, ResourceSlot::GBufferDepth, TextureFormat::D32_FLOAT);
            ctx.acquire(ResourceSlot::GBufferDepth, &desc)?;
        }

        cmd.set_global_texture(ResourceSlot::GBuffer0.global_name(), &albedo)?;
        cmd.set_global_texture(ResourceSlot::GBuffer1.global_name(), &specular)?;
        cmd.set_global_texture(ResourceSlot::GBuffer2.global_name(), &normals)
    }

    fn execute(&mut self, ctx: &mut PassContext<'_>, cmd: &mut dyn CommandList) -> Result<()> {
        let plan = Self::depth_plan(ctx);
        let colors = [
            Attachment::new(&ctx.texture(ResourceSlot::GBuffer0)?, LoadOp::Clear, StoreOp::Store),
            Attachment::new(&ctx.texture(ResourceSlot::GBuffer1)?, LoadOp::Clear, StoreOp::Store),
            Attachment::new(&Self::normals_target(ctx)?, LoadOp::Clear, StoreOp::Store),
        ];
        let (depth, clear_flags) = match plan {
            DepthPlan::CameraDepth => (Attachment::load_store(&ctx.frame.depth), ClearFlags::COLOR),
            DepthPlan::Private => (
                Attachment::new(&ctx.texture(ResourceSlot::GBufferDepth)?, LoadOp::Clear, StoreOp::DontCare),
                ClearFlags::COLOR | ClearFlags::DEPTH,
            ),
        };

        cmd.begin_sample(PassKind::AttributeSynthesis.profiler_tag())?;
        cmd.set_render_targets(&colors, Some(&depth))?;
        cmd.clear(clear_flags, CLEAR_COLOR, 1.0)?;
        cmd.draw_renderers(&RendererListDesc::opaque(ShaderTag::GBuffer, Self::render_state(ctx, plan)))?;
        cmd.end_sample()
    }
}

#[cfg(test)]
#[path = "attribute_synthesis_tests.rs"]
mod tests;

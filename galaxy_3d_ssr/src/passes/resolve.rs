/// Reflection march and resolve
///
/// Two algorithms share this pass:
///
/// - **Approximation**: copy camera color to a source buffer, march rays into a
///   (possibly down-sampled, possibly mipmapped) reflection buffer, then
///   composite it over camera color weighted by the hit mask.
/// - **PBR Accumulation**: march roughness-jittered rays into a hit buffer,
///   resolve them against scene color at full resolution, then blend the
///   result with the reprojected history and store it for the next frame.

use std::sync::Arc;
use crate::config::{Algorithm, ReflectionConfig};
use crate::device::{
    property, Attachment, CommandList, FilterMode, Material, ProgramPass, ShaderKeywords, ShaderPass,
    Texture, TextureDesc, TextureFormat,
};
use crate::error::Result;
use crate::passes::{PassContext, ReflectionPass};
use crate::resource::ResourceSlot;
use crate::schedule::PassKind;
use crate::shading::ReflectionUniforms;

/// Hit buffer format: (hit u, hit v, mask, 0)
pub const HIT_FORMAT: TextureFormat = TextureFormat::R16G16B16A16_SFLOAT;

#[derive(Debug, Default)]
pub struct ResolvePass;

impl ResolvePass {
    pub fn new() -> Self {
        Self
    }

    fn full_desc(ctx: &PassContext<'_>, slot: ResourceSlot) -> TextureDesc {
        let target = ctx.frame.info.target;
        TextureDesc::new(slot.global_name(), target.width, target.height, target.color_format)
            .with_filter(FilterMode::Point)
    }

    fn scaled_desc(ctx: &PassContext<'_>, slot: ResourceSlot, format: TextureFormat) -> TextureDesc {
        let target = ctx.frame.info.target;
        let (width, height) = ctx.config.resolution.scaled_extent(target.width, target.height);
        TextureDesc::new(slot.global_name(), width, height, format)
    }

    /// Scaled hit buffer (accumulation)
    pub fn hit_desc(ctx: &PassContext<'_>) -> TextureDesc {
        Self::scaled_desc(ctx, ResourceSlot::Hit, HIT_FORMAT).with_filter(FilterMode::Point)
    }

    /// Full-resolution history in the camera color format (accumulation)
    pub fn history_desc(ctx: &PassContext<'_>) -> TextureDesc {
        Self::full_desc(ctx, ResourceSlot::History)
    }

    /// Camera color copy read by the approximation march
    pub fn source_desc(ctx: &PassContext<'_>) -> TextureDesc {
        Self::full_desc(ctx, ResourceSlot::Source)
    }

    /// Reflection buffer: full resolution when accumulating, scaled otherwise
    pub fn reflection_desc(ctx: &PassContext<'_>) -> TextureDesc {
        match ctx.config.algorithm {
            Algorithm::PbrAccumulation => Self::full_desc(ctx, ResourceSlot::ReflectionColor),
            Algorithm::Approximation => {
                let desc = Self::scaled_desc(ctx, ResourceSlot::ReflectionColor, ctx.frame.info.target.color_format);
                if ctx.config.uses_mipmaps() {
                    desc.with_mip_chain().with_filter(FilterMode::Trilinear)
                } else {
                    desc.with_filter(FilterMode::Point)
                }
            }
        }
    }

    /// Temporal blend runs only with trusted motion and a non-zero factor
    pub fn blends_history(config: &ReflectionConfig, motion_valid: bool) -> bool {
        motion_valid && config.accumulation_factor != 0.0
    }

    fn execute_approximation(
        ctx: &PassContext<'_>,
        material: &Arc<dyn Material>,
        cmd: &mut dyn CommandList,
    ) -> Result<()> {
        let color = &ctx.frame.color;
        let source = ctx.texture(ResourceSlot::Source)?;
        let reflection = ctx.texture(ResourceSlot::ReflectionColor)?;
        let mipmapped = reflection.info().has_mips();

        cmd.set_keyword(ShaderKeywords::APPROX_COLOR_MIPMAPS, mipmapped)?;
        cmd.blit(color, &source, None)?;
        cmd.blit(&source, &reflection, Some(ProgramPass::new(material, ShaderPass::ApproximateMarch)))?;
        if mipmapped {
            cmd.generate_mips(&reflection)?;
        }
        cmd.blit(&reflection, color, Some(ProgramPass::new(material, ShaderPass::ApproximateComposite)))
    }

    fn execute_accumulation(
        ctx: &PassContext<'_>,
        material: &Arc<dyn Material>,
        cmd: &mut dyn CommandList,
    ) -> Result<()> {
        let color = &ctx.frame.color;
        let hit = ctx.texture(ResourceSlot::Hit)?;
        let reflection = ctx.texture(ResourceSlot::ReflectionColor)?;

        cmd.blit(color, &hit, Some(ProgramPass::new(material, ShaderPass::AccumulationHit)))?;
        cmd.blit(color, &reflection, Some(ProgramPass::new(material, ShaderPass::AccumulationResolve)))?;
        cmd.blit(&reflection, color, None)?;

        if Self::blends_history(ctx.config, ctx.motion_valid) {
            let history = ctx.texture(ResourceSlot::History)?;
            cmd.blit(&reflection, color, Some(ProgramPass::new(material, ShaderPass::TemporalBlend)))?;
            cmd.set_render_targets(&[Attachment::load_store(&history)], None)?;
            cmd.blit(color, &history, None)?;
        }
        Ok(())
    }

    fn bind(cmd: &mut dyn CommandList, slot: ResourceSlot, texture: &Arc<dyn Texture>) -> Result<()> {
        cmd.set_global_texture(slot.global_name(), texture)
    }
}

impl ReflectionPass for ResolvePass {
    fn kind(&self) -> PassKind {
        PassKind::Resolve
    }

    fn setup(&mut self, ctx: &mut PassContext<'_>, cmd: &mut dyn CommandList) -> Result<()> {
        if ctx.material.is_none() {
            return Ok(());
        }

        cmd.set_global_texture(property::CAMERA_DEPTH, &ctx.frame.depth)?;
        match &ctx.frame.motion {
            Some(motion) => cmd.set_global_texture(property::MOTION_VECTOR, motion)?,
            // Unbound motion reads as zero
            None => cmd.clear_global_texture(property::MOTION_VECTOR)?,
        }

        match ctx.config.algorithm {
            Algorithm::PbrAccumulation => {
                let hit_desc = Self::hit_desc(ctx);
                let history_desc = Self::history_desc(ctx);
                let hit = ctx.acquire(ResourceSlot::Hit, &hit_desc)?;
                let history = ctx.acquire(ResourceSlot::History, &history_desc)?;
                Self::bind(cmd, ResourceSlot::Hit, &hit)?;
                Self::bind(cmd, ResourceSlot::History, &history)?;
            }
            Algorithm::Approximation => {
                let source_desc = Self::source_desc(ctx);
                let source = ctx.acquire(ResourceSlot::Source, &source_desc)?;
                Self::bind(cmd, ResourceSlot::Source, &source)?;
            }
        }

        let reflection_desc = Self::reflection_desc(ctx);
        let reflection = ctx.acquire(ResourceSlot::ReflectionColor, &reflection_desc)?;
        Self::bind(cmd, ResourceSlot::ReflectionColor, &reflection)
    }

    fn execute(&mut self, ctx: &mut PassContext<'_>, cmd: &mut dyn CommandList) -> Result<()> {
        let Some(material) = ctx.material else {
            return Ok(());
        };

        let uniforms = ReflectionUniforms::new(ctx.config, &ctx.frame.info, ctx.frame_index);
        cmd.begin_sample(PassKind::Resolve.profiler_tag())?;
        cmd.push_constants(uniforms.as_bytes())?;
        match ctx.config.algorithm {
            Algorithm::Approximation => Self::execute_approximation(ctx, material, cmd)?,
            Algorithm::PbrAccumulation => Self::execute_accumulation(ctx, material, cmd)?,
        }
        cmd.end_sample()
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;

/// Per-pixel definition of the reflection shader program
///
/// Backends without a shader compiler run `shade` for every destination pixel
/// of a blit; GPU backends compile the equivalent shader.

use glam::{UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};
use crate::device::{ShaderKeywords, ShaderPass};
use crate::shading::fade::{edge_fade, mip_level, smoothness_fade};
use crate::shading::march::{jitter_normal, march_ray, DepthSampler, MarchSettings, ViewProjection};
use crate::shading::temporal::{reproject, temporal_blend};
use crate::shading::ReflectionUniforms;

/// Textures visible to the program
pub trait ProgramInputs {
    /// Blit source, sampled with its own filter at `lod`
    fn source(&self, uv: Vec2, lod: f32) -> Vec4;

    /// Mip count of the blit source
    fn source_mip_count(&self) -> u32;

    /// `_CameraDepthTexture`
    fn scene_depth(&self, uv: Vec2) -> f32;

    /// `_CameraBackDepthTexture`
    fn back_depth(&self, uv: Vec2) -> f32;

    /// `_GBuffer2`: normal xyz, smoothness w
    fn normal_smoothness(&self, uv: Vec2) -> Vec4;

    /// `_ScreenSpaceReflectionHitTexture`
    fn hit(&self, uv: Vec2) -> Vec4;

    /// `_ScreenSpaceReflectionHistoryTexture`
    fn history(&self, uv: Vec2) -> Vec4;

    /// `_MotionVectorTexture`, zero when unbound
    fn motion(&self, uv: Vec2) -> Vec2;
}

/// Destination pixel being shaded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub uv: Vec2,
    pub pixel: UVec2,
    /// Current destination value
    pub destination: Vec4,
}

struct ProgramDepth<'a> {
    inputs: &'a dyn ProgramInputs,
    backface: bool,
}

impl DepthSampler for ProgramDepth<'_> {
    fn front_depth(&self, uv: Vec2) -> f32 {
        self.inputs.scene_depth(uv)
    }

    fn back_depth(&self, uv: Vec2) -> Option<f32> {
        self.backface.then(|| self.inputs.back_depth(uv))
    }
}

/// Shade one fragment of a program pass
pub fn shade(
    pass: ShaderPass,
    fragment: &Fragment,
    inputs: &dyn ProgramInputs,
    uniforms: &ReflectionUniforms,
    keywords: ShaderKeywords,
) -> Vec4 {
    match pass {
        ShaderPass::ApproximateMarch => approximate_march(fragment, inputs, uniforms, keywords),
        ShaderPass::ApproximateComposite => approximate_composite(fragment, inputs, keywords),
        ShaderPass::AccumulationHit => accumulation_hit(fragment, inputs, uniforms, keywords),
        ShaderPass::AccumulationResolve => accumulation_resolve(fragment, inputs),
        ShaderPass::TemporalBlend => temporal(fragment, inputs, uniforms),
    }
}

/// Surface hit for a fragment: (hit uv, mask)
fn trace(
    fragment: &Fragment,
    inputs: &dyn ProgramInputs,
    uniforms: &ReflectionUniforms,
    keywords: ShaderKeywords,
    jitter: bool,
) -> Option<(Vec2, f32)> {
    let depth = inputs.scene_depth(fragment.uv);
    if depth <= 0.0 || depth >= 1.0 {
        return None;
    }

    let surface = inputs.normal_smoothness(fragment.uv);
    let smoothness = surface.w;
    let fade = smoothness_fade(smoothness, uniforms.min_smoothness, uniforms.fade_smoothness);
    if fade <= 0.0 {
        return None;
    }

    let mut normal: Vec3 = surface.xyz().try_normalize()?;
    if jitter {
        normal = jitter_normal(normal, smoothness, fragment.pixel, uniforms.frame_index);
    }

    let sampler = ProgramDepth {
        inputs,
        backface: keywords.contains(ShaderKeywords::BACKFACE_ENABLED),
    };
    let hit = march_ray(
        &ViewProjection::new(uniforms.tan_half_fov),
        fragment.uv,
        depth,
        normal,
        &MarchSettings::from_uniforms(uniforms),
        &sampler,
    )?;
    Some((hit.uv, fade * edge_fade(hit.uv, uniforms.edge_fade)))
}

fn approximate_march(
    fragment: &Fragment,
    inputs: &dyn ProgramInputs,
    uniforms: &ReflectionUniforms,
    keywords: ShaderKeywords,
) -> Vec4 {
    match trace(fragment, inputs, uniforms, keywords, false) {
        Some((uv, mask)) => inputs.source(uv, 0.0).xyz().extend(mask),
        None => Vec4::ZERO,
    }
}

fn approximate_composite(fragment: &Fragment, inputs: &dyn ProgramInputs, keywords: ShaderKeywords) -> Vec4 {
    let lod = if keywords.contains(ShaderKeywords::APPROX_COLOR_MIPMAPS) {
        mip_level(inputs.normal_smoothness(fragment.uv).w, inputs.source_mip_count())
    } else {
        0.0
    };
    let reflection = inputs.source(fragment.uv, lod);
    let scene = fragment.destination;
    scene.xyz().lerp(reflection.xyz(), reflection.w).extend(scene.w)
}

fn accumulation_hit(
    fragment: &Fragment,
    inputs: &dyn ProgramInputs,
    uniforms: &ReflectionUniforms,
    keywords: ShaderKeywords,
) -> Vec4 {
    match trace(fragment, inputs, uniforms, keywords, true) {
        Some((uv, mask)) => Vec4::new(uv.x, uv.y, mask, 0.0),
        None => Vec4::ZERO,
    }
}

fn accumulation_resolve(fragment: &Fragment, inputs: &dyn ProgramInputs) -> Vec4 {
    let scene = inputs.source(fragment.uv, 0.0);
    let hit = inputs.hit(fragment.uv);
    if hit.z <= 0.0 {
        return scene;
    }
    let reflected = inputs.source(hit.xy(), 0.0);
    scene.xyz().lerp(reflected.xyz(), hit.z).extend(scene.w)
}

fn temporal(fragment: &Fragment, inputs: &dyn ProgramInputs, uniforms: &ReflectionUniforms) -> Vec4 {
    let current = inputs.source(fragment.uv, 0.0);
    let history = reproject(fragment.uv, inputs.motion(fragment.uv))
        .map(|uv| inputs.history(uv))
        .unwrap_or(current);
    temporal_blend(history, current, uniforms.accumulation_factor)
}

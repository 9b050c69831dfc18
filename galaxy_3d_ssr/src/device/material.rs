/// Reflection material: the shader program executed by blits

use bitflags::bitflags;

/// Shader the reflection material must be built from
pub const SSR_SHADER_NAME: &str = "Hidden/Lighting/ScreenSpaceReflection";

/// Material trait
///
/// The host owns the compiled program; this crate only needs to verify which
/// shader it was built from.
pub trait Material: Send + Sync {
    fn shader_name(&self) -> &str;
}

/// Plain named material (hosts without their own material type, tests)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderMaterial {
    shader_name: String,
}

impl ShaderMaterial {
    pub fn new(shader_name: &str) -> Self {
        Self { shader_name: shader_name.to_string() }
    }

    /// Material built from the reflection shader
    pub fn reflection() -> Self {
        Self::new(SSR_SHADER_NAME)
    }
}

impl Material for ShaderMaterial {
    fn shader_name(&self) -> &str {
        &self.shader_name
    }
}

/// Program passes of the reflection shader, by pass index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ShaderPass {
    /// March rays, write (reflection rgb, mask)
    ApproximateMarch = 0,
    /// Blend the reflection buffer over camera color
    ApproximateComposite = 1,
    /// March jittered rays, write (hit uv, mask)
    AccumulationHit = 2,
    /// Resolve hit buffer against scene color
    AccumulationResolve = 3,
    /// Blend the reprojected history with the current frame
    TemporalBlend = 4,
}

impl ShaderPass {
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

bitflags! {
    /// Shader keywords toggled on the command list
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderKeywords: u32 {
        /// Thickness comes from `_CameraBackDepthTexture`
        const BACKFACE_ENABLED = 1 << 0;
        /// Composite samples the reflection mip chain
        const APPROX_COLOR_MIPMAPS = 1 << 1;
    }
}

impl ShaderKeywords {
    /// Keyword name as declared by the shader
    pub fn keyword_name(&self) -> &'static str {
        if *self == ShaderKeywords::BACKFACE_ENABLED {
            "_BACKFACE_ENABLED"
        } else if *self == ShaderKeywords::APPROX_COLOR_MIPMAPS {
            "_SSR_APPROX_COLOR_MIPMAPS"
        } else {
            "<keyword set>"
        }
    }
}

// ===== GLOBAL TEXTURE NAMES =====

/// Global texture bindings read by the reflection shader
pub mod property {
    pub const GBUFFER0: &str = "_GBuffer0";
    pub const GBUFFER1: &str = "_GBuffer1";
    pub const GBUFFER2: &str = "_GBuffer2";
    pub const GBUFFERS_DEPTH: &str = "_GBuffersDepthTexture";
    pub const CAMERA_BACK_DEPTH: &str = "_CameraBackDepthTexture";
    pub const SSR_HIT: &str = "_ScreenSpaceReflectionHitTexture";
    pub const SSR_HISTORY: &str = "_ScreenSpaceReflectionHistoryTexture";
    pub const SSR_COLOR: &str = "_ScreenSpaceReflectionColorTexture";
    pub const SSR_SOURCE: &str = "_ScreenSpaceReflectionSourceTexture";
    pub const CAMERA_DEPTH: &str = "_CameraDepthTexture";
    pub const MOTION_VECTOR: &str = "_MotionVectorTexture";
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;

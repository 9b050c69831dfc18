/// Reflection parameters resolved once per frame

/// Ray marching algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Algorithm {
    /// Single-frame march, composited before transparents
    Approximation = 0,
    /// Jittered rays accumulated over frames through a history buffer
    PbrAccumulation = 1,
}

/// Size of the down-sampled reflection buffers relative to the camera target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Resolution {
    Quarter = 1,
    Half = 2,
    ThreeQuarters = 3,
    Full = 4,
}

impl Resolution {
    /// Scale expressed in quarters (1..=4)
    pub fn quarters(&self) -> u32 {
        *self as u32
    }

    /// Scale factor applied to the target size
    pub fn scale(&self) -> f32 {
        self.quarters() as f32 * 0.25
    }

    /// Scaled extent, never below 1x1
    pub fn scaled_extent(&self, width: u32, height: u32) -> (u32, u32) {
        let q = self.quarters();
        ((width * q / 4).max(1), (height * q / 4).max(1))
    }
}

/// Reflection buffer mip generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MipmapsMode {
    /// Point sampled, single level
    None = 0,
    /// Full mip chain sampled by roughness
    Trilinear = 1,
}

/// Source of the per-pixel thickness used by the hit test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ThicknessMode {
    /// Constant scalar thickness
    Constant = 0,
    /// Thickness from a back-face depth pass
    ComputeBackface = 1,
}

/// Ray marching quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Quality {
    Low = 0,
    Medium = 1,
    High = 2,
    Custom = 3,
}

/// March step parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchParams {
    pub step_size: f32,
    pub step_multiplier: f32,
    pub max_steps: u32,
}

impl Quality {
    /// Step parameters of the preset; `custom_max_step` only applies to Custom
    pub fn march_params(&self, custom_max_step: u32) -> MarchParams {
        match self {
            Quality::Low => MarchParams { step_size: 0.4, step_multiplier: 1.33, max_steps: 16 },
            Quality::Medium => MarchParams { step_size: 0.3, step_multiplier: 1.33, max_steps: 32 },
            Quality::High => MarchParams { step_size: 0.2, step_multiplier: 1.33, max_steps: 64 },
            Quality::Custom => MarchParams {
                step_size: 0.2,
                step_multiplier: 1.1,
                max_steps: custom_max_step,
            },
        }
    }
}

/// Gap enforced between min and fade smoothness
pub const FADE_SMOOTHNESS_EPSILON: f32 = 0.01;

pub const MIN_MAX_STEP: u32 = 4;
pub const MAX_MAX_STEP: u32 = 128;

/// Minimum number of simultaneous color outputs needed by the effect
pub const REQUIRED_COLOR_ATTACHMENTS: u32 = 3;

/// Complete reflection parameter set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionConfig {
    pub enabled: bool,
    pub algorithm: Algorithm,
    pub resolution: Resolution,
    pub mipmaps_mode: MipmapsMode,
    pub thickness_mode: ThicknessMode,
    pub min_smoothness: f32,
    pub fade_smoothness: f32,
    pub edge_fade: f32,
    pub thickness: f32,
    pub quality: Quality,
    pub max_step: u32,
    pub accumulation_factor: f32,
    /// Keep running while a debug overlay is displayed
    pub run_in_debugger: bool,
    /// Treat scene view motion vectors as valid while they are not updating
    pub scene_view_accumulation: bool,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            algorithm: Algorithm::Approximation,
            resolution: Resolution::Full,
            mipmaps_mode: MipmapsMode::Trilinear,
            thickness_mode: ThicknessMode::Constant,
            min_smoothness: 0.4,
            fade_smoothness: 0.6,
            edge_fade: 0.1,
            thickness: 0.25,
            quality: Quality::Low,
            max_step: 16,
            accumulation_factor: 0.75,
            run_in_debugger: false,
            scene_view_accumulation: false,
        }
    }
}

fn clamp01(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

impl ReflectionConfig {
    /// Copy with every numeric parameter clamped into range and the fade
    /// smoothness raised above the minimum
    pub fn sanitized(&self) -> Self {
        let mut config = *self;
        config.min_smoothness = clamp01(self.min_smoothness);
        config.fade_smoothness = clamp01(self.fade_smoothness);
        config.edge_fade = clamp01(self.edge_fade);
        config.thickness = clamp01(self.thickness);
        config.accumulation_factor = clamp01(self.accumulation_factor);
        config.max_step = self.max_step.clamp(MIN_MAX_STEP, MAX_MAX_STEP);
        config.fade_smoothness = config.effective_fade_smoothness();
        config
    }

    /// Fade smoothness as seen by the shader (always above `min_smoothness`)
    pub fn effective_fade_smoothness(&self) -> f32 {
        if self.fade_smoothness <= self.min_smoothness {
            self.min_smoothness + FADE_SMOOTHNESS_EPSILON
        } else {
            self.fade_smoothness
        }
    }

    /// Step parameters after applying the quality preset
    pub fn march_params(&self) -> MarchParams {
        self.quality.march_params(self.max_step.clamp(MIN_MAX_STEP, MAX_MAX_STEP))
    }

    /// Effect is enabled and the target supports enough color outputs
    pub fn is_active(&self, max_color_attachments: u32) -> bool {
        self.enabled && max_color_attachments >= REQUIRED_COLOR_ATTACHMENTS
    }

    pub fn uses_backface(&self) -> bool {
        self.thickness_mode == ThicknessMode::ComputeBackface
    }

    pub fn uses_mipmaps(&self) -> bool {
        self.mipmaps_mode == MipmapsMode::Trilinear
    }
}

#[cfg(test)]
#[path = "reflection_config_tests.rs"]
mod tests;

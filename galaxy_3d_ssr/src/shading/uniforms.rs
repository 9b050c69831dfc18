/// Uniform block pushed before the reflection program passes

use bytemuck::{Pod, Zeroable};
use crate::config::ReflectionConfig;
use crate::host::CameraInfo;

/// Reflection shader parameters
///
/// Layout is `#[repr(C)]`, 64 bytes, no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ReflectionUniforms {
    pub min_smoothness: f32,
    /// Always above `min_smoothness`
    pub fade_smoothness: f32,
    pub edge_fade: f32,
    pub thickness: f32,
    pub step_size: f32,
    pub step_size_multiplier: f32,
    pub max_step: f32,
    /// Resolution scale (quarters * 0.25)
    pub down_sample: f32,
    pub accumulation_factor: f32,
    pub frame_index: u32,
    pub tan_half_fov: [f32; 2],
    pub scaled_size: [f32; 2],
    pub target_size: [f32; 2],
}

impl ReflectionUniforms {
    pub fn new(config: &ReflectionConfig, info: &CameraInfo, frame_index: u32) -> Self {
        let march = config.march_params();
        let (scaled_width, scaled_height) =
            config.resolution.scaled_extent(info.target.width, info.target.height);
        Self {
            min_smoothness: config.min_smoothness,
            fade_smoothness: config.effective_fade_smoothness(),
            edge_fade: config.edge_fade,
            thickness: config.thickness,
            step_size: march.step_size,
            step_size_multiplier: march.step_multiplier,
            max_step: march.max_steps as f32,
            down_sample: config.resolution.scale(),
            accumulation_factor: config.accumulation_factor,
            frame_index,
            tan_half_fov: info.tan_half_fov(),
            scaled_size: [scaled_width as f32, scaled_height as f32],
            target_size: [info.target.width as f32, info.target.height as f32],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Decode a pushed uniform block; `None` if the size does not match
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytemuck::try_pod_read_unaligned(bytes).ok()
    }
}

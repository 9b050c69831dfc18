/// Screen-space ray march
///
/// Depth is linear view depth normalized to [0, 1] (1 = far plane). View
/// space has x right, y down and z forward so that a pixel's view position is
/// `(ndc * tan_half_fov * depth, depth)` with `ndc = uv * 2 - 1`.

use glam::{UVec2, Vec2, Vec3};
use crate::shading::fade::{resolve_thickness, saturate};
use crate::shading::ReflectionUniforms;

/// Depth distance covered by a step size (and a thickness) of 1.0
pub const STEP_UNIT: f32 = 0.05;

/// Bisection iterations applied to a coarse hit
pub const REFINE_STEPS: u32 = 4;

/// Depth buffers read by the march
pub trait DepthSampler {
    /// Front-most scene depth
    fn front_depth(&self, uv: Vec2) -> f32;

    /// Back-face depth, `None` when thickness is constant
    fn back_depth(&self, uv: Vec2) -> Option<f32>;
}

/// Pinhole projection of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewProjection {
    pub tan_half_fov: Vec2,
}

impl ViewProjection {
    pub fn new(tan_half_fov: [f32; 2]) -> Self {
        Self { tan_half_fov: Vec2::from(tan_half_fov) }
    }

    pub fn view_position(&self, uv: Vec2, depth: f32) -> Vec3 {
        let ndc = uv * 2.0 - Vec2::ONE;
        (ndc * self.tan_half_fov * depth).extend(depth)
    }

    /// Screen uv and depth of a view position; `None` behind the camera
    pub fn project(&self, position: Vec3) -> Option<(Vec2, f32)> {
        if position.z <= 1e-6 {
            return None;
        }
        let ndc = position.truncate() / (self.tan_half_fov * position.z);
        Some(((ndc + Vec2::ONE) * 0.5, position.z))
    }
}

pub fn on_screen(uv: Vec2) -> bool {
    uv.x >= 0.0 && uv.x <= 1.0 && uv.y >= 0.0 && uv.y <= 1.0
}

/// Mirror the view direction about the surface normal
pub fn reflect_direction(view_position: Vec3, normal: Vec3) -> Vec3 {
    let view = view_position.normalize_or_zero();
    (view - 2.0 * view.dot(normal) * normal).normalize_or_zero()
}

/// March parameters in depth units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchSettings {
    pub step_size: f32,
    pub step_multiplier: f32,
    pub max_steps: u32,
    /// Constant thickness
    pub thickness: f32,
}

impl MarchSettings {
    pub fn from_uniforms(uniforms: &ReflectionUniforms) -> Self {
        Self {
            step_size: uniforms.step_size * STEP_UNIT,
            step_multiplier: uniforms.step_size_multiplier,
            max_steps: uniforms.max_step as u32,
            thickness: uniforms.thickness * STEP_UNIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub uv: Vec2,
    pub depth: f32,
    /// Coarse steps taken before the hit
    pub steps: u32,
}

fn is_within(depth: f32, scene: f32, thickness: f32) -> bool {
    depth >= scene && depth <= scene + thickness
}

/// March from a surface point along its reflection direction
pub fn march_ray(
    projection: &ViewProjection,
    origin_uv: Vec2,
    origin_depth: f32,
    normal: Vec3,
    settings: &MarchSettings,
    sampler: &dyn DepthSampler,
) -> Option<RayHit> {
    let origin = projection.view_position(origin_uv, origin_depth);
    let direction = reflect_direction(origin, normal);
    if direction == Vec3::ZERO {
        return None;
    }

    let mut step = settings.step_size;
    let mut previous = 0.0;
    let mut distance = step;
    for i in 0..settings.max_steps {
        let (uv, depth) = projection.project(origin + direction * distance)?;
        if !on_screen(uv) {
            return None;
        }
        let scene = sampler.front_depth(uv);
        let thickness = resolve_thickness(settings.thickness, scene, sampler.back_depth(uv));
        if is_within(depth, scene, thickness) {
            let (uv, depth) = refine(projection, origin, direction, previous, distance, sampler)
                .unwrap_or((uv, depth));
            return Some(RayHit { uv, depth, steps: i + 1 });
        }
        previous = distance;
        step *= settings.step_multiplier;
        distance += step;
    }
    None
}

/// Bisect between the last miss and the coarse hit
fn refine(
    projection: &ViewProjection,
    origin: Vec3,
    direction: Vec3,
    mut near: f32,
    mut far: f32,
    sampler: &dyn DepthSampler,
) -> Option<(Vec2, f32)> {
    for _ in 0..REFINE_STEPS {
        let middle = 0.5 * (near + far);
        let (uv, depth) = projection.project(origin + direction * middle)?;
        if depth >= sampler.front_depth(uv) {
            far = middle;
        } else {
            near = middle;
        }
    }
    projection.project(origin + direction * far)
}

// ===== ACCUMULATION JITTER =====

/// PCG integer hash
pub fn hash_u32(value: u32) -> u32 {
    let state = value.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Deterministic value in [0, 1) for a pixel, frame and channel
pub fn random_unit(pixel: UVec2, frame_index: u32, channel: u32) -> f32 {
    let seed = hash_u32(pixel.x ^ hash_u32(pixel.y ^ hash_u32(frame_index ^ hash_u32(channel))));
    (seed >> 8) as f32 / (1u32 << 24) as f32
}

/// Perturb a normal proportionally to roughness squared
pub fn jitter_normal(normal: Vec3, smoothness: f32, pixel: UVec2, frame_index: u32) -> Vec3 {
    let roughness = 1.0 - saturate(smoothness);
    let amount = roughness * roughness;
    if amount <= 0.0 {
        return normal;
    }
    let offset = Vec3::new(
        random_unit(pixel, frame_index, 0) * 2.0 - 1.0,
        random_unit(pixel, frame_index, 1) * 2.0 - 1.0,
        random_unit(pixel, frame_index, 2) * 2.0 - 1.0,
    );
    (normal + offset * amount).try_normalize().unwrap_or(normal)
}

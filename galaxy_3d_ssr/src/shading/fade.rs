/// Fade and thickness terms of the reflection mask

use glam::Vec2;

pub fn saturate(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// 0 below `min`, ramps to 1 at `fade`
pub fn smoothness_fade(smoothness: f32, min: f32, fade: f32) -> f32 {
    if smoothness < min {
        return 0.0;
    }
    let range = fade - min;
    if range <= 0.0 {
        return 1.0;
    }
    saturate((smoothness - min) / range)
}

/// Attenuation near the screen border
pub fn edge_fade(uv: Vec2, edge: f32) -> f32 {
    if edge <= 0.0 {
        return 1.0;
    }
    let distance = uv.x.min(1.0 - uv.x).min(uv.y).min(1.0 - uv.y);
    saturate(distance / edge)
}

/// Thickness at a sample: back-face distance when available, else the constant.
/// A back depth of 1.0 or more is the cleared far value.
pub fn resolve_thickness(constant: f32, front_depth: f32, back_depth: Option<f32>) -> f32 {
    match back_depth {
        Some(back) if back < 1.0 => (back - front_depth).max(0.0),
        _ => constant,
    }
}

/// Reflection mip level for a surface smoothness
pub fn mip_level(smoothness: f32, mip_count: u32) -> f32 {
    (1.0 - saturate(smoothness)) * mip_count.saturating_sub(1) as f32
}

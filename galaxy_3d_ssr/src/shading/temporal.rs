/// Temporal accumulation

use glam::{Vec2, Vec4};
use crate::shading::fade::saturate;
use crate::shading::march::on_screen;

/// `history * (1 - factor) + current * factor`
pub fn temporal_blend(history: Vec4, current: Vec4, factor: f32) -> Vec4 {
    let factor = saturate(factor);
    history * (1.0 - factor) + current * factor
}

/// Previous-frame uv of a pixel, `None` when it falls outside the screen
pub fn reproject(uv: Vec2, motion: Vec2) -> Option<Vec2> {
    let previous = uv - motion;
    on_screen(previous).then_some(previous)
}

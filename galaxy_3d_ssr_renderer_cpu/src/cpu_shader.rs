/// Program execution for blits
///
/// Inputs are snapshots taken before the destination is written, so a pass
/// may read the texture it renders into.

use glam::{UVec2, Vec2, Vec4, Vec4Swizzles};
use rustc_hash::FxHashMap;
use galaxy_3d_ssr::galaxy3d::Result;
use galaxy_3d_ssr::galaxy3d::render::{property, ShaderKeywords, ShaderPass};
use galaxy_3d_ssr::galaxy3d::shading::{shade, Fragment, ProgramInputs, ReflectionUniforms};
use crate::cpu_texture::{CpuTexture, TextureImage};

/// Textures visible to a program pass
pub struct ProgramBindings {
    source: TextureImage,
    globals: FxHashMap<&'static str, TextureImage>,
}

impl ProgramBindings {
    pub fn new(source: TextureImage) -> Self {
        Self { source, globals: FxHashMap::default() }
    }

    /// Bind a global snapshot under one of the `property` names
    pub fn bind(&mut self, name: &'static str, image: TextureImage) {
        self.globals.insert(name, image);
    }

    fn read(&self, name: &str, uv: Vec2) -> Option<Vec4> {
        self.globals.get(name).map(|image| image.sample(uv, 0.0))
    }
}

/// Global names read by the program
pub const PROGRAM_GLOBALS: [&str; 6] = [
    property::CAMERA_DEPTH,
    property::CAMERA_BACK_DEPTH,
    property::GBUFFER2,
    property::SSR_HIT,
    property::SSR_HISTORY,
    property::MOTION_VECTOR,
];

impl ProgramInputs for ProgramBindings {
    fn source(&self, uv: Vec2, lod: f32) -> Vec4 {
        self.source.sample(uv, lod)
    }

    fn source_mip_count(&self) -> u32 {
        self.source.mip_count()
    }

    fn scene_depth(&self, uv: Vec2) -> f32 {
        self.read(property::CAMERA_DEPTH, uv).map_or(1.0, |d| d.x)
    }

    fn back_depth(&self, uv: Vec2) -> f32 {
        self.read(property::CAMERA_BACK_DEPTH, uv).map_or(1.0, |d| d.x)
    }

    fn normal_smoothness(&self, uv: Vec2) -> Vec4 {
        self.read(property::GBUFFER2, uv).unwrap_or(Vec4::ZERO)
    }

    fn hit(&self, uv: Vec2) -> Vec4 {
        self.read(property::SSR_HIT, uv).unwrap_or(Vec4::ZERO)
    }

    fn history(&self, uv: Vec2) -> Vec4 {
        self.read(property::SSR_HISTORY, uv).unwrap_or(Vec4::ZERO)
    }

    fn motion(&self, uv: Vec2) -> Vec2 {
        self.read(property::MOTION_VECTOR, uv).map_or(Vec2::ZERO, |m| m.xy())
    }
}

/// Shade every level 0 pixel of `destination`
pub fn run_program(
    pass: ShaderPass,
    destination: &CpuTexture,
    bindings: &ProgramBindings,
    uniforms: &ReflectionUniforms,
    keywords: ShaderKeywords,
) -> Result<()> {
    let current = destination.pixels()?;
    let (width, height) = destination.extent();
    let mut output = Vec::with_capacity(current.len());
    for y in 0..height {
        for x in 0..width {
            let fragment = Fragment {
                uv: Vec2::new((x as f32 + 0.5) / width as f32, (y as f32 + 0.5) / height as f32),
                pixel: UVec2::new(x, y),
                destination: current[(y * width + x) as usize],
            };
            output.push(shade(pass, &fragment, bindings, uniforms, keywords));
        }
    }
    destination.upload(&output)
}

/// Plain copy, resampling when the sizes differ
pub fn copy(source: &TextureImage, destination: &CpuTexture) -> Result<()> {
    let (width, height) = destination.extent();
    let base = source.level(0);
    let texels = if (base.width, base.height) == (width, height) {
        base.texels.clone()
    } else {
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                source.sample(Vec2::new((x as f32 + 0.5) / width as f32, (y as f32 + 0.5) / height as f32), 0.0)
            })
            .collect()
    };
    destination.upload(&texels)
}

#[cfg(test)]
#[path = "cpu_shader_tests.rs"]
mod tests;

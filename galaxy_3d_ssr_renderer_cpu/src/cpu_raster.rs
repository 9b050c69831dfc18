/// Software scene and renderer-list rasterization
///
/// The software device has no meshes. Its scene is a list of screen-aligned
/// surfaces, each with a front and a back depth, which is enough to exercise
/// depth priming, back-face depth and attribute output.

use glam::{Vec2, Vec3, Vec4};
use galaxy_3d_ssr::engine_bail;
use galaxy_3d_ssr::galaxy3d::Result;
use galaxy_3d_ssr::galaxy3d::render::{
    CompareFunction, CullMode, RenderQueueRange, RendererListDesc, ShaderTag,
};
use crate::cpu_texture::CpuTexture;

const SOURCE: &str = "galaxy3d::ssr::cpu::Raster";

/// Screen-aligned surface covering `[min_uv, max_uv)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSurface {
    pub min_uv: Vec2,
    pub max_uv: Vec2,
    /// Linear depth of the front face
    pub front_depth: f32,
    /// Linear depth of the back face
    pub back_depth: f32,
    /// Lit color written by the host forward pass, albedo in `_GBuffer0`
    pub albedo: Vec4,
    pub specular: Vec4,
    /// View-space normal
    pub normal: Vec3,
    pub smoothness: f32,
    pub transparent: bool,
}

impl SceneSurface {
    /// Opaque, infinitely thin, rough surface facing the camera
    pub fn new(min_uv: Vec2, max_uv: Vec2, depth: f32) -> Self {
        Self {
            min_uv,
            max_uv,
            front_depth: depth,
            back_depth: depth,
            albedo: Vec4::ONE,
            specular: Vec4::ZERO,
            normal: Vec3::NEG_Z,
            smoothness: 0.0,
            transparent: false,
        }
    }

    pub fn with_back_depth(mut self, back_depth: f32) -> Self {
        self.back_depth = back_depth;
        self
    }

    pub fn with_albedo(mut self, albedo: Vec4) -> Self {
        self.albedo = albedo;
        self
    }

    pub fn with_specular(mut self, specular: Vec4) -> Self {
        self.specular = specular;
        self
    }

    /// Normal (normalized) and smoothness
    pub fn with_surface(mut self, normal: Vec3, smoothness: f32) -> Self {
        self.normal = normal.normalize_or_zero();
        self.smoothness = smoothness;
        self
    }

    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    pub fn covers(&self, uv: Vec2) -> bool {
        uv.x >= self.min_uv.x && uv.x < self.max_uv.x && uv.y >= self.min_uv.y && uv.y < self.max_uv.y
    }

    fn in_queue(&self, queue: RenderQueueRange) -> bool {
        match queue {
            RenderQueueRange::Opaque => !self.transparent,
            RenderQueueRange::Transparent => self.transparent,
            RenderQueueRange::All => true,
        }
    }

    /// Depth of the face left visible by the cull mode
    fn rasterized_depth(&self, cull: CullMode) -> f32 {
        match cull {
            CullMode::Front => self.back_depth,
            CullMode::Back | CullMode::Off => self.front_depth,
        }
    }

    fn outputs(&self, tag: ShaderTag) -> [Vec4; 3] {
        match tag {
            ShaderTag::DepthOnly => [Vec4::ZERO; 3],
            ShaderTag::GBuffer => [self.albedo, self.specular, self.normal.extend(self.smoothness)],
        }
    }
}

fn color_count(tag: ShaderTag) -> usize {
    match tag {
        ShaderTag::DepthOnly => 0,
        ShaderTag::GBuffer => 3,
    }
}

/// Level 0 copy of an attachment, written back after the draw
struct Plane<'a> {
    texture: &'a CpuTexture,
    texels: Vec<Vec4>,
}

impl<'a> Plane<'a> {
    fn read(texture: &'a CpuTexture) -> Result<Self> {
        Ok(Self { texture, texels: texture.pixels()? })
    }

    fn write_back(self) -> Result<()> {
        self.texture.upload(&self.texels)
    }
}

/// Draw the scene surfaces selected by a renderer list
///
/// Returns the number of fragments that passed the depth test.
pub fn draw_renderers(
    scene: &[SceneSurface],
    desc: &RendererListDesc,
    colors: &[&CpuTexture],
    depth: Option<&CpuTexture>,
) -> Result<u64> {
    let Some(extent) = colors
        .first()
        .map(|t| t.extent())
        .or_else(|| depth.map(|t| t.extent()))
    else {
        engine_bail!(SOURCE, "draw_renderers without render targets");
    };
    if colors.iter().map(|t| t.extent()).chain(depth.map(|t| t.extent())).any(|e| e != extent) {
        engine_bail!(SOURCE, "render targets differ in size");
    }

    let mut color_planes = colors
        .iter()
        .take(color_count(desc.shader_tag))
        .map(|t| Plane::read(t))
        .collect::<Result<Vec<_>>>()?;
    let mut depth_plane = depth.map(Plane::read).transpose()?;

    let (width, height) = extent;
    let mut fragments = 0;
    for surface in scene.iter().filter(|s| s.in_queue(desc.queue)) {
        let value = surface.rasterized_depth(desc.state.cull);
        let outputs = surface.outputs(desc.shader_tag);
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new((x as f32 + 0.5) / width as f32, (y as f32 + 0.5) / height as f32);
                if !surface.covers(uv) {
                    continue;
                }
                let index = (y * width + x) as usize;
                if let Some(plane) = depth_plane.as_mut() {
                    if !desc.state.depth.compare.passes(value, plane.texels[index].x) {
                        continue;
                    }
                    if desc.state.depth.write_enabled {
                        plane.texels[index] = Vec4::splat(value);
                    }
                }
                for (plane, output) in color_planes.iter_mut().zip(outputs) {
                    plane.texels[index] = output;
                }
                fragments += 1;
            }
        }
    }

    for plane in color_planes {
        plane.write_back()?;
    }
    if let Some(plane) = depth_plane {
        plane.write_back()?;
    }
    Ok(fragments)
}

/// Host forward rendering: lit color and front depth of the opaque surfaces
pub fn render_scene(scene: &[SceneSurface], color: &CpuTexture, depth: &CpuTexture) -> Result<()> {
    if color.extent() != depth.extent() {
        engine_bail!(SOURCE, "color and depth differ in size");
    }
    let mut color_plane = Plane::read(color)?;
    let mut depth_plane = Plane::read(depth)?;
    let (width, height) = color.extent();

    for surface in scene.iter().filter(|s| !s.transparent) {
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new((x as f32 + 0.5) / width as f32, (y as f32 + 0.5) / height as f32);
                let index = (y * width + x) as usize;
                if surface.covers(uv) && CompareFunction::Less.passes(surface.front_depth, depth_plane.texels[index].x) {
                    depth_plane.texels[index] = Vec4::splat(surface.front_depth);
                    color_plane.texels[index] = surface.albedo;
                }
            }
        }
    }

    color_plane.write_back()?;
    depth_plane.write_back()
}

#[cfg(test)]
#[path = "cpu_raster_tests.rs"]
mod tests;

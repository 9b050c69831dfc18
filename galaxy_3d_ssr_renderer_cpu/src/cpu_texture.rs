/// Texture - CPU implementation of the Texture trait
///
/// Every format is stored as `Vec4` texels (depth in `x`). Multisampled
/// textures keep a single sample per pixel. Levels live behind an `Arc` so a
/// blit can snapshot its inputs and write its destination in the same pass.

use std::any::Any;
use std::sync::{Arc, RwLock};
use glam::{Vec2, Vec4};
use galaxy_3d_ssr::engine_bail;
use galaxy_3d_ssr::galaxy3d::Result;
use galaxy_3d_ssr::galaxy3d::render::{FilterMode, Texture, TextureDesc, TextureInfo, WrapMode};

const SOURCE: &str = "galaxy3d::ssr::cpu::Texture";

/// One mip level, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<Vec4>,
}

impl MipLevel {
    pub fn new(width: u32, height: u32, value: Vec4) -> Self {
        Self {
            width,
            height,
            texels: vec![value; (width as usize) * (height as usize)],
        }
    }

    fn address(coord: i64, size: u32, wrap: WrapMode) -> usize {
        let size = size as i64;
        match wrap {
            WrapMode::Clamp => coord.clamp(0, size - 1) as usize,
            WrapMode::Repeat => coord.rem_euclid(size) as usize,
        }
    }

    /// Texel at integer coordinates, addressed with `wrap`
    pub fn load(&self, x: i64, y: i64, wrap: WrapMode) -> Vec4 {
        let x = Self::address(x, self.width, wrap);
        let y = Self::address(y, self.height, wrap);
        self.texels[y * self.width as usize + x]
    }

    pub fn point(&self, uv: Vec2, wrap: WrapMode) -> Vec4 {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = (uv.y * self.height as f32).floor() as i64;
        self.load(x, y, wrap)
    }

    pub fn bilinear(&self, uv: Vec2, wrap: WrapMode) -> Vec4 {
        let coord = uv * Vec2::new(self.width as f32, self.height as f32) - Vec2::splat(0.5);
        let base = coord.floor();
        let frac = coord - base;
        let (x, y) = (base.x as i64, base.y as i64);
        let top = self.load(x, y, wrap).lerp(self.load(x + 1, y, wrap), frac.x);
        let bottom = self.load(x, y + 1, wrap).lerp(self.load(x + 1, y + 1, wrap), frac.x);
        top.lerp(bottom, frac.y)
    }

    /// 2x2 box-filtered half-size level
    pub fn downsample(&self) -> MipLevel {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut level = MipLevel::new(width, height, Vec4::ZERO);
        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = (2 * x as i64, 2 * y as i64);
                let sum = self.load(sx, sy, WrapMode::Clamp)
                    + self.load(sx + 1, sy, WrapMode::Clamp)
                    + self.load(sx, sy + 1, WrapMode::Clamp)
                    + self.load(sx + 1, sy + 1, WrapMode::Clamp);
                level.texels[(y * width + x) as usize] = sum * 0.25;
            }
        }
        level
    }
}

/// Immutable view of a texture's contents, sampled with its filter
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub filter: FilterMode,
    pub wrap: WrapMode,
    pub levels: Arc<Vec<MipLevel>>,
}

impl TextureImage {
    pub fn mip_count(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn level(&self, index: u32) -> &MipLevel {
        let last = self.levels.len().saturating_sub(1);
        &self.levels[(index as usize).min(last)]
    }

    /// Sample at `lod` with the texture's filter
    pub fn sample(&self, uv: Vec2, lod: f32) -> Vec4 {
        let max_lod = self.mip_count().saturating_sub(1) as f32;
        let lod = lod.clamp(0.0, max_lod);
        match self.filter {
            FilterMode::Point => self.level(lod.round() as u32).point(uv, self.wrap),
            FilterMode::Bilinear => self.level(lod.round() as u32).bilinear(uv, self.wrap),
            FilterMode::Trilinear => {
                let low = lod.floor();
                let near = self.level(low as u32).bilinear(uv, self.wrap);
                let far = self.level(lod.ceil() as u32).bilinear(uv, self.wrap);
                near.lerp(far, lod - low)
            }
        }
    }

    /// Level 0 texel at integer coordinates
    pub fn texel(&self, x: u32, y: u32) -> Vec4 {
        self.level(0).load(x as i64, y as i64, WrapMode::Clamp)
    }
}

/// CPU texture
pub struct CpuTexture {
    info: TextureInfo,
    levels: RwLock<Arc<Vec<MipLevel>>>,
}

impl CpuTexture {
    /// Color textures start transparent black, depth textures at the far plane
    pub fn new(desc: &TextureDesc) -> Self {
        let initial = if desc.format.is_depth() { Vec4::ONE } else { Vec4::ZERO };
        let mut levels = Vec::with_capacity(desc.mip_levels as usize);
        let (mut width, mut height) = (desc.width, desc.height);
        for _ in 0..desc.mip_levels.max(1) {
            levels.push(MipLevel::new(width, height, initial));
            width = (width / 2).max(1);
            height = (height / 2).max(1);
        }
        Self {
            info: TextureInfo::from(desc),
            levels: RwLock::new(Arc::new(levels)),
        }
    }

    /// Level 0 size
    pub fn extent(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }

    /// Snapshot of the current contents
    pub fn image(&self) -> Result<TextureImage> {
        let Ok(levels) = self.levels.read() else {
            engine_bail!(SOURCE, "texture '{}' lock poisoned", self.info.name);
        };
        Ok(TextureImage {
            filter: self.info.filter,
            wrap: self.info.wrap,
            levels: Arc::clone(&levels),
        })
    }

    /// Mutate the levels in place (copy-on-write if a snapshot is alive)
    pub fn modify<R>(&self, f: impl FnOnce(&mut Vec<MipLevel>) -> R) -> Result<R> {
        let Ok(mut levels) = self.levels.write() else {
            engine_bail!(SOURCE, "texture '{}' lock poisoned", self.info.name);
        };
        Ok(f(Arc::make_mut(&mut levels)))
    }

    /// Replace level 0
    pub fn upload(&self, texels: &[Vec4]) -> Result<()> {
        let expected = (self.info.width as usize) * (self.info.height as usize);
        if texels.len() != expected {
            engine_bail!(
                SOURCE,
                "upload to '{}' has {} texels, expected {}",
                self.info.name,
                texels.len(),
                expected
            );
        }
        self.modify(|levels| levels[0].texels.copy_from_slice(texels))
    }

    /// Set every texel of every level
    pub fn fill(&self, value: Vec4) -> Result<()> {
        self.modify(|levels| {
            for level in levels.iter_mut() {
                level.texels.fill(value);
            }
        })
    }

    /// Rebuild levels 1.. from level 0
    pub fn generate_mips(&self) -> Result<()> {
        if !self.info.has_mips() {
            engine_bail!(SOURCE, "texture '{}' has no mip chain", self.info.name);
        }
        self.modify(|levels| {
            for index in 1..levels.len() {
                levels[index] = levels[index - 1].downsample();
            }
        })
    }

    /// Level 0 contents
    pub fn pixels(&self) -> Result<Vec<Vec4>> {
        Ok(self.image()?.level(0).texels.clone())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Result<Vec4> {
        Ok(self.image()?.texel(x, y))
    }
}

impl Texture for CpuTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Downcast a texture created by another device
pub fn as_cpu(texture: &Arc<dyn Texture>) -> Result<&CpuTexture> {
    match texture.as_any().downcast_ref::<CpuTexture>() {
        Some(texture) => Ok(texture),
        None => Err(galaxy_3d_ssr::engine_err!(
            SOURCE,
            "texture '{}' was not created by the software device",
            texture.info().name
        )),
    }
}

#[cfg(test)]
#[path = "cpu_texture_tests.rs"]
mod tests;

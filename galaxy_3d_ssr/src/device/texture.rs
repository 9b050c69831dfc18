/// Texture trait, texture descriptor, and texture info

use std::any::Any;

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Color formats
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    R8G8B8A8_SNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Depth formats
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
}

impl TextureFormat {
    /// Returns true for depth (and depth/stencil) formats
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM | TextureFormat::D32_FLOAT | TextureFormat::D24_UNORM_S8_UINT
        )
    }

    /// Returns true for formats decoded from sRGB on sampling
    pub fn is_srgb(&self) -> bool {
        matches!(self, TextureFormat::R8G8B8A8_SRGB | TextureFormat::B8G8R8A8_SRGB)
    }

    /// Returns true for signed normalized formats
    pub fn is_signed_normalized(&self) -> bool {
        matches!(self, TextureFormat::R8G8B8A8_SNORM)
    }

    /// Returns true for floating point color formats
    pub fn is_float(&self) -> bool {
        matches!(self, TextureFormat::R16G16B16A16_SFLOAT | TextureFormat::R32G32B32A32_SFLOAT)
    }

    /// Size of one texel in bytes
    pub fn bytes_per_texel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R8G8B8A8_SNORM
            | TextureFormat::B8G8R8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM
            | TextureFormat::D32_FLOAT
            | TextureFormat::D24_UNORM_S8_UINT => 4,
            TextureFormat::D16_UNORM => 2,
            TextureFormat::R16G16B16A16_SFLOAT => 8,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
        }
    }
}

/// Texture usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureUsage {
    /// Texture can be sampled in shaders
    Sampled,
    /// Texture can be used as render target
    RenderTarget,
    /// Texture can be used for both
    SampledAndRenderTarget,
    /// Texture can be used as depth/stencil attachment
    DepthStencil,
}

/// Sampling filter used when the texture is bound for reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Point,
    Bilinear,
    Trilinear,
}

/// Addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Clamp,
    Repeat,
}

/// Number of levels of a full mip chain for the given extent
pub fn mip_chain_length(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a texture
///
/// Two descriptors that compare equal describe interchangeable textures; the
/// resource cache hashes descriptors to decide when to reallocate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureDesc {
    /// Debug name, also used as the global binding name
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
    /// MSAA sample count (1 = single-sample)
    pub samples: u32,
    /// Number of mip levels (1 = no mips)
    pub mip_levels: u32,
    /// Sampling filter
    pub filter: FilterMode,
    /// Addressing mode
    pub wrap: WrapMode,
}

impl TextureDesc {
    /// Single-sample, single-mip, clamped, bilinear color texture
    pub fn new(name: &str, width: u32, height: u32, format: TextureFormat) -> Self {
        let usage = if format.is_depth() {
            TextureUsage::DepthStencil
        } else {
            TextureUsage::SampledAndRenderTarget
        };
        Self {
            name: name.to_string(),
            width,
            height,
            format,
            usage,
            samples: 1,
            mip_levels: 1,
            filter: if format.is_depth() { FilterMode::Point } else { FilterMode::Bilinear },
            wrap: WrapMode::Clamp,
        }
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples.max(1);
        self
    }

    /// Allocate a full mip chain for the descriptor extent
    pub fn with_mip_chain(mut self) -> Self {
        self.mip_levels = mip_chain_length(self.width, self.height);
        self
    }

    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
///
/// Returned by `Texture::info()` to query texture properties
/// without exposing backend-specific details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
    pub samples: u32,
    pub mip_levels: u32,
    pub filter: FilterMode,
    pub wrap: WrapMode,
}

impl TextureInfo {
    /// Returns true if this texture is multisampled
    pub fn is_multisampled(&self) -> bool {
        self.samples > 1
    }

    /// Returns true if this texture carries more than one mip level
    pub fn has_mips(&self) -> bool {
        self.mip_levels > 1
    }
}

impl From<&TextureDesc> for TextureInfo {
    fn from(desc: &TextureDesc) -> Self {
        Self {
            name: desc.name.clone(),
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
            samples: desc.samples,
            mip_levels: desc.mip_levels,
            filter: desc.filter,
            wrap: desc.wrap,
        }
    }
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend-specific texture types (e.g., CpuTexture).
/// The texture is automatically destroyed when dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;

    /// Downcast support for backends
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;

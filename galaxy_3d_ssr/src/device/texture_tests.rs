/// Unit tests for texture.rs

use crate::device::{
    TextureDesc, TextureFormat, TextureInfo, TextureUsage, FilterMode, WrapMode,
    mip_chain_length,
};

// ============================================================================
// TEXTURE FORMAT TESTS
// ============================================================================

#[test]
fn test_depth_formats() {
    assert!(TextureFormat::D32_FLOAT.is_depth());
    assert!(TextureFormat::D16_UNORM.is_depth());
    assert!(TextureFormat::D24_UNORM_S8_UINT.is_depth());
    assert!(!TextureFormat::R16G16B16A16_SFLOAT.is_depth());
}

#[test]
fn test_format_classes() {
    assert!(TextureFormat::R8G8B8A8_SRGB.is_srgb());
    assert!(!TextureFormat::R8G8B8A8_UNORM.is_srgb());
    assert!(TextureFormat::R8G8B8A8_SNORM.is_signed_normalized());
    assert!(TextureFormat::R16G16B16A16_SFLOAT.is_float());
    assert_eq!(TextureFormat::R16G16B16A16_SFLOAT.bytes_per_texel(), 8);
    assert_eq!(TextureFormat::D32_FLOAT.bytes_per_texel(), 4);
}

// ============================================================================
// MIP CHAIN TESTS
// ============================================================================

#[test]
fn test_mip_chain_length() {
    assert_eq!(mip_chain_length(1, 1), 1);
    assert_eq!(mip_chain_length(2, 1), 2);
    assert_eq!(mip_chain_length(960, 540), 10);
    assert_eq!(mip_chain_length(1024, 1024), 11);
    assert_eq!(mip_chain_length(0, 0), 1);
}

// ============================================================================
// TEXTURE DESC TESTS
// ============================================================================

#[test]
fn test_desc_defaults_for_color() {
    let desc = TextureDesc::new("_GBuffer0", 64, 32, TextureFormat::R8G8B8A8_UNORM);
    assert_eq!(desc.usage, TextureUsage::SampledAndRenderTarget);
    assert_eq!(desc.samples, 1);
    assert_eq!(desc.mip_levels, 1);
    assert_eq!(desc.filter, FilterMode::Bilinear);
    assert_eq!(desc.wrap, WrapMode::Clamp);
}

#[test]
fn test_desc_defaults_for_depth() {
    let desc = TextureDesc::new("_CameraBackDepthTexture", 64, 32, TextureFormat::D32_FLOAT);
    assert_eq!(desc.usage, TextureUsage::DepthStencil);
    assert_eq!(desc.filter, FilterMode::Point);
}

#[test]
fn test_desc_builders() {
    let desc = TextureDesc::new("reflect", 960, 540, TextureFormat::R16G16B16A16_SFLOAT)
        .with_mip_chain()
        .with_filter(FilterMode::Trilinear)
        .with_samples(0)
        .with_wrap(WrapMode::Repeat);
    assert_eq!(desc.mip_levels, 10);
    assert_eq!(desc.filter, FilterMode::Trilinear);
    assert_eq!(desc.samples, 1);
    assert_eq!(desc.wrap, WrapMode::Repeat);
}

#[test]
fn test_desc_equality_drives_identity() {
    let a = TextureDesc::new("hit", 100, 50, TextureFormat::R16G16B16A16_SFLOAT);
    let b = a.clone();
    let c = TextureDesc::new("hit", 100, 51, TextureFormat::R16G16B16A16_SFLOAT);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// ============================================================================
// TEXTURE INFO TESTS
// ============================================================================

#[test]
fn test_info_from_desc() {
    let desc = TextureDesc::new("color", 8, 4, TextureFormat::R8G8B8A8_SRGB)
        .with_samples(4)
        .with_mip_chain();
    let info = TextureInfo::from(&desc);
    assert_eq!(info.name, "color");
    assert_eq!(info.width, 8);
    assert_eq!(info.height, 4);
    assert!(info.is_multisampled());
    assert!(info.has_mips());
}

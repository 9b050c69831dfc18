/// Unit tests for cpu_texture.rs

use std::sync::Arc;
use glam::{Vec2, Vec4};
use galaxy_3d_ssr::galaxy3d::render::{FilterMode, Texture, TextureDesc, TextureFormat, WrapMode};
use crate::cpu_texture::{as_cpu, CpuTexture, MipLevel};

fn gradient(width: u32, height: u32) -> Vec<Vec4> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| Vec4::new(x as f32, y as f32, 0.0, 1.0)))
        .collect()
}

// ============================================================================
// CREATION
// ============================================================================

#[test]
fn test_color_starts_black_depth_starts_far() {
    let color = CpuTexture::new(&TextureDesc::new("color", 4, 4, TextureFormat::R8G8B8A8_UNORM));
    let depth = CpuTexture::new(&TextureDesc::new("depth", 4, 4, TextureFormat::D32_FLOAT));
    assert_eq!(color.pixel(1, 1).unwrap(), Vec4::ZERO);
    assert_eq!(depth.pixel(1, 1).unwrap(), Vec4::ONE);
}

#[test]
fn test_mip_chain_levels() {
    let texture = CpuTexture::new(&TextureDesc::new("mips", 8, 2, TextureFormat::R16G16B16A16_SFLOAT).with_mip_chain());
    let image = texture.image().unwrap();
    assert_eq!(image.mip_count(), 4);
    assert_eq!((image.level(1).width, image.level(1).height), (4, 1));
    assert_eq!((image.level(3).width, image.level(3).height), (1, 1));
}

#[test]
fn test_upload_checks_size() {
    let texture = CpuTexture::new(&TextureDesc::new("t", 2, 2, TextureFormat::R8G8B8A8_UNORM));
    assert!(texture.upload(&[Vec4::ONE; 3]).is_err());
    texture.upload(&[Vec4::ONE; 4]).unwrap();
    assert_eq!(texture.pixels().unwrap(), vec![Vec4::ONE; 4]);
}

#[test]
fn test_snapshot_survives_writes() {
    let texture = CpuTexture::new(&TextureDesc::new("t", 2, 2, TextureFormat::R8G8B8A8_UNORM));
    let before = texture.image().unwrap();
    texture.fill(Vec4::ONE).unwrap();
    assert_eq!(before.texel(0, 0), Vec4::ZERO);
    assert_eq!(texture.pixel(0, 0).unwrap(), Vec4::ONE);
}

#[test]
fn test_as_cpu_downcasts() {
    let texture: Arc<dyn Texture> = Arc::new(CpuTexture::new(&TextureDesc::new("t", 1, 1, TextureFormat::D32_FLOAT)));
    assert_eq!(as_cpu(&texture).unwrap().info().name, "t");
}

// ============================================================================
// SAMPLING
// ============================================================================

#[test]
fn test_point_sampling_picks_containing_texel() {
    let texture = CpuTexture::new(&TextureDesc::new("t", 4, 4, TextureFormat::R32G32B32A32_SFLOAT).with_filter(FilterMode::Point));
    texture.upload(&gradient(4, 4)).unwrap();
    let image = texture.image().unwrap();

    assert_eq!(image.sample(Vec2::new(0.3, 0.6), 0.0), Vec4::new(1.0, 2.0, 0.0, 1.0));
    assert_eq!(image.sample(Vec2::new(1.0, 1.0), 0.0), Vec4::new(3.0, 3.0, 0.0, 1.0));
}

#[test]
fn test_bilinear_sampling_interpolates_centers() {
    let texture = CpuTexture::new(&TextureDesc::new("t", 4, 4, TextureFormat::R32G32B32A32_SFLOAT));
    texture.upload(&gradient(4, 4)).unwrap();
    let image = texture.image().unwrap();

    let value = image.sample(Vec2::new(0.25, 0.125), 0.0);
    assert!((value.x - 0.5).abs() < 1e-5);
    assert!(value.y.abs() < 1e-5);
}

#[test]
fn test_repeat_wraps() {
    let level = MipLevel { width: 2, height: 1, texels: vec![Vec4::ZERO, Vec4::ONE] };
    assert_eq!(level.load(-1, 0, WrapMode::Repeat), Vec4::ONE);
    assert_eq!(level.load(-1, 0, WrapMode::Clamp), Vec4::ZERO);
}

#[test]
fn test_generate_mips_box_filters() {
    let texture = CpuTexture::new(&TextureDesc::new("t", 2, 2, TextureFormat::R32G32B32A32_SFLOAT).with_mip_chain());
    texture.upload(&[Vec4::ZERO, Vec4::ONE, Vec4::ONE, Vec4::ZERO]).unwrap();
    texture.generate_mips().unwrap();

    let image = texture.image().unwrap();
    assert_eq!(image.level(1).texels, vec![Vec4::splat(0.5)]);
}

#[test]
fn test_trilinear_blends_levels() {
    let texture = CpuTexture::new(
        &TextureDesc::new("t", 2, 2, TextureFormat::R32G32B32A32_SFLOAT)
            .with_mip_chain()
            .with_filter(FilterMode::Trilinear),
    );
    texture.fill(Vec4::ONE).unwrap();
    texture.modify(|levels| levels[1].texels.fill(Vec4::ZERO)).unwrap();

    let value = texture.image().unwrap().sample(Vec2::splat(0.5), 0.5);
    assert!((value.x - 0.5).abs() < 1e-5);
}

#[test]
fn test_generate_mips_without_chain_fails() {
    let texture = CpuTexture::new(&TextureDesc::new("t", 2, 2, TextureFormat::R8G8B8A8_UNORM));
    assert!(texture.generate_mips().is_err());
}

//! Integration tests for the software device through the host-facing traits
//!
//! Run with: cargo test --test cpu_renderer_tests

use std::sync::{Arc, Mutex};
use galaxy_3d_ssr::galaxy3d::render::{
    Attachment, ClearFlags, GraphicsDevice, Material, ProgramPass, ShaderKeywords, ShaderMaterial, ShaderPass,
    TextureDesc, TextureFormat,
};
use galaxy_3d_ssr::galaxy3d::config::ReflectionConfig;
use galaxy_3d_ssr::galaxy3d::host::{CameraInfo, HostFrameState, TargetDescriptor};
use galaxy_3d_ssr::galaxy3d::shading::ReflectionUniforms;
use galaxy_3d_ssr::galaxy3d::Engine;
use galaxy_3d_ssr::glam::Vec4;
use galaxy_3d_ssr_renderer_cpu::galaxy3d::{as_cpu, format_stats_report, CpuGraphicsDevice};
use serial_test::serial;

// ============================================================================
// TRAIT OBJECT WORKFLOW
// ============================================================================

#[test]
fn test_cpu_command_list_through_trait_objects() {
    let device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(CpuGraphicsDevice::new()));
    let mut device = device.lock().unwrap();

    let target = device.create_texture(&TextureDesc::new("target", 8, 8, TextureFormat::R16G16B16A16_SFLOAT)).unwrap();
    let mut cmd = device.create_command_list().unwrap();
    cmd.begin_sample("clear").unwrap();
    cmd.set_render_targets(&[Attachment::load_store(&target)], None).unwrap();
    cmd.clear(ClearFlags::COLOR, [0.0, 1.0, 0.0, 1.0], 1.0).unwrap();
    cmd.end_sample().unwrap();
    device.submit(&[&*cmd]).unwrap();

    assert_eq!(as_cpu(&target).unwrap().pixel(7, 7).unwrap(), Vec4::new(0.0, 1.0, 0.0, 1.0));
    assert_eq!(
        format_stats_report(&device.stats()),
        vec!["Textures created: 1", "Submissions: 1", "Blits: 0", "Draws: 0"]
    );
}

#[test]
fn test_cpu_composite_over_sky_keeps_color() {
    let mut device = CpuGraphicsDevice::new();
    let color = device.create_texture(&TextureDesc::new("color", 4, 4, TextureFormat::R16G16B16A16_SFLOAT)).unwrap();
    let reflection = device.create_texture(&TextureDesc::new("reflect", 4, 4, TextureFormat::R16G16B16A16_SFLOAT)).unwrap();
    as_cpu(&color).unwrap().fill(Vec4::splat(0.5)).unwrap();

    let material: Arc<dyn Material> = Arc::new(ShaderMaterial::reflection());
    let config = ReflectionConfig { enabled: true, ..ReflectionConfig::default() };
    let uniforms = ReflectionUniforms::new(&config, &CameraInfo::game(TargetDescriptor::new(4, 4)), 0);

    let mut cmd = device.create_command_list().unwrap();
    cmd.push_constants(uniforms.as_bytes()).unwrap();
    cmd.set_keyword(ShaderKeywords::APPROX_COLOR_MIPMAPS, false).unwrap();
    cmd.blit(&color, &reflection, Some(ProgramPass::new(&material, ShaderPass::ApproximateMarch))).unwrap();
    cmd.blit(&reflection, &color, Some(ProgramPass::new(&material, ShaderPass::ApproximateComposite))).unwrap();
    device.submit(&[&*cmd]).unwrap();

    assert_eq!(as_cpu(&reflection).unwrap().pixel(0, 0).unwrap(), Vec4::ZERO);
    assert_eq!(as_cpu(&color).unwrap().pixel(0, 0).unwrap(), Vec4::splat(0.5));
    assert_eq!(device.stats().blits, 2);
}

// ============================================================================
// ENGINE
// ============================================================================

#[test]
#[serial]
fn test_cpu_device_registered_in_engine() {
    Engine::initialize().unwrap();
    Engine::create_graphics_device(CpuGraphicsDevice::with_max_color_attachments(2)).unwrap();

    let device = Engine::graphics_device().unwrap();
    let host = HostFrameState::from_device(&*device.lock().unwrap());
    assert_eq!(host.max_color_attachments, 2);
    assert!(!ReflectionConfig { enabled: true, ..ReflectionConfig::default() }.is_active(host.max_color_attachments));

    Engine::destroy_graphics_device().unwrap();
}

/// Unit tests for cpu_shader.rs

use glam::{Vec2, Vec4};
use galaxy_3d_ssr::galaxy3d::config::ReflectionConfig;
use galaxy_3d_ssr::galaxy3d::host::{CameraInfo, TargetDescriptor};
use galaxy_3d_ssr::galaxy3d::render::{
    property, FilterMode, ShaderKeywords, ShaderPass, TextureDesc, TextureFormat,
};
use galaxy_3d_ssr::galaxy3d::shading::{ProgramInputs, ReflectionUniforms};
use crate::cpu_shader::{copy, run_program, ProgramBindings};
use crate::cpu_texture::CpuTexture;

fn texture(name: &str, width: u32, height: u32) -> CpuTexture {
    CpuTexture::new(
        &TextureDesc::new(name, width, height, TextureFormat::R32G32B32A32_SFLOAT).with_filter(FilterMode::Point),
    )
}

fn uniforms() -> ReflectionUniforms {
    ReflectionUniforms::new(&ReflectionConfig::default(), &CameraInfo::game(TargetDescriptor::new(2, 2)), 0)
}

fn quad() -> Vec<Vec4> {
    vec![
        Vec4::new(1.0, 0.0, 0.0, 1.0),
        Vec4::new(0.0, 1.0, 0.0, 1.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
        Vec4::new(1.0, 1.0, 1.0, 1.0),
    ]
}

#[test]
fn test_unbound_globals_read_defaults() {
    let bindings = ProgramBindings::new(texture("source", 1, 1).image().unwrap());
    let uv = Vec2::splat(0.5);
    assert_eq!(bindings.scene_depth(uv), 1.0);
    assert_eq!(bindings.back_depth(uv), 1.0);
    assert_eq!(bindings.normal_smoothness(uv), Vec4::ZERO);
    assert_eq!(bindings.motion(uv), Vec2::ZERO);
}

#[test]
fn test_march_over_sky_clears_destination() {
    let destination = texture("reflect", 2, 2);
    destination.fill(Vec4::ONE).unwrap();
    let bindings = ProgramBindings::new(texture("source", 2, 2).image().unwrap());

    run_program(ShaderPass::ApproximateMarch, &destination, &bindings, &uniforms(), ShaderKeywords::empty()).unwrap();
    assert_eq!(destination.pixels().unwrap(), vec![Vec4::ZERO; 4]);
}

#[test]
fn test_resolve_fetches_hit_color() {
    let source = texture("color", 2, 2);
    source.upload(&quad()).unwrap();
    let hit = texture("hit", 2, 2);
    hit.fill(Vec4::new(0.25, 0.25, 1.0, 0.0)).unwrap();

    let mut bindings = ProgramBindings::new(source.image().unwrap());
    bindings.bind(property::SSR_HIT, hit.image().unwrap());
    let destination = texture("reflect", 2, 2);
    run_program(ShaderPass::AccumulationResolve, &destination, &bindings, &uniforms(), ShaderKeywords::empty()).unwrap();

    assert_eq!(destination.pixels().unwrap(), vec![Vec4::new(1.0, 0.0, 0.0, 1.0); 4]);
}

#[test]
fn test_temporal_blend_uses_factor() {
    let source = texture("reflect", 2, 2);
    let history = texture("history", 2, 2);
    history.fill(Vec4::ONE).unwrap();

    let mut bindings = ProgramBindings::new(source.image().unwrap());
    bindings.bind(property::SSR_HISTORY, history.image().unwrap());
    let mut uniforms = uniforms();
    uniforms.accumulation_factor = 0.25;

    let destination = texture("color", 2, 2);
    run_program(ShaderPass::TemporalBlend, &destination, &bindings, &uniforms, ShaderKeywords::empty()).unwrap();
    assert_eq!(destination.pixel(1, 1).unwrap(), Vec4::splat(0.75));
}

#[test]
fn test_composite_reads_destination() {
    let reflection = texture("reflect", 2, 2);
    reflection.fill(Vec4::new(1.0, 1.0, 1.0, 0.5)).unwrap();
    let destination = texture("color", 2, 2);
    destination.fill(Vec4::new(0.0, 0.0, 0.0, 1.0)).unwrap();

    let bindings = ProgramBindings::new(reflection.image().unwrap());
    run_program(ShaderPass::ApproximateComposite, &destination, &bindings, &uniforms(), ShaderKeywords::empty()).unwrap();
    assert_eq!(destination.pixel(0, 0).unwrap(), Vec4::new(0.5, 0.5, 0.5, 1.0));
}

#[test]
fn test_copy_resamples() {
    let source = texture("source", 2, 2);
    source.upload(&quad()).unwrap();
    let destination = texture("destination", 4, 4);
    copy(&source.image().unwrap(), &destination).unwrap();

    assert_eq!(destination.pixel(1, 1).unwrap(), quad()[0]);
    assert_eq!(destination.pixel(3, 2).unwrap(), quad()[3]);
}

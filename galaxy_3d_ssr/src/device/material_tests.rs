/// Unit tests for material.rs

use crate::device::{Material, ShaderMaterial, ShaderPass, ShaderKeywords, SSR_SHADER_NAME};

#[test]
fn test_reflection_material_shader_name() {
    let material = ShaderMaterial::reflection();
    assert_eq!(material.shader_name(), SSR_SHADER_NAME);
    assert_eq!(SSR_SHADER_NAME, "Hidden/Lighting/ScreenSpaceReflection");
}

#[test]
fn test_custom_material_shader_name() {
    let material = ShaderMaterial::new("Hidden/Other");
    assert_eq!(material.shader_name(), "Hidden/Other");
}

#[test]
fn test_shader_pass_indices() {
    assert_eq!(ShaderPass::ApproximateMarch.index(), 0);
    assert_eq!(ShaderPass::ApproximateComposite.index(), 1);
    assert_eq!(ShaderPass::AccumulationHit.index(), 2);
    assert_eq!(ShaderPass::AccumulationResolve.index(), 3);
    assert_eq!(ShaderPass::TemporalBlend.index(), 4);
}

#[test]
fn test_keyword_names() {
    assert_eq!(ShaderKeywords::BACKFACE_ENABLED.keyword_name(), "_BACKFACE_ENABLED");
    assert_eq!(ShaderKeywords::APPROX_COLOR_MIPMAPS.keyword_name(), "_SSR_APPROX_COLOR_MIPMAPS");
    assert_eq!(ShaderKeywords::all().keyword_name(), "<keyword set>");
}

//! Unit tests for host.rs

use std::sync::Arc;
use crate::device::mock_graphics_device::{MockGraphicsDevice, MockTexture};
use crate::device::{GraphicsBackend, Texture, TextureFormat};
use crate::host::*;

#[test]
fn test_rendering_path_deferred() {
    assert!(RenderingPath::Deferred.is_deferred());
    assert!(RenderingPath::DeferredPlus.is_deferred());
    assert!(!RenderingPath::Forward.is_deferred());
    assert!(!RenderingPath::ForwardPlus.is_deferred());
}

#[test]
fn test_target_descriptor() {
    let target = TargetDescriptor::new(1920, 1080).with_samples(4);
    assert!(target.is_multisampled());
    assert!((target.aspect() - 16.0 / 9.0).abs() < 1e-5);
    assert!(!TargetDescriptor::new(4, 4).with_samples(0).is_multisampled());
}

#[test]
fn test_host_state_from_device() {
    let mut device = MockGraphicsDevice::with_backend(GraphicsBackend::OpenGLCore);
    device.max_color_attachments = 2;
    let host = HostFrameState::from_device(&device);
    assert_eq!(host.backend, GraphicsBackend::OpenGLCore);
    assert_eq!(host.max_color_attachments, 2);
    assert_eq!(host.rendering_path, RenderingPath::Forward);
}

#[test]
fn test_camera_info_builders() {
    let info = CameraInfo::game(TargetDescriptor::new(200, 100))
        .with_kind(CameraKind::SceneView)
        .with_render_type(CameraRenderType::Overlay, false);
    assert_eq!(info.kind, CameraKind::SceneView);
    assert_eq!(info.render_type, CameraRenderType::Overlay);
    assert!(!info.clears_depth);

    let [tan_x, tan_y] = info.tan_half_fov();
    assert!((tan_y - (30f32.to_radians()).tan()).abs() < 1e-5);
    assert!((tan_x - 2.0 * tan_y).abs() < 1e-5);
}

#[test]
fn test_camera_frame_optional_textures() {
    let color: Arc<dyn Texture> = Arc::new(MockTexture::new("color", 4, 4, TextureFormat::R16G16B16A16_SFLOAT));
    let depth: Arc<dyn Texture> = Arc::new(MockTexture::new("depth", 4, 4, TextureFormat::D32_FLOAT));
    let motion: Arc<dyn Texture> = Arc::new(MockTexture::new("motion", 4, 4, TextureFormat::R16G16B16A16_SFLOAT));

    let frame = CameraFrame::new(CameraInfo::game(TargetDescriptor::new(4, 4)), color, depth);
    assert!(frame.motion.is_none());
    assert!(frame.normals.is_none());

    let frame = frame.with_motion(motion);
    assert!(frame.motion.is_some());
    assert!(format!("{:?}", frame).contains("motion"));
}

/// Host pipeline interface
///
/// Everything the reflection passes need to know about the host renderer is
/// passed in explicitly through these types: pipeline-wide state once per
/// frame (`HostFrameState`), camera properties (`CameraInfo`) and the camera's
/// textures (`CameraFrame`).

use std::sync::Arc;
use slotmap::new_key_type;
use crate::device::{GraphicsBackend, GraphicsDevice, Texture, TextureFormat};

new_key_type! {
    /// Stable key of a registered camera
    pub struct CameraKey;
}

/// Host rendering path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderingPath {
    Forward,
    ForwardPlus,
    Deferred,
    DeferredPlus,
}

impl RenderingPath {
    /// Deferred paths expose their own attribute buffers
    pub fn is_deferred(&self) -> bool {
        matches!(self, RenderingPath::Deferred | RenderingPath::DeferredPlus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraKind {
    /// In-game camera
    Game,
    /// Editor scene view
    SceneView,
    /// Asset preview thumbnails
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraRenderType {
    /// Renders the scene from scratch
    Base,
    /// Stacked over a base camera's output
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Gamma,
    Linear,
}

/// Camera color target description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetDescriptor {
    pub width: u32,
    pub height: u32,
    pub color_format: TextureFormat,
    /// MSAA sample count (1 = single-sample)
    pub samples: u32,
}

impl TargetDescriptor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color_format: TextureFormat::R16G16B16A16_SFLOAT,
            samples: 1,
        }
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples.max(1);
        self
    }

    pub fn is_multisampled(&self) -> bool {
        self.samples > 1
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Pipeline-wide state for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostFrameState {
    pub rendering_path: RenderingPath,
    pub backend: GraphicsBackend,
    /// Maximum simultaneous color outputs of the target
    pub max_color_attachments: u32,
    /// A rendering debugger overlay is displayed
    pub debug_overlay_active: bool,
    /// Motion vectors are refreshed this frame (play mode, animated scene view)
    pub motion_vectors_updating: bool,
    pub color_space: ColorSpace,
}

impl HostFrameState {
    /// Forward rendering state with the device's capabilities
    pub fn from_device(device: &dyn GraphicsDevice) -> Self {
        Self {
            rendering_path: RenderingPath::Forward,
            backend: device.backend(),
            max_color_attachments: device.max_color_attachments(),
            debug_overlay_active: false,
            motion_vectors_updating: true,
            color_space: ColorSpace::Linear,
        }
    }
}

impl Default for HostFrameState {
    fn default() -> Self {
        Self {
            rendering_path: RenderingPath::Forward,
            backend: GraphicsBackend::Vulkan,
            max_color_attachments: 8,
            debug_overlay_active: false,
            motion_vectors_updating: true,
            color_space: ColorSpace::Linear,
        }
    }
}

/// Per-camera properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraInfo {
    pub kind: CameraKind,
    pub render_type: CameraRenderType,
    /// Camera clears depth before rendering
    pub clears_depth: bool,
    pub target: TargetDescriptor,
    /// Vertical field of view in radians
    pub vertical_fov: f32,
}

impl CameraInfo {
    /// Base game camera clearing depth, 60 degree field of view
    pub fn game(target: TargetDescriptor) -> Self {
        Self {
            kind: CameraKind::Game,
            render_type: CameraRenderType::Base,
            clears_depth: true,
            target,
            vertical_fov: 60f32.to_radians(),
        }
    }

    pub fn with_kind(mut self, kind: CameraKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_render_type(mut self, render_type: CameraRenderType, clears_depth: bool) -> Self {
        self.render_type = render_type;
        self.clears_depth = clears_depth;
        self
    }

    /// Tangents of the half field of view (horizontal, vertical)
    pub fn tan_half_fov(&self) -> [f32; 2] {
        let tan_y = (self.vertical_fov * 0.5).tan();
        [tan_y * self.target.aspect(), tan_y]
    }
}

/// Camera textures for the current frame
#[derive(Clone)]
pub struct CameraFrame {
    pub info: CameraInfo,
    pub color: Arc<dyn Texture>,
    pub depth: Arc<dyn Texture>,
    pub motion: Option<Arc<dyn Texture>>,
    /// Normals texture already rendered by the host, if any
    pub normals: Option<Arc<dyn Texture>>,
}

impl CameraFrame {
    pub fn new(info: CameraInfo, color: Arc<dyn Texture>, depth: Arc<dyn Texture>) -> Self {
        Self { info, color, depth, motion: None, normals: None }
    }

    pub fn with_motion(mut self, motion: Arc<dyn Texture>) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn with_normals(mut self, normals: Arc<dyn Texture>) -> Self {
        self.normals = Some(normals);
        self
    }
}

impl std::fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraFrame")
            .field("info", &self.info)
            .field("color", &self.color.info().name)
            .field("depth", &self.depth.info().name)
            .field("motion", &self.motion.as_ref().map(|t| t.info().name.clone()))
            .field("normals", &self.normals.as_ref().map(|t| t.info().name.clone()))
            .finish()
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;

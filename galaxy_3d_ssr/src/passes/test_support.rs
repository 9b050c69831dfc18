/// Shared fixture for pass unit tests

use std::sync::Arc;
use slotmap::SlotMap;
use crate::config::ReflectionConfig;
use crate::device::mock_graphics_device::{MockGraphicsDevice, MockTexture};
use crate::device::{Material, ShaderMaterial, Texture, TextureDesc, TextureFormat};
use crate::host::{CameraFrame, CameraInfo, CameraKey, HostFrameState, TargetDescriptor};
use crate::passes::PassContext;
use crate::resource::ResourceCache;

pub struct PassFixture {
    pub device: MockGraphicsDevice,
    pub cache: ResourceCache,
    pub camera: CameraKey,
    pub frame: CameraFrame,
    pub config: ReflectionConfig,
    pub host: HostFrameState,
    pub material: Arc<dyn Material>,
    pub motion_valid: bool,
    _cameras: SlotMap<CameraKey, ()>,
}

pub fn camera_texture(name: &str, target: TargetDescriptor, format: TextureFormat) -> Arc<dyn Texture> {
    Arc::new(MockTexture::from_desc(
        &TextureDesc::new(name, target.width, target.height, format).with_samples(target.samples),
    ))
}

impl PassFixture {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_info(CameraInfo::game(TargetDescriptor::new(width, height)))
    }

    pub fn with_info(info: CameraInfo) -> Self {
        let mut cameras = SlotMap::with_key();
        let camera = cameras.insert(());
        let color = camera_texture("_CameraColorTexture", info.target, TextureFormat::R16G16B16A16_SFLOAT);
        let depth = camera_texture("_CameraDepthAttachment", info.target, TextureFormat::D32_FLOAT);
        Self {
            device: MockGraphicsDevice::new(),
            cache: ResourceCache::new(),
            camera,
            frame: CameraFrame::new(info, color, depth),
            config: ReflectionConfig { enabled: true, ..Default::default() },
            host: HostFrameState::default(),
            material: Arc::new(ShaderMaterial::reflection()),
            motion_valid: true,
            _cameras: cameras,
        }
    }

    pub fn ctx(&mut self) -> PassContext<'_> {
        PassContext {
            device: &mut self.device,
            cache: &mut self.cache,
            camera: self.camera,
            frame: &self.frame,
            config: &self.config,
            host: &self.host,
            material: Some(&self.material),
            motion_valid: self.motion_valid,
            frame_index: 0,
        }
    }
}

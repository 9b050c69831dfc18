/// Reflection passes and the context they record with
///
/// Every pass runs in two steps per camera and frame: `setup` allocates (or
/// reuses) its textures and binds them globally, `execute` records the GPU
/// work at the pass's injection point. Passes hold no per-camera state;
/// everything camera-specific lives in the `ResourceCache`.

pub mod attribute_synthesis;
pub mod thickness;
pub mod resolve;

pub use attribute_synthesis::*;
pub use thickness::*;
pub use resolve::*;

use std::sync::Arc;
use crate::config::ReflectionConfig;
use crate::device::{CommandList, GraphicsDevice, Material, Texture, TextureDesc};
use crate::error::Result;
use crate::host::{CameraFrame, CameraKey, HostFrameState};
use crate::resource::{ResourceCache, ResourceSlot};
use crate::schedule::PassKind;

/// Everything a pass may read or allocate for one camera
pub struct PassContext<'a> {
    pub device: &'a mut dyn GraphicsDevice,
    pub cache: &'a mut ResourceCache,
    pub camera: CameraKey,
    pub frame: &'a CameraFrame,
    pub config: &'a ReflectionConfig,
    pub host: &'a HostFrameState,
    pub material: Option<&'a Arc<dyn Material>>,
    /// Motion vectors can be trusted for this camera
    pub motion_valid: bool,
    pub frame_index: u32,
}

impl PassContext<'_> {
    /// Get or allocate the camera's texture for a slot
    pub fn acquire(&mut self, slot: ResourceSlot, desc: &TextureDesc) -> Result<Arc<dyn Texture>> {
        self.cache.acquire(&mut *self.device, self.camera, slot, desc)
    }

    /// Texture allocated by `setup`
    pub fn texture(&self, slot: ResourceSlot) -> Result<Arc<dyn Texture>> {
        match self.cache.get(self.camera, slot) {
            Some(texture) => Ok(Arc::clone(texture)),
            None => Err(crate::engine_err!(
                "galaxy3d::ssr::PassContext",
                "{:?} used before setup",
                slot
            )),
        }
    }
}

/// One reflection pass
pub trait ReflectionPass: Send + Sync {
    fn kind(&self) -> PassKind;

    /// Allocate and bind textures (the only point where reallocation happens)
    fn setup(&mut self, ctx: &mut PassContext<'_>, cmd: &mut dyn CommandList) -> Result<()>;

    /// Record the pass
    fn execute(&mut self, ctx: &mut PassContext<'_>, cmd: &mut dyn CommandList) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support;

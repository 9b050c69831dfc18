/// Per-camera texture cache
///
/// Textures are keyed by (camera, slot). A slot is reallocated only when the
/// hash of its descriptor changes; otherwise the same texture is handed back
/// frame after frame. Non-persistent slots that were not acquired during a
/// frame are evicted by `end_frame`, persistent ones (hit, history) stay until
/// the camera is released.

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use rustc_hash::{FxHashMap, FxHasher};
use crate::device::{GraphicsDevice, Texture, TextureDesc, property};
use crate::error::Result;
use crate::host::CameraKey;

/// Cached texture roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceSlot {
    /// Copy of camera color (approximation source)
    Source,
    /// Reflection color buffer
    ReflectionColor,
    /// Hit uv + mask (accumulation)
    Hit,
    /// Temporal history (accumulation)
    History,
    /// Albedo + material flags
    GBuffer0,
    /// Specular + occlusion
    GBuffer1,
    /// Normal + smoothness
    GBuffer2,
    /// Private depth for attribute synthesis
    GBufferDepth,
    /// Back-face depth
    BackFaceDepth,
}

impl ResourceSlot {
    /// Global binding name of the slot
    pub fn global_name(&self) -> &'static str {
        match self {
            ResourceSlot::Source => property::SSR_SOURCE,
            ResourceSlot::ReflectionColor => property::SSR_COLOR,
            ResourceSlot::Hit => property::SSR_HIT,
            ResourceSlot::History => property::SSR_HISTORY,
            ResourceSlot::GBuffer0 => property::GBUFFER0,
            ResourceSlot::GBuffer1 => property::GBUFFER1,
            ResourceSlot::GBuffer2 => property::GBUFFER2,
            ResourceSlot::GBufferDepth => property::GBUFFERS_DEPTH,
            ResourceSlot::BackFaceDepth => property::CAMERA_BACK_DEPTH,
        }
    }

    /// Persistent slots carry data from one frame to the next
    pub fn is_persistent(&self) -> bool {
        matches!(self, ResourceSlot::Hit | ResourceSlot::History)
    }
}

/// Hash of a texture descriptor
pub fn descriptor_hash(desc: &TextureDesc) -> u64 {
    let mut hasher = FxHasher::default();
    desc.hash(&mut hasher);
    hasher.finish()
}

struct CachedTexture {
    desc_hash: u64,
    texture: Arc<dyn Texture>,
    used_this_frame: bool,
}

/// Textures owned for one camera
#[derive(Default)]
pub struct FrameResources {
    slots: FxHashMap<ResourceSlot, CachedTexture>,
}

impl FrameResources {
    pub fn get(&self, slot: ResourceSlot) -> Option<&Arc<dyn Texture>> {
        self.slots.get(&slot).map(|cached| &cached.texture)
    }

    pub fn contains(&self, slot: ResourceSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocated slots, sorted
    pub fn slots(&self) -> Vec<ResourceSlot> {
        let mut slots: Vec<ResourceSlot> = self.slots.keys().copied().collect();
        slots.sort();
        slots
    }
}

/// Texture cache for all cameras
#[derive(Default)]
pub struct ResourceCache {
    cameras: FxHashMap<CameraKey, FrameResources>,
    allocations: u64,
    evictions: u64,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the usage marks of a camera's slots
    pub fn begin_frame(&mut self, camera: CameraKey) {
        if let Some(resources) = self.cameras.get_mut(&camera) {
            for cached in resources.slots.values_mut() {
                cached.used_this_frame = false;
            }
        }
    }

    /// Get the slot's texture, allocating it if missing or if the descriptor changed
    pub fn acquire(
        &mut self,
        device: &mut dyn GraphicsDevice,
        camera: CameraKey,
        slot: ResourceSlot,
        desc: &TextureDesc,
    ) -> Result<Arc<dyn Texture>> {
        let hash = descriptor_hash(desc);
        let resources = self.cameras.entry(camera).or_default();

        if let Some(cached) = resources.slots.get_mut(&slot) {
            if cached.desc_hash == hash {
                cached.used_this_frame = true;
                return Ok(Arc::clone(&cached.texture));
            }
        }

        let texture = device.create_texture(desc)?;
        crate::engine_trace!(
            "galaxy3d::ssr::ResourceCache",
            "Allocated {:?} '{}' {}x{} {:?}",
            slot, desc.name, desc.width, desc.height, desc.format
        );
        resources.slots.insert(slot, CachedTexture {
            desc_hash: hash,
            texture: Arc::clone(&texture),
            used_this_frame: true,
        });
        self.allocations += 1;
        Ok(texture)
    }

    /// Evict non-persistent slots not acquired since `begin_frame`; returns the eviction count
    pub fn end_frame(&mut self, camera: CameraKey) -> usize {
        let Some(resources) = self.cameras.get_mut(&camera) else {
            return 0;
        };
        let before = resources.slots.len();
        resources.slots.retain(|slot, cached| cached.used_this_frame || slot.is_persistent());
        let evicted = before - resources.slots.len();
        self.evictions += evicted as u64;
        evicted
    }

    /// Drop a single slot
    pub fn release(&mut self, camera: CameraKey, slot: ResourceSlot) -> bool {
        let released = self
            .cameras
            .get_mut(&camera)
            .and_then(|resources| resources.slots.remove(&slot))
            .is_some();
        if released {
            self.evictions += 1;
        }
        released
    }

    /// Drop every texture of a camera; returns the number of released textures
    pub fn release_camera(&mut self, camera: CameraKey) -> usize {
        let released = self.cameras.remove(&camera).map(|r| r.len()).unwrap_or(0);
        self.evictions += released as u64;
        released
    }

    pub fn resources(&self, camera: CameraKey) -> Option<&FrameResources> {
        self.cameras.get(&camera)
    }

    pub fn get(&self, camera: CameraKey, slot: ResourceSlot) -> Option<&Arc<dyn Texture>> {
        self.cameras.get(&camera).and_then(|resources| resources.get(slot))
    }

    /// Total textures allocated since creation
    pub fn allocation_count(&self) -> u64 {
        self.allocations
    }

    /// Total textures evicted or released since creation
    pub fn eviction_count(&self) -> u64 {
        self.evictions
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }
}

#[cfg(test)]
#[path = "resource_cache_tests.rs"]
mod tests;

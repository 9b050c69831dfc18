/// Screen space reflection orchestrator
///
/// `ReflectionFeature` decides every frame, for every camera, which passes
/// run and where they are injected into the host pipeline, then drives their
/// Setup, Execute and Cleanup phases. It owns the per-camera textures (through
/// the `ResourceCache`) and the per-camera diagnostic state.
///
/// # Example
///
/// ```no_run
/// use std::sync::{Arc, Mutex};
/// use galaxy_3d_ssr::galaxy3d::ReflectionFeature;
/// use galaxy_3d_ssr::galaxy3d::render::{GraphicsDevice, ShaderMaterial};
/// use galaxy_3d_ssr_renderer_cpu::galaxy3d::CpuGraphicsDevice;
///
/// let device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(CpuGraphicsDevice::new()));
/// let mut feature = ReflectionFeature::new(device);
/// feature.set_material(Arc::new(ShaderMaterial::reflection()))?;
/// let camera = feature.register_camera();
/// # let _ = camera;
/// # Ok::<(), galaxy_3d_ssr::galaxy3d::Error>(())
/// ```

use std::sync::{Arc, Mutex};
use slotmap::SlotMap;
use crate::config::{Algorithm, ReflectionConfig};
use crate::device::{CommandList, GraphicsDevice, Material, SSR_SHADER_NAME};
use crate::diagnostics::OneShotNotice;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::host::{CameraFrame, CameraInfo, CameraKind, HostFrameState};
use crate::passes::{AttributeSynthesisPass, PassContext, ReflectionPass, ResolvePass, ThicknessPass};
use crate::resource::{FrameResources, ResourceCache};
use crate::schedule::{InjectionPoint, PassInputs, PassKind, PassSchedule};

pub use crate::host::CameraKey;

const SOURCE: &str = "galaxy3d::ssr::ReflectionFeature";

/// Per-camera orchestration state
#[derive(Debug, Default)]
struct CameraState {
    missing_material: OneShotNotice,
    debugger_active: OneShotNotice,
    /// Frames recorded so far (jitter seed)
    frame_index: u32,
}

pub struct ReflectionFeature {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    material: Option<Arc<dyn Material>>,
    cameras: SlotMap<CameraKey, CameraState>,
    cache: ResourceCache,
    passes: Vec<Box<dyn ReflectionPass>>,
}

impl ReflectionFeature {
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>) -> Self {
        Self {
            device,
            material: None,
            cameras: SlotMap::with_key(),
            cache: ResourceCache::new(),
            passes: vec![
                Box::new(AttributeSynthesisPass::new()),
                Box::new(ThicknessPass::new()),
                Box::new(ResolvePass::new()),
            ],
        }
    }

    /// Feature bound to the device registered with `Engine`
    pub fn from_engine() -> Result<Self> {
        Ok(Self::new(Engine::graphics_device()?))
    }

    // ===== MATERIAL =====

    /// Bind the reflection material
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if the material was not built from the
    /// reflection shader. The previously bound material is kept.
    pub fn set_material(&mut self, material: Arc<dyn Material>) -> Result<()> {
        if material.shader_name() != SSR_SHADER_NAME {
            crate::engine_error!(
                SOURCE,
                "Material uses shader '{}', expected '{}'",
                material.shader_name(),
                SSR_SHADER_NAME
            );
            return Err(Error::InvalidResource(format!(
                "reflection material must use '{}'",
                SSR_SHADER_NAME
            )));
        }
        self.material = Some(material);
        for state in self.cameras.values_mut() {
            state.missing_material.reset();
        }
        Ok(())
    }

    pub fn clear_material(&mut self) {
        self.material = None;
    }

    pub fn material(&self) -> Option<&Arc<dyn Material>> {
        self.material.as_ref()
    }

    // ===== CAMERAS =====

    pub fn register_camera(&mut self) -> CameraKey {
        let key = self.cameras.insert(CameraState::default());
        crate::engine_debug!(SOURCE, "Camera {:?} registered", key);
        key
    }

    /// Camera teardown: drops all of its textures
    pub fn release_camera(&mut self, camera: CameraKey) -> bool {
        if self.cameras.remove(camera).is_none() {
            return false;
        }
        let released = self.cache.release_camera(camera);
        crate::engine_debug!(SOURCE, "Camera {:?} released ({} textures)", camera, released);
        true
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Frames recorded for a camera
    pub fn frame_index(&self, camera: CameraKey) -> Option<u32> {
        self.cameras.get(camera).map(|state| state.frame_index)
    }

    pub fn resources(&self, camera: CameraKey) -> Option<&FrameResources> {
        self.cache.resources(camera)
    }

    pub fn resource_cache(&self) -> &ResourceCache {
        &self.cache
    }

    // ===== SCHEDULING =====

    /// Motion vectors can be trusted for this camera
    pub fn motion_valid(config: &ReflectionConfig, host: &HostFrameState, info: &CameraInfo) -> bool {
        host.motion_vectors_updating || info.kind != CameraKind::SceneView || config.scene_view_accumulation
    }

    /// Injection point of the resolve pass
    pub fn resolve_point(config: &ReflectionConfig) -> InjectionPoint {
        match config.algorithm {
            Algorithm::Approximation => InjectionPoint::BeforeTransparents,
            Algorithm::PbrAccumulation if config.accumulation_factor == 0.0 => InjectionPoint::BeforePostProcessing,
            Algorithm::PbrAccumulation => InjectionPoint::AfterPostProcessing,
        }
    }

    /// Passes to run for a camera this frame
    pub fn schedule(
        &mut self,
        camera: CameraKey,
        config: &ReflectionConfig,
        host: &HostFrameState,
        info: &CameraInfo,
    ) -> PassSchedule {
        let mut schedule = PassSchedule::new();
        let Some(state) = self.cameras.get_mut(camera) else {
            crate::engine_warn!(SOURCE, "Camera {:?} is not registered", camera);
            return schedule;
        };

        if self.material.is_none() {
            if state.missing_material.notify() {
                crate::engine_error!(
                    SOURCE,
                    "No material using '{}' bound, reflections skipped for camera {:?}",
                    SSR_SHADER_NAME,
                    camera
                );
            }
            return schedule;
        }

        let config = config.sanitized();
        if !config.is_active(host.max_color_attachments) || info.kind == CameraKind::Preview {
            return schedule;
        }

        if host.debug_overlay_active && !config.run_in_debugger {
            if state.debugger_active.notify() {
                crate::engine_info!(SOURCE, "Reflections disabled while the rendering debugger is active");
            }
            return schedule;
        }
        state.debugger_active.reset();

        if !host.rendering_path.is_deferred() || host.backend.is_opengl() {
            schedule.push(PassKind::AttributeSynthesis, InjectionPoint::BeforeTransparents, PassInputs::DEPTH);
        }
        schedule.push(PassKind::Thickness, InjectionPoint::AfterOpaques, PassInputs::empty());

        let mut inputs = PassInputs::DEPTH | PassInputs::NORMAL | PassInputs::COLOR;
        if config.algorithm == Algorithm::PbrAccumulation {
            inputs |= PassInputs::MOTION;
        }
        schedule.push(PassKind::Resolve, Self::resolve_point(&config), inputs);
        schedule
    }

    // ===== PHASES =====

    fn run_phase(
        &mut self,
        camera: CameraKey,
        kinds: &[PassKind],
        config: &ReflectionConfig,
        host: &HostFrameState,
        frame: &CameraFrame,
        cmd: &mut dyn CommandList,
        setup: bool,
    ) -> Result<()> {
        let Some(state) = self.cameras.get(camera) else {
            crate::engine_error!(SOURCE, "Camera {:?} is not registered", camera);
            return Err(Error::InvalidResource(format!("unregistered camera {:?}", camera)));
        };
        let frame_index = state.frame_index;

        let config = config.sanitized();
        let device = Arc::clone(&self.device);
        let mut device = device
            .lock()
            .map_err(|_| crate::engine_err!(SOURCE, "GraphicsDevice lock poisoned"))?;

        let mut ctx = PassContext {
            device: &mut *device,
            cache: &mut self.cache,
            camera,
            frame,
            config: &config,
            host,
            material: self.material.as_ref(),
            motion_valid: Self::motion_valid(&config, host, &frame.info),
            frame_index,
        };

        for kind in kinds {
            let Some(pass) = self.passes.iter_mut().find(|pass| pass.kind() == *kind) else {
                continue;
            };
            if setup {
                pass.setup(&mut ctx, cmd)?;
            } else {
                pass.execute(&mut ctx, cmd)?;
            }
        }
        Ok(())
    }

    /// Setup phase: allocate and bind every scheduled pass's textures
    ///
    /// The only point where textures are (re)allocated.
    pub fn setup(
        &mut self,
        camera: CameraKey,
        schedule: &PassSchedule,
        config: &ReflectionConfig,
        host: &HostFrameState,
        frame: &CameraFrame,
        cmd: &mut dyn CommandList,
    ) -> Result<()> {
        self.cache.begin_frame(camera);
        let kinds: Vec<PassKind> = schedule.ordered().iter().map(|pass| pass.kind).collect();
        self.run_phase(camera, &kinds, config, host, frame, cmd, true)
    }

    /// Record the passes scheduled at one injection point
    pub fn execute(
        &mut self,
        camera: CameraKey,
        schedule: &PassSchedule,
        point: InjectionPoint,
        config: &ReflectionConfig,
        host: &HostFrameState,
        frame: &CameraFrame,
        cmd: &mut dyn CommandList,
    ) -> Result<()> {
        let kinds: Vec<PassKind> = schedule.passes_at(point).map(|pass| pass.kind).collect();
        if kinds.is_empty() {
            return Ok(());
        }
        self.run_phase(camera, &kinds, config, host, frame, cmd, false)
    }

    /// Cleanup phase: evict textures not used this frame, advance the frame index
    ///
    /// Returns the number of evicted textures.
    pub fn cleanup(&mut self, camera: CameraKey, schedule: &PassSchedule) -> usize {
        let Some(state) = self.cameras.get_mut(camera) else {
            return 0;
        };
        if schedule.is_empty() {
            return 0;
        }
        state.frame_index = state.frame_index.wrapping_add(1);
        let evicted = self.cache.end_frame(camera);
        if evicted > 0 {
            crate::engine_trace!(SOURCE, "Camera {:?}: evicted {} textures", camera, evicted);
        }
        evicted
    }

    /// Schedule, set up, execute every injection point in order and clean up
    pub fn record_frame(
        &mut self,
        camera: CameraKey,
        config: &ReflectionConfig,
        host: &HostFrameState,
        frame: &CameraFrame,
        cmd: &mut dyn CommandList,
    ) -> Result<PassSchedule> {
        let schedule = self.schedule(camera, config, host, &frame.info);
        if schedule.is_empty() {
            return Ok(schedule);
        }
        self.setup(camera, &schedule, config, host, frame, cmd)?;
        for point in schedule.injection_points() {
            self.execute(camera, &schedule, point, config, host, frame, cmd)?;
        }
        self.cleanup(camera, &schedule);
        Ok(schedule)
    }
}

#[cfg(test)]
#[path = "feature_tests.rs"]
mod tests;

/// GraphicsDevice - CPU implementation of the GraphicsDevice trait
///
/// Executes submitted command lists immediately on the calling thread.
/// Global bindings, keywords and pushed constants persist across submissions,
/// like pipeline state on a GPU queue.

use std::sync::Arc;
use glam::Vec4;
use rustc_hash::FxHashMap;
use galaxy_3d_ssr::{engine_bail, engine_debug, engine_trace};
use galaxy_3d_ssr::galaxy3d::Result;
use galaxy_3d_ssr::galaxy3d::render::{
    Attachment, ClearFlags, CommandList, DeviceStats, GraphicsBackend, GraphicsDevice, RendererListDesc,
    ShaderKeywords, Texture, TextureDesc, TextureFormat, SSR_SHADER_NAME,
};
use galaxy_3d_ssr::galaxy3d::shading::ReflectionUniforms;
use crate::cpu_command_list::{Command, CpuCommandList, RecordedProgram};
use crate::cpu_raster::{self, SceneSurface};
use crate::cpu_shader::{copy, run_program, ProgramBindings, PROGRAM_GLOBALS};
use crate::cpu_texture::{as_cpu, CpuTexture};

const SOURCE: &str = "galaxy3d::ssr::cpu::GraphicsDevice";

/// Default color attachment limit, matching common desktop GPUs
pub const DEFAULT_MAX_COLOR_ATTACHMENTS: u32 = 8;

/// State carried between replayed commands
struct ReplayState {
    globals: FxHashMap<String, Arc<dyn Texture>>,
    keywords: ShaderKeywords,
    constants: Option<ReflectionUniforms>,
    colors: Vec<Arc<dyn Texture>>,
    depth: Option<Arc<dyn Texture>>,
}

impl ReplayState {
    fn new() -> Self {
        Self {
            globals: FxHashMap::default(),
            keywords: ShaderKeywords::empty(),
            constants: None,
            colors: Vec::new(),
            depth: None,
        }
    }
}

/// Software graphics device
pub struct CpuGraphicsDevice {
    max_color_attachments: u32,
    scene: Vec<SceneSurface>,
    state: ReplayState,
    stats: DeviceStats,
}

impl CpuGraphicsDevice {
    pub fn new() -> Self {
        Self::with_max_color_attachments(DEFAULT_MAX_COLOR_ATTACHMENTS)
    }

    /// Device limited to `count` simultaneous color outputs
    pub fn with_max_color_attachments(count: u32) -> Self {
        Self {
            max_color_attachments: count,
            scene: Vec::new(),
            state: ReplayState::new(),
            stats: DeviceStats::default(),
        }
    }

    /// Replace the surfaces drawn by renderer lists
    pub fn set_scene(&mut self, scene: Vec<SceneSurface>) {
        self.scene = scene;
    }

    pub fn scene(&self) -> &[SceneSurface] {
        &self.scene
    }

    /// Host forward rendering of the scene into a camera's color and depth
    pub fn render_scene(&self, color: &Arc<dyn Texture>, depth: &Arc<dyn Texture>) -> Result<()> {
        cpu_raster::render_scene(&self.scene, as_cpu(color)?, as_cpu(depth)?)
    }

    /// Texture last bound under a global name
    pub fn global(&self, name: &str) -> Option<&Arc<dyn Texture>> {
        self.state.globals.get(name)
    }

    pub fn keywords(&self) -> ShaderKeywords {
        self.state.keywords
    }

    /// Last uniform block pushed
    pub fn constants(&self) -> Option<&ReflectionUniforms> {
        self.state.constants.as_ref()
    }

    fn bind_targets(&mut self, colors: &[Attachment], depth: Option<&Attachment>) -> Result<()> {
        if colors.len() as u32 > self.max_color_attachments {
            engine_bail!(
                SOURCE,
                "{} color attachments bound, device supports {}",
                colors.len(),
                self.max_color_attachments
            );
        }
        self.state.colors = colors.iter().map(|a| Arc::clone(&a.texture)).collect();
        self.state.depth = depth.map(|a| Arc::clone(&a.texture));
        Ok(())
    }

    fn clear(&self, flags: ClearFlags, color: [f32; 4], depth: f32) -> Result<()> {
        if flags.contains(ClearFlags::COLOR) {
            for target in &self.state.colors {
                as_cpu(target)?.fill(Vec4::from(color))?;
            }
        }
        if flags.contains(ClearFlags::DEPTH) {
            if let Some(target) = &self.state.depth {
                as_cpu(target)?.fill(Vec4::splat(depth))?;
            }
        }
        Ok(())
    }

    fn draw(&mut self, desc: &RendererListDesc) -> Result<()> {
        let colors = self.state.colors.iter().map(as_cpu).collect::<Result<Vec<&CpuTexture>>>()?;
        let depth = self.state.depth.as_ref().map(as_cpu).transpose()?;
        let fragments = cpu_raster::draw_renderers(&self.scene, desc, &colors, depth)?;
        engine_trace!(SOURCE, "draw_renderers {:?}: {} fragments", desc.shader_tag, fragments);
        self.stats.draws += 1;
        Ok(())
    }

    fn blit(
        &mut self,
        source: &Arc<dyn Texture>,
        destination: &Arc<dyn Texture>,
        program: Option<&RecordedProgram>,
    ) -> Result<()> {
        let image = as_cpu(source)?.image()?;
        let target = as_cpu(destination)?;
        match program {
            None => copy(&image, target)?,
            Some(program) => {
                if program.material.shader_name() != SSR_SHADER_NAME {
                    engine_bail!(SOURCE, "material shader '{}' cannot be executed", program.material.shader_name());
                }
                let Some(uniforms) = self.state.constants.as_ref() else {
                    engine_bail!(SOURCE, "{:?} blit without pushed constants", program.pass);
                };
                let mut bindings = ProgramBindings::new(image);
                for name in PROGRAM_GLOBALS {
                    if let Some(texture) = self.state.globals.get(name) {
                        bindings.bind(name, as_cpu(texture)?.image()?);
                    }
                }
                run_program(program.pass, target, &bindings, uniforms, self.state.keywords)?;
            }
        }
        self.stats.blits += 1;
        Ok(())
    }

    fn replay(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::BeginSample(name) => engine_trace!(SOURCE, "begin {}", name),
            Command::EndSample => {}
            Command::SetRenderTargets { colors, depth } => self.bind_targets(colors, depth.as_ref())?,
            Command::Clear { flags, color, depth } => self.clear(*flags, *color, *depth)?,
            Command::DrawRenderers(desc) => self.draw(desc)?,
            Command::Blit { source, destination, program } => self.blit(source, destination, program.as_ref())?,
            Command::GenerateMips(texture) => as_cpu(texture)?.generate_mips()?,
            Command::PushConstants(bytes) => {
                let Some(uniforms) = ReflectionUniforms::from_bytes(bytes) else {
                    engine_bail!(SOURCE, "uniform block of {} bytes does not match the program", bytes.len());
                };
                self.state.constants = Some(uniforms);
            }
            Command::SetKeyword(keyword, enabled) => self.state.keywords.set(*keyword, *enabled),
            Command::SetGlobalTexture(name, texture) => {
                self.state.globals.insert(name.clone(), Arc::clone(texture));
            }
            Command::ClearGlobalTexture(name) => {
                self.state.globals.remove(name);
            }
        }
        Ok(())
    }
}

impl Default for CpuGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for CpuGraphicsDevice {
    fn backend(&self) -> GraphicsBackend {
        GraphicsBackend::Software
    }

    fn max_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    fn supports_render_format(&self, _format: TextureFormat) -> bool {
        true
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Arc<dyn Texture>> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(SOURCE, "texture '{}' has zero extent {}x{}", desc.name, desc.width, desc.height);
        }
        self.stats.textures_created += 1;
        engine_debug!(
            SOURCE,
            "created '{}' {}x{} {:?} mips={}",
            desc.name,
            desc.width,
            desc.height,
            desc.format,
            desc.mip_levels
        );
        Ok(Arc::new(CpuTexture::new(desc)))
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        Ok(Box::new(CpuCommandList::new()))
    }

    fn submit(&mut self, commands: &[&dyn CommandList]) -> Result<()> {
        for list in commands {
            let Some(list) = list.as_any().downcast_ref::<CpuCommandList>() else {
                engine_bail!(SOURCE, "command list was not created by the software device");
            };
            for command in list.commands() {
                self.replay(command)?;
            }
            self.stats.submissions += 1;
        }
        Ok(())
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "cpu_graphics_device_tests.rs"]
mod tests;

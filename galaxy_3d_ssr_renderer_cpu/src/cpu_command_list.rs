/// CommandList - CPU implementation of the CommandList trait
///
/// Commands are recorded as values and replayed by
/// `CpuGraphicsDevice::submit`.

use std::any::Any;
use std::sync::Arc;
use galaxy_3d_ssr::engine_bail;
use galaxy_3d_ssr::galaxy3d::Result;
use galaxy_3d_ssr::galaxy3d::render::{
    Attachment, ClearFlags, CommandList, Material, ProgramPass, RendererListDesc, ShaderKeywords,
    ShaderPass, Texture,
};

/// Program pass captured by a blit
#[derive(Clone)]
pub struct RecordedProgram {
    pub material: Arc<dyn Material>,
    pub pass: ShaderPass,
}

/// Recorded command
#[derive(Clone)]
pub enum Command {
    BeginSample(String),
    EndSample,
    SetRenderTargets {
        colors: Vec<Attachment>,
        depth: Option<Attachment>,
    },
    Clear {
        flags: ClearFlags,
        color: [f32; 4],
        depth: f32,
    },
    DrawRenderers(RendererListDesc),
    Blit {
        source: Arc<dyn Texture>,
        destination: Arc<dyn Texture>,
        program: Option<RecordedProgram>,
    },
    GenerateMips(Arc<dyn Texture>),
    PushConstants(Vec<u8>),
    SetKeyword(ShaderKeywords, bool),
    SetGlobalTexture(String, Arc<dyn Texture>),
    ClearGlobalTexture(String),
}

impl Command {
    /// Short description for traces
    pub fn label(&self) -> String {
        match self {
            Command::BeginSample(name) => format!("begin_sample {}", name),
            Command::EndSample => "end_sample".to_string(),
            Command::SetRenderTargets { colors, depth } => format!(
                "set_render_targets {} color(s), depth={}",
                colors.len(),
                depth.as_ref().map(|d| d.texture.info().name.as_str()).unwrap_or("none")
            ),
            Command::Clear { flags, .. } => format!("clear {:?}", flags),
            Command::DrawRenderers(desc) => format!("draw_renderers {:?}", desc.shader_tag),
            Command::Blit { source, destination, program } => format!(
                "blit {} -> {}{}",
                source.info().name,
                destination.info().name,
                program.as_ref().map(|p| format!(" ({:?})", p.pass)).unwrap_or_default()
            ),
            Command::GenerateMips(texture) => format!("generate_mips {}", texture.info().name),
            Command::PushConstants(data) => format!("push_constants {} bytes", data.len()),
            Command::SetKeyword(keyword, enabled) => format!("set_keyword {}={}", keyword.keyword_name(), enabled),
            Command::SetGlobalTexture(name, texture) => format!("set_global_texture {}={}", name, texture.info().name),
            Command::ClearGlobalTexture(name) => format!("clear_global_texture {}", name),
        }
    }
}

/// CPU command list
#[derive(Default)]
pub struct CpuCommandList {
    commands: Vec<Command>,
    /// Profiling scopes currently open
    open_samples: u32,
}

impl CpuCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop recorded commands so the list can be reused
    pub fn reset(&mut self) {
        self.commands.clear();
        self.open_samples = 0;
    }
}

impl CommandList for CpuCommandList {
    fn begin_sample(&mut self, name: &str) -> Result<()> {
        self.open_samples += 1;
        self.commands.push(Command::BeginSample(name.to_string()));
        Ok(())
    }

    fn end_sample(&mut self) -> Result<()> {
        if self.open_samples == 0 {
            engine_bail!("galaxy3d::ssr::cpu::CommandList", "end_sample without begin_sample");
        }
        self.open_samples -= 1;
        self.commands.push(Command::EndSample);
        Ok(())
    }

    fn set_render_targets(&mut self, colors: &[Attachment], depth: Option<&Attachment>) -> Result<()> {
        self.commands.push(Command::SetRenderTargets {
            colors: colors.to_vec(),
            depth: depth.cloned(),
        });
        Ok(())
    }

    fn clear(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32) -> Result<()> {
        self.commands.push(Command::Clear { flags, color, depth });
        Ok(())
    }

    fn draw_renderers(&mut self, desc: &RendererListDesc) -> Result<()> {
        self.commands.push(Command::DrawRenderers(*desc));
        Ok(())
    }

    fn blit(
        &mut self,
        source: &Arc<dyn Texture>,
        destination: &Arc<dyn Texture>,
        program: Option<ProgramPass<'_>>,
    ) -> Result<()> {
        self.commands.push(Command::Blit {
            source: Arc::clone(source),
            destination: Arc::clone(destination),
            program: program.map(|p| RecordedProgram {
                material: Arc::clone(p.material),
                pass: p.pass,
            }),
        });
        Ok(())
    }

    fn generate_mips(&mut self, texture: &Arc<dyn Texture>) -> Result<()> {
        if !texture.info().has_mips() {
            engine_bail!(
                "galaxy3d::ssr::cpu::CommandList",
                "generate_mips on '{}' without mip chain",
                texture.info().name
            );
        }
        self.commands.push(Command::GenerateMips(Arc::clone(texture)));
        Ok(())
    }

    fn push_constants(&mut self, data: &[u8]) -> Result<()> {
        self.commands.push(Command::PushConstants(data.to_vec()));
        Ok(())
    }

    fn set_keyword(&mut self, keyword: ShaderKeywords, enabled: bool) -> Result<()> {
        self.commands.push(Command::SetKeyword(keyword, enabled));
        Ok(())
    }

    fn set_global_texture(&mut self, name: &str, texture: &Arc<dyn Texture>) -> Result<()> {
        self.commands.push(Command::SetGlobalTexture(name.to_string(), Arc::clone(texture)));
        Ok(())
    }

    fn clear_global_texture(&mut self, name: &str) -> Result<()> {
        self.commands.push(Command::ClearGlobalTexture(name.to_string()));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "cpu_command_list_tests.rs"]
mod tests;

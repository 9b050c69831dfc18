/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every command as a string so pass tests can assert on the exact
/// command sequence without executing anything.

use std::any::Any;
use std::sync::Arc;
use crate::device::{
    GraphicsDevice, GraphicsBackend, DeviceStats, CommandList, Texture, TextureDesc,
    TextureFormat, TextureInfo, Attachment, ClearFlags, RendererListDesc, ProgramPass,
    ShaderKeywords,
};
use crate::error::Result;
use crate::engine_bail;

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
}

impl MockTexture {
    pub fn new(name: &str, width: u32, height: u32, format: TextureFormat) -> Self {
        Self::from_desc(&TextureDesc::new(name, width, height, format))
    }

    pub fn from_desc(desc: &TextureDesc) -> Self {
        Self { info: TextureInfo::from(desc) }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

#[derive(Default)]
pub struct MockCommandList {
    pub commands: Vec<String>,
    /// Global bindings in recording order
    pub globals: Vec<(String, Arc<dyn Texture>)>,
    /// Last uniform block pushed
    pub constants: Vec<u8>,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last texture bound under `name`
    pub fn global(&self, name: &str) -> Option<&Arc<dyn Texture>> {
        self.globals.iter().rev().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// Recorded commands starting with `prefix`
    pub fn commands_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|c| c.starts_with(prefix))
            .map(|c| c.as_str())
            .collect()
    }
}

fn clear_flags_label(flags: ClearFlags) -> String {
    let mut parts = Vec::new();
    if flags.contains(ClearFlags::COLOR) {
        parts.push("COLOR");
    }
    if flags.contains(ClearFlags::DEPTH) {
        parts.push("DEPTH");
    }
    parts.join("|")
}

impl CommandList for MockCommandList {
    fn begin_sample(&mut self, name: &str) -> Result<()> {
        self.commands.push(format!("begin_sample:{}", name));
        Ok(())
    }

    fn end_sample(&mut self) -> Result<()> {
        self.commands.push("end_sample".to_string());
        Ok(())
    }

    fn set_render_targets(&mut self, colors: &[Attachment], depth: Option<&Attachment>) -> Result<()> {
        let names: Vec<&str> = colors.iter().map(|a| a.texture.info().name.as_str()).collect();
        let depth_name = depth.map(|a| a.texture.info().name.as_str()).unwrap_or("none");
        self.commands.push(format!("set_render_targets:{};depth={}", names.join(","), depth_name));
        Ok(())
    }

    fn clear(&mut self, flags: ClearFlags, _color: [f32; 4], _depth: f32) -> Result<()> {
        self.commands.push(format!("clear:{}", clear_flags_label(flags)));
        Ok(())
    }

    fn draw_renderers(&mut self, desc: &RendererListDesc) -> Result<()> {
        self.commands.push(format!(
            "draw_renderers:{:?}:{:?}:{}:{:?}",
            desc.shader_tag,
            desc.state.depth.compare,
            if desc.state.depth.write_enabled { "write" } else { "nowrite" },
            desc.state.cull,
        ));
        Ok(())
    }

    fn blit(
        &mut self,
        source: &Arc<dyn Texture>,
        destination: &Arc<dyn Texture>,
        program: Option<ProgramPass<'_>>,
    ) -> Result<()> {
        match program {
            Some(program) => self.commands.push(format!(
                "blit:{}->{}:{:?}",
                source.info().name,
                destination.info().name,
                program.pass
            )),
            None => self.commands.push(format!(
                "blit:{}->{}",
                source.info().name,
                destination.info().name
            )),
        }
        Ok(())
    }

    fn generate_mips(&mut self, texture: &Arc<dyn Texture>) -> Result<()> {
        if !texture.info().has_mips() {
            engine_bail!("galaxy3d::ssr::Mock", "generate_mips on '{}' without mips", texture.info().name);
        }
        self.commands.push(format!("generate_mips:{}", texture.info().name));
        Ok(())
    }

    fn push_constants(&mut self, data: &[u8]) -> Result<()> {
        self.constants = data.to_vec();
        self.commands.push(format!("push_constants:{}", data.len()));
        Ok(())
    }

    fn set_keyword(&mut self, keyword: ShaderKeywords, enabled: bool) -> Result<()> {
        self.commands.push(format!("set_keyword:{}={}", keyword.keyword_name(), enabled));
        Ok(())
    }

    fn set_global_texture(&mut self, name: &str, texture: &Arc<dyn Texture>) -> Result<()> {
        self.globals.push((name.to_string(), Arc::clone(texture)));
        self.commands.push(format!("set_global_texture:{}={}", name, texture.info().name));
        Ok(())
    }

    fn clear_global_texture(&mut self, name: &str) -> Result<()> {
        self.globals.retain(|(n, _)| n != name);
        self.commands.push(format!("clear_global_texture:{}", name));
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock device that tracks created textures without GPU
pub struct MockGraphicsDevice {
    pub backend: GraphicsBackend,
    pub max_color_attachments: u32,
    pub supports_snorm: bool,
    /// Names of created textures, in creation order
    pub created_textures: Vec<String>,
    pub submitted_commands: Vec<String>,
    stats: DeviceStats,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            backend: GraphicsBackend::Vulkan,
            max_color_attachments: 8,
            supports_snorm: true,
            created_textures: Vec::new(),
            submitted_commands: Vec::new(),
            stats: DeviceStats::default(),
        }
    }

    pub fn with_backend(backend: GraphicsBackend) -> Self {
        Self { backend, ..Self::new() }
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn backend(&self) -> GraphicsBackend {
        self.backend
    }

    fn max_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    fn supports_render_format(&self, format: TextureFormat) -> bool {
        !format.is_signed_normalized() || self.supports_snorm
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Arc<dyn Texture>> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("galaxy3d::ssr::Mock", "texture '{}' has zero extent", desc.name);
        }
        self.created_textures.push(desc.name.clone());
        self.stats.textures_created += 1;
        Ok(Arc::new(MockTexture::from_desc(desc)))
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        Ok(Box::new(MockCommandList::new()))
    }

    fn submit(&mut self, commands: &[&dyn CommandList]) -> Result<()> {
        for list in commands {
            let Some(mock) = list.as_any().downcast_ref::<MockCommandList>() else {
                engine_bail!("galaxy3d::ssr::Mock", "foreign command list submitted");
            };
            self.submitted_commands.extend(mock.commands.iter().cloned());
            self.stats.submissions += 1;
        }
        Ok(())
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;

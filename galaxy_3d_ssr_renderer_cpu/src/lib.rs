/*!
# Galaxy 3D SSR - Software Renderer Backend

CPU implementation of the `galaxy_3d_ssr` device traits.

Textures are stored as `Vec4` texels, command lists are recorded as values and
replayed on `submit`, and blits through the reflection material run the
reference shader kernels of `galaxy_3d_ssr::galaxy3d::shading` per pixel. The
scene drawn by renderer lists is a set of screen-aligned surfaces, which is
enough to run the whole reflection feature end to end without a GPU.
*/

mod cpu_texture;
mod cpu_command_list;
mod cpu_raster;
mod cpu_shader;
mod cpu_graphics_device;
mod debug;

pub mod galaxy3d {
    pub use crate::cpu_graphics_device::{CpuGraphicsDevice, DEFAULT_MAX_COLOR_ATTACHMENTS};
    pub use crate::cpu_texture::{as_cpu, CpuTexture, MipLevel, TextureImage};
    pub use crate::cpu_command_list::{Command, CpuCommandList, RecordedProgram};
    pub use crate::cpu_raster::SceneSurface;
    pub use crate::cpu_shader::ProgramBindings;

    // Re-export debug utilities
    pub use crate::debug::{format_stats_report, print_stats_report};
}

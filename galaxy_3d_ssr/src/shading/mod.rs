/// Reference definitions of the reflection shader program
///
/// The kernels here fix the numeric behavior of each program pass: fades,
/// thickness, ray marching, jitter and temporal blending. The software
/// backend executes them directly. Normals are taken in view space.

pub mod uniforms;
pub mod fade;
pub mod march;
pub mod temporal;
pub mod program;

pub use uniforms::*;
pub use fade::*;
pub use march::*;
pub use temporal::*;
pub use program::*;

#[cfg(test)]
#[path = "shading_tests.rs"]
mod tests;

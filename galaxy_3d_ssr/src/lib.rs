/*!
# Galaxy 3D SSR

Screen space reflections for the Galaxy 3D rendering pipeline.

This crate reuses the depth, normal and color buffers already rendered for the
current frame to approximate mirror-like and glossy reflections. It does not
own a renderer: the host pipeline exposes a `GraphicsDevice` and a
`CommandList` (trait objects, implemented by backends such as
`galaxy_3d_ssr_renderer_cpu`), and this crate decides which passes run, in
which order, with which textures.

## Architecture

- **ReflectionFeature**: per-frame, per-camera orchestrator producing a `PassSchedule`
- **AttributeSynthesisPass**: forward-path surface attribute buffers (`_GBuffer0..2`)
- **ThicknessPass**: back-face depth for thickness testing
- **ResolvePass**: ray marching and resolve (Approximation / PBR Accumulation)
- **ResourceCache**: per-camera textures, reallocated only when descriptors change
- **shading**: reference definitions of the reflection shader program
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod device;
pub mod config;
pub mod host;
pub mod resource;
pub mod schedule;
pub mod passes;
pub mod shading;
pub mod feature;
mod diagnostics;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Orchestrator
    pub use crate::feature::{ReflectionFeature, CameraKey};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device sub-module with all host-facing rendering types
    pub mod render {
        pub use crate::device::*;
    }

    // Configuration sub-module
    pub mod config {
        pub use crate::config::*;
    }

    // Host pipeline state sub-module
    pub mod host {
        pub use crate::host::*;
    }

    // Pass scheduling sub-module
    pub mod schedule {
        pub use crate::schedule::*;
    }

    // Per-camera resources sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Shader program reference kernels
    pub mod shading {
        pub use crate::shading::*;
    }
}

// Re-export math library at crate root
pub use glam;

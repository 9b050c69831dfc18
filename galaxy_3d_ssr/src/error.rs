//! Error types for Galaxy3D screen space reflections
//!
//! This module defines the error types used throughout the crate, including
//! device failures, invalid resources and initialization problems.
//!
//! Nothing here is fatal to the host: the orchestrator recovers from
//! misconfiguration and capability shortfalls locally. Errors only surface
//! when the device or command list itself fails.

use std::fmt;

/// Result type for Galaxy3D SSR operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D SSR errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (device, command list, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, material, camera, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an `Error::BackendError`, logging it at ERROR severity with file:line
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_ssr::engine_err;
/// let err = engine_err!("galaxy3d::ssr::cpu", "texture {} not found", 3);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::galaxy3d::Engine::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error and return `Err(Error::BackendError)` from the current function
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_ssr::engine_bail;
/// fn check(samples: u32) -> galaxy_3d_ssr::galaxy3d::Result<()> {
///     if samples == 0 {
///         engine_bail!("galaxy3d::ssr::cpu", "invalid sample count {}", samples);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

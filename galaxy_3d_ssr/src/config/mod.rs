/// Configuration module - reflection parameters and override layers

pub mod reflection_config;
pub mod config_stack;

pub use reflection_config::*;
pub use config_stack::*;

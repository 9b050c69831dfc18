/// Prioritized override layers resolving to a `ReflectionConfig`
///
/// Each layer overrides only the fields it sets. Layers are applied over the
/// defaults in ascending priority (insertion order breaks ties), so the
/// highest priority layer wins.

use crate::config::{
    ReflectionConfig, Algorithm, Resolution, MipmapsMode, ThicknessMode, Quality,
};

/// Partial configuration: `None` leaves the underlying value untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverride {
    pub enabled: Option<bool>,
    pub algorithm: Option<Algorithm>,
    pub resolution: Option<Resolution>,
    pub mipmaps_mode: Option<MipmapsMode>,
    pub thickness_mode: Option<ThicknessMode>,
    pub min_smoothness: Option<f32>,
    pub fade_smoothness: Option<f32>,
    pub edge_fade: Option<f32>,
    pub thickness: Option<f32>,
    pub quality: Option<Quality>,
    pub max_step: Option<u32>,
    pub accumulation_factor: Option<f32>,
    pub run_in_debugger: Option<bool>,
    pub scene_view_accumulation: Option<bool>,
}

impl ConfigOverride {
    /// Override that sets every field from `config`
    pub fn from_config(config: &ReflectionConfig) -> Self {
        Self {
            enabled: Some(config.enabled),
            algorithm: Some(config.algorithm),
            resolution: Some(config.resolution),
            mipmaps_mode: Some(config.mipmaps_mode),
            thickness_mode: Some(config.thickness_mode),
            min_smoothness: Some(config.min_smoothness),
            fade_smoothness: Some(config.fade_smoothness),
            edge_fade: Some(config.edge_fade),
            thickness: Some(config.thickness),
            quality: Some(config.quality),
            max_step: Some(config.max_step),
            accumulation_factor: Some(config.accumulation_factor),
            run_in_debugger: Some(config.run_in_debugger),
            scene_view_accumulation: Some(config.scene_view_accumulation),
        }
    }

    /// Write the set fields into `config`
    pub fn apply_to(&self, config: &mut ReflectionConfig) {
        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = self.$field { config.$field = value; })*
            };
        }
        apply!(
            enabled, algorithm, resolution, mipmaps_mode, thickness_mode,
            min_smoothness, fade_smoothness, edge_fade, thickness, quality,
            max_step, accumulation_factor, run_in_debugger, scene_view_accumulation
        );
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone)]
struct ConfigLayer {
    name: String,
    priority: i32,
    active: bool,
    overrides: ConfigOverride,
}

/// Ordered set of named override layers
#[derive(Debug, Clone, Default)]
pub struct ConfigStack {
    base: ReflectionConfig,
    layers: Vec<ConfigLayer>,
}

impl ConfigStack {
    /// Stack over the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack over a custom base configuration
    pub fn with_base(base: ReflectionConfig) -> Self {
        Self { base, layers: Vec::new() }
    }

    /// Add or replace a layer (replacing keeps the layer's active flag)
    pub fn set_layer(&mut self, name: &str, priority: i32, overrides: ConfigOverride) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.name == name) {
            layer.priority = priority;
            layer.overrides = overrides;
            return;
        }
        self.layers.push(ConfigLayer {
            name: name.to_string(),
            priority,
            active: true,
            overrides,
        });
    }

    /// Enable or disable a layer; returns false if the layer does not exist
    pub fn set_layer_active(&mut self, name: &str, active: bool) -> bool {
        match self.layers.iter_mut().find(|l| l.name == name) {
            Some(layer) => {
                layer.active = active;
                true
            }
            None => false,
        }
    }

    /// Remove a layer; returns false if the layer does not exist
    pub fn remove_layer(&mut self, name: &str) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| l.name != name);
        self.layers.len() != before
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Resolve active layers over the base, then sanitize
    pub fn resolve(&self) -> ReflectionConfig {
        let mut ordered: Vec<&ConfigLayer> = self.layers.iter().filter(|l| l.active).collect();
        // Stable sort keeps insertion order among equal priorities
        ordered.sort_by_key(|l| l.priority);

        let mut config = self.base;
        for layer in ordered {
            layer.overrides.apply_to(&mut config);
        }
        config.sanitized()
    }
}

#[cfg(test)]
#[path = "config_stack_tests.rs"]
mod tests;

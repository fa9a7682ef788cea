//! Builder configuration.
//!
//! Every field has a default, so a YAML file only needs the values it
//! changes:
//!
//! ```yaml
//! slide_width_px: 960
//! layer_priorities:
//!   icon: 45
//! ```

use super::error::{DeckError, Result};
use crate::common::unit::EMUS_PER_PX_96;
use crate::plan::ElementKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for [`super::DeckBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Plan canvas width in pixels; becomes the slide width
    pub slide_width_px: f64,
    pub slide_height_px: f64,
    /// Linear pixel-to-EMU scale
    pub emu_per_px: i64,
    pub default_font_size_pt: f64,
    pub default_animation_ms: u32,
    /// Edge length of rasterized icons
    pub icon_raster_px: u32,
    pub layer_priorities: LayerPriorities,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            slide_width_px: 1280.0,
            slide_height_px: 720.0,
            emu_per_px: EMUS_PER_PX_96,
            default_font_size_pt: 18.0,
            default_animation_ms: 500,
            icon_raster_px: 256,
            layer_priorities: LayerPriorities::default(),
        }
    }
}

impl BuilderConfig {
    /// Parse a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_saphyr::from_str(yaml).map_err(|e| DeckError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| DeckError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.slide_width_px) || !positive(self.slide_height_px) {
            return Err(DeckError::Config(format!(
                "slide size must be positive, got {}x{}",
                self.slide_width_px, self.slide_height_px
            )));
        }
        if self.emu_per_px <= 0 {
            return Err(DeckError::Config(format!(
                "emu_per_px must be positive, got {}",
                self.emu_per_px
            )));
        }
        if self.icon_raster_px == 0 {
            return Err(DeckError::Config("icon_raster_px must be positive".to_string()));
        }
        Ok(())
    }
}

/// Default paint-order priority per element type; lower paints first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerPriorities {
    pub image: i64,
    pub shape: i64,
    pub icon: i64,
    pub chart: i64,
    pub table: i64,
    pub text: i64,
}

impl Default for LayerPriorities {
    fn default() -> Self {
        Self {
            image: 10,
            shape: 20,
            icon: 30,
            chart: 40,
            table: 40,
            text: 50,
        }
    }
}

impl LayerPriorities {
    /// Priority of an element type.
    pub fn for_kind(&self, kind: &ElementKind) -> i64 {
        match kind {
            ElementKind::Image { .. } => self.image,
            ElementKind::Shape { .. } => self.shape,
            ElementKind::Icon { .. } => self.icon,
            ElementKind::Chart { .. } => self.chart,
            ElementKind::Table { .. } => self.table,
            ElementKind::TextBox { .. } => self.text,
        }
    }
}

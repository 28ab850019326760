//! YAML configuration for the viewer and renderer.
//!
//! Every field is optional; a missing file section falls back to the
//! defaults below, which reproduce the classic 1200×800 view.
//!
//! ```yaml
//! canvas:
//!   width: 1200
//!   height: 800
//! view:
//!   translation: [600, 400]
//!   scaling: 40
//! pattern:
//!   colours: [black, "rgb(176, 93, 37)", "#23622d", "rgb(81, 122, 184)"]
//!   debug_bounds: false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use littlebird::{PatternConfig, Rectangle, Transformation, Vector};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub view: ViewConfig,
    pub pattern: PatternConfig,
}

/// Pixel size of the rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 1200, height: 800 }
    }
}

/// Initial view and input step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub translation: [f64; 2],
    pub scaling: f64,
    /// Wheel zoom factor per notch (zooming out uses `2 - zoom_step`).
    pub zoom_step: f64,
    /// Keyboard pan distance in pixels.
    pub pan_step: f64,
    /// Scaling limits applied by the viewer.
    pub min_scaling: f64,
    pub max_scaling: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            translation: [600.0, 400.0],
            scaling: 40.0,
            zoom_step: 1.02,
            pan_step: 40.0,
            min_scaling: 2.0,
            max_scaling: 2000.0,
        }
    }
}

impl Config {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be at least 1x1, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        let view = &self.view;
        if !(view.scaling.is_finite() && view.scaling > 0.0) {
            return Err(ConfigError::Invalid(format!("scaling must be positive, got {}", view.scaling)));
        }
        if !(view.zoom_step > 1.0 && view.zoom_step < 2.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be between 1 and 2, got {}",
                view.zoom_step
            )));
        }
        if !(view.min_scaling > 0.0 && view.min_scaling <= view.max_scaling) {
            return Err(ConfigError::Invalid(format!(
                "scaling limits must satisfy 0 < min <= max, got {}..{}",
                view.min_scaling, view.max_scaling
            )));
        }
        Ok(())
    }

    /// The canvas rectangle in pixels, anchored at the origin.
    pub fn canvas_rect(&self) -> Rectangle {
        Rectangle::new(
            Vector::ZERO,
            Vector::new(self.canvas.width as f64, self.canvas.height as f64),
        )
    }

    pub fn initial_transformation(&self) -> Transformation {
        let [x, y] = self.view.translation;
        Transformation::new(Vector::new(x, y), self.view.scaling)
    }
}

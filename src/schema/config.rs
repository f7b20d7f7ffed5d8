//! Configuration types for automaton construction.
//!
//! Every default is resolved exactly once, here: the config deserializes
//! field-by-field with serde defaults so a partial (or absent) JSON object
//! yields the same values as [`EngineConfig::default`], and `validate`
//! runs once at engine construction.

use serde::{Deserialize, Serialize};

use crate::render::Rgb;

fn default_width() -> usize {
    100
}

fn default_height() -> usize {
    100
}

fn default_tick_speed() -> f32 {
    40.0
}

fn default_auto_draw() -> bool {
    true
}

fn default_cell_scale() -> u32 {
    5
}

fn default_bg_color() -> Rgb {
    Rgb::WHITE
}

fn default_grid_line_draw() -> bool {
    true
}

fn default_grid_line_every() -> u32 {
    1
}

fn default_grid_line_color() -> Rgb {
    Rgb::GRAY
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Grid width in cells.
    #[serde(default = "default_width")]
    pub width: usize,
    /// Grid height in cells.
    #[serde(default = "default_height")]
    pub height: usize,
    /// Ticks per second while running.
    #[serde(default = "default_tick_speed")]
    pub tick_speed: f32,
    /// Start the periodic schedule immediately at construction.
    #[serde(default)]
    pub auto_tick: bool,
    /// Leave the grid blank on `reset` instead of re-running the initializer.
    #[serde(default)]
    pub blank_reset: bool,
    /// Perform a render pass automatically after every tick.
    #[serde(default = "default_auto_draw")]
    pub auto_draw: bool,
    /// Pixels per cell when rendering.
    #[serde(default = "default_cell_scale")]
    pub cell_scale: u32,
    /// Fill color for cells the color map leaves unmapped.
    #[serde(default = "default_bg_color")]
    pub bg_color: Rgb,
    /// Grid line overlay.
    #[serde(default)]
    pub grid_lines: GridLinesConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            tick_speed: default_tick_speed(),
            auto_tick: false,
            blank_reset: false,
            auto_draw: default_auto_draw(),
            cell_scale: default_cell_scale(),
            bg_color: default_bg_color(),
            grid_lines: GridLinesConfig::default(),
        }
    }
}

/// Grid line overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridLinesConfig {
    /// Whether to overlay grid lines at all.
    #[serde(default = "default_grid_line_draw")]
    pub draw: bool,
    /// Draw a line every N cells.
    #[serde(default = "default_grid_line_every")]
    pub every: u32,
    /// Line color.
    #[serde(default = "default_grid_line_color")]
    pub color: Rgb,
}

impl Default for GridLinesConfig {
    fn default() -> Self {
        Self {
            draw: default_grid_line_draw(),
            every: default_grid_line_every(),
            color: default_grid_line_color(),
        }
    }
}

impl EngineConfig {
    /// Total cell count (`width * height`).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if !self.tick_speed.is_finite() || self.tick_speed <= 0.0 {
            return Err(ConfigError::InvalidTickSpeed);
        }
        if self.cell_scale == 0 {
            return Err(ConfigError::InvalidCellScale);
        }
        if self.grid_lines.every == 0 {
            return Err(ConfigError::InvalidGridLineSpacing);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("tick speed must be positive and finite")]
    InvalidTickSpeed,
    #[error("cell scale must be non-zero")]
    InvalidCellScale,
    #[error("grid line spacing must be non-zero")]
    InvalidGridLineSpacing,
    #[error("auto_tick requires a scheduler")]
    AutoTickWithoutScheduler,
}

//! Render surface abstraction.
//!
//! The engine paints through the narrow [`RenderSurface`] trait and never
//! touches a concrete drawing backend, so the core stays testable headless.
//! Rendering is strictly an optional post-tick side effect: a surface-less
//! engine skips every render pass.

mod pixel;

pub use pixel::*;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// 24-bit RGB color, serialized as a `#RRGGBB` hex string in configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color strings that fail `#RRGGBB` parsing.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("invalid color {0:?}, expected \"#RRGGBB\"")]
pub struct ColorParseError(String);

impl std::str::FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6)
            .ok_or_else(|| ColorParseError(s.to_owned()))?;
        let parse = |range| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_owned()))
        };
        Ok(Rgb {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// One full-length grid line in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLine {
    /// Vertical line spanning the surface height at `x_px`.
    Vertical { x_px: u32 },
    /// Horizontal line spanning the surface width at `y_px`.
    Horizontal { y_px: u32 },
}

/// Drawing surface the engine paints into.
///
/// Coordinates passed to `fill_cell` are cell coordinates; the surface is
/// `width * cell_scale` by `height * cell_scale` pixels after `resize`.
pub trait RenderSurface {
    /// Resize the surface to the given pixel dimensions, discarding content.
    fn resize(&mut self, width_px: u32, height_px: u32);

    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Rgb);

    /// Fill the `scale`-pixel square for the cell at `(x, y)`.
    fn fill_cell(&mut self, x: u32, y: u32, scale: u32, color: Rgb);

    /// Draw a one-pixel grid line across the surface.
    fn fill_grid_line(&mut self, line: GridLine, color: Rgb);
}

/// Shared-ownership surfaces, so a caller can keep reading the pixels of a
/// surface it handed to the engine.
impl<S: RenderSurface> RenderSurface for Rc<RefCell<S>> {
    fn resize(&mut self, width_px: u32, height_px: u32) {
        self.borrow_mut().resize(width_px, height_px)
    }

    fn clear(&mut self, color: Rgb) {
        self.borrow_mut().clear(color)
    }

    fn fill_cell(&mut self, x: u32, y: u32, scale: u32, color: Rgb) {
        self.borrow_mut().fill_cell(x, y, scale, color)
    }

    fn fill_grid_line(&mut self, line: GridLine, color: Rgb) {
        self.borrow_mut().fill_grid_line(line, color)
    }
}

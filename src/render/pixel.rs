//! In-memory pixel surface with PPM export.
//!
//! Backs headless runs: the engine paints into a plain RGB framebuffer and
//! the caller dumps frames to disk, one file per generation if it wants.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::{GridLine, RenderSurface, Rgb};

/// Plain RGB framebuffer implementing [`RenderSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelSurface {
    /// Create a surface of the given pixel dimensions, filled white.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::WHITE; (width * height) as usize],
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Row-major pixel slice.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for py in y.min(self.height)..y_end {
            let row = (py * self.width) as usize;
            for px in x.min(self.width)..x_end {
                self.pixels[row + px as usize] = color;
            }
        }
    }

    /// Write the surface as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut row = Vec::with_capacity(self.width as usize * 3);
        for chunk in self.pixels.chunks(self.width.max(1) as usize) {
            row.clear();
            for color in chunk {
                row.extend_from_slice(&[color.r, color.g, color.b]);
            }
            writer.write_all(&row)?;
        }
        writer.flush()
    }

    /// Write the surface as a PPM file at `path`.
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_ppm(BufWriter::new(file))
    }
}

impl RenderSurface for PixelSurface {
    fn resize(&mut self, width_px: u32, height_px: u32) {
        self.width = width_px;
        self.height = height_px;
        self.pixels = vec![Rgb::WHITE; (width_px * height_px) as usize];
    }

    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn fill_cell(&mut self, x: u32, y: u32, scale: u32, color: Rgb) {
        self.fill_rect(x * scale, y * scale, scale, scale, color);
    }

    fn fill_grid_line(&mut self, line: GridLine, color: Rgb) {
        match line {
            GridLine::Vertical { x_px } => self.fill_rect(x_px, 0, 1, self.height, color),
            GridLine::Horizontal { y_px } => self.fill_rect(0, y_px, self.width, 1, color),
        }
    }
}

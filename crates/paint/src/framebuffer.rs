//! # Software Framebuffer
//!
//! An ARGB pixel buffer that implements [`DrawContext`], so text can be
//! rendered without a GPU in either compositing mode.
//!
//! Pixel format: **ARGB** (`0xAARRGGBB`).

use std::io::{self, Write};

use common::Color;
use font::GlyphBitmap;

use crate::compositor::blend_coverage;
use crate::context::{DrawContext, TexturedQuad};

/// An ARGB pixel buffer for software rendering.
pub struct Framebuffer {
    pub pixels: Vec<u32>,
    pub width: u32,
    pub height: u32,
    fill: Color,
}

impl Framebuffer {
    /// Create a framebuffer filled with opaque white, drawing in black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Color::WHITE.to_argb(); width as usize * height as usize],
            width,
            height,
            fill: Color::BLACK,
        }
    }

    /// Fill the entire framebuffer with a single color.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_argb());
    }

    /// Set the color glyph coverage is tinted with.
    pub fn set_fill(&mut self, color: Color) {
        self.fill = color;
    }

    /// The pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Blit the top-left `src_w × src_h` samples of `texture` scaled to a
    /// destination rectangle, tinted with the fill color.
    ///
    /// Uses nearest-neighbor sampling; the destination is clipped to the buffer.
    pub fn blit_coverage_scaled(
        &mut self,
        dst_x: i32,
        dst_y: i32,
        dst_w: u32,
        dst_h: u32,
        texture: &GlyphBitmap,
        src_w: usize,
        src_h: usize,
    ) {
        let src_w = src_w.min(texture.width());
        let src_h = src_h.min(texture.height());
        if dst_w == 0 || dst_h == 0 || src_w == 0 || src_h == 0 {
            return;
        }

        let x0 = (dst_x as i64).max(0);
        let y0 = (dst_y as i64).max(0);
        let x1 = (dst_x as i64 + dst_w as i64).min(self.width as i64);
        let y1 = (dst_y as i64 + dst_h as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let fill = self.fill;
        for py in y0..y1 {
            let dy = (py - dst_y as i64) as u64;
            let sy = ((dy * src_h as u64) / dst_h as u64).min(src_h as u64 - 1) as usize;
            let row_start = py as usize * self.width as usize;

            for px in x0..x1 {
                let dx = (px - dst_x as i64) as u64;
                let sx = ((dx * src_w as u64) / dst_w as u64).min(src_w as u64 - 1) as usize;

                let coverage = texture.sample(sx, sy);
                if coverage == 0 {
                    continue;
                }
                let idx = row_start + px as usize;
                self.pixels[idx] = blend_coverage(self.pixels[idx], fill, coverage);
            }
        }
    }

    /// Write the buffer as a binary PPM (P6) image. Alpha is discarded.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            let c = Color::from_argb(p);
            rgb.extend_from_slice(&[c.r, c.g, c.b]);
        }
        out.write_all(&rgb)?;
        out.flush()
    }
}

impl DrawContext for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    fn fill(&self) -> Color {
        self.fill
    }

    fn draw_textured_quad(&mut self, texture: &GlyphBitmap, quad: &TexturedQuad) {
        let [top_left, _, bottom_right, _] = quad.vertices;
        let w = (bottom_right.x - top_left.x).round();
        let h = (bottom_right.y - top_left.y).round();
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        self.blit_coverage_scaled(
            top_left.x.round() as i32,
            top_left.y.round() as i32,
            w as u32,
            h as u32,
            texture,
            bottom_right.u as usize,
            bottom_right.v as usize,
        );
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fill", &self.fill)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

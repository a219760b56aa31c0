//! The drawing-context seam between text rendering and its target.

use common::Color;
use font::{GlyphBitmap, GlyphTable};

/// A vertex of a textured quad. `u`/`v` are texel coordinates into the
/// glyph's bitmap, not normalised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub u: f32,
    pub v: f32,
}

impl TexVertex {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, u: f32, v: f32) -> Self {
        Self { x, y, z, u, v }
    }
}

/// A glyph quad in geometry space.
///
/// Vertex order is top-left, bottom-left, bottom-right, top-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexturedQuad {
    /// Index of the glyph in its table, usable as a texture key.
    pub glyph: usize,
    pub vertices: [TexVertex; 4],
}

/// A render target that text can be drawn into.
///
/// Pixel-space compositing writes `pixels_mut()` directly; geometry-space
/// compositing hands each glyph to `draw_textured_quad`.
pub trait DrawContext {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Row-major `0xAARRGGBB` pixels, exactly `width * height` of them.
    fn pixels_mut(&mut self) -> &mut [u32];

    /// Current fill color used to tint glyph coverage.
    fn fill(&self) -> Color;

    /// Draw one glyph quad textured with `texture`.
    fn draw_textured_quad(&mut self, texture: &GlyphBitmap, quad: &TexturedQuad);

    /// Called once per painter before its first glyph is drawn, so a context
    /// can upload every glyph bitmap ahead of time.
    fn prepare_glyph_textures(&mut self, _table: &GlyphTable) {}
}

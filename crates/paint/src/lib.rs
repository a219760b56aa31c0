//! # Paint Crate
//!
//! Glyph compositing and the text-drawing facade.
//!
//! - `context`: the [`DrawContext`] trait render targets implement
//! - `compositor`: geometry-space quads and pixel-space alpha blending
//! - `framebuffer`: a software ARGB target usable in both modes
//! - `text`: [`TextPainter`], which owns render state and draws strings

pub mod compositor;
pub mod context;
pub mod framebuffer;
pub mod text;

pub use compositor::{
    blend_coverage, clip_glyph, glyph_quad, GlyphClip, GlyphCompositor, Pen, PixelCompositor,
    QuadCompositor, RenderMode,
};
pub use context::{DrawContext, TexVertex, TexturedQuad};
pub use framebuffer::Framebuffer;
pub use text::{RenderState, TextPainter};

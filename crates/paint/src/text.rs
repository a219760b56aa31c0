//! Text painting: render state plus layout plus compositing.

use common::Rect;
use font::{FontMetrics, GlyphTable};
use layout::{layout_box, layout_lines, Align, TextStyle};

use crate::compositor::{Pen, RenderMode};
use crate::context::DrawContext;

/// Per-painter settings that drawing calls read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderState {
    pub size: f32,
    pub leading: f32,
    pub align: Align,
    pub mode: RenderMode,
}

/// Draws text from one glyph table into any [`DrawContext`].
///
/// Owns the mutable render state; the table is shared and read-only. A
/// painter is meant to be driven from a single thread.
pub struct TextPainter<'a> {
    table: &'a GlyphTable,
    state: RenderState,
    textures_prepared: bool,
}

impl<'a> TextPainter<'a> {
    /// A painter at the design size, with default leading, left alignment and
    /// geometry-space output.
    pub fn new(table: &'a GlyphTable) -> Self {
        let size = table.design_box() as f32;
        Self {
            table,
            state: RenderState {
                size,
                leading: FontMetrics::new(table).default_leading(size),
                align: Align::default(),
                mode: RenderMode::default(),
            },
            textures_prepared: false,
        }
    }

    pub fn metrics(&self) -> FontMetrics<'a> {
        FontMetrics::new(self.table)
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    // ── State ───────────────────────────────────────────────────────────────

    /// Set the point size. Leading is left as is.
    pub fn set_size(&mut self, size: f32) {
        self.state.size = size;
    }

    /// Back to the design size.
    pub fn reset_size(&mut self) {
        self.state.size = self.table.design_box() as f32;
    }

    pub fn set_leading(&mut self, leading: f32) {
        self.state.leading = leading;
    }

    /// Back to the default leading for the current size.
    pub fn reset_leading(&mut self) {
        self.state.leading = self.metrics().default_leading(self.state.size);
    }

    pub fn set_align(&mut self, align: Align) {
        self.state.align = align;
    }

    /// Switch compositing mode. Pixel space draws bitmaps unscaled, so
    /// entering it also resets size and leading.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.state.mode = mode;
        if mode == RenderMode::Pixel {
            self.reset_size();
            self.reset_leading();
        }
    }

    // ── Metrics at the current size ─────────────────────────────────────────

    pub fn ascent(&self) -> f32 {
        self.metrics().ascent(self.state.size)
    }

    pub fn descent(&self) -> f32 {
        self.metrics().descent(self.state.size)
    }

    pub fn char_width(&self, ch: char) -> f32 {
        self.metrics().char_width(ch, self.state.size)
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.metrics().text_width(text, self.state.size)
    }

    // ── Drawing ─────────────────────────────────────────────────────────────

    /// Draw one character with its baseline origin at `(x, y)`.
    /// Characters without a glyph draw nothing.
    pub fn draw_char(&mut self, ch: char, x: f32, y: f32, z: f32, ctx: &mut dyn DrawContext) {
        let Some(index) = self.table.lookup_char(ch) else {
            return;
        };
        if !self.textures_prepared {
            ctx.prepare_glyph_textures(self.table);
            self.textures_prepared = true;
        }
        let pen = Pen { x, y, z };
        self.state
            .mode
            .compositor()
            .composite(self.table, index, pen, self.state.size, ctx);
    }

    /// Draw `text` with the first baseline at `y`. Lines split on `\n` and
    /// are aligned on `x` individually.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, z: f32, ctx: &mut dyn DrawContext) {
        let metrics = self.metrics();
        let style = self.style();
        layout_lines(&metrics, text, x, y, &style, &mut |g| {
            self.draw_char(g.ch, g.x, g.y, z, ctx)
        });
    }

    /// Word-wrap `text` into `bounds`, whose top edge is the top of the first
    /// line. Text that does not fit below the bottom edge is dropped.
    pub fn draw_text_in_box(&mut self, text: &str, bounds: Rect, z: f32, ctx: &mut dyn DrawContext) {
        let metrics = self.metrics();
        let style = self.style();
        layout_box(&metrics, text, bounds, &style, &mut |g| {
            self.draw_char(g.ch, g.x, g.y, z, ctx)
        });
    }

    fn style(&self) -> TextStyle {
        TextStyle {
            size: self.state.size,
            leading: self.state.leading,
            align: self.state.align,
        }
    }
}

impl std::fmt::Debug for TextPainter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextPainter")
            .field("glyphs", &self.table.len())
            .field("state", &self.state)
            .field("textures_prepared", &self.textures_prepared)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

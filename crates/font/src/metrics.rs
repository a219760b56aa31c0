//! Scaled typographic metrics.
//!
//! Glyph tables store integer design units relative to the font's design box.
//! [`FontMetrics`] scales them to a requested point size.

use crate::table::GlyphTable;

/// Multiplier from `ascent + descent` to the default baseline distance.
pub const LEADING_FACTOR: f32 = 1.275;

/// A read-only metrics view over a [`GlyphTable`].
#[derive(Clone, Copy, Debug)]
pub struct FontMetrics<'a> {
    table: &'a GlyphTable,
}

impl<'a> FontMetrics<'a> {
    pub fn new(table: &'a GlyphTable) -> Self {
        Self { table }
    }

    /// Scale a design-unit value to `size`.
    #[inline]
    pub fn scale(&self, units: i32, size: f32) -> f32 {
        units as f32 * size / self.table.design_box() as f32
    }

    /// Distance from the baseline to the top of the text at `size`.
    pub fn ascent(&self, size: f32) -> f32 {
        self.scale(self.table.ascent_units(), size)
    }

    /// Distance from the baseline to the bottom of the text at `size`.
    pub fn descent(&self, size: f32) -> f32 {
        self.scale(self.table.descent_units(), size)
    }

    /// Advance width of `ch` at `size`.
    ///
    /// A space measures as wide as `'i'`, since space glyphs are not reliably
    /// present in the bitmap sets. Characters without a glyph are zero-width.
    pub fn char_width(&self, ch: char, size: f32) -> f32 {
        if ch == ' ' {
            return self.char_width('i', size);
        }
        match self.table.lookup_char(ch).and_then(|i| self.table.record(i)) {
            Some(rec) => self.scale(rec.advance_width, size),
            None => 0.0,
        }
    }

    /// Summed advance of a single line. Newlines are not treated specially.
    pub fn line_width(&self, line: &str, size: f32) -> f32 {
        line.chars().map(|ch| self.char_width(ch, size)).sum()
    }

    /// Width of the widest `\n`-separated line of `text`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.split('\n')
            .map(|line| self.line_width(line, size))
            .fold(0.0, f32::max)
    }

    /// Baseline-to-baseline distance used when no leading is set explicitly.
    pub fn default_leading(&self, size: f32) -> f32 {
        (self.ascent(size) + self.descent(size)) * LEADING_FACTOR
    }

    /// Kerning between two characters. Always zero; kept as an extension point.
    #[inline]
    pub fn kern(&self, _a: char, _b: char) -> f32 {
        0.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

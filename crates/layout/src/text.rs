//! Text layout: pen placement for multi-line and box-wrapped text.
//!
//! Layout never touches pixels. Each character is reported once, as a
//! [`PlacedGlyph`] carrying the pen position (baseline y) at which it should
//! be composited; characters without a glyph are still reported and simply
//! contribute zero advance.

use common::Rect;
use font::FontMetrics;

// ─────────────────────────────────────────────────────────────────────────────
// Style
// ─────────────────────────────────────────────────────────────────────────────

/// Horizontal alignment of a line relative to the layout x coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    /// The line starts at x.
    #[default]
    Left,
    /// The line is centred on x.
    Center,
    /// The line ends at x.
    Right,
}

impl Align {
    /// Pen offset applied to a line of the given width.
    #[inline]
    pub fn offset(self, line_width: f32) -> f32 {
        match self {
            Align::Left => 0.0,
            Align::Center => -line_width / 2.0,
            Align::Right => -line_width,
        }
    }
}

/// Size, line spacing and alignment for one layout call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub leading: f32,
    pub align: Align,
}

/// A character positioned at a pen location. `y` is the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    pub x: f32,
    pub y: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Unconstrained layout
// ─────────────────────────────────────────────────────────────────────────────

/// Lay out a single line (no `\n` handling) with alignment applied.
pub fn layout_line<F>(
    metrics: &FontMetrics<'_>,
    line: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
    place: &mut F,
) where
    F: FnMut(PlacedGlyph),
{
    let mut pen_x = match style.align {
        Align::Left => x,
        align => x + align.offset(metrics.line_width(line, style.size)),
    };

    let mut prev: Option<char> = None;
    for ch in line.chars() {
        if let Some(p) = prev {
            pen_x += metrics.kern(p, ch);
        }
        place(PlacedGlyph { ch, x: pen_x, y });
        pen_x += metrics.char_width(ch, style.size);
        prev = Some(ch);
    }
}

/// Lay out `text` starting with the baseline at `(x, y)`.
///
/// Lines are split on `\n`; each one is aligned on its own width and the
/// baseline moves down by `style.leading` after every newline.
pub fn layout_lines<F>(
    metrics: &FontMetrics<'_>,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
    place: &mut F,
) where
    F: FnMut(PlacedGlyph),
{
    let mut baseline = y;
    for line in text.split('\n') {
        layout_line(metrics, line, x, baseline, style, place);
        baseline += style.leading;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Box-constrained layout
// ─────────────────────────────────────────────────────────────────────────────

/// Word-wrap `text` into `bounds`.
///
/// The top of `bounds` lines up with the ascent of the first line, not its
/// baseline. Paragraphs split on `\n`, words on `' '`. A word that would cross
/// the right edge moves to the next line first. Each word is laid out with
/// [`layout_line`], so the style's alignment applies per word. Once the
/// baseline passes the bottom edge the rest of the text is dropped without
/// any signal.
pub fn layout_box<F>(
    metrics: &FontMetrics<'_>,
    text: &str,
    bounds: Rect,
    style: &TextStyle,
    place: &mut F,
) where
    F: FnMut(PlacedGlyph),
{
    let space = metrics.char_width(' ', style.size);
    let right = bounds.right();
    let bottom = bounds.bottom();

    let mut pen_x = bounds.x;
    let mut pen_y = bounds.y + metrics.ascent(style.size);

    for paragraph in text.split('\n') {
        for word in paragraph.split(' ') {
            let word_width = metrics.line_width(word, style.size);
            if pen_x + word_width > right {
                pen_x = bounds.x;
                pen_y += style.leading;
                if pen_y > bottom {
                    log::trace!("text overflows {bounds:?} at word {word:?}; remainder dropped");
                    return;
                }
            }
            layout_line(metrics, word, pen_x, pen_y, style, place);
            pen_x += word_width + space;
        }
        pen_x = bounds.x;
        pen_y += style.leading;
        if pen_y > bottom {
            return;
        }
    }
}

/// Collect the placements of [`layout_lines`] into a vector.
pub fn place_lines(
    metrics: &FontMetrics<'_>,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
) -> Vec<PlacedGlyph> {
    let mut out = Vec::with_capacity(text.len());
    layout_lines(metrics, text, x, y, style, &mut |g| out.push(g));
    out
}

/// Collect the placements of [`layout_box`] into a vector.
pub fn place_box(
    metrics: &FontMetrics<'_>,
    text: &str,
    bounds: Rect,
    style: &TextStyle,
) -> Vec<PlacedGlyph> {
    let mut out = Vec::with_capacity(text.len());
    layout_box(metrics, text, bounds, style, &mut |g| out.push(g));
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Glyph compositing in geometry space and pixel space.
//!
//! Pixel format: **ARGB** (`0xAARRGGBB`). Pixel-space output is always opaque.

use common::Color;
use font::{GlyphBitmap, GlyphRecord, GlyphTable};

use crate::context::{DrawContext, TexVertex, TexturedQuad};

// ─────────────────────────────────────────────────────────────────────────────
// RenderMode
// ─────────────────────────────────────────────────────────────────────────────

/// Which coordinate convention glyphs are composited in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Scaled textured quads handed to the context.
    #[default]
    Geometry,
    /// Unscaled alpha blending straight into the context's pixels.
    Pixel,
}

impl RenderMode {
    /// The compositor implementing this mode.
    pub fn compositor(self) -> &'static dyn GlyphCompositor {
        match self {
            RenderMode::Geometry => &QuadCompositor,
            RenderMode::Pixel => &PixelCompositor,
        }
    }
}

/// Pen position for one glyph. `y` is the baseline; `z` is only used by
/// geometry-space output.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Pen {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Draws a single glyph of a table into a context.
pub trait GlyphCompositor {
    /// Composite glyph `index` of `table` at `pen`, scaled to `size` where the
    /// mode scales at all. Unknown indices are ignored.
    fn composite(
        &self,
        table: &GlyphTable,
        index: usize,
        pen: Pen,
        size: f32,
        ctx: &mut dyn DrawContext,
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry space
// ─────────────────────────────────────────────────────────────────────────────

/// Emits one textured quad per glyph.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuadCompositor;

/// The quad covering `rec` at `pen`, scaled by `size / design_box`.
pub fn glyph_quad(rec: &GlyphRecord, index: usize, design_box: u32, pen: Pen, size: f32) -> TexturedQuad {
    let scale = size / design_box as f32;
    let w = rec.bitmap_width as f32;
    let h = rec.bitmap_height as f32;

    let x1 = pen.x + rec.left_extent as f32 * scale;
    let y1 = pen.y - rec.top_extent as f32 * scale;
    let x2 = x1 + w * scale;
    let y2 = y1 + h * scale;

    TexturedQuad {
        glyph: index,
        vertices: [
            TexVertex::new(x1, y1, pen.z, 0.0, 0.0),
            TexVertex::new(x1, y2, pen.z, 0.0, h),
            TexVertex::new(x2, y2, pen.z, w, h),
            TexVertex::new(x2, y1, pen.z, w, 0.0),
        ],
    }
}

impl GlyphCompositor for QuadCompositor {
    fn composite(
        &self,
        table: &GlyphTable,
        index: usize,
        pen: Pen,
        size: f32,
        ctx: &mut dyn DrawContext,
    ) {
        let (Some(rec), Some(bitmap)) = (table.record(index), table.bitmap(index)) else {
            return;
        };
        let quad = glyph_quad(rec, index, table.design_box(), pen, size);
        ctx.draw_textured_quad(bitmap, &quad);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pixel space
// ─────────────────────────────────────────────────────────────────────────────

/// Alpha-blends glyph coverage directly into the context's pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelCompositor;

/// The part of a glyph bitmap that lands inside the destination buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphClip {
    pub dst_x: usize,
    pub dst_y: usize,
    pub src_x: usize,
    pub src_y: usize,
    pub width: usize,
    pub height: usize,
}

/// Clip a `w × h` bitmap placed at `(xx, yy)` against a `buf_w × buf_h`
/// buffer. Returns `None` when nothing overlaps.
pub fn clip_glyph(xx: i32, yy: i32, w: usize, h: usize, buf_w: u32, buf_h: u32) -> Option<GlyphClip> {
    let (xx, yy) = (xx as i64, yy as i64);
    let x0 = xx.max(0);
    let y0 = yy.max(0);
    let x1 = (xx + w as i64).min(buf_w as i64);
    let y1 = (yy + h as i64).min(buf_h as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(GlyphClip {
        dst_x: x0 as usize,
        dst_y: y0 as usize,
        src_x: (x0 - xx) as usize,
        src_y: (y0 - yy) as usize,
        width: (x1 - x0) as usize,
        height: (y1 - y0) as usize,
    })
}

/// Blend `fill` over `dst` with glyph coverage `coverage`.
///
/// The fill alpha scales the coverage; the result is always opaque.
#[inline]
pub fn blend_coverage(dst: u32, fill: Color, coverage: u8) -> u32 {
    let alpha = fill.a as u32 * coverage as u32 / 255;
    let inv_alpha = 255 - alpha;
    let d = Color::from_argb(dst);
    let mix = |f: u8, d: u8| (alpha * f as u32 + inv_alpha * d as u32) / 255;
    0xFF00_0000 | mix(fill.r, d.r) << 16 | mix(fill.g, d.g) << 8 | mix(fill.b, d.b)
}

/// Blend the clipped region of `bitmap` into `pixels` (row stride `buf_w`).
///
/// Source rows are read with the bitmap's padded stride. The clip is
/// narrowed to the rows `pixels` actually holds and to both strides, so a
/// short buffer or an oversized clip draws less instead of panicking.
pub fn blit_coverage(pixels: &mut [u32], buf_w: usize, bitmap: &GlyphBitmap, clip: &GlyphClip, fill: Color) {
    if buf_w == 0 {
        return;
    }
    let stride = bitmap.side();
    let src = bitmap.pixels();
    let width = clip
        .width
        .min(buf_w.saturating_sub(clip.dst_x))
        .min(stride.saturating_sub(clip.src_x));
    let height = clip
        .height
        .min((pixels.len() / buf_w).saturating_sub(clip.dst_y))
        .min(stride.saturating_sub(clip.src_y));
    for row in 0..height {
        let s = (clip.src_y + row) * stride + clip.src_x;
        let d = (clip.dst_y + row) * buf_w + clip.dst_x;
        let (Some(src_row), Some(dst_row)) = (src.get(s..s + width), pixels.get_mut(d..d + width)) else {
            break;
        };
        for (px, &coverage) in dst_row.iter_mut().zip(src_row) {
            *px = blend_coverage(*px, fill, coverage);
        }
    }
}

impl GlyphCompositor for PixelCompositor {
    fn composite(
        &self,
        table: &GlyphTable,
        index: usize,
        pen: Pen,
        _size: f32,
        ctx: &mut dyn DrawContext,
    ) {
        let (Some(rec), Some(bitmap)) = (table.record(index), table.bitmap(index)) else {
            return;
        };
        let xx = (pen.x as i32).saturating_add(rec.left_extent);
        let yy = (pen.y as i32).saturating_sub(rec.top_extent);
        let (buf_w, buf_h) = (ctx.width(), ctx.height());

        let Some(clip) = clip_glyph(xx, yy, bitmap.width(), bitmap.height(), buf_w, buf_h) else {
            log::trace!("glyph {:#x} at ({xx}, {yy}) is outside the {buf_w}x{buf_h} buffer", rec.code);
            return;
        };

        let fill = ctx.fill();
        let pixels = ctx.pixels_mut();
        if pixels.len() < buf_w as usize * buf_h as usize {
            log::trace!("pixel buffer holds {} of {buf_w}x{buf_h} pixels", pixels.len());
        }
        blit_coverage(pixels, buf_w as usize, bitmap, &clip, fill);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use font::FontHeader;

    /// A context that records quads and texture preparation.
    pub(crate) struct Recorder {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
        pub fill: Color,
        pub quads: Vec<TexturedQuad>,
        pub prepared: usize,
    }

    impl Recorder {
        pub(crate) fn new(width: u32, height: u32, background: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![background; (width * height) as usize],
                fill: Color::BLACK,
                quads: Vec::new(),
                prepared: 0,
            }
        }

        pub(crate) fn at(&self, x: usize, y: usize) -> u32 {
            self.pixels[y * self.width as usize + x]
        }
    }

    impl DrawContext for Recorder {
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
        fn draw_textured_quad(&mut self, _texture: &GlyphBitmap, quad: &TexturedQuad) {
            self.quads.push(*quad);
        }
        fn prepare_glyph_textures(&mut self, _table: &GlyphTable) {
            self.prepared += 1;
        }
    }

    /// 'd' is a 3×2 gradient glyph (top 2, left 1); 'p' a 1×1 anchor.
    pub(crate) fn table() -> GlyphTable {
        let d = GlyphRecord {
            code: 'd' as u32,
            bitmap_width: 3,
            bitmap_height: 2,
            advance_width: 4,
            top_extent: 2,
            left_extent: 1,
        };
        let p = GlyphRecord {
            code: 'p' as u32,
            bitmap_width: 1,
            bitmap_height: 1,
            advance_width: 4,
            top_extent: 0,
            left_extent: 0,
        };
        let header = FontHeader { design_box: 8, padded_box_hint: 8, ascent_units: 0, descent_units: 0 };
        GlyphTable::new(header, vec![(d, vec![0, 128, 255, 64, 192, 32]), (p, vec![255])]).unwrap()
    }

    const WHITE: u32 = 0xFFFF_FFFF;

    #[test]
    fn blend_formula_matches_per_channel() {
        let fill = Color::rgba(200, 100, 0, 255);
        let dst = 0xFF10_2030;
        let out = blend_coverage(dst, fill, 128);
        assert_eq!(out >> 24, 0xFF);
        assert_eq!((out >> 16) & 0xFF, (128 * 200 + 127 * 0x10) / 255);
        assert_eq!((out >> 8) & 0xFF, (128 * 100 + 127 * 0x20) / 255);
        assert_eq!(out & 0xFF, (127 * 0x30) / 255);
    }

    #[test]
    fn blend_extremes() {
        let fill = Color::rgb(1, 2, 3);
        assert_eq!(blend_coverage(0xFFAA_BBCC, fill, 0), 0xFFAA_BBCC);
        assert_eq!(blend_coverage(0xFFAA_BBCC, fill, 255), 0xFF01_0203);
        // Transparent destination comes out opaque.
        assert_eq!(blend_coverage(0x00AA_BBCC, fill, 0), 0xFFAA_BBCC);
        // Fill alpha scales the coverage.
        let clear = Color::rgba(255, 255, 255, 0);
        assert_eq!(blend_coverage(0xFF00_0000, clear, 255), 0xFF00_0000);
    }

    #[test]
    fn clip_inside_is_identity() {
        let clip = clip_glyph(2, 3, 4, 5, 10, 10).unwrap();
        assert_eq!(
            clip,
            GlyphClip { dst_x: 2, dst_y: 3, src_x: 0, src_y: 0, width: 4, height: 5 }
        );
    }

    #[test]
    fn clip_straddling_edges() {
        let tl = clip_glyph(-1, -2, 4, 5, 10, 10).unwrap();
        assert_eq!(
            tl,
            GlyphClip { dst_x: 0, dst_y: 0, src_x: 1, src_y: 2, width: 3, height: 3 }
        );
        let br = clip_glyph(8, 9, 4, 5, 10, 10).unwrap();
        assert_eq!(
            br,
            GlyphClip { dst_x: 8, dst_y: 9, src_x: 0, src_y: 0, width: 2, height: 1 }
        );
    }

    #[test]
    fn clip_outside_is_none() {
        assert_eq!(clip_glyph(10, 0, 4, 4, 10, 10), None);
        assert_eq!(clip_glyph(0, 10, 4, 4, 10, 10), None);
        assert_eq!(clip_glyph(-4, 0, 4, 4, 10, 10), None);
        assert_eq!(clip_glyph(0, -4, 4, 4, 10, 10), None);
        assert_eq!(clip_glyph(0, 0, 0, 4, 10, 10), None);
        assert_eq!(clip_glyph(i32::MIN, i32::MIN, 4, 4, 10, 10), None);
    }

    #[test]
    fn pixel_glyph_inside_matches_formula() {
        let t = table();
        let idx = t.lookup_char('d').unwrap();
        let mut ctx = Recorder::new(8, 8, WHITE);
        PixelCompositor.composite(&t, idx, Pen { x: 2.0, y: 4.0, z: 0.0 }, 8.0, &mut ctx);

        // Origin = (2 + 1, 4 - 2) = (3, 2).
        let samples = [[0u8, 128, 255], [64, 192, 32]];
        for (row, line) in samples.iter().enumerate() {
            for (col, &a) in line.iter().enumerate() {
                let expected = blend_coverage(WHITE, Color::BLACK, a);
                assert_eq!(ctx.at(3 + col, 2 + row), expected, "({col}, {row})");
            }
        }
        let touched = ctx.pixels.iter().filter(|&&p| p != WHITE).count();
        assert_eq!(touched, 5); // the zero-coverage sample leaves white
        assert!(ctx.quads.is_empty());
    }

    #[test]
    fn pixel_glyph_straddling_edge_writes_only_in_bounds() {
        let t = table();
        let idx = t.lookup_char('d').unwrap();
        let mut ctx = Recorder::new(3, 3, WHITE);
        // Origin = (-3 + 1, 1 - 2) = (-2, -1): only column 2 of row 1 is visible.
        PixelCompositor.composite(&t, idx, Pen { x: -3.0, y: 1.0, z: 0.0 }, 8.0, &mut ctx);
        assert_eq!(ctx.pixels.len(), 9);
        assert_eq!(ctx.at(0, 0), blend_coverage(WHITE, Color::BLACK, 32));
        assert_eq!(ctx.pixels.iter().filter(|&&p| p != WHITE).count(), 1);
    }

    #[test]
    fn pixel_glyph_overrunning_right_and_bottom_is_clipped() {
        let t = table();
        let idx = t.lookup_char('d').unwrap();
        let mut ctx = Recorder::new(4, 3, WHITE);
        // Origin = (1 + 1, 3 - 2) = (2, 1): source columns 0..2 and rows 0..2 fit.
        PixelCompositor.composite(&t, idx, Pen { x: 1.0, y: 3.0, z: 0.0 }, 8.0, &mut ctx);

        assert_eq!(ctx.pixels.len(), 12);
        assert_eq!(ctx.at(2, 1), WHITE);
        assert_eq!(ctx.at(3, 1), blend_coverage(WHITE, Color::BLACK, 128));
        assert_eq!(ctx.at(2, 2), blend_coverage(WHITE, Color::BLACK, 64));
        assert_eq!(ctx.at(3, 2), blend_coverage(WHITE, Color::BLACK, 192));
        assert_eq!(ctx.pixels.iter().filter(|&&p| p != WHITE).count(), 3);
    }

    #[test]
    fn pixel_glyph_on_short_buffer_draws_whole_rows_only() {
        let t = table();
        let idx = t.lookup_char('d').unwrap();
        let mut ctx = Recorder::new(4, 4, WHITE);
        ctx.pixels.truncate(6);
        // Origin (1, 0); only the first row is fully backed by pixels.
        PixelCompositor.composite(&t, idx, Pen { x: 0.0, y: 2.0, z: 0.0 }, 8.0, &mut ctx);

        assert_eq!(ctx.pixels.len(), 6);
        assert_eq!(ctx.pixels[1], WHITE);
        assert_eq!(ctx.pixels[2], blend_coverage(WHITE, Color::BLACK, 128));
        assert_eq!(ctx.pixels[3], blend_coverage(WHITE, Color::BLACK, 255));
        assert!(ctx.pixels[4..].iter().all(|&p| p == WHITE));
    }

    #[test]
    fn blit_ignores_clip_beyond_buffer() {
        let t = table();
        let bitmap = t.bitmap(t.lookup_char('d').unwrap()).unwrap();
        let mut pixels = vec![WHITE; 4];
        let clip = GlyphClip { dst_x: 1, dst_y: 1, src_x: 0, src_y: 0, width: 50, height: 50 };
        blit_coverage(&mut pixels, 2, bitmap, &clip, Color::BLACK);
        // One pixel is left at (1, 1); it takes the zero sample at source (0, 0).
        assert_eq!(pixels, vec![WHITE; 4]);
        let clip = GlyphClip { dst_x: 0, dst_y: 0, src_x: 1, src_y: 0, width: 50, height: 50 };
        blit_coverage(&mut pixels, 2, bitmap, &clip, Color::BLACK);
        assert_eq!(pixels[0], blend_coverage(WHITE, Color::BLACK, 128));
        assert_eq!(pixels[3], blend_coverage(WHITE, Color::BLACK, 32));
        blit_coverage(&mut pixels, 0, bitmap, &clip, Color::BLACK);
    }

    #[test]
    fn pixel_glyph_outside_is_skipped() {
        let t = table();
        let idx = t.lookup_char('d').unwrap();
        let mut ctx = Recorder::new(4, 4, WHITE);
        PixelCompositor.composite(&t, idx, Pen { x: 100.0, y: 2.0, z: 0.0 }, 8.0, &mut ctx);
        PixelCompositor.composite(&t, idx, Pen { x: -50.0, y: -50.0, z: 0.0 }, 8.0, &mut ctx);
        assert!(ctx.pixels.iter().all(|&p| p == WHITE));
    }

    #[test]
    fn pixel_mode_ignores_size() {
        let t = table();
        let idx = t.lookup_char('d').unwrap();
        let mut a = Recorder::new(8, 8, WHITE);
        let mut b = Recorder::new(8, 8, WHITE);
        let pen = Pen { x: 2.0, y: 4.0, z: 0.0 };
        PixelCompositor.composite(&t, idx, pen, 8.0, &mut a);
        PixelCompositor.composite(&t, idx, pen, 32.0, &mut b);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn geometry_quad_is_scaled_from_design_units() {
        let t = table();
        let idx = t.lookup_char('d').unwrap();
        let mut ctx = Recorder::new(4, 4, WHITE);
        // size 16 over design box 8 → scale 2.
        QuadCompositor.composite(&t, idx, Pen { x: 10.0, y: 20.0, z: 3.0 }, 16.0, &mut ctx);

        assert_eq!(ctx.quads.len(), 1);
        let q = ctx.quads[0];
        assert_eq!(q.glyph, idx);
        assert_eq!(q.vertices[0], TexVertex::new(12.0, 16.0, 3.0, 0.0, 0.0));
        assert_eq!(q.vertices[1], TexVertex::new(12.0, 20.0, 3.0, 0.0, 2.0));
        assert_eq!(q.vertices[2], TexVertex::new(18.0, 20.0, 3.0, 3.0, 2.0));
        assert_eq!(q.vertices[3], TexVertex::new(18.0, 16.0, 3.0, 3.0, 0.0));
        assert!(ctx.pixels.iter().all(|&p| p == WHITE));
    }

    #[test]
    fn render_mode_selects_compositor() {
        let t = table();
        let idx = t.lookup_char('d').unwrap();
        let pen = Pen { x: 2.0, y: 4.0, z: 0.0 };

        let mut ctx = Recorder::new(8, 8, WHITE);
        RenderMode::Geometry.compositor().composite(&t, idx, pen, 8.0, &mut ctx);
        assert_eq!(ctx.quads.len(), 1);
        assert!(ctx.pixels.iter().all(|&p| p == WHITE));

        let mut ctx = Recorder::new(8, 8, WHITE);
        RenderMode::Pixel.compositor().composite(&t, idx, pen, 8.0, &mut ctx);
        assert!(ctx.quads.is_empty());
        assert!(ctx.pixels.iter().any(|&p| p != WHITE));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let t = table();
        let mut ctx = Recorder::new(4, 4, WHITE);
        PixelCompositor.composite(&t, 99, Pen::default(), 8.0, &mut ctx);
        QuadCompositor.composite(&t, 99, Pen::default(), 8.0, &mut ctx);
        assert!(ctx.quads.is_empty());
        assert!(ctx.pixels.iter().all(|&p| p == WHITE));
    }
}

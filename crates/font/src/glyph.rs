//! Glyph records and their padded alpha bitmaps.
//!
//! ```text
//!   |   ..XX..       }
//!   |   XXXX..       }  top_extent (bitmap top is baseline - top_extent)
//!   |   ..XX..       }
//!   +---XXXXXX----   }  baseline
//!   ^^^^ left_extent (pen offset before the bitmap starts)
//!   ^^^^^^^^^^^^^^ advance_width (pen displacement after the glyph)
//! ```
//!
//! All metric fields are in font-design units, relative to the font's design
//! box size.

// ─────────────────────────────────────────────────────────────────────────────
// GlyphRecord
// ─────────────────────────────────────────────────────────────────────────────

/// Metrics for one stored character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphRecord {
    /// Unicode scalar value of the character.
    pub code: u32,
    /// Width of the stored alpha mask in pixels.
    pub bitmap_width: u32,
    /// Height of the stored alpha mask in pixels.
    pub bitmap_height: u32,
    /// Horizontal pen displacement caused by the character.
    pub advance_width: i32,
    /// Distance from the baseline up to the top row of the bitmap.
    pub top_extent: i32,
    /// Distance from the pen position to the left column of the bitmap.
    pub left_extent: i32,
}

impl GlyphRecord {
    /// Number of alpha samples the glyph's bitmap holds.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.bitmap_width as usize * self.bitmap_height as usize
    }

    /// The record's code as a `char`, if it is a valid scalar value.
    pub fn char(&self) -> Option<char> {
        char::from_u32(self.code)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GlyphBitmap
// ─────────────────────────────────────────────────────────────────────────────

/// A glyph alpha mask stored in a square, power-of-two sized buffer.
///
/// Every glyph of a font shares the same `side`, so the row stride is uniform
/// across the table and the buffer can be handed to a texture upload as is.
/// Samples outside the glyph's own `width × height` region are zero.
#[derive(Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    side: usize,
    width: usize,
    height: usize,
    alpha: Vec<u8>,
}

impl GlyphBitmap {
    /// Re-pack tightly packed, row-major samples into a padded square buffer.
    ///
    /// The caller guarantees `packed.len() == width * height` and that both
    /// dimensions fit in `side`.
    pub(crate) fn from_packed(side: usize, width: usize, height: usize, packed: &[u8]) -> Self {
        debug_assert_eq!(packed.len(), width * height);
        debug_assert!(width <= side && height <= side);

        let mut alpha = vec![0u8; side * side];
        if width > 0 {
            for (dst_row, src_row) in alpha.chunks_exact_mut(side).zip(packed.chunks_exact(width)) {
                dst_row[..width].copy_from_slice(src_row);
            }
        }
        Self { side, width, height, alpha }
    }

    /// Side length of the square backing buffer, which is also its row stride.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The whole padded buffer, `side * side` samples.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.alpha
    }

    /// Alpha sample at column `x`, row `y` of the padded buffer.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        self.alpha[y * self.side + x]
    }

    /// The glyph's rows without their padding columns.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.alpha
            .chunks_exact(self.side)
            .take(self.height)
            .map(move |row| &row[..self.width])
    }
}

impl core::fmt::Debug for GlyphBitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphBitmap")
            .field("side", &self.side)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

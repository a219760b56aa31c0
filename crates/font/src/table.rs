//! The glyph table: records, padded bitmaps and character lookup.
//!
//! Lookup is a two-tier scheme. Codes below 128 go through a direct-indexed
//! fast-path array built at load time; everything else is found by binary
//! search over the ascending `code` column.

use common::ParseError;

use crate::error::FontError;
use crate::glyph::{GlyphBitmap, GlyphRecord};

/// Number of slots in the direct-indexed ASCII table.
pub const ASCII_SLOTS: usize = 128;

/// Largest texture side a font may request.
pub const MAX_TEXTURE_SIDE: usize = 4096;

/// Upper bound on the padded bitmap storage of one table.
pub const MAX_BITMAP_BYTES: usize = 256 << 20;

/// Character whose top extent defines the font's ascent.
const ASCENT_ANCHOR: u32 = 'd' as u32;
/// Character whose below-baseline extent defines the font's descent.
const DESCENT_ANCHOR: u32 = 'p' as u32;

// ─────────────────────────────────────────────────────────────────────────────
// FontHeader
// ─────────────────────────────────────────────────────────────────────────────

/// Font-wide values stored ahead of the glyph records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontHeader {
    /// Nominal size of the source font; design units are relative to it.
    pub design_box: u32,
    /// Requested texture side. Snapped up to a power of two on load.
    pub padded_box_hint: u32,
    /// Stored ascent; 0 means "derive from the anchor glyph".
    pub ascent_units: i32,
    /// Stored descent; 0 means "derive from the anchor glyph".
    pub descent_units: i32,
}

// ─────────────────────────────────────────────────────────────────────────────
// GlyphTable
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable set of glyph records with their alpha bitmaps.
///
/// Indices returned by [`GlyphTable::lookup`] are positions in the record
/// sequence and stay valid for the lifetime of the table.
#[derive(Clone, Debug)]
pub struct GlyphTable {
    records: Vec<GlyphRecord>,
    bitmaps: Vec<GlyphBitmap>,
    ascii: [Option<usize>; ASCII_SLOTS],
    design_box: u32,
    texture_side: usize,
    ascent_units: i32,
    descent_units: i32,
}

impl GlyphTable {
    /// Build a table from a header and `(record, packed alpha samples)` pairs.
    ///
    /// Records must be sorted by strictly ascending code and each sample slice
    /// must hold exactly `bitmap_width * bitmap_height` bytes. Ascent and
    /// descent left at zero in the header are derived from the `'d'` and `'p'`
    /// glyphs; if both are still zero afterwards the font is rejected.
    pub fn new<I, A>(header: FontHeader, glyphs: I) -> Result<Self, FontError>
    where
        I: IntoIterator<Item = (GlyphRecord, A)>,
        A: AsRef<[u8]>,
    {
        if header.design_box == 0 {
            return Err(ParseError::InvalidValue("design box size must be positive").into());
        }
        let texture_side = texture_side_for(header.design_box, header.padded_box_hint)?;

        let mut records = Vec::new();
        let mut bitmaps = Vec::new();
        let mut ascii = [None; ASCII_SLOTS];
        let mut ascent = header.ascent_units;
        let mut descent = header.descent_units;

        for (index, (record, samples)) in glyphs.into_iter().enumerate() {
            let samples = samples.as_ref();
            if let Some(prev) = records.last().map(|r: &GlyphRecord| r.code) {
                if record.code <= prev {
                    return Err(FontError::UnsortedCodes { index, code: record.code });
                }
            }
            if samples.len() != record.sample_count() {
                return Err(FontError::SampleCount {
                    code: record.code,
                    expected: record.sample_count(),
                    found: samples.len(),
                });
            }
            if record.bitmap_width as usize > texture_side
                || record.bitmap_height as usize > texture_side
            {
                return Err(FontError::GlyphTooLarge {
                    code: record.code,
                    width: record.bitmap_width,
                    height: record.bitmap_height,
                    side: texture_side,
                });
            }

            if (index + 1).saturating_mul(texture_side * texture_side) > MAX_BITMAP_BYTES {
                return Err(ParseError::LengthOutOfRange("total bitmap size").into());
            }

            if let Some(slot) = ascii.get_mut(record.code as usize) {
                if slot.is_none() {
                    *slot = Some(index);
                }
            }

            if record.code == ASCENT_ANCHOR && ascent == 0 {
                ascent = record.top_extent;
            }
            if record.code == DESCENT_ANCHOR && descent == 0 {
                descent = record
                    .top_extent
                    .checked_neg()
                    .and_then(|t| t.checked_add(record.bitmap_height as i32))
                    .ok_or(ParseError::InvalidValue("descent anchor out of range"))?;
            }

            bitmaps.push(GlyphBitmap::from_packed(
                texture_side,
                record.bitmap_width as usize,
                record.bitmap_height as usize,
                samples,
            ));
            records.push(record);
        }

        if ascent == 0 && descent == 0 {
            return Err(FontError::RequiresRebuild);
        }

        log::debug!(
            "glyph table: {} glyphs, design box {}, texture side {}, ascent {}, descent {}",
            records.len(),
            header.design_box,
            texture_side,
            ascent,
            descent
        );

        Ok(Self {
            records,
            bitmaps,
            ascii,
            design_box: header.design_box,
            texture_side,
            ascent_units: ascent,
            descent_units: descent,
        })
    }

    /// Find the index of the glyph for `code`.
    ///
    /// ASCII codes are answered from the fast-path array; others by binary
    /// search. A miss is `None`, never an error.
    pub fn lookup(&self, code: u32) -> Option<usize> {
        match self.ascii.get(code as usize) {
            Some(slot) => *slot,
            None => self.search(code),
        }
    }

    /// Convenience wrapper around [`GlyphTable::lookup`].
    #[inline]
    pub fn lookup_char(&self, ch: char) -> Option<usize> {
        self.lookup(ch as u32)
    }

    /// Binary search over the whole record sequence.
    ///
    /// The pivot is compared before the `start >= stop` termination test, and
    /// the bounds are inclusive on both ends.
    pub fn search(&self, code: u32) -> Option<usize> {
        if self.records.is_empty() {
            return None;
        }
        let mut start = 0isize;
        let mut stop = self.records.len() as isize - 1;
        loop {
            // start >= 0 and stop >= start - 1 always hold, so pivot is in range.
            let pivot = (start + stop) / 2;
            let pivot_code = self.records[pivot as usize].code;
            if code == pivot_code {
                return Some(pivot as usize);
            }
            if start >= stop {
                return None;
            }
            if code < pivot_code {
                stop = pivot - 1;
            } else {
                start = pivot + 1;
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn record(&self, index: usize) -> Option<&GlyphRecord> {
        self.records.get(index)
    }

    #[inline]
    pub fn bitmap(&self, index: usize) -> Option<&GlyphBitmap> {
        self.bitmaps.get(index)
    }

    /// All records in table order.
    #[inline]
    pub fn records(&self) -> &[GlyphRecord] {
        &self.records
    }

    /// Records paired with their bitmaps, in table order.
    pub fn glyphs(&self) -> impl Iterator<Item = (&GlyphRecord, &GlyphBitmap)> + '_ {
        self.records.iter().zip(self.bitmaps.iter())
    }

    /// Nominal font size; design units are relative to it.
    #[inline]
    pub fn design_box(&self) -> u32 {
        self.design_box
    }

    /// Side of every glyph's square backing buffer (a power of two).
    #[inline]
    pub fn texture_side(&self) -> usize {
        self.texture_side
    }

    #[inline]
    pub fn ascent_units(&self) -> i32 {
        self.ascent_units
    }

    #[inline]
    pub fn descent_units(&self) -> i32 {
        self.descent_units
    }
}

/// Snap the requested texture side up to a power of two that also covers the
/// design box.
pub(crate) fn texture_side_for(design_box: u32, hint: u32) -> Result<usize, FontError> {
    let side = (hint.max(design_box) as usize).next_power_of_two();
    if side > MAX_TEXTURE_SIDE {
        return Err(ParseError::LengthOutOfRange("texture side").into());
    }
    Ok(side)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

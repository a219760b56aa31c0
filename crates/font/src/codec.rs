//! Binary font resource format.
//!
//! All integers are big-endian `i32`:
//!
//! ```text
//! header:  glyph_count bit_depth design_box padded_box_hint ascent descent
//! record:  code height width advance top_extent left_extent reserved   (× glyph_count)
//! bitmaps: height*width alpha bytes per glyph, row-major, unpadded     (× glyph_count)
//! ```

use common::{BufWriter, Cursor, ParseError};

use crate::error::FontError;
use crate::glyph::GlyphRecord;
use crate::table::{texture_side_for, FontHeader, GlyphTable, MAX_BITMAP_BYTES};

/// The only sample depth the format defines.
pub const BIT_DEPTH: i32 = 8;

const HEADER_LEN: usize = 6 * 4;
const RECORD_LEN: usize = 7 * 4;

/// Decode a font resource into a [`GlyphTable`].
pub fn decode(data: &[u8]) -> Result<GlyphTable, FontError> {
    let mut c = Cursor::new(data);

    let glyph_count = c.count("glyph count")?;
    let bit_depth = c.i32()?;
    if bit_depth != BIT_DEPTH {
        log::warn!("font declares {bit_depth}-bit samples; reading as {BIT_DEPTH}-bit");
    }
    let design_box = c.count("design box size")? as u32;
    let padded_box_hint = c.count("padded box size")? as u32;
    let ascent_units = c.i32()?;
    let descent_units = c.i32()?;
    let header = FontHeader { design_box, padded_box_hint, ascent_units, descent_units };

    // Every record is 28 bytes, so a count larger than the input is corrupt.
    if glyph_count > c.remaining() / RECORD_LEN {
        return Err(ParseError::LengthOutOfRange("glyph count").into());
    }
    // Each glyph gets a padded side × side buffer regardless of its own size.
    let side = texture_side_for(design_box, padded_box_hint)?;
    if glyph_count.saturating_mul(side * side) > MAX_BITMAP_BYTES {
        return Err(ParseError::LengthOutOfRange("total bitmap size").into());
    }

    let mut records = Vec::with_capacity(glyph_count);
    for _ in 0..glyph_count {
        let code = c.count("glyph code")? as u32;
        let bitmap_height = c.count("glyph height")? as u32;
        let bitmap_width = c.count("glyph width")? as u32;
        let advance_width = c.i32()?;
        let top_extent = c.i32()?;
        let left_extent = c.i32()?;
        let _reserved = c.i32()?;
        records.push(GlyphRecord {
            code,
            bitmap_width,
            bitmap_height,
            advance_width,
            top_extent,
            left_extent,
        });
    }

    let mut glyphs = Vec::with_capacity(glyph_count);
    for rec in records {
        let samples = c.bytes(rec.sample_count())?;
        glyphs.push((rec, samples));
    }

    if !c.is_empty() {
        log::debug!("{} trailing bytes after glyph bitmaps ignored", c.remaining());
    }

    GlyphTable::new(header, glyphs)
}

/// Encode a [`GlyphTable`] back into the binary format.
///
/// The texture side is written as the padded-box hint and the derived
/// ascent/descent replace the header values the table was built from.
pub fn encode(table: &GlyphTable) -> Vec<u8> {
    let samples: usize = table.records().iter().map(GlyphRecord::sample_count).sum();
    let mut w = BufWriter::with_capacity(HEADER_LEN + table.len() * RECORD_LEN + samples);

    w.i32(table.len() as i32);
    w.i32(BIT_DEPTH);
    w.i32(table.design_box() as i32);
    w.i32(table.texture_side() as i32);
    w.i32(table.ascent_units());
    w.i32(table.descent_units());

    for rec in table.records() {
        w.i32(rec.code as i32);
        w.i32(rec.bitmap_height as i32);
        w.i32(rec.bitmap_width as i32);
        w.i32(rec.advance_width);
        w.i32(rec.top_extent);
        w.i32(rec.left_extent);
        w.i32(0);
    }

    for (_, bitmap) in table.glyphs() {
        for row in bitmap.rows() {
            w.bytes(row);
        }
    }

    w.finish()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::{header, record};

    /// A three-glyph font with recognisable sample patterns.
    fn sample_table() -> GlyphTable {
        let glyphs = vec![
            (record('A', 3, 2, 20, 30, 1), vec![1, 2, 3, 4, 5, 6]),
            (record('d', 2, 3, 25, 40, 2), vec![10, 20, 30, 40, 50, 60]),
            (record('p', 1, 4, 25, 10, 2), vec![7, 8, 9, 255]),
            (record('\u{3B1}', 2, 2, 22, 20, 0), vec![0, 128, 255, 64]),
        ];
        GlyphTable::new(header(48), glyphs).unwrap()
    }

    #[test]
    fn encode_header_layout() {
        let bytes = encode(&sample_table());
        let mut c = Cursor::new(&bytes);
        assert_eq!(c.i32().unwrap(), 4); // glyph count
        assert_eq!(c.i32().unwrap(), 8); // bit depth
        assert_eq!(c.i32().unwrap(), 48); // design box
        assert_eq!(c.i32().unwrap(), 64); // texture side
        assert_eq!(c.i32().unwrap(), 40); // ascent from 'd'
        assert_eq!(c.i32().unwrap(), -6); // descent from 'p': -10 + 4
        // First record: 'A'
        assert_eq!(c.i32().unwrap(), 'A' as i32);
        assert_eq!(c.i32().unwrap(), 2); // height
        assert_eq!(c.i32().unwrap(), 3); // width
    }

    #[test]
    fn encoded_bitmaps_are_tightly_packed() {
        let table = sample_table();
        let bytes = encode(&table);
        let bitmap_start = HEADER_LEN + table.len() * RECORD_LEN;
        assert_eq!(
            &bytes[bitmap_start..],
            &[1, 2, 3, 4, 5, 6, 10, 20, 30, 40, 50, 60, 7, 8, 9, 255, 0, 128, 255, 64]
        );
    }

    #[test]
    fn roundtrip_preserves_records_and_samples() {
        let table = sample_table();
        let decoded = decode(&encode(&table)).unwrap();

        assert_eq!(decoded.records(), table.records());
        assert_eq!(decoded.design_box(), table.design_box());
        assert_eq!(decoded.texture_side(), table.texture_side());
        assert_eq!(decoded.ascent_units(), table.ascent_units());
        assert_eq!(decoded.descent_units(), table.descent_units());
        for ((_, a), (_, b)) in decoded.glyphs().zip(table.glyphs()) {
            assert_eq!(a.pixels(), b.pixels());
        }
    }

    #[test]
    fn decode_repacks_into_padded_buffer() {
        let table = decode(&encode(&sample_table())).unwrap();
        let a = table.bitmap(table.lookup_char('A').unwrap()).unwrap();
        assert_eq!(a.sample(0, 1), 4);
        assert_eq!(a.sample(2, 1), 6);
        assert_eq!(a.sample(3, 0), 0);
        assert_eq!(a.pixels()[64], 4);
    }

    #[test]
    fn decode_truncated_bitmaps_fails() {
        let mut bytes = encode(&sample_table());
        bytes.pop();
        assert!(matches!(
            decode(&bytes),
            Err(FontError::Parse(ParseError::UnexpectedEof))
        ));
    }

    #[test]
    fn decode_rejects_negative_dimensions() {
        let mut bytes = encode(&sample_table());
        // Height field of the first record.
        bytes[HEADER_LEN + 4..HEADER_LEN + 8].copy_from_slice(&(-2i32).to_be_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(FontError::Parse(ParseError::LengthOutOfRange("glyph height")))
        ));
    }

    #[test]
    fn decode_rejects_absurd_glyph_count() {
        let mut bytes = encode(&sample_table());
        bytes[0..4].copy_from_slice(&i32::MAX.to_be_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(FontError::Parse(ParseError::LengthOutOfRange("glyph count")))
        ));
    }

    #[test]
    fn decode_tolerates_unexpected_bit_depth() {
        let mut bytes = encode(&sample_table());
        bytes[4..8].copy_from_slice(&1i32.to_be_bytes());
        assert_eq!(decode(&bytes).unwrap().len(), 4);
    }

    #[test]
    fn decode_without_anchor_glyphs_requires_rebuild() {
        let glyphs = vec![(record('d', 1, 1, 10, 0, 0), vec![0u8])];
        // 'd' with a zero top extent leaves both metrics unset.
        assert!(matches!(
            GlyphTable::new(header(48), glyphs),
            Err(FontError::RequiresRebuild)
        ));

        let mut w = BufWriter::new();
        for v in [1, 8, 48, 64, 0, 0] {
            w.i32(v);
        }
        for v in ['A' as i32, 1, 1, 10, 5, 0, 0] {
            w.i32(v);
        }
        w.bytes(&[255]);
        assert!(matches!(decode(&w.finish()), Err(FontError::RequiresRebuild)));
    }

    #[test]
    fn decode_rejects_descent_anchor_overflow() {
        let mut w = BufWriter::new();
        for v in [1, 8, 8, 8, 0, 0] {
            w.i32(v);
        }
        for v in ['p' as i32, 1, 1, 4, i32::MIN, 0, 0] {
            w.i32(v);
        }
        w.bytes(&[255]);
        assert!(matches!(
            decode(&w.finish()),
            Err(FontError::Parse(ParseError::InvalidValue(_)))
        ));
    }

    #[test]
    fn decode_rejects_oversized_bitmap_total() {
        // A 4096 side pads every glyph to 16 MiB, so 17 empty glyphs exceed the bound.
        let mut w = BufWriter::new();
        for v in [17, 8, 8, 4096, 0, 0] {
            w.i32(v);
        }
        for code in 0..17 {
            for v in ['a' as i32 + code, 0, 0, 4, 0, 0, 0] {
                w.i32(v);
            }
        }
        assert!(matches!(
            decode(&w.finish()),
            Err(FontError::Parse(ParseError::LengthOutOfRange("total bitmap size")))
        ));
    }
}

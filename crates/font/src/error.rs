//! Font loading errors.

use common::ParseError;

/// Errors that can occur while building or decoding a glyph table.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The binary font data is truncated or carries out-of-range fields.
    #[error("malformed font data: {0}")]
    Parse(#[from] ParseError),

    /// Neither an ascent nor a descent could be established for the font.
    #[error("font has no usable ascent or descent; re-create it with the font builder")]
    RequiresRebuild,

    /// A glyph's alpha data does not match its declared dimensions.
    #[error("glyph {code:#x} declares {expected} alpha samples but {found} were supplied")]
    SampleCount { code: u32, expected: usize, found: usize },

    /// Glyph codes must be strictly ascending for the binary search.
    #[error("glyph code {code:#x} at index {index} is not greater than its predecessor")]
    UnsortedCodes { index: usize, code: u32 },

    /// A glyph bitmap does not fit in the font's texture side.
    #[error("glyph {code:#x} bitmap is {width}x{height}, larger than the {side}px texture")]
    GlyphTooLarge { code: u32, width: u32, height: u32, side: usize },
}

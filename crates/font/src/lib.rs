//! # Bitmap Font Store
//!
//! Pre-rendered alpha-mask glyphs with integer design-unit metrics.
//!
//! - `glyph`: per-character metric records and padded alpha bitmaps
//! - `table`: the immutable glyph table with fast-path + binary-search lookup
//! - `metrics`: ascent, descent, advance widths and leading scaled to a size
//! - `codec`: decode/encode of the big-endian binary font resource

pub mod codec;
pub mod error;
pub mod glyph;
pub mod metrics;
pub mod table;

pub use codec::{decode, encode};
pub use error::FontError;
pub use glyph::{GlyphBitmap, GlyphRecord};
pub use metrics::{FontMetrics, LEADING_FACTOR};
pub use table::{FontHeader, GlyphTable};

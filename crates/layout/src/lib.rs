//! # Text Layout
//!
//! Line splitting, alignment and box-constrained word wrapping over a bitmap
//! font's metrics. Produces pen placements; compositing lives in `paint`.

pub mod text;

pub use text::{
    Align, PlacedGlyph, TextStyle, layout_box, layout_line, layout_lines, place_box, place_lines,
};

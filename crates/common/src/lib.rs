//! # Common Foundation Crate
//!
//! Shared types for the bitmap text engine: the big-endian byte cursor and
//! writer used by the font codec, the byte-level `ParseError`, and the small
//! color / geometry primitives shared by layout and painting.

#![forbid(unsafe_code)]

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// ParseError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur when decoding binary or text data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Tried to read past the end of the buffer.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A decoded value is not valid in context.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    /// A count or dimension field is out of the acceptable range.
    #[error("length out of range: {0}")]
    LengthOutOfRange(&'static str),
}

// ─────────────────────────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────────────────────────

/// A zero-copy, big-endian byte-buffer reader.
pub struct Cursor<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at offset 0.
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    /// Number of bytes remaining from the current position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.off)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8], ParseError> {
        let end = self.off.checked_add(n).ok_or(ParseError::UnexpectedEof)?;
        let slice = self.buf.get(self.off..end).ok_or(ParseError::UnexpectedEof)?;
        self.off = end;
        Ok(slice)
    }

    /// Read a big-endian `i32`.
    #[inline]
    pub fn i32(&mut self) -> Result<i32, ParseError> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read an `i32` that must not be negative, widened to `usize`.
    ///
    /// `what` names the field in the error.
    pub fn count(&mut self, what: &'static str) -> Result<usize, ParseError> {
        let v = self.i32()?;
        usize::try_from(v).map_err(|_| ParseError::LengthOutOfRange(what))
    }

    /// Read exactly `n` bytes as a slice.
    #[inline]
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], ParseError> {
        self.take(n)
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("off", &self.off)
            .field("len", &self.buf.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BufWriter
// ─────────────────────────────────────────────────────────────────────────────

/// A growable, big-endian byte buffer writer.
#[derive(Clone, Default)]
pub struct BufWriter {
    out: Vec<u8>,
}

impl BufWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self { out: Vec::with_capacity(cap) }
    }

    /// Write a big-endian `i32`.
    #[inline]
    pub fn i32(&mut self, v: i32) {
        self.out.extend_from_slice(&v.to_be_bytes());
    }

    /// Write a raw byte slice.
    #[inline]
    pub fn bytes(&mut self, b: &[u8]) {
        self.out.extend_from_slice(b);
    }

    /// Consume the writer and return the underlying buffer.
    #[inline]
    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

impl fmt::Debug for BufWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufWriter").field("len", &self.out.len()).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// An RGBA fill color with 8 bits per channel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };

    /// Create a fully-opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`.
    pub fn from_hex(s: &str) -> Result<Self, ParseError> {
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_digit(c: u8) -> Result<u8, ParseError> {
            match c {
                b'0'..=b'9' => Ok(c - b'0'),
                b'a'..=b'f' => Ok(c - b'a' + 10),
                b'A'..=b'F' => Ok(c - b'A' + 10),
                _ => Err(ParseError::InvalidValue("invalid hex digit")),
            }
        }

        let bytes = s.as_bytes();
        if bytes.len() != 6 && bytes.len() != 8 {
            return Err(ParseError::InvalidValue("hex color must be 6 or 8 hex digits"));
        }
        let mut channels = [255u8; 4];
        for (i, pair) in bytes.chunks(2).enumerate() {
            channels[i] = hex_digit(pair[0])? << 4 | hex_digit(pair[1])?;
        }
        let [r, g, b, a] = channels;
        Ok(Self::rgba(r, g, b, a))
    }

    /// Pack into a `u32` as `0xAARRGGBB`, the framebuffer pixel layout.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | (self.b as u32)
    }

    /// Unpack from a `0xAARRGGBB` pixel.
    #[inline]
    pub const fn from_argb(v: u32) -> Self {
        Self {
            a: (v >> 24) as u8,
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:02x}{:02x}{:02x}{:02x})", self.r, self.g, self.b, self.a)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rect
// ─────────────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle defined by origin `(x, y)` and size `(w, h)`.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.h
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect({}, {}, {}×{})", self.x, self.y, self.w, self.h)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

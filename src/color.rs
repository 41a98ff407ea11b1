//! Packed luma/chroma colors and RGB conversions
//!
//! The filter never works on RGB directly. Every pixel is converted once to a
//! [`PackedColor`], a 32-bit word holding one luma and two chroma channels:
//!
//! ```text
//!  31         20 19        10 9          0
//! +-------------+------------+------------+
//! |   Y (12)    |   U (10)   |   V (10)   |
//! +-------------+------------+------------+
//! ```
//!
//! Luma is stored as `16 * Y` with `Y` in `0..=255`. Chroma is stored as
//! `4 * C + 512`, so neutral gray sits at the mid-point of each chroma field
//! and blending can de-bias, weight and re-bias without sign juggling.
//!
//! Coefficients are ITU-R BT.601 full range:
//!
//! - `Y = 0.299 R + 0.587 G + 0.114 B`
//! - `U = (B - Y) / 1.772`
//! - `V = (R - Y) / 1.402`
//!
//! At this precision `unpack(pack(r, g, b))` is exact for every 8-bit triple.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Width of the luma field in bits.
pub const LUMA_BITS: u32 = 12;
/// Width of each chroma field in bits.
pub const CHROMA_BITS: u32 = 10;
/// Largest storable luma value.
pub const LUMA_MAX: u16 = (1 << LUMA_BITS) - 1;
/// Largest storable chroma value (biased).
pub const CHROMA_MAX: u16 = (1 << CHROMA_BITS) - 1;
/// Stored value of zero chroma.
pub const CHROMA_BIAS: i32 = 1 << (CHROMA_BITS - 1);

const LUMA_SHIFT: u32 = CHROMA_BITS * 2;
const U_SHIFT: u32 = CHROMA_BITS;
const LUMA_MASK: u32 = LUMA_MAX as u32;
const CHROMA_MASK: u32 = CHROMA_MAX as u32;

/// Fixed-point scale of the luma field relative to 8-bit luma.
const LUMA_SCALE: f64 = 16.0;
/// Fixed-point scale of the chroma fields relative to 8-bit chroma.
const CHROMA_SCALE: f64 = 4.0;

const KR: f64 = 0.299;
const KB: f64 = 0.114;
const KG: f64 = 1.0 - KR - KB;
const CB_SCALE: f64 = 1.0 / (1.0 - KB) / 2.0;
const CR_SCALE: f64 = 1.0 / (1.0 - KR) / 2.0;

/// Error type for hex color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// An 8-bit-per-channel RGB color, used at the I/O boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to the packed luma/chroma representation.
    pub fn pack(self) -> PackedColor {
        pack(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_color(s)
    }
}

/// Serialized as a `#RRGGBB` string.
impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl From<Rgba<u8>> for Rgb {
    fn from(px: Rgba<u8>) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

impl From<Rgb> for Rgba<u8> {
    fn from(rgb: Rgb) -> Self {
        Rgba([rgb.r, rgb.g, rgb.b, 255])
    }
}

/// A luma/chroma color packed into one 32-bit word.
///
/// Every channel is masked to its field on construction, so a `PackedColor`
/// can never carry out-of-range channel values.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedColor(u32);

impl PackedColor {
    /// Packed black: zero luma, neutral chroma.
    pub const BLACK: PackedColor = PackedColor::from_channels(0, CHROMA_BIAS as u16, CHROMA_BIAS as u16);

    /// Reinterpret a raw word. Any 32-bit value is a valid packed color.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw 32-bit word.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Build from stored channel values (chroma biased). Values wider than
    /// their field are truncated to it.
    pub const fn from_channels(luma: u16, u: u16, v: u16) -> Self {
        Self(
            ((luma as u32 & LUMA_MASK) << LUMA_SHIFT)
                | ((u as u32 & CHROMA_MASK) << U_SHIFT)
                | (v as u32 & CHROMA_MASK),
        )
    }

    /// Stored luma, `0..=4095`.
    pub const fn luma(self) -> u16 {
        ((self.0 >> LUMA_SHIFT) & LUMA_MASK) as u16
    }

    /// Stored (biased) blue-difference chroma, `0..=1023`.
    pub const fn chroma_u(self) -> u16 {
        ((self.0 >> U_SHIFT) & CHROMA_MASK) as u16
    }

    /// Stored (biased) red-difference chroma, `0..=1023`.
    pub const fn chroma_v(self) -> u16 {
        (self.0 & CHROMA_MASK) as u16
    }

    pub fn from_rgb(rgb: Rgb) -> Self {
        pack(rgb.r, rgb.g, rgb.b)
    }

    pub fn to_rgb(self) -> Rgb {
        let (r, g, b) = unpack(self);
        Rgb::new(r, g, b)
    }
}

impl Default for PackedColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Debug for PackedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedColor({:#010x})", self.0)
    }
}

/// Pack an RGB triple into a [`PackedColor`].
pub fn pack(r: u8, g: u8, b: u8) -> PackedColor {
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));

    let y = KR * r + KG * g + KB * b;
    let u = CB_SCALE * (-KR * r - KG * g + (1.0 - KB) * b);
    let v = CR_SCALE * ((1.0 - KR) * r - KG * g - KB * b);

    let luma = quantize(y * LUMA_SCALE, 0, i64::from(LUMA_MAX));
    let cu = quantize_chroma(u);
    let cv = quantize_chroma(v);

    PackedColor::from_channels(luma as u16, cu as u16, cv as u16)
}

/// Unpack a [`PackedColor`] into an RGB triple.
///
/// Colors produced by blending may fall outside the RGB gamut; each channel
/// is clamped to `0..=255`.
pub fn unpack(color: PackedColor) -> (u8, u8, u8) {
    let y = f64::from(color.luma()) / LUMA_SCALE;
    let u = f64::from(i32::from(color.chroma_u()) - CHROMA_BIAS) / CHROMA_SCALE;
    let v = f64::from(i32::from(color.chroma_v()) - CHROMA_BIAS) / CHROMA_SCALE;

    let r = y + v / CR_SCALE;
    let g = y - (KB / CB_SCALE / KG) * u - (KR / CR_SCALE / KG) * v;
    let b = y + u / CB_SCALE;

    (
        quantize(r, 0, 255) as u8,
        quantize(g, 0, 255) as u8,
        quantize(b, 0, 255) as u8,
    )
}

/// Round half away from zero, then clamp.
fn quantize(value: f64, min: i64, max: i64) -> i64 {
    (value.round() as i64).clamp(min, max)
}

/// Scale and round a signed chroma value before biasing it into its field.
fn quantize_chroma(value: f64) -> i64 {
    let scaled = (value * CHROMA_SCALE).round() as i64;
    (scaled + i64::from(CHROMA_BIAS)).clamp(0, i64::from(CHROMA_MAX))
}

/// Parse a hex color string (#RGB, #RRGGBB)
fn parse_hex_color(s: &str) -> Result<Rgb, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    // Validate all characters are hex
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let digits: Vec<u8> = hex.chars().map(parse_hex_digit).collect::<Result<_, _>>()?;
    match digits.len() {
        // #RGB -> #RRGGBB (doubled digits)
        3 => Ok(Rgb::new(digits[0] * 17, digits[1] * 17, digits[2] * 17)),
        6 => Ok(Rgb::new(
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        )),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidHex(c)),
    }
}

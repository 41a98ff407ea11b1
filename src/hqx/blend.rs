//! Fixed-point blends of packed colors
//!
//! Weights are in eighths: every blend's weights sum to [`WEIGHT_TOTAL`] and
//! the weighted sum is shifted right by [`WEIGHT_SHIFT`]. Chroma is de-biased
//! before weighting and re-biased afterwards; the shift floors toward
//! negative infinity.

use crate::color::{PackedColor, CHROMA_BIAS};

pub const WEIGHT_SHIFT: u32 = 3;
pub const WEIGHT_TOTAL: u32 = 1 << WEIGHT_SHIFT;

/// `(a * wa + b * wb) >> 3`, per channel.
pub fn mix2(a: PackedColor, wa: u32, b: PackedColor, wb: u32) -> PackedColor {
    mix(&[(a, wa), (b, wb)])
}

/// `(a * wa + b * wb + c * wc) >> 3`, per channel.
pub fn mix3(a: PackedColor, wa: u32, b: PackedColor, wb: u32, c: PackedColor, wc: u32) -> PackedColor {
    mix(&[(a, wa), (b, wb), (c, wc)])
}

fn mix(taps: &[(PackedColor, u32)]) -> PackedColor {
    debug_assert_eq!(taps.iter().map(|&(_, w)| w).sum::<u32>(), WEIGHT_TOTAL);

    let (mut y, mut u, mut v) = (0u32, 0i32, 0i32);
    for &(color, weight) in taps {
        y += u32::from(color.luma()) * weight;
        u += (i32::from(color.chroma_u()) - CHROMA_BIAS) * weight as i32;
        v += (i32::from(color.chroma_v()) - CHROMA_BIAS) * weight as i32;
    }

    PackedColor::from_channels(
        (y >> WEIGHT_SHIFT) as u16,
        ((u >> WEIGHT_SHIFT) + CHROMA_BIAS) as u16,
        ((v >> WEIGHT_SHIFT) + CHROMA_BIAS) as u16,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::pack;

    #[test]
    fn test_blending_a_color_with_itself_is_identity() {
        let c = pack(37, 190, 222);
        assert_eq!(mix2(c, 5, c, 3), c);
        assert_eq!(mix3(c, 4, c, 2, c, 2), c);
        assert_eq!(mix3(c, 6, c, 1, c, 1), c);
    }

    #[test]
    fn test_half_black_half_white() {
        let gray = mix2(pack(0, 0, 0), 4, pack(255, 255, 255), 4);
        assert_eq!(gray.raw(), 0x7f88_0200);
        assert_eq!(gray.luma(), 2040);
    }

    #[test]
    fn test_weights_are_in_eighths() {
        let black = pack(0, 0, 0);
        let white = pack(255, 255, 255);
        assert_eq!(mix2(black, 5, white, 3).raw(), 0x5fa8_0200);
        assert_eq!(mix2(white, 7, black, 1).luma(), 3570);
    }

    #[test]
    fn test_negative_chroma_floors() {
        let a = PackedColor::from_channels(0, 511, 513);
        let b = PackedColor::from_channels(0, 512, 512);
        let mixed = mix2(a, 4, b, 4);
        // (-1 * 4) >> 3 == -1, (1 * 4) >> 3 == 0
        assert_eq!(mixed.chroma_u(), 511);
        assert_eq!(mixed.chroma_v(), 512);
    }

    #[test]
    fn test_three_tap_blend() {
        let red = pack(255, 0, 0);
        let blue = pack(0, 0, 255);
        let black = pack(0, 0, 0);
        let c = mix3(red, 4, blue, 2, black, 2);
        assert_eq!(c.luma(), (1220 * 4 + 465 * 2) >> 3);
        assert_eq!(i32::from(c.chroma_u()), (((340 - 512) * 4 + (1022 - 512) * 2) >> 3) + 512);
    }
}

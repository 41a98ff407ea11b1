//! Pixel difference predicates
//!
//! The classifier and the rule tables only ever ask one question about two
//! pixels: are they perceptually different? [`Metric`] answers it and also
//! resolves a pixel to the [`PackedColor`] used for blending, which lets the
//! same engine run on packed colors ([`YuvThreshold`]) or on palette indices
//! ([`crate::palettes::IndexedPalette`]).

use serde::{Deserialize, Serialize};

use crate::color::PackedColor;

/// A difference predicate over some pixel representation.
pub trait Metric {
    /// The pixel type stored in the source grid.
    type Pixel: Copy;

    /// Returns true if `a` and `b` should be treated as different colors.
    fn differs(&self, a: Self::Pixel, b: Self::Pixel) -> bool;

    /// The packed color a pixel contributes to blends.
    fn resolve(&self, pixel: Self::Pixel) -> PackedColor;
}

impl<M: Metric + ?Sized> Metric for &M {
    type Pixel = M::Pixel;

    fn differs(&self, a: Self::Pixel, b: Self::Pixel) -> bool {
        (**self).differs(a, b)
    }

    fn resolve(&self, pixel: Self::Pixel) -> PackedColor {
        (**self).resolve(pixel)
    }
}

/// Per-channel thresholds on packed luma/chroma colors.
///
/// Two colors differ when any absolute channel difference is strictly greater
/// than that channel's threshold. Thresholds are in stored units: the
/// defaults 768, 28 and 24 are 48, 7 and 6 in 8-bit luma/chroma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YuvThreshold {
    pub luma: u16,
    pub chroma_u: u16,
    pub chroma_v: u16,
}

impl YuvThreshold {
    /// Default luma threshold (48/256 of the range).
    pub const DEFAULT_LUMA: u16 = 768;
    /// Default blue-difference threshold.
    pub const DEFAULT_CHROMA_U: u16 = 28;
    /// Default red-difference threshold.
    pub const DEFAULT_CHROMA_V: u16 = 24;

    pub const fn new(luma: u16, chroma_u: u16, chroma_v: u16) -> Self {
        Self { luma, chroma_u, chroma_v }
    }

    /// Compare two packed colors channel by channel.
    pub fn exceeds(&self, a: PackedColor, b: PackedColor) -> bool {
        a.luma().abs_diff(b.luma()) > self.luma
            || a.chroma_u().abs_diff(b.chroma_u()) > self.chroma_u
            || a.chroma_v().abs_diff(b.chroma_v()) > self.chroma_v
    }
}

impl Default for YuvThreshold {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LUMA, Self::DEFAULT_CHROMA_U, Self::DEFAULT_CHROMA_V)
    }
}

impl Metric for YuvThreshold {
    type Pixel = PackedColor;

    fn differs(&self, a: PackedColor, b: PackedColor) -> bool {
        self.exceeds(a, b)
    }

    fn resolve(&self, pixel: PackedColor) -> PackedColor {
        pixel
    }
}

/// Difference predicate with the default thresholds.
pub fn differs(a: PackedColor, b: PackedColor) -> bool {
    YuvThreshold::default().exceeds(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::pack;

    #[test]
    fn test_same_color_never_differs() {
        for raw in [0u32, 0x0008_0200, 0xff08_0200, 0x4c45_53fe, u32::MAX, 0x1234_5678] {
            let c = PackedColor::from_raw(raw);
            assert!(!differs(c, c));
        }
    }

    #[test]
    fn test_black_white_differs() {
        assert!(differs(pack(0, 0, 0), pack(255, 255, 255)));
    }

    #[test]
    fn test_close_grays_are_similar() {
        // 40 levels of luma is below the 48 level threshold.
        assert!(!differs(pack(100, 100, 100), pack(140, 140, 140)));
        assert!(differs(pack(100, 100, 100), pack(149, 149, 149)));
    }

    #[test]
    fn test_threshold_is_strict() {
        let t = YuvThreshold::default();
        let base = PackedColor::from_channels(1000, 512, 512);
        let at = PackedColor::from_channels(1000 + 768, 512, 512);
        let over = PackedColor::from_channels(1000 + 769, 512, 512);
        assert!(!t.differs(base, at));
        assert!(t.differs(base, over));
    }

    #[test]
    fn test_each_chroma_channel_triggers() {
        let t = YuvThreshold::default();
        let base = PackedColor::from_channels(2000, 512, 512);
        assert!(!t.differs(base, PackedColor::from_channels(2000, 540, 512)));
        assert!(t.differs(base, PackedColor::from_channels(2000, 541, 512)));
        assert!(!t.differs(base, PackedColor::from_channels(2000, 512, 488)));
        assert!(t.differs(base, PackedColor::from_channels(2000, 512, 487)));
    }

    #[test]
    fn test_predicate_is_symmetric() {
        let a = pack(200, 40, 40);
        let b = pack(20, 40, 160);
        assert_eq!(differs(a, b), differs(b, a));
        assert!(differs(a, b));
    }

    #[test]
    fn test_zero_thresholds_detect_any_change() {
        let t = YuvThreshold::new(0, 0, 0);
        let a = PackedColor::from_channels(100, 512, 512);
        assert!(t.differs(a, PackedColor::from_channels(101, 512, 512)));
        assert!(!t.differs(a, a));
    }

    #[test]
    fn test_resolve_is_identity() {
        let c = pack(1, 2, 3);
        assert_eq!(YuvThreshold::default().resolve(c), c);
    }
}

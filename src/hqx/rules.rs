//! hq4x interpolation rules
//!
//! Every sub-pixel of a quadrant has an ordered [`RuleTable`]. A [`Rule`]
//! matches when the pattern satisfies any of its masks and, if the rule is
//! guarded, the two named neighbors differ under the active metric. The
//! first matching rule picks the blend; otherwise the table's fallback does.
//!
//! Neighbor indices refer to the (already permuted) neighborhood:
//!
//! ```text
//! 0 1 2
//! 3 4 5
//! 6 7 8
//! ```

use std::fmt;

use super::blend::{self, WEIGHT_TOTAL};
use super::pattern::Pattern;
use crate::color::PackedColor;
use crate::metric::Metric;

/// Matches when `pattern & mask == target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mask {
    pub mask: u8,
    pub target: u8,
}

const fn m(mask: u8, target: u8) -> Mask {
    Mask { mask, target }
}

/// How a sub-pixel is computed from the neighborhood. Pairs are
/// `(neighbor, weight)` with weights in eighths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    Copy(usize),
    Mix2([(usize, u32); 2]),
    Mix3([(usize, u32); 3]),
}

impl Blend {
    /// Sum of all weights; always [`WEIGHT_TOTAL`].
    pub fn total_weight(&self) -> u32 {
        self.taps().iter().map(|&(_, w)| w).sum()
    }

    /// `(neighbor, weight)` pairs, with a copy as a single full-weight tap.
    pub fn taps(&self) -> Vec<(usize, u32)> {
        match *self {
            Blend::Copy(i) => vec![(i, WEIGHT_TOTAL)],
            Blend::Mix2(taps) => taps.to_vec(),
            Blend::Mix3(taps) => taps.to_vec(),
        }
    }

    pub fn apply<M: Metric>(&self, w: &[M::Pixel; 9], metric: &M) -> PackedColor {
        let c = |i: usize| metric.resolve(w[i]);
        match *self {
            Blend::Copy(i) => c(i),
            Blend::Mix2([(a, wa), (b, wb)]) => blend::mix2(c(a), wa, c(b), wb),
            Blend::Mix3([(a, wa), (b, wb), (d, wd)]) => blend::mix3(c(a), wa, c(b), wb, c(d), wd),
        }
    }
}

impl fmt::Display for Blend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Blend::Copy(i) = self {
            return write!(f, "copy w{}", i);
        }
        let taps: Vec<String> = self.taps().iter().map(|(i, w)| format!("w{}*{}", i, w)).collect();
        write!(f, "({}) / 8", taps.join(" + "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub when: &'static [Mask],
    pub guard: Option<(usize, usize)>,
    pub blend: Blend,
}

impl Rule {
    pub fn matches<M: Metric>(&self, pattern: Pattern, w: &[M::Pixel; 9], metric: &M) -> bool {
        self.when.iter().any(|mask| pattern.matches(mask.mask, mask.target))
            && self.guard.is_none_or(|(a, b)| metric.differs(w[a], w[b]))
    }
}

const fn rule(when: &'static [Mask], blend: Blend) -> Rule {
    Rule { when, guard: None, blend }
}

const fn guarded(when: &'static [Mask], a: usize, b: usize, blend: Blend) -> Rule {
    Rule { when, guard: Some((a, b)), blend }
}

/// Result of evaluating a table: the winning row (`None` for the fallback)
/// and the color it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub row: Option<usize>,
    pub blend: Blend,
    pub color: PackedColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTable {
    pub rules: &'static [Rule],
    pub fallback: Blend,
}

impl RuleTable {
    /// Index of the first matching rule.
    pub fn select<M: Metric>(&self, pattern: Pattern, w: &[M::Pixel; 9], metric: &M) -> Option<usize> {
        self.rules.iter().position(|r| r.matches(pattern, w, metric))
    }

    pub fn evaluate<M: Metric>(&self, pattern: Pattern, w: &[M::Pixel; 9], metric: &M) -> Outcome {
        let row = self.select(pattern, w, metric);
        let blend = row.map_or(self.fallback, |i| self.rules[i].blend);
        Outcome { row, blend, color: blend.apply(w, metric) }
    }

    pub fn interpolate<M: Metric>(&self, pattern: Pattern, w: &[M::Pixel; 9], metric: &M) -> PackedColor {
        self.evaluate(pattern, w, metric).color
    }
}

/// The sub-pixel a rule table computes within a 2x2 quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];

    pub fn table(self) -> &'static RuleTable {
        &TABLES[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Mask sets shared between tables.
const SET_00: &[Mask] = &[m(0xbf, 0x37), m(0xdb, 0x13)];
const SET_01: &[Mask] = &[m(0xdb, 0x49), m(0xef, 0x6d)];
const SET_02: &[Mask] = &[
    m(0x6f, 0x2a), m(0x5b, 0x0a), m(0xbf, 0x3a), m(0xdf, 0x5a),
    m(0x9f, 0x8a), m(0xcf, 0x8a), m(0xef, 0x4e), m(0x3f, 0x0e),
    m(0xfb, 0x5a), m(0xbb, 0x8a), m(0x7f, 0x5a), m(0xaf, 0x8a),
    m(0xeb, 0x8a),
];
const SET_05: &[Mask] = &[m(0x1b, 0x03), m(0x4f, 0x43), m(0x8b, 0x83), m(0x6b, 0x43)];
const SET_06: &[Mask] = &[m(0x4b, 0x09), m(0x8b, 0x89), m(0x1f, 0x19), m(0x3b, 0x19)];
const SET_07: &[Mask] = &[
    m(0x0b, 0x08), m(0xf9, 0x68), m(0xf3, 0x62), m(0x6d, 0x6c),
    m(0x67, 0x66), m(0x3d, 0x3c), m(0x37, 0x36), m(0xf9, 0xf8),
    m(0xdd, 0xdc), m(0xf3, 0xf2), m(0xd7, 0xd6), m(0xdd, 0x1c),
    m(0xd7, 0x16), m(0x0b, 0x02),
];
const SET_08: &[Mask] = &[m(0x0f, 0x0b), m(0x2b, 0x0b), m(0xfe, 0x4a), m(0xfe, 0x1a)];
const SET_09: &[Mask] = &[m(0x2f, 0x2f)];
const SET_10: &[Mask] = &[m(0x0a, 0x00)];
const SET_11: &[Mask] = &[m(0x0b, 0x09)];
const SET_12: &[Mask] = &[m(0x7e, 0x2a), m(0xef, 0xab)];
const SET_13: &[Mask] = &[m(0xbf, 0x8f), m(0x7e, 0x0e)];
const SET_14: &[Mask] = &[
    m(0x4f, 0x4b), m(0x9f, 0x1b), m(0x2f, 0x0b), m(0xbe, 0x0a),
    m(0xee, 0x0a), m(0x7e, 0x0a), m(0xeb, 0x4b), m(0x3b, 0x1b),
];
const SET_15: &[Mask] = &[m(0x0b, 0x03)];

const TOP_LEFT: RuleTable = RuleTable {
    rules: &[
        guarded(SET_00, 1, 5, Blend::Mix2([(4, 5), (3, 3)])),
        guarded(SET_01, 7, 3, Blend::Mix2([(4, 5), (1, 3)])),
        guarded(&[m(0x0b, 0x0b), m(0xfe, 0x4a), m(0xfe, 0x1a)], 3, 1, Blend::Copy(4)),
        guarded(SET_02, 3, 1, Blend::Mix2([(4, 5), (0, 3)])),
        rule(SET_01, Blend::Mix2([(4, 6), (3, 2)])),
        rule(SET_00, Blend::Mix2([(4, 6), (1, 2)])),
        rule(SET_05, Blend::Mix2([(4, 5), (3, 3)])),
        rule(SET_06, Blend::Mix2([(4, 5), (1, 3)])),
        rule(
            &[m(0x0f, 0x0b), m(0x5e, 0x0a), m(0x2b, 0x0b), m(0xbe, 0x0a), m(0x7a, 0x0a), m(0xee, 0x0a)],
            Blend::Mix2([(1, 4), (3, 4)]),
        ),
        rule(SET_07, Blend::Mix2([(4, 5), (0, 3)])),
    ],
    fallback: Blend::Mix3([(4, 4), (1, 2), (3, 2)]),
};

const TOP_RIGHT: RuleTable = RuleTable {
    rules: &[
        guarded(SET_00, 1, 5, Blend::Mix2([(4, 7), (3, 1)])),
        guarded(SET_08, 3, 1, Blend::Copy(4)),
        guarded(SET_02, 3, 1, Blend::Mix2([(4, 6), (0, 2)])),
        rule(SET_09, Blend::Copy(4)),
        rule(SET_10, Blend::Mix3([(4, 5), (1, 2), (3, 1)])),
        rule(&[m(0x0b, 0x08)], Blend::Mix3([(4, 5), (1, 2), (0, 1)])),
        rule(SET_11, Blend::Mix2([(4, 5), (1, 3)])),
        rule(SET_00, Blend::Mix2([(1, 6), (4, 2)])),
        rule(SET_12, Blend::Mix3([(1, 4), (4, 2), (3, 2)])),
        rule(SET_13, Blend::Mix2([(1, 5), (3, 3)])),
        rule(SET_05, Blend::Mix2([(4, 7), (3, 1)])),
        rule(
            &[m(0xf3, 0x62), m(0x67, 0x66), m(0x37, 0x36), m(0xf3, 0xf2), m(0xd7, 0xd6), m(0xd7, 0x16), m(0x0b, 0x02)],
            Blend::Mix2([(4, 6), (0, 2)]),
        ),
        rule(SET_14, Blend::Mix2([(1, 4), (4, 4)])),
    ],
    fallback: Blend::Mix2([(4, 6), (1, 2)]),
};

const BOTTOM_LEFT: RuleTable = RuleTable {
    rules: &[
        guarded(SET_01, 7, 3, Blend::Mix2([(4, 7), (1, 1)])),
        guarded(SET_08, 3, 1, Blend::Copy(4)),
        guarded(SET_02, 3, 1, Blend::Mix2([(4, 6), (0, 2)])),
        rule(SET_09, Blend::Copy(4)),
        rule(SET_10, Blend::Mix3([(4, 5), (3, 2), (1, 1)])),
        rule(&[m(0x0b, 0x02)], Blend::Mix3([(4, 5), (3, 2), (0, 1)])),
        rule(SET_15, Blend::Mix2([(4, 5), (3, 3)])),
        rule(SET_01, Blend::Mix2([(3, 6), (4, 2)])),
        rule(SET_13, Blend::Mix3([(3, 4), (4, 2), (1, 2)])),
        rule(SET_12, Blend::Mix2([(3, 5), (1, 3)])),
        rule(SET_06, Blend::Mix2([(4, 7), (1, 1)])),
        rule(
            &[m(0x0b, 0x08), m(0xf9, 0x68), m(0x6d, 0x6c), m(0x3d, 0x3c), m(0xf9, 0xf8), m(0xdd, 0xdc), m(0xdd, 0x1c)],
            Blend::Mix2([(4, 6), (0, 2)]),
        ),
        rule(SET_14, Blend::Mix2([(3, 4), (4, 4)])),
    ],
    fallback: Blend::Mix2([(4, 6), (3, 2)]),
};

const BOTTOM_RIGHT: RuleTable = RuleTable {
    rules: &[
        guarded(&[m(0x7f, 0x2b), m(0xef, 0xab), m(0xbf, 0x8f), m(0x7f, 0x0f)], 3, 1, Blend::Copy(4)),
        guarded(SET_02, 3, 1, Blend::Mix2([(4, 7), (0, 1)])),
        rule(SET_15, Blend::Mix2([(4, 7), (3, 1)])),
        rule(SET_11, Blend::Mix2([(4, 7), (1, 1)])),
        rule(
            &[m(0x0a, 0x00), m(0x7e, 0x2a), m(0xef, 0xab), m(0xbf, 0x8f), m(0x7e, 0x0e)],
            Blend::Mix3([(4, 6), (3, 1), (1, 1)]),
        ),
        rule(SET_07, Blend::Mix2([(4, 7), (0, 1)])),
    ],
    fallback: Blend::Copy(4),
};

/// Rule tables indexed by [`Corner`].
pub static TABLES: [RuleTable; 4] = [TOP_LEFT, TOP_RIGHT, BOTTOM_LEFT, BOTTOM_RIGHT];

//! Neighborhoods, quadrant permutations and difference patterns

use std::fmt;

use crate::grid::Grid;
use crate::metric::Metric;

/// Index of the pixel being expanded inside a [`Neighborhood`].
pub const CENTER: usize = 4;

/// Neighbor index represented by each pattern bit, lowest bit first.
pub const PATTERN_BITS: [usize; 8] = [0, 1, 2, 3, 5, 6, 7, 8];

/// The 3x3 neighborhood of a source pixel, row-major:
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood<P>(pub [P; 9]);

impl<P: Copy> Neighborhood<P> {
    /// Gather the neighborhood of (x, y), replicating edge pixels for
    /// neighbors outside the grid.
    pub fn gather(grid: &Grid<P>, x: usize, y: usize) -> Self {
        let (x, y) = (x as isize, y as isize);
        let at = |dx: isize, dy: isize| grid.get_clamped(x + dx, y + dy);

        Self([
            at(-1, -1), at(0, -1), at(1, -1),
            at(-1, 0), at(0, 0), at(1, 0),
            at(-1, 1), at(0, 1), at(1, 1),
        ])
    }

    pub fn center(&self) -> P {
        self.0[CENTER]
    }

    /// Reorder the neighborhood so that `quadrant` appears where the top-left
    /// quadrant normally is.
    pub fn permuted(&self, quadrant: Quadrant) -> Self {
        Self(quadrant.permutation().map(|i| self.0[i]))
    }
}

/// One bit per non-center neighbor, set when that neighbor differs from the
/// center. Bit `i` stands for neighbor [`PATTERN_BITS`]`[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pattern(u8);

impl Pattern {
    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `pattern & mask == target`
    pub const fn matches(self, mask: u8, target: u8) -> bool {
        self.0 & mask == target
    }

    /// Whether the neighbor at `index` (0..=8, not 4) differs from the center.
    pub fn differs_at(self, index: usize) -> bool {
        PATTERN_BITS
            .iter()
            .position(|&n| n == index)
            .is_some_and(|bit| self.0 & (1 << bit) != 0)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010b}", self.0)
    }
}

/// Compute the difference pattern of a neighborhood.
pub fn classify<M: Metric>(neighborhood: &Neighborhood<M::Pixel>, metric: &M) -> Pattern {
    let center = neighborhood.center();
    let bits = PATTERN_BITS
        .iter()
        .enumerate()
        .filter(|&(_, &n)| metric.differs(center, neighborhood.0[n]))
        .fold(0u8, |acc, (bit, _)| acc | (1 << bit));
    Pattern(bits)
}

/// One of the four 2x2 quadrants of a pixel's 4x4 expansion.
///
/// Each quadrant is produced by the same four rule tables, run on a mirrored
/// copy of the neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] =
        [Quadrant::TopLeft, Quadrant::TopRight, Quadrant::BottomLeft, Quadrant::BottomRight];

    /// Neighbor order that maps this quadrant onto the top-left one.
    pub const fn permutation(self) -> [usize; 9] {
        match self {
            Quadrant::TopLeft => [0, 1, 2, 3, 4, 5, 6, 7, 8],
            Quadrant::TopRight => [2, 1, 0, 5, 4, 3, 8, 7, 6],
            Quadrant::BottomLeft => [6, 7, 8, 3, 4, 5, 0, 1, 2],
            Quadrant::BottomRight => [8, 7, 6, 5, 4, 3, 2, 1, 0],
        }
    }

    /// (dx, dy) inside the 4x4 block written by the top-left, top-right,
    /// bottom-left and bottom-right rule tables, in that order.
    pub const fn offsets(self) -> [(usize, usize); 4] {
        match self {
            Quadrant::TopLeft => [(0, 0), (1, 0), (0, 1), (1, 1)],
            Quadrant::TopRight => [(3, 0), (2, 0), (3, 1), (2, 1)],
            Quadrant::BottomLeft => [(0, 3), (1, 3), (0, 2), (1, 2)],
            Quadrant::BottomRight => [(3, 3), (2, 3), (3, 2), (2, 2)],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! hq4x magnification
//!
//! The filter classifies each source pixel's 3x3 neighborhood into an 8-bit
//! difference pattern, then looks up how each of the sixteen output
//! sub-pixels blends the neighbors. Only the top-left quadrant's rules are
//! tabulated; the other three quadrants reuse them on a mirrored
//! neighborhood.

mod blend;
mod filter;
mod pattern;
mod rules;

pub use blend::{mix2, mix3, WEIGHT_SHIFT, WEIGHT_TOTAL};
pub use filter::{hq4x, Block, FilterOptions, Hq4x, SCALE};
pub use pattern::{classify, Neighborhood, Pattern, Quadrant, CENTER, PATTERN_BITS};
pub use rules::{Blend, Corner, Mask, Outcome, Rule, RuleTable, TABLES};

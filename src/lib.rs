//! hqscale - Library for magnifying pixel art with the hq4x filter
//!
//! This library provides functionality to:
//! - Pack RGB colors into a YUV word and compare them with per-channel thresholds
//! - Magnify packed-color or palette-indexed grids 4x with the hq4x rules
//! - Decode ZX Spectrum screen dumps into indexed grids
//! - Explain how a single source pixel is expanded

pub mod cli;
pub mod color;
pub mod config;
pub mod explain;
pub mod grid;
pub mod hqx;
pub mod metric;
pub mod output;
pub mod palettes;
pub mod screen;

pub use color::{pack, unpack, PackedColor, Rgb};
pub use grid::{Grid, GridError};
pub use hqx::{hq4x, FilterOptions, Hq4x};
pub use metric::{differs, Metric, YuvThreshold};

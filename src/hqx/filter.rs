//! The hq4x driver: expands every source pixel into a 4x4 block

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::pattern::{classify, Neighborhood, Quadrant};
use super::rules::Corner;
use crate::color::PackedColor;
use crate::grid::Grid;
use crate::metric::{Metric, YuvThreshold};

/// Magnification factor.
pub const SCALE: usize = 4;

/// A 4x4 output block, indexed `[dy][dx]`.
pub type Block = [[PackedColor; SCALE]; SCALE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Process source rows on the rayon thread pool.
    pub parallel: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// hq4x filter over any [`Metric`].
///
/// Each source row maps to a band of four destination rows that no other row
/// touches, so bands are filled independently. Parallel and sequential runs
/// produce identical output.
#[derive(Debug, Clone, Default)]
pub struct Hq4x<M> {
    metric: M,
    options: FilterOptions,
}

impl<M> Hq4x<M>
where
    M: Metric + Sync,
    M::Pixel: Send + Sync,
{
    pub fn new(metric: M) -> Self {
        Self { metric, options: FilterOptions::default() }
    }

    pub fn with_options(metric: M, options: FilterOptions) -> Self {
        Self { metric, options }
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn options(&self) -> FilterOptions {
        self.options
    }

    /// Magnify `src` four times in each direction.
    pub fn filter(&self, src: &Grid<M::Pixel>) -> Grid<PackedColor> {
        let (width, height) = src.dimensions();
        let band = width * SCALE * SCALE;
        let mut cells = vec![PackedColor::BLACK; band * height];

        debug!(
            "hq4x {}x{} -> {}x{} ({})",
            width,
            height,
            width * SCALE,
            height * SCALE,
            if self.options.parallel { "parallel" } else { "sequential" }
        );

        if self.options.parallel {
            cells
                .par_chunks_mut(band)
                .enumerate()
                .for_each(|(y, rows)| self.expand_row(src, y, rows));
        } else {
            cells.chunks_mut(band).enumerate().for_each(|(y, rows)| self.expand_row(src, y, rows));
        }

        Grid::from_parts(width * SCALE, height * SCALE, cells)
    }

    /// The 4x4 block for one neighborhood.
    pub fn expand(&self, neighborhood: &Neighborhood<M::Pixel>) -> Block {
        let mut block = [[PackedColor::BLACK; SCALE]; SCALE];
        for quadrant in Quadrant::ALL {
            let w = neighborhood.permuted(quadrant);
            let pattern = classify(&w, &self.metric);
            for (corner, (dx, dy)) in Corner::ALL.into_iter().zip(quadrant.offsets()) {
                block[dy][dx] = corner.table().interpolate(pattern, &w.0, &self.metric);
            }
        }
        block
    }

    /// The 4x4 block for source pixel (x, y).
    pub fn expand_pixel(&self, src: &Grid<M::Pixel>, x: usize, y: usize) -> Block {
        self.expand(&Neighborhood::gather(src, x, y))
    }

    /// Fill the four destination rows of source row `y`.
    fn expand_row(&self, src: &Grid<M::Pixel>, y: usize, rows: &mut [PackedColor]) {
        let stride = src.width() * SCALE;
        for x in 0..src.width() {
            let block = self.expand_pixel(src, x, y);
            for (dy, line) in block.iter().enumerate() {
                let start = dy * stride + x * SCALE;
                rows[start..start + SCALE].copy_from_slice(line);
            }
        }
    }
}

/// hq4x with the default luma/chroma thresholds.
pub fn hq4x(src: &Grid<PackedColor>) -> Grid<PackedColor> {
    Hq4x::new(YuvThreshold::default()).filter(src)
}

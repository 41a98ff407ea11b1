//! Per-pixel explanations of the hq4x decision process
//!
//! Shows, for one source pixel, the neighborhood the filter saw, the
//! difference pattern of each quadrant and which rule produced each of the
//! sixteen output sub-pixels.

use serde::Serialize;
use thiserror::Error;

use crate::grid::Grid;
use crate::hqx::{classify, Corner, Neighborhood, Quadrant};
use crate::metric::Metric;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplainError {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },
}

/// How one output sub-pixel was computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubpixelExplanation {
    /// Rule table that produced it
    pub rule: &'static str,
    /// Offset inside the 4x4 block
    pub dx: usize,
    pub dy: usize,
    /// Matching row, `None` when the table's fallback applied
    pub row: Option<usize>,
    pub blend: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuadrantExplanation {
    pub quadrant: &'static str,
    /// Pattern of the permuted neighborhood, as a binary string
    pub pattern: String,
    pub subpixels: Vec<SubpixelExplanation>,
}

/// Explanation of a single source pixel's 4x4 expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixelExplanation {
    pub x: usize,
    pub y: usize,
    /// Neighborhood colors as `#RRGGBB`, row-major, center at index 4
    pub neighborhood: Vec<String>,
    pub quadrants: Vec<QuadrantExplanation>,
}

/// Explain how pixel (x, y) of `grid` is expanded.
pub fn explain_pixel<M: Metric>(
    grid: &Grid<M::Pixel>,
    x: usize,
    y: usize,
    metric: &M,
) -> Result<PixelExplanation, ExplainError> {
    let (width, height) = grid.dimensions();
    if x >= width || y >= height {
        return Err(ExplainError::OutOfBounds { x, y, width, height });
    }

    let neighborhood = Neighborhood::gather(grid, x, y);
    let hex = |p: M::Pixel| metric.resolve(p).to_rgb().to_hex();

    let quadrants = Quadrant::ALL
        .into_iter()
        .map(|quadrant| {
            let w = neighborhood.permuted(quadrant);
            let pattern = classify(&w, metric);
            let subpixels = Corner::ALL
                .into_iter()
                .zip(quadrant.offsets())
                .map(|(corner, (dx, dy))| {
                    let outcome = corner.table().evaluate(pattern, &w.0, metric);
                    SubpixelExplanation {
                        rule: corner.name(),
                        dx,
                        dy,
                        row: outcome.row,
                        blend: outcome.blend.to_string(),
                        color: outcome.color.to_rgb().to_hex(),
                    }
                })
                .collect();
            QuadrantExplanation { quadrant: quadrant.name(), pattern: pattern.to_string(), subpixels }
        })
        .collect();

    Ok(PixelExplanation { x, y, neighborhood: neighborhood.0.iter().map(|&p| hex(p)).collect(), quadrants })
}

/// Format an explanation as human-readable text
pub fn format_pixel_explanation(exp: &PixelExplanation) -> String {
    let mut output = String::new();

    output.push_str(&format!("Pixel: ({}, {})\n", exp.x, exp.y));
    output.push('\n');

    output.push_str("NEIGHBORHOOD\n");
    output.push_str("------------\n");
    for row in exp.neighborhood.chunks(3) {
        output.push_str(&format!("  {}\n", row.join(" ")));
    }

    for q in &exp.quadrants {
        output.push('\n');
        let title = format!("{} quadrant, pattern {}", q.quadrant.to_uppercase(), q.pattern);
        output.push_str(&format!("{}\n{}\n", title, "-".repeat(title.len())));
        for s in &q.subpixels {
            let row = s.row.map_or_else(|| "fallback".to_string(), |r| format!("row {}", r));
            output.push_str(&format!(
                "  ({}, {}) {:12} {:8} {:28} {}\n",
                s.dx, s.dy, s.rule, row, s.blend, s.color
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{pack, PackedColor};
    use crate::hqx::hq4x;
    use crate::metric::YuvThreshold;

    fn center_differs() -> Grid<PackedColor> {
        let r = pack(200, 40, 40);
        let b = pack(20, 40, 160);
        Grid::from_rows(vec![vec![b, b, b], vec![b, r, b], vec![b, b, r]]).unwrap()
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = center_differs();
        let err = explain_pixel(&grid, 3, 0, &YuvThreshold::default()).unwrap_err();
        assert_eq!(err, ExplainError::OutOfBounds { x: 3, y: 0, width: 3, height: 3 });
    }

    #[test]
    fn test_neighborhood_and_patterns() {
        let exp = explain_pixel(&center_differs(), 1, 1, &YuvThreshold::default()).unwrap();
        assert_eq!(exp.neighborhood.len(), 9);
        assert_eq!(exp.neighborhood[4], "#C82828");
        assert_eq!(exp.neighborhood[0], "#1428A0");

        let patterns: Vec<&str> = exp.quadrants.iter().map(|q| q.pattern.as_str()).collect();
        // Neighbor 8 matches the center; mirrored, it lands on bits 5, 2 and 0.
        assert_eq!(patterns, vec!["0b01111111", "0b11011111", "0b11111011", "0b11111110"]);
    }

    #[test]
    fn test_subpixels_match_filter_output() {
        let grid = center_differs();
        let out = hq4x(&grid);
        let exp = explain_pixel(&grid, 1, 1, &YuvThreshold::default()).unwrap();

        let mut seen = 0;
        for q in &exp.quadrants {
            assert_eq!(q.subpixels.len(), 4);
            for s in &q.subpixels {
                let expected = out.get(4 + s.dx, 4 + s.dy).map(|c| c.to_rgb().to_hex());
                assert_eq!(Some(s.color.clone()), expected, "{} ({}, {})", q.quadrant, s.dx, s.dy);
                seen += 1;
            }
        }
        assert_eq!(seen, 16);
    }

    #[test]
    fn test_json_output() {
        let exp = explain_pixel(&center_differs(), 0, 0, &YuvThreshold::default()).unwrap();
        let json = serde_json::to_value(&exp).unwrap();
        assert_eq!(json["x"], 0);
        assert_eq!(json["quadrants"].as_array().map(Vec::len), Some(4));
        assert_eq!(json["quadrants"][0]["quadrant"], "top-left");
        assert_eq!(json["quadrants"][0]["subpixels"][0]["rule"], "top-left");
    }

    #[test]
    fn test_uniform_pixel_uses_fallbacks() {
        let grid = Grid::filled(2, 2, pack(9, 9, 9)).unwrap();
        let exp = explain_pixel(&grid, 0, 0, &YuvThreshold::default()).unwrap();
        let top_left = &exp.quadrants[0];
        assert_eq!(top_left.pattern, "0b00000000");
        assert_eq!(top_left.subpixels[0].row, None);
        assert_eq!(top_left.subpixels[3].row, Some(4));
    }

    #[test]
    fn test_text_format() {
        let exp = explain_pixel(&center_differs(), 1, 1, &YuvThreshold::default()).unwrap();
        let text = format_pixel_explanation(&exp);
        assert!(text.starts_with("Pixel: (1, 1)\n"));
        assert!(text.contains("NEIGHBORHOOD"));
        assert!(text.contains("TOP-LEFT quadrant, pattern 0b01111111"));
        assert!(text.contains("#C82828"));
    }
}

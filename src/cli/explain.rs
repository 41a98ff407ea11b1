//! Explain command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::HqConfig;
use crate::explain::{explain_pixel, format_pixel_explanation};
use crate::output::load_png;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the explain command
pub fn run_explain(input: &Path, x: usize, y: usize, json: bool, config: &HqConfig) -> ExitCode {
    let grid = match load_png(input) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let explanation = match explain_pixel(&grid, x, y, &config.filter.threshold()) {
        Ok(explanation) => explanation,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    if json {
        match serde_json::to_string_pretty(&explanation) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: Failed to serialize explanation: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        print!("{}", format_pixel_explanation(&explanation));
    }

    ExitCode::from(EXIT_SUCCESS)
}

//! Screen command implementation (ZX Spectrum screen dumps)

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::config::HqConfig;
use crate::hqx::SCALE;
use crate::output::{generate_output_path, grid_to_image, save_png, scale_nearest};
use crate::palettes::{self, filter_indexed};
use crate::screen::ZxScreen;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the screen command
pub fn run_screen(
    input: &Path,
    output: Option<&Path>,
    palette_name: &str,
    nearest: bool,
    config: &HqConfig,
) -> ExitCode {
    let bytes = match fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let screen = match ZxScreen::from_bytes(&bytes) {
        Ok(screen) => screen,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let palette = match palettes::builtin(palette_name) {
        Ok(palette) => palette,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let indices = screen.to_index_grid();
    let colors = if nearest {
        palette.to_packed_grid(&indices)
    } else {
        filter_indexed(&indices, &palette, config.filter.options())
    };
    let colors = match colors {
        Ok(colors) => colors,
        Err(e) => {
            eprintln!("Error: Palette '{}' cannot show this screen: {}", palette_name, e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let image = match grid_to_image(&colors) {
        Ok(image) if nearest => scale_nearest(image, SCALE as u32),
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let out = generate_output_path(input, output, config.output.dir.as_deref(), &config.output.suffix, false);
    if let Err(e) = save_png(&image, &out) {
        eprintln!("Error: Cannot write '{}': {}", out.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", out.display());
    ExitCode::from(EXIT_SUCCESS)
}

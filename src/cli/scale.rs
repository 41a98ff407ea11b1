//! Scale command implementation

use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::HqConfig;
use crate::hqx::Hq4x;
use crate::metric::YuvThreshold;
use crate::output::{generate_output_path, grid_to_image, load_png, save_png, OutputError};

use super::{find_png_files, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Expand directory arguments into the PNG files they contain.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_png_files(input);
            if found.is_empty() {
                return Err(format!("No PNG files found in '{}'", input.display()));
            }
            files.extend(found);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            return Err(format!("Input file '{}' not found", input.display()));
        }
    }
    Ok(files)
}

/// Execute the scale command
pub fn run_scale(inputs: &[PathBuf], output: Option<&Path>, config: &HqConfig) -> ExitCode {
    let files = match collect_inputs(inputs) {
        Ok(files) => files,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let filter = Hq4x::with_options(config.filter.threshold(), config.filter.options());
    let multiple = files.len() > 1;
    let mut exit = EXIT_SUCCESS;

    for input in &files {
        let out = generate_output_path(
            input,
            output,
            config.output.dir.as_deref(),
            &config.output.suffix,
            multiple,
        );
        match scale_file(&filter, input, &out) {
            Ok(()) => println!("Saved: {}", out.display()),
            Err(Failure::Load(e)) => {
                eprintln!("Error: Cannot read '{}': {}", input.display(), e);
                exit = exit.max(EXIT_INVALID_ARGS);
            }
            Err(Failure::Save(e)) => {
                eprintln!("Error: Cannot write '{}': {}", out.display(), e);
                exit = exit.max(EXIT_ERROR);
            }
        }
    }

    ExitCode::from(exit)
}

enum Failure {
    Load(OutputError),
    Save(OutputError),
}

fn scale_file(filter: &Hq4x<YuvThreshold>, input: &Path, out: &Path) -> Result<(), Failure> {
    let grid = load_png(input).map_err(Failure::Load)?;
    let scaled = filter.filter(&grid);
    info!("{}: {}x{} -> {}x{}", input.display(), grid.width(), grid.height(), scaled.width(), scaled.height());
    let image = grid_to_image(&scaled).map_err(Failure::Save)?;
    save_png(&image, out).map_err(Failure::Save)
}

//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod explain;
mod palettes;
mod scale;
mod screen;

use clap::{ArgAction, Args, Parser, Subcommand};
use flexi_logger::{Logger, LoggerHandle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::config::{self, CliOverrides, HqConfig};

pub use palettes::PaletteAction;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Check if a path has a `.png` extension (any case).
pub fn is_png_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Find all PNG files in a directory (recursively), sorted.
pub fn find_png_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*", glob::Pattern::escape(&dir.display().to_string()));
    let mut files: Vec<PathBuf> = match glob(&pattern) {
        Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_file() && is_png_file(p)).collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

/// hqscale - hq4x pixel art magnification
#[derive(Parser)]
#[command(name = "hqscale")]
#[command(about = "hqscale - Magnify pixel art 4x with the hq4x filter")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of searching for hqscale.toml
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Difference thresholds, overriding `[filter]` in hqscale.toml
#[derive(Args, Debug, Default, Clone)]
pub struct ThresholdArgs {
    /// Luma threshold (0-4095, default 768)
    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=4095))]
    pub luma_threshold: Option<u16>,

    /// Blue-difference threshold (0-1023, default 28)
    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=1023))]
    pub chroma_u_threshold: Option<u16>,

    /// Red-difference threshold (0-1023, default 24)
    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=1023))]
    pub chroma_v_threshold: Option<u16>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Magnify PNG images 4x
    Scale {
        /// PNG files, or directories searched recursively for PNG files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file or directory.
        /// If omitted: {input}{suffix}.png
        /// If file (single input): output.png
        /// If file (multiple): output_{input}.png
        /// If directory (ends with /): dir/{input}{suffix}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for outputs when -o is not given (overrides [output] dir)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Filter on a single thread
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Decode a ZX Spectrum screen dump (.scr) and magnify it
    Screen {
        /// Screen dump, at least 6912 bytes
        input: PathBuf,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for outputs when -o is not given (overrides [output] dir)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Palette for the 16 screen colors
        #[arg(long, default_value = "zx-spectrum")]
        palette: String,

        /// Plain 4x nearest-neighbor scaling instead of hq4x
        #[arg(long)]
        nearest: bool,

        /// Filter on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Show how one source pixel is expanded
    Explain {
        /// Input PNG
        input: PathBuf,

        /// Pixel column
        #[arg(long)]
        x: usize,

        /// Pixel row
        #[arg(long)]
        y: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// List and inspect built-in palettes
    Palettes {
        #[command(subcommand)]
        action: PaletteAction,
    },
}

/// Start logging to stderr at a level picked by `-v` occurrences.
///
/// The returned handle must be kept alive for the program's lifetime.
fn init_logging(verbosity: u8) -> Option<LoggerHandle> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    match Logger::try_with_env_or_str(level).and_then(|logger| logger.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    }
}

/// Load the effective configuration, reporting errors the CLI way.
fn load_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<HqConfig, ExitCode> {
    let mut config = config::load_config(path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    config::merge_cli_overrides(&mut config, overrides);
    Ok(config)
}

fn overrides(thresholds: &ThresholdArgs, sequential: bool, out_dir: Option<PathBuf>) -> CliOverrides {
    CliOverrides {
        luma_threshold: thresholds.luma_threshold,
        chroma_u_threshold: thresholds.chroma_u_threshold,
        chroma_v_threshold: thresholds.chroma_v_threshold,
        parallel: sequential.then_some(false),
        out_dir,
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Scale { inputs, output, out_dir, sequential, thresholds } => {
            match load_config(config_path, &overrides(&thresholds, sequential, out_dir)) {
                Ok(config) => scale::run_scale(&inputs, output.as_deref(), &config),
                Err(code) => code,
            }
        }
        Commands::Screen { input, output, out_dir, palette, nearest, sequential } => {
            match load_config(config_path, &overrides(&ThresholdArgs::default(), sequential, out_dir)) {
                Ok(config) => screen::run_screen(&input, output.as_deref(), &palette, nearest, &config),
                Err(code) => code,
            }
        }
        Commands::Explain { input, x, y, json, thresholds } => {
            match load_config(config_path, &overrides(&thresholds, false, None)) {
                Ok(config) => explain::run_explain(&input, x, y, json, &config),
                Err(code) => code,
            }
        }
        Commands::Palettes { action } => palettes::run_palettes(action),
    }
}

//! hqscale - Command-line tool for magnifying pixel art 4x with hq4x

use std::process::ExitCode;

use hqscale::cli;

fn main() -> ExitCode {
    cli::run()
}

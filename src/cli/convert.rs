//! Convert command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS, USAGE};
use crate::config::{load_settings, Configuration};
use crate::pipeline::{convert, ConvertError};

/// Execute a conversion from the raw positional values
pub fn run_convert(args: &[String], config_path: Option<&Path>) -> ExitCode {
    let config = match Configuration::resolve(args) {
        Ok(c) => c,
        Err(e) => {
            log::debug!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    log::debug!(
        "converting {} with {} colour bits, {} format, {}-bit palette",
        config.image_path.display(),
        config.colour_depth.bits(),
        config.format,
        config.palette_depth.bits()
    );

    let report = match convert(&config, &settings) {
        Ok(r) => r,
        Err(e @ ConvertError::Output(_)) => {
            eprintln!("Error: {}", e);
            eprintln!("Artifacts written before the failure were left in place.");
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e @ ConvertError::UnsupportedFormat(_)) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", USAGE);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    println!(
        "Converted: {} ({}x{}, {} colours, {}-bit palette)",
        config.image_path.display(),
        report.width,
        report.height,
        report.palette_size,
        config.palette_depth.bits()
    );
    println!("  Image:   {}", report.paths.index.display());
    println!("  Palette: {}", report.paths.palette.display());
    if report.preview_written {
        println!("  Preview: {}", report.paths.preview.display());
    }

    ExitCode::from(EXIT_SUCCESS)
}

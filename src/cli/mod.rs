//! Command-line interface implementation
//!
//! Parses the command line with clap and dispatches to the conversion
//! command. The positional values are handed to the configuration resolver
//! unparsed so that argument counting and bit-count normalization live in one
//! place.

mod convert;

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Usage text printed when the positional arguments are wrong
pub const USAGE: &str = "\
Convert image files to FPGA memory maps in $readmemh or Xilinx COE format.
usage: img2fmem image_file colour_bits output_format [palette_bits]
         image_file: source image file name
         colour_bits: number of colour index bits per pixel: 4, 6, or 8
         output_format: mem or coe
         palette_bits: number of palette bits: 12 (default) or 24

Example: img2fmem test.png 8 mem 24";

/// img2fmem - Convert images to palette-indexed FPGA memory maps
#[derive(Parser, Debug)]
#[command(name = "img2fmem")]
#[command(about = "Convert image files to FPGA memory maps in $readmemh or Xilinx COE format")]
#[command(version)]
pub struct Cli {
    /// image_file colour_bits output_format [palette_bits]
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    pub args: Vec<String>,

    /// Settings file (img2fmem.toml) controlling output directory, header and preview
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

/// Parse the process arguments and run.
pub fn run() -> ExitCode {
    run_from(std::env::args_os())
}

/// Parse `args` (including the program name) and run.
pub fn run_from<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are reported through the error path too
            return if e.use_stderr() {
                ExitCode::from(EXIT_INVALID_ARGS)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };

    // Tests may run several invocations in one process, so ignore re-init
    let _ = env_logger::Builder::new().filter_level(cli.verbose.log_level_filter()).try_init();

    convert::run_convert(&cli.args, cli.config.as_deref())
}

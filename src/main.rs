//! img2fmem - Command-line tool for converting images to FPGA memory maps

use std::process::ExitCode;

use img2fmem::cli;

fn main() -> ExitCode {
    cli::run()
}

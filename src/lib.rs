//! img2fmem - Library for converting images to FPGA memory maps
//!
//! This library provides functionality to:
//! - Resolve the run configuration from positional arguments
//! - Quantize an image to a 16, 64 or 256 colour adaptive palette
//! - Encode the pixel indices and packed palette as `$readmemh` or COE files
//! - Save a quantized preview image

pub mod cli;
pub mod config;
pub mod encode;
pub mod output;
pub mod pipeline;
pub mod pixels;
pub mod precision;
pub mod quantize;

//! Memory initialization file encoders
//!
//! Two text dialects are supported:
//!
//! - `mem`: a `$readmemh` hex dump, one word per line after a `//` header
//! - `coe`: a Xilinx coefficient file with a `;` header, a radix line and a
//!   comma-separated vector terminated by `;`
//!
//! The pixel index stream is written as 2-digit hex words. Palette entries are
//! packed into 12-bit (3 digit) or 24-bit (6 digit) words.

use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ColourDepth, PaletteDepth};
use crate::pixels::Rgb;

/// Error encoding a memory initialization file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The output format token is neither `mem` nor `coe`
    #[error("output_format should be mem or coe, got '{0}'")]
    UnsupportedFormat(String),
}

/// Text dialect of a memory initialization file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `$readmemh` hex dump
    Mem,
    /// Xilinx coefficient file
    Coe,
}

impl FromStr for OutputFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mem" => Ok(OutputFormat::Mem),
            "coe" => Ok(OutputFormat::Coe),
            other => Err(EncodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl OutputFormat {
    /// File extension, identical to the format token.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Mem => "mem",
            OutputFormat::Coe => "coe",
        }
    }

    /// Line comment marker of the dialect.
    pub fn comment_prefix(self) -> &'static str {
        match self {
            OutputFormat::Mem => "//",
            OutputFormat::Coe => ";",
        }
    }

    /// Render a complete file from pre-formatted hex words.
    ///
    /// `radix` is only written by `coe`.
    pub fn render(self, header: &str, radix: u32, words: &[String]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", self.comment_prefix(), header);

        match self {
            OutputFormat::Mem => {
                for word in words {
                    out.push_str(word);
                    out.push('\n');
                }
            }
            OutputFormat::Coe => {
                let _ = writeln!(out, "memory_initialization_radix={};", radix);
                out.push_str("memory_initialization_vector=\n");
                out.push_str(&words.join(",\n"));
                out.push_str(";\n");
            }
        }

        out
    }
}

/// Pack a palette entry into a memory word.
///
/// 24-bit words are `r << 16 | g << 8 | b`. 12-bit words are
/// `r * 256 + g * 16 + b`, which expects channels already reduced to 0-15.
pub fn pack_palette_entry(colour: Rgb, depth: PaletteDepth) -> u32 {
    let (r, g, b) = (colour.r as u32, colour.g as u32, colour.b as u32);
    match depth {
        PaletteDepth::Bits24 => r * (1 << 16) + g * (1 << 8) + b,
        PaletteDepth::Bits12 => r * (1 << 8) + g * (1 << 4) + b,
    }
}

/// Encode the per-pixel index stream.
pub fn encode_index_stream(
    indices: &[u8],
    format: &str,
    colour_depth: ColourDepth,
    header: &str,
) -> Result<String, EncodeError> {
    let format: OutputFormat = format.parse()?;
    let words: Vec<String> = indices.iter().map(|i| format!("{:02X}", i)).collect();
    Ok(format.render(header, colour_depth.bits(), &words))
}

/// Encode the palette as packed words.
pub fn encode_palette_stream(
    palette: &[Rgb],
    format: &str,
    depth: PaletteDepth,
    header: &str,
) -> Result<String, EncodeError> {
    let format: OutputFormat = format.parse()?;
    let width = depth.hex_digits();
    let words: Vec<String> = palette
        .iter()
        .map(|c| format!("{:0width$X}", pack_palette_entry(*c, depth), width = width))
        .collect();
    Ok(format.render(header, depth.bits(), &words))
}

//! Run configuration for img2fmem
//!
//! The [`Configuration`] is built once from the positional command-line values
//! and threaded through every pipeline stage. Out-of-range colour and palette
//! bit counts are coerced to the defaults rather than rejected.
//!
//! An optional `img2fmem.toml` settings file (see [`schema`] and [`loader`])
//! controls where artifacts go and what the attribution header says.

pub mod loader;
pub mod schema;

pub use loader::{load_settings, SettingsError};
pub use schema::{OutputSettings, Settings};

use std::path::PathBuf;
use thiserror::Error;

/// Error resolving the run configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Wrong positional argument count or a non-numeric bit count
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Number of colour index bits per pixel.
///
/// Determines the palette size: 4 bits address 16 entries, 6 bits 64 and
/// 8 bits 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColourDepth {
    Four,
    Six,
    #[default]
    Eight,
}

impl ColourDepth {
    /// Normalize a requested bit count. Anything other than 4 or 6 is 8.
    pub fn from_bits(bits: i64) -> Self {
        match bits {
            4 => ColourDepth::Four,
            6 => ColourDepth::Six,
            _ => ColourDepth::Eight,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            ColourDepth::Four => 4,
            ColourDepth::Six => 6,
            ColourDepth::Eight => 8,
        }
    }

    pub fn palette_size(self) -> usize {
        1 << self.bits()
    }
}

/// Width of a packed palette word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteDepth {
    /// 12-bit words; channels are reduced to 4 bits before quantization
    #[default]
    Bits12,
    /// 24-bit words, 8 bits per channel
    Bits24,
}

impl PaletteDepth {
    /// Normalize a requested bit count. Only an exact 24 selects 24-bit words.
    pub fn from_bits(bits: i64) -> Self {
        if bits == 24 {
            PaletteDepth::Bits24
        } else {
            PaletteDepth::Bits12
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            PaletteDepth::Bits12 => 12,
            PaletteDepth::Bits24 => 24,
        }
    }

    /// Hex digits needed to print one packed word.
    pub fn hex_digits(self) -> usize {
        match self {
            PaletteDepth::Bits12 => 3,
            PaletteDepth::Bits24 => 6,
        }
    }

    /// Whether channels are truncated to 4 significant bits before quantization.
    pub fn reduces_precision(self) -> bool {
        self == PaletteDepth::Bits12
    }
}

/// Immutable configuration for a single conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Source image
    pub image_path: PathBuf,
    /// Colour index bits per pixel
    pub colour_depth: ColourDepth,
    /// Output format token (`mem` or `coe`), validated by the encoders
    pub format: String,
    /// Packed palette word width
    pub palette_depth: PaletteDepth,
}

impl Configuration {
    /// Build a configuration from positional values:
    /// `image_file colour_bits output_format [palette_bits]`.
    pub fn resolve<S: AsRef<str>>(positional: &[S]) -> Result<Self, ConfigError> {
        if positional.len() != 3 && positional.len() != 4 {
            return Err(ConfigError::InvalidArguments(format!(
                "expected 3 or 4 arguments, got {}",
                positional.len()
            )));
        }

        let image_path = PathBuf::from(positional[0].as_ref());
        let colour_depth = ColourDepth::from_bits(parse_bits("colour_bits", positional[1].as_ref())?);
        let format = positional[2].as_ref().to_string();
        let palette_depth = match positional.get(3) {
            Some(bits) => PaletteDepth::from_bits(parse_bits("palette_bits", bits.as_ref())?),
            None => PaletteDepth::default(),
        };

        Ok(Self { image_path, colour_depth, format, palette_depth })
    }

    pub fn palette_size(&self) -> usize {
        self.colour_depth.palette_size()
    }
}

fn parse_bits(name: &str, value: &str) -> Result<i64, ConfigError> {
    value.trim().parse::<i64>().map_err(|_| {
        ConfigError::InvalidArguments(format!("{} must be an integer, got '{}'", name, value))
    })
}

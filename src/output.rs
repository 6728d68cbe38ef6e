//! Artifact naming and file output
//!
//! Each run writes three artifacts next to the input image (or into the
//! configured output directory):
//!
//! | Artifact | Path |
//! |----------|------|
//! | Index stream | `{base}.{fmt}` |
//! | Palette stream | `{base}_palette.{fmt}` |
//! | Preview | `{base}_preview.png` |
//!
//! `base` is the input path with its final extension removed.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use crate::encode::OutputFormat;
use crate::quantize::IndexedImage;

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// PNG encoding error
    Png(png::EncodingError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Png(e) => write!(f, "PNG error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Png(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<png::EncodingError> for OutputError {
    fn from(e: png::EncodingError) -> Self {
        OutputError::Png(e)
    }
}

/// Paths of the three artifacts produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub index: PathBuf,
    pub palette: PathBuf,
    pub preview: PathBuf,
}

/// Strip the final extension from `input`, keeping its directory.
///
/// With `output_dir`, only the file stem is kept and placed in that directory.
pub fn base_name(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stripped = input.with_extension("");
    match output_dir {
        Some(dir) => match stripped.file_name() {
            Some(name) => dir.join(name),
            None => dir.join("output"),
        },
        None => stripped,
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Generate the artifact paths for an input image.
///
/// # Arguments
///
/// * `input` - The source image path
/// * `format` - The output dialect, which also names the text artifacts' extension
/// * `output_dir` - Directory override from settings, if any
pub fn artifact_paths(input: &Path, format: OutputFormat, output_dir: Option<&Path>) -> ArtifactPaths {
    let base = base_name(input, output_dir);
    let extension = format.extension();
    ArtifactPaths {
        index: with_suffix(&base, &format!(".{}", extension)),
        palette: with_suffix(&base, &format!("_palette.{}", extension)),
        preview: with_suffix(&base, "_preview.png"),
    }
}

fn create_parent_dirs(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write an encoded text artifact, creating parent directories as needed.
pub fn write_text_artifact(path: &Path, contents: &str) -> Result<(), OutputError> {
    create_parent_dirs(path)?;
    std::fs::write(path, contents)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Save a quantized image as an indexed-colour PNG.
///
/// The PLTE chunk holds every palette entry and each pixel is one index byte.
pub fn save_indexed_png(image: &IndexedImage, path: &Path) -> Result<(), OutputError> {
    create_parent_dirs(path)?;

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width, image.height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);

    let plte: Vec<u8> = image.palette.entries().iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    encoder.set_palette(plte);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.indices)?;
    writer.finish()?;

    log::info!("wrote {}", path.display());
    Ok(())
}

//! Image to memory map conversion pipeline
//!
//! A run loads the image once, then works on two independently owned copies:
//! one reduced and quantized for the memory files, one for the preview. Stages
//! run strictly in order and the first failure aborts the run. Artifacts
//! written before the failure are left in place.

use std::path::Path;
use thiserror::Error;

use crate::config::{Configuration, Settings};
use crate::encode::{encode_index_stream, encode_palette_stream, EncodeError, OutputFormat};
use crate::output::{artifact_paths, save_indexed_png, write_text_artifact, ArtifactPaths, OutputError};
use crate::pixels::{load_image, PixelError, PixelGrid};
use crate::precision::{reduce_for_preview, reduce_for_quantization};
use crate::quantize::{quantize, IndexedImage, QuantizeError};

/// Error from a conversion run
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] PixelError),
    #[error(transparent)]
    UnsupportedFormat(#[from] EncodeError),
    #[error(transparent)]
    Quantize(#[from] QuantizeError),
    #[error("Failed to write output: {0}")]
    Output(#[from] OutputError),
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub width: u32,
    pub height: u32,
    pub palette_size: usize,
    pub paths: ArtifactPaths,
    /// False when the preview was disabled in settings
    pub preview_written: bool,
}

/// Convert the configured image into index, palette and preview artifacts.
pub fn convert(config: &Configuration, settings: &Settings) -> Result<ConversionReport, ConvertError> {
    let source = load_image(&config.image_path)?;
    let palette_size = config.palette_size();
    let header = settings.output.header.as_str();

    let mut working = source.clone();
    let mut preview = source;

    reduce_for_quantization(&mut working, config.palette_depth);
    let indexed = quantize(&working, palette_size)?;

    let format: OutputFormat = config.format.parse()?;
    let paths = artifact_paths(&config.image_path, format, settings.output.dir.as_deref());

    let index_text =
        encode_index_stream(&indexed.indices, &config.format, config.colour_depth, header)?;
    write_text_artifact(&paths.index, &index_text)?;

    let palette_text =
        encode_palette_stream(indexed.palette.entries(), &config.format, config.palette_depth, header)?;
    write_text_artifact(&paths.palette, &palette_text)?;

    if settings.output.preview {
        reduce_for_preview(&mut preview, config.palette_depth);
        render_preview(&preview, palette_size, &paths.preview)?;
    } else {
        log::debug!("preview disabled, skipping {}", paths.preview.display());
    }

    Ok(ConversionReport {
        width: indexed.width,
        height: indexed.height,
        palette_size,
        paths,
        preview_written: settings.output.preview,
    })
}

/// Quantize `grid` on its own and save the result as a viewable PNG.
///
/// The preview palette is independent of the one written to the memory files.
pub fn render_preview(
    grid: &PixelGrid,
    palette_size: usize,
    path: &Path,
) -> Result<IndexedImage, ConvertError> {
    let indexed = quantize(grid, palette_size)?;
    save_indexed_png(&indexed, path)?;
    Ok(indexed)
}

//! Pixel grids and image loading
//!
//! Decoding is delegated to the `image` crate. Whatever the source colour
//! type, the loaded grid is plain RGB: alpha is dropped and grayscale is
//! expanded.

use image::{Rgb as ImageRgb, RgbImage};
use std::path::Path;
use thiserror::Error;

/// Error loading a source image
#[derive(Debug, Error)]
pub enum PixelError {
    /// The codec could not open or parse the file
    #[error("Failed to open image '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// An RGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_pixel(pixel: ImageRgb<u8>) -> Self {
        Self { r: pixel[0], g: pixel[1], b: pixel[2] }
    }

    /// Apply `f` to each channel.
    pub fn map(self, f: impl Fn(u8) -> u8) -> Self {
        Self { r: f(self.r), g: f(self.g), b: f(self.b) }
    }

    /// Squared Euclidean distance in RGB space.
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// A width x height grid of RGB pixels, row-major, origin top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelGrid {
    /// Build a grid from row-major pixels.
    ///
    /// Returns `None` if `pixels.len()` is not `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Option<Self> {
        if pixels.len() as u64 != width as u64 * height as u64 {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    /// A grid filled with one colour.
    pub fn filled(width: u32, height: u32, colour: Rgb) -> Self {
        Self { width, height, pixels: vec![colour; width as usize * height as usize] }
    }

    pub fn from_image(img: &RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| Rgb::from_pixel(*p)).collect();
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Rewrite every channel of every pixel in place.
    pub fn map_channels(&mut self, f: impl Fn(u8) -> u8) {
        for pixel in &mut self.pixels {
            *pixel = pixel.map(&f);
        }
    }
}

/// Decode an image file into an RGB pixel grid.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<PixelGrid, PixelError> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|source| PixelError::Decode { path: path.display().to_string(), source })?;
    let grid = PixelGrid::from_image(&img.to_rgb8());
    log::debug!("loaded {} ({}x{})", path.display(), grid.width(), grid.height());
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(PixelGrid::new(2, 2, vec![Rgb::default(); 3]).is_none());
        assert!(PixelGrid::new(2, 2, vec![Rgb::default(); 4]).is_some());
        assert!(PixelGrid::new(0, 5, Vec::new()).is_some());
    }

    #[test]
    fn test_from_image_is_row_major() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, ImageRgb([1, 0, 0]));
        img.put_pixel(0, 1, ImageRgb([2, 0, 0]));
        let grid = PixelGrid::from_image(&img);
        assert_eq!(grid.pixels()[1], Rgb::new(1, 0, 0));
        assert_eq!(grid.pixels()[2], Rgb::new(2, 0, 0));
    }

    #[test]
    fn test_map_channels() {
        let mut grid = PixelGrid::filled(2, 1, Rgb::new(255, 128, 17));
        grid.map_channels(|c| c / 16);
        assert_eq!(grid.pixels(), &[Rgb::new(15, 8, 1), Rgb::new(15, 8, 1)]);
    }

    #[test]
    fn test_distance_sq() {
        assert_eq!(Rgb::new(0, 0, 0).distance_sq(Rgb::new(0, 0, 0)), 0);
        assert_eq!(Rgb::new(0, 0, 0).distance_sq(Rgb::new(255, 255, 255)), 3 * 255 * 255);
        assert_eq!(Rgb::new(10, 0, 0).distance_sq(Rgb::new(0, 3, 4)), 125);
    }

    #[test]
    fn test_load_image_drops_alpha() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("alpha.png");
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 128]));
        img.save(&path).unwrap();

        let grid = load_image(&path).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 1));
        assert_eq!(grid.pixels(), &[Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);
    }

    #[test]
    fn test_load_image_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = load_image(temp.path().join("nope.png"));
        assert!(matches!(result, Err(PixelError::Decode { .. })));
    }
}

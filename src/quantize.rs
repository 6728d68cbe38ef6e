//! Adaptive palette quantization using the median cut algorithm.
//!
//! The pixel grid is reduced to a histogram of distinct colours. If the
//! colours already fit, they become the palette unchanged. Otherwise boxes of
//! colours are split along their widest channel until there are enough boxes,
//! and each box contributes its pixel-weighted mean colour.
//!
//! The palette is always padded to the requested size, and every pixel is
//! mapped to its nearest entry. Results are deterministic for a given input.

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::pixels::{PixelGrid, Rgb};

/// Largest palette addressable by an 8-bit index
pub const MAX_PALETTE_SIZE: usize = 256;

/// Error from palette quantization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    #[error("palette size must be between 1 and {MAX_PALETTE_SIZE}, got {0}")]
    PaletteSize(usize),
}

/// An ordered palette. An entry's position is its index value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Rgb>,
}

impl Palette {
    /// Extend `colours` to exactly `size` entries by repeating them in order.
    ///
    /// An empty colour list pads with black.
    fn padded(mut colours: Vec<Rgb>, size: usize) -> Self {
        if colours.is_empty() {
            colours.push(Rgb::default());
        }
        let produced = colours.len();
        for i in produced..size {
            colours.push(colours[i % produced]);
        }
        colours.truncate(size);
        Self { entries: colours }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    /// Index of the closest entry; ties go to the lowest index.
    pub fn nearest(&self, colour: Rgb) -> usize {
        let mut best = 0;
        let mut best_distance = u32::MAX;
        for (i, entry) in self.entries.iter().enumerate() {
            let d = entry.distance_sq(colour);
            if d < best_distance {
                best = i;
                best_distance = d;
                if d == 0 {
                    break;
                }
            }
        }
        best
    }
}

/// A quantized image: a palette plus one index per pixel in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    pub indices: Vec<u8>,
}

/// Reduce `grid` to a palette of exactly `palette_size` colours.
pub fn quantize(grid: &PixelGrid, palette_size: usize) -> Result<IndexedImage, QuantizeError> {
    if palette_size == 0 || palette_size > MAX_PALETTE_SIZE {
        return Err(QuantizeError::PaletteSize(palette_size));
    }

    let mut histogram: BTreeMap<Rgb, u32> = BTreeMap::new();
    for pixel in grid.pixels() {
        *histogram.entry(*pixel).or_insert(0) += 1;
    }
    log::debug!("{} distinct colours, palette size {}", histogram.len(), palette_size);

    let distinct: Vec<Rgb> = histogram.keys().copied().collect();
    let palette = Palette::padded(median_cut(histogram, palette_size), palette_size);

    // Each distinct colour is matched once
    let lookup: HashMap<Rgb, u8> =
        distinct.into_iter().map(|c| (c, palette.nearest(c) as u8)).collect();
    let indices = grid.pixels().iter().map(|p| lookup[p]).collect();

    Ok(IndexedImage { width: grid.width(), height: grid.height(), palette, indices })
}

/// A box of colours for median cut.
#[derive(Debug, Clone)]
struct ColorBox {
    colors: Vec<(Rgb, u32)>, // Color and count
}

#[derive(Debug, Clone, Copy)]
enum Channel {
    Red,
    Green,
    Blue,
}

impl ColorBox {
    fn new(colors: Vec<(Rgb, u32)>) -> Self {
        Self { colors }
    }

    /// Find which channel has the largest range.
    fn widest_channel(&self) -> Channel {
        let (mut min_r, mut max_r) = (255u8, 0u8);
        let (mut min_g, mut max_g) = (255u8, 0u8);
        let (mut min_b, mut max_b) = (255u8, 0u8);

        for (color, _) in &self.colors {
            min_r = min_r.min(color.r);
            max_r = max_r.max(color.r);
            min_g = min_g.min(color.g);
            max_g = max_g.max(color.g);
            min_b = min_b.min(color.b);
            max_b = max_b.max(color.b);
        }

        let range_r = max_r.saturating_sub(min_r);
        let range_g = max_g.saturating_sub(min_g);
        let range_b = max_b.saturating_sub(min_b);

        if range_r >= range_g && range_r >= range_b {
            Channel::Red
        } else if range_g >= range_b {
            Channel::Green
        } else {
            Channel::Blue
        }
    }

    /// Split the box in two at the pixel-weighted median of the widest channel.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let channel = self.widest_channel();

        // Stable sort keeps ties in histogram order
        self.colors.sort_by_key(|(color, _)| match channel {
            Channel::Red => color.r,
            Channel::Green => color.g,
            Channel::Blue => color.b,
        });

        let total = self.pixel_count();
        let mut running = 0u64;
        let mut split_idx = self.colors.len() / 2;

        for (i, (_, count)) in self.colors.iter().enumerate() {
            running += *count as u64;
            if running >= total / 2 {
                split_idx = i + 1;
                break;
            }
        }

        // Never leave a side empty
        split_idx = split_idx.clamp(1, self.colors.len() - 1);

        let right = self.colors.split_off(split_idx);
        (ColorBox::new(self.colors), ColorBox::new(right))
    }

    /// Mean colour of the box, weighted by pixel count.
    fn average_color(&self) -> Rgb {
        let total = self.pixel_count();
        if total == 0 {
            return Rgb::default();
        }

        let weighted = |channel: fn(&Rgb) -> u8| -> u8 {
            let sum: u64 = self.colors.iter().map(|(c, n)| channel(c) as u64 * *n as u64).sum();
            (sum / total) as u8
        };

        Rgb { r: weighted(|c| c.r), g: weighted(|c| c.g), b: weighted(|c| c.b) }
    }

    fn pixel_count(&self) -> u64 {
        self.colors.iter().map(|(_, count)| *count as u64).sum()
    }
}

/// Reduce a colour histogram to at most `max_colors` representative colours.
fn median_cut(histogram: BTreeMap<Rgb, u32>, max_colors: usize) -> Vec<Rgb> {
    if histogram.len() <= max_colors {
        return histogram.into_keys().collect();
    }

    let mut boxes = vec![ColorBox::new(histogram.into_iter().collect())];

    while boxes.len() < max_colors {
        // Split the most populated box that still has more than one colour
        let Some(idx) = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.colors.len() > 1)
            .max_by_key(|(_, b)| b.pixel_count())
            .map(|(i, _)| i)
        else {
            break;
        };

        let (left, right) = boxes.remove(idx).split();
        boxes.push(left);
        boxes.push(right);
    }

    boxes.iter().map(ColorBox::average_color).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelGrid {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.push(Rgb::new((x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) * 3 % 256) as u8));
            }
        }
        PixelGrid::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_palette_always_full_length() {
        let grid = gradient(40, 30);
        for size in [16, 64, 256] {
            let result = quantize(&grid, size).unwrap();
            assert_eq!(result.palette.len(), size);
            assert_eq!(result.indices.len(), 40 * 30);
            assert!(result.indices.iter().all(|&i| (i as usize) < size));
        }
    }

    #[test]
    fn test_few_colours_are_kept_exactly() {
        let pixels = vec![Rgb::new(15, 0, 0), Rgb::new(0, 15, 0), Rgb::new(15, 0, 0), Rgb::new(0, 0, 15)];
        let grid = PixelGrid::new(2, 2, pixels.clone()).unwrap();
        let result = quantize(&grid, 16).unwrap();

        for (pixel, &index) in pixels.iter().zip(&result.indices) {
            assert_eq!(result.palette.entries()[index as usize], *pixel);
        }
        assert_eq!(result.indices[0], result.indices[2]);
    }

    #[test]
    fn test_solid_image() {
        let grid = PixelGrid::filled(2, 1, Rgb::new(15, 0, 0));
        let result = quantize(&grid, 16).unwrap();
        assert_eq!(result.palette.len(), 16);
        assert_eq!(result.indices, vec![0, 0]);
        assert_eq!(result.palette.entries()[0], Rgb::new(15, 0, 0));
    }

    #[test]
    fn test_padding_stays_in_colour_range() {
        let pixels = vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)];
        let grid = PixelGrid::new(2, 1, pixels).unwrap();
        let result = quantize(&grid, 16).unwrap();
        assert!(result.palette.entries().iter().all(|c| c.r <= 15 && c.g <= 15 && c.b <= 15));
    }

    #[test]
    fn test_empty_image_pads_with_black() {
        let grid = PixelGrid::new(0, 0, Vec::new()).unwrap();
        let result = quantize(&grid, 16).unwrap();
        assert_eq!(result.palette.len(), 16);
        assert!(result.palette.entries().iter().all(|&c| c == Rgb::default()));
        assert!(result.indices.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let grid = gradient(64, 64);
        let a = quantize(&grid, 16).unwrap();
        let b = quantize(&grid, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reduces_to_palette_size() {
        let grid = gradient(64, 64);
        let result = quantize(&grid, 16).unwrap();
        // Median cut produces 16 boxes; with many colours none are padded
        let mut distinct: Vec<Rgb> = result.palette.entries().to_vec();
        distinct.sort();
        distinct.dedup();
        assert!(distinct.len() > 1);
        assert!(distinct.len() <= 16);
    }

    #[test]
    fn test_pixels_map_to_nearest_entry() {
        let grid = gradient(32, 32);
        let result = quantize(&grid, 16).unwrap();
        for (pixel, &index) in grid.pixels().iter().zip(&result.indices) {
            let chosen = result.palette.entries()[index as usize].distance_sq(*pixel);
            let best = result.palette.entries().iter().map(|c| c.distance_sq(*pixel)).min().unwrap();
            assert_eq!(chosen, best);
        }
    }

    #[test]
    fn test_invalid_palette_size() {
        let grid = PixelGrid::filled(1, 1, Rgb::default());
        assert_eq!(quantize(&grid, 0), Err(QuantizeError::PaletteSize(0)));
        assert_eq!(quantize(&grid, 257), Err(QuantizeError::PaletteSize(257)));
    }

    #[test]
    fn test_split_never_empties_a_side() {
        let heavy = ColorBox::new(vec![(Rgb::new(0, 0, 0), 1000), (Rgb::new(255, 0, 0), 1)]);
        let (left, right) = heavy.split();
        assert_eq!(left.colors.len(), 1);
        assert_eq!(right.colors.len(), 1);
    }

    #[test]
    fn test_average_color_weighted() {
        let b = ColorBox::new(vec![(Rgb::new(0, 0, 0), 3), (Rgb::new(100, 40, 20), 1)]);
        assert_eq!(b.average_color(), Rgb::new(25, 10, 5));
    }
}

//! Channel precision reduction for 12-bit palettes
//!
//! A 12-bit palette word holds 4 significant bits per channel. The
//! quantization copy is truncated to the 0-15 range so the palette is
//! computed in that reduced space. The preview copy is truncated the same way
//! but re-expanded to 0-240 so it keeps the original brightness range.

use crate::config::PaletteDepth;
use crate::pixels::PixelGrid;

/// Truncate a channel to its top 4 bits, shifted down to 0-15.
pub fn reduce_channel(value: u8) -> u8 {
    value / 16
}

/// Truncate a channel to its top 4 bits, kept in place (0, 16, .., 240).
pub fn quantize_channel(value: u8) -> u8 {
    (value / 16) * 16
}

/// Prepare the quantization copy. No-op for 24-bit palettes.
pub fn reduce_for_quantization(grid: &mut PixelGrid, depth: PaletteDepth) {
    if depth.reduces_precision() {
        grid.map_channels(reduce_channel);
    }
}

/// Prepare the preview copy. No-op for 24-bit palettes.
pub fn reduce_for_preview(grid: &mut PixelGrid, depth: PaletteDepth) {
    if depth.reduces_precision() {
        grid.map_channels(quantize_channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Rgb;

    #[test]
    fn test_reduce_channel() {
        assert_eq!(reduce_channel(0), 0);
        assert_eq!(reduce_channel(15), 0);
        assert_eq!(reduce_channel(16), 1);
        assert_eq!(reduce_channel(128), 8);
        assert_eq!(reduce_channel(255), 15);
    }

    #[test]
    fn test_quantize_channel() {
        assert_eq!(quantize_channel(15), 0);
        assert_eq!(quantize_channel(31), 16);
        assert_eq!(quantize_channel(255), 240);
    }

    #[test]
    fn test_twelve_bit_copies_diverge() {
        let source = PixelGrid::filled(1, 1, Rgb::new(255, 128, 16));

        let mut quantize_copy = source.clone();
        let mut preview_copy = source.clone();
        reduce_for_quantization(&mut quantize_copy, PaletteDepth::Bits12);
        reduce_for_preview(&mut preview_copy, PaletteDepth::Bits12);

        assert_eq!(quantize_copy.pixels(), &[Rgb::new(15, 8, 1)]);
        assert_eq!(preview_copy.pixels(), &[Rgb::new(240, 128, 16)]);
        // The source grid is untouched
        assert_eq!(source.pixels(), &[Rgb::new(255, 128, 16)]);
    }

    #[test]
    fn test_twenty_four_bit_is_untouched() {
        let source = PixelGrid::filled(2, 2, Rgb::new(255, 129, 7));
        let mut quantize_copy = source.clone();
        let mut preview_copy = source.clone();
        reduce_for_quantization(&mut quantize_copy, PaletteDepth::Bits24);
        reduce_for_preview(&mut preview_copy, PaletteDepth::Bits24);
        assert_eq!(quantize_copy, source);
        assert_eq!(preview_copy, source);
    }
}

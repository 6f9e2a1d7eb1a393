use image::{GrayImage, RgbImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::morphology::close;

use crate::config::PixelRect;

/// Crops a pixel rectangle, clamped to the image bounds.
///
/// A rectangle that falls entirely outside the image yields a 0×0 image.
pub fn crop_pixels(img: &GrayImage, rect: &PixelRect) -> GrayImage {
    let (w, h) = img.dimensions();

    let x0 = rect.x.min(w);
    let y0 = rect.y.min(h);
    let rw = rect.width.min(w - x0);
    let rh = rect.height.min(h - y0);

    image::imageops::crop_imm(img, x0, y0, rw, rh).to_image()
}

/// Binarises at the Otsu level: pixels above it become white, the rest black.
pub fn threshold_otsu(img: &GrayImage) -> GrayImage {
    threshold(img, otsu_level(img), ThresholdType::Binary)
}

/// Binarises at the Otsu level with the polarity flipped, for light text on
/// a dark fill.
pub fn threshold_otsu_inverted(img: &GrayImage) -> GrayImage {
    threshold(img, otsu_level(img), ThresholdType::BinaryInverted)
}

/// Binarises at mid-gray.
pub fn threshold_mid(img: &GrayImage) -> GrayImage {
    threshold(img, 127, ThresholdType::Binary)
}

/// Minimum saturation and value (0-255 scale) for a pixel to count as
/// colored rather than white, gray or black.
const MIN_SATURATION: u16 = 50;
const MIN_VALUE: u8 = 50;

/// True when the pixel has a visible hue. Every hue counts.
pub fn is_colored_pixel(r: u8, g: u8, b: u8) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max < MIN_VALUE {
        return false;
    }
    // saturation = (max - min) / max, scaled to 0-255
    (max - min) as u16 * 255 >= MIN_SATURATION * max as u16
}

/// Share of colored pixels in an RGB crop; 0 for an empty crop.
pub fn colored_fraction(img: &RgbImage) -> f32 {
    let total = img.width() as u64 * img.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let colored = img
        .pixels()
        .filter(|p| is_colored_pixel(p[0], p[1], p[2]))
        .count();
    colored as f32 / total as f32
}

/// Morphological close over a 3×3 square.
///
/// Fills hairline gaps inside bright glyph strokes left by binarisation.
pub fn close_gaps(img: &GrayImage) -> GrayImage {
    close(img, Norm::LInf, 1)
}

//! Grayscale conversion.
//!
//! Collapses a color image to a single luma channel. Defaults to the
//! ITU-R BT.601 coefficients; BT.709 and custom weights are available
//! through [`GrayscaleWeights`].

use ndarray::{Array3, Axis, Zip};

use crate::raster::RasterImage;

/// Per-channel weights for luma, applied to R, G, B.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrayscaleWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl GrayscaleWeights {
    /// ITU-R BT.601 (0.299, 0.587, 0.114)
    pub const BT601: Self = Self {
        r: 0.299,
        g: 0.587,
        b: 0.114,
    };

    /// ITU-R BT.709 (0.2126, 0.7152, 0.0722)
    pub const BT709: Self = Self {
        r: 0.2126,
        g: 0.7152,
        b: 0.0722,
    };

    /// Custom weights, normalized to sum to 1.
    ///
    /// Falls back to BT.601 when the weights sum to zero or less.
    pub fn custom(r: f32, g: f32, b: f32) -> Self {
        let sum = r + g + b;
        if sum <= 0.0 || !sum.is_finite() {
            return Self::BT601;
        }
        Self {
            r: r / sum,
            g: g / sum,
            b: b / sum,
        }
    }
}

impl Default for GrayscaleWeights {
    fn default() -> Self {
        Self::BT601
    }
}

/// Convert to a single luma channel using BT.601 weights.
///
/// A grayscale input is returned as a copy.
pub fn to_grayscale(image: &RasterImage) -> RasterImage {
    to_grayscale_weighted(image, GrayscaleWeights::BT601)
}

/// Convert to a single luma channel with custom weights.
///
/// # Arguments
/// * `image` - Grayscale or RGB image
/// * `weights` - Channel weights
///
/// # Returns
/// New (H, W, 1) image, luma rounded to the nearest integer
pub fn to_grayscale_weighted(image: &RasterImage, weights: GrayscaleWeights) -> RasterImage {
    if image.is_grayscale() {
        return image.clone();
    }

    let input = image.view();
    let (height, width, _) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, 1));

    Zip::from(output.lanes_mut(Axis(2)))
        .and(input.lanes(Axis(2)))
        .par_for_each(|mut out, rgb| {
            let luma = weights.r * rgb[0] as f32 + weights.g * rgb[1] as f32 + weights.b * rgb[2] as f32;
            out[0] = luma.round().clamp(0.0, 255.0) as u8;
        });

    RasterImage::from_filtered(output)
}

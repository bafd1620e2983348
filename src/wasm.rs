//! WebAssembly exports for RasterLab filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images cross the boundary as flat row-major `u8` buffers with
//! `width * height * channels` bytes, channels being 1 (gray) or 3 (RGB).
//! Invalid dimensions or parameters are thrown as JavaScript errors.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::filters::blur::{convolve, ConvolutionKind};
use crate::filters::border::BorderPolicy;
use crate::filters::grayscale::to_grayscale;
use crate::filters::histogram::Histogram;
use crate::filters::noise::add_noise;
use crate::filters::rank::median;
use crate::filters::regional::regional_mean;
use crate::filters::threshold::{adaptive_threshold, otsu_threshold, threshold};
use crate::raster::RasterImage;

fn to_raster(data: &[u8], width: usize, height: usize, channels: usize) -> Result<RasterImage, JsError> {
    Ok(RasterImage::from_raw(width, height, channels, data.to_vec())?)
}

// ============================================================================
// Grayscale
// ============================================================================

/// Convert an RGB buffer to BT.601 luma.
///
/// # Arguments
/// * `data` - Flat array of bytes (length = width * height * channels)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 1 or 3
///
/// # Returns
/// Flat array with one byte per pixel
#[wasm_bindgen]
pub fn grayscale_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsError> {
    let input = to_raster(data, width, height, channels)?;
    Ok(to_grayscale(&input).into_raw())
}

// ============================================================================
// Noise
// ============================================================================

/// Redraw each pixel with probability `probability`, seeded.
#[wasm_bindgen]
pub fn add_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    probability: f64,
    seed: u64,
) -> Result<Vec<u8>, JsError> {
    let mut image = to_raster(data, width, height, channels)?;
    let mut rng = StdRng::seed_from_u64(seed);
    add_noise(&mut image, probability, &mut rng)?;
    Ok(image.into_raw())
}

// ============================================================================
// Smoothing
// ============================================================================

/// Smooth with a named kernel: "triangle", "gaussian" or "tent".
///
/// # Arguments
/// * `kind` - Kernel name
/// * `size` - Kernel size (odd)
/// * `sigma` - Gaussian sigma, `<= 0` derives it from `size`
/// * `border` - "reflect", "replicate" or "zero"
#[wasm_bindgen]
pub fn convolve_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kind: &str,
    size: usize,
    sigma: f32,
    border: &str,
) -> Result<Vec<u8>, JsError> {
    let input = to_raster(data, width, height, channels)?;
    let kernel = kind.parse::<ConvolutionKind>()?.kernel(size, sigma)?;
    let border = border.parse::<BorderPolicy>()?;
    Ok(convolve(&input, &kernel, border).into_raw())
}

#[wasm_bindgen]
pub fn median_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    window_size: usize,
    border: &str,
) -> Result<Vec<u8>, JsError> {
    let input = to_raster(data, width, height, channels)?;
    Ok(median(&input, window_size, border.parse()?)?.into_raw())
}

#[wasm_bindgen]
pub fn regional_mean_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsError> {
    let input = to_raster(data, width, height, channels)?;
    Ok(regional_mean(&input).into_raw())
}

// ============================================================================
// Threshold
// ============================================================================

/// Binarize at a fixed level. Output has one byte per pixel.
#[wasm_bindgen]
pub fn threshold_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    t: i32,
) -> Result<Vec<u8>, JsError> {
    let input = to_raster(data, width, height, channels)?;
    Ok(threshold(&input, t)?.into_raw())
}

/// Binarize at Otsu's level. Output has one byte per pixel.
#[wasm_bindgen]
pub fn otsu_threshold_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsError> {
    let input = to_raster(data, width, height, channels)?;
    Ok(otsu_threshold(&input).image.into_raw())
}

/// Otsu's level of the luma, the one `otsu_threshold_wasm` binarizes at.
#[wasm_bindgen]
pub fn otsu_level_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<u8, JsError> {
    let input = to_raster(data, width, height, channels)?;
    Ok(Histogram::of_gray(&input).otsu_level())
}

#[wasm_bindgen]
pub fn adaptive_threshold_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    window_size: usize,
    c: f64,
    border: &str,
) -> Result<Vec<u8>, JsError> {
    let input = to_raster(data, width, height, channels)?;
    Ok(adaptive_threshold(&input, window_size, c, border.parse()?)?.into_raw())
}

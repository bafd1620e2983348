//! Regional smoothing: plain 5x5 windowed mean and the quadrant Kuwahara.
//!
//! [`regional_mean`] averages a full 5x5 window and leaves the 2-pixel
//! margin untouched. It does not pick a low-variance sub-region; that is
//! what [`kuwahara`] does.

use ndarray::parallel::prelude::*;
use ndarray::{s, Array3, Axis, Zip};

use super::border::BorderPolicy;
use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Radius of the [`regional_mean`] window.
pub const REGIONAL_RADIUS: usize = 2;

// ============================================================================
// Windowed mean
// ============================================================================

/// Smooth the interior with a 5x5 per-channel mean.
///
/// Pixels whose window lies fully inside the image (rows `2..=H-3`,
/// columns `2..=W-3`) get the rounded window mean; everything within two
/// pixels of an edge is copied unchanged.
///
/// # Arguments
/// * `image` - Grayscale or color image
///
/// # Returns
/// Smoothed image with the same shape
pub fn regional_mean(image: &RasterImage) -> RasterImage {
    let input = image.view();
    let (height, width, _) = input.dim();
    let r = REGIONAL_RADIUS;
    let window_len = ((2 * r + 1) * (2 * r + 1)) as f32;

    let mut output = input.to_owned();
    if height <= 2 * r || width <= 2 * r {
        return RasterImage::from_filtered(output);
    }

    let mut interior = output.slice_mut(s![r..height - r, r..width - r, ..]);
    Zip::indexed(&mut interior).par_for_each(|(iy, ix, c), out| {
        let (y, x) = (iy + r, ix + r);
        let sum: u32 = input
            .slice(s![y - r..=y + r, x - r..=x + r, c])
            .iter()
            .map(|&v| v as u32)
            .sum();
        *out = (sum as f32 / window_len).round() as u8;
    });

    RasterImage::from_filtered(output)
}

// ============================================================================
// Kuwahara
// ============================================================================

/// Classic Kuwahara filter.
///
/// The `(2r+1)²` window is split into four `(r+1)²` quadrants that share
/// the center row and column. The quadrant with the lowest variance
/// (summed over channels) wins and the pixel takes its mean. Ties keep the
/// first quadrant in the order top-left, top-right, bottom-left,
/// bottom-right.
///
/// # Arguments
/// * `image` - Grayscale or color image
/// * `radius` - Window radius (>= 1)
/// * `border` - How samples past the edge are read
pub fn kuwahara(image: &RasterImage, radius: usize, border: BorderPolicy) -> Result<RasterImage> {
    if radius == 0 {
        return Err(Error::Config("kuwahara radius must be at least 1".into()));
    }

    let input = image.view();
    let (_, _, channels) = input.dim();
    let mut output = Array3::<u8>::zeros(input.dim());
    let r = radius as isize;
    let n = ((radius + 1) * (radius + 1)) as f64;

    // Quadrant origins relative to the center pixel.
    let quadrants = [(-r, -r), (-r, 0), (0, -r), (0, 0)];

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            let mut sums = vec![0.0f64; channels];
            let mut sq_sums = vec![0.0f64; channels];
            let mut best_mean = vec![0.0f64; channels];

            for x in 0..row.len_of(Axis(0)) {
                let mut best_variance = f64::INFINITY;

                for &(oy, ox) in &quadrants {
                    sums.fill(0.0);
                    sq_sums.fill(0.0);
                    for dy in 0..=r {
                        for dx in 0..=r {
                            let sy = y as isize + oy + dy;
                            let sx = x as isize + ox + dx;
                            for c in 0..channels {
                                let v = border.sample(&input, sy, sx, c) as f64;
                                sums[c] += v;
                                sq_sums[c] += v * v;
                            }
                        }
                    }

                    let variance: f64 = (0..channels)
                        .map(|c| {
                            let mean = sums[c] / n;
                            sq_sums[c] / n - mean * mean
                        })
                        .sum();
                    if variance < best_variance {
                        best_variance = variance;
                        for c in 0..channels {
                            best_mean[c] = sums[c] / n;
                        }
                    }
                }

                for c in 0..channels {
                    row[[x, c]] = best_mean[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    Ok(RasterImage::from_filtered(output))
}

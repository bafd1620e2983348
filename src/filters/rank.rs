//! Rank-order filters: median.
//!
//! Removes salt-and-pepper noise while preserving edges.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1)
//! - **Color**: (height, width, 3) - each channel ranked on its own

use ndarray::{Array3, Zip};

use super::border::BorderPolicy;
use crate::error::{check_odd_size, Result};
use crate::raster::RasterImage;

/// Default median window (5x5).
pub const DEFAULT_MEDIAN_WINDOW: usize = 5;

/// Apply a median filter.
///
/// Every output sample is the middle value of the `window_size²` samples
/// of the same channel around it. The window has an odd number of samples,
/// so the median is exact (no interpolation).
///
/// # Arguments
/// * `image` - Grayscale or color image
/// * `window_size` - Window width/height (odd, >= 1)
/// * `border` - How samples past the edge are read
///
/// # Returns
/// Median-filtered image with the same shape
pub fn median(image: &RasterImage, window_size: usize, border: BorderPolicy) -> Result<RasterImage> {
    check_odd_size("median window", window_size)?;

    let input = image.view();
    let mut output = Array3::<u8>::zeros(input.dim());
    let r = (window_size / 2) as isize;
    let window_len = window_size * window_size;

    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let mut values: Vec<u8> = Vec::with_capacity(window_len);
        for dy in -r..=r {
            for dx in -r..=r {
                values.push(border.sample(&input, y as isize + dy, x as isize + dx, c));
            }
        }

        let mid = values.len() / 2;
        *out = *values.select_nth_unstable(mid).1;
    });

    Ok(RasterImage::from_filtered(output))
}

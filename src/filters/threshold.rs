//! Thresholding: manual, Otsu, adaptive mean, and per-channel variants.
//!
//! The single-level algorithms convert to grayscale first and return a
//! binary (H, W, 1) image holding only 0 and 255. The `_channels` variants
//! keep the channel count and binarize each channel against its own level.
//!
//! Manual levels are inclusive (`v >= t` is white). Levels computed from
//! the data (Otsu, mean) mark the top of the dark class, so `v > level` is
//! white; that keeps a two-level image intact under Otsu.

use ndarray::{Array3, Axis, Zip};

use super::border::BorderPolicy;
use super::core::IntegralImage;
use super::grayscale::to_grayscale;
use super::histogram::{channel_histograms, Histogram};
use crate::error::{check_odd_size, Error, Result};
use crate::raster::RasterImage;

/// Default adaptive window (11x11).
pub const DEFAULT_ADAPTIVE_WINDOW: usize = 11;
/// Default offset subtracted from the local mean.
pub const DEFAULT_ADAPTIVE_OFFSET: f64 = 2.0;

/// Binary image together with the level that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thresholded {
    pub level: u8,
    pub image: RasterImage,
}

/// Per-channel binary image with one level per channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelThresholded {
    pub levels: Vec<u8>,
    pub image: RasterImage,
}

fn check_level(t: i32) -> Result<u8> {
    u8::try_from(t).map_err(|_| {
        Error::Config(format!("threshold must be within [0, 255], got {t}"))
    })
}

/// Parse a user-entered manual threshold.
///
/// Text that is not an integer is a [`Error::Validation`]; an integer
/// outside 0-255 is a [`Error::Config`].
pub fn parse_threshold(input: &str) -> Result<u8> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("'{}' is not an integer threshold", input.trim())))?;
    let value = i32::try_from(value)
        .map_err(|_| Error::Config(format!("threshold must be within [0, 255], got {value}")))?;
    check_level(value)
}

/// Map every sample of `gray` through `is_white`.
fn binarize<F>(gray: &RasterImage, is_white: F) -> RasterImage
where
    F: Fn(u8) -> bool + Sync + Send,
{
    let mut output = gray.view().to_owned();
    output.par_mapv_inplace(|v| if is_white(v) { 255 } else { 0 });
    RasterImage::from_filtered(output)
}

// ============================================================================
// Manual
// ============================================================================

/// Binarize the luma at a fixed level.
///
/// # Arguments
/// * `image` - Grayscale or color image
/// * `t` - Threshold (0-255); pixels with `v >= t` become 255
///
/// # Returns
/// Binary grayscale image
pub fn threshold(image: &RasterImage, t: i32) -> Result<RasterImage> {
    let level = check_level(t)?;
    let gray = to_grayscale(image);
    Ok(binarize(&gray, |v| v >= level))
}

// ============================================================================
// Otsu
// ============================================================================

/// Binarize at the level found by Otsu's method.
///
/// Pixels above the selected level (the upper class) become 255.
pub fn otsu_threshold(image: &RasterImage) -> Thresholded {
    let gray = to_grayscale(image);
    let level = Histogram::of_channel(&gray.view(), 0).otsu_level();
    log::trace!("otsu level {level}");
    Thresholded {
        level,
        image: binarize(&gray, |v| v > level),
    }
}

// ============================================================================
// Adaptive
// ============================================================================

/// Binarize each pixel against the mean of its neighborhood.
///
/// A pixel becomes 255 when `v >= local_mean - offset`, which tolerates
/// uneven illumination that defeats a single global level.
///
/// # Arguments
/// * `image` - Grayscale or color image
/// * `window_size` - Neighborhood width/height (odd, >= 3)
/// * `offset` - Constant subtracted from the local mean
/// * `border` - How samples past the edge are read
///
/// # Returns
/// Binary grayscale image
pub fn adaptive_threshold(
    image: &RasterImage,
    window_size: usize,
    offset: f64,
    border: BorderPolicy,
) -> Result<RasterImage> {
    check_adaptive(window_size, offset)?;
    let gray = to_grayscale(image);
    Ok(adaptive_binarize(&gray, window_size, offset, border))
}

fn check_adaptive(window_size: usize, offset: f64) -> Result<()> {
    check_odd_size("adaptive window", window_size)?;
    if window_size < 3 {
        return Err(Error::Config(format!(
            "adaptive window must be at least 3, got {window_size}"
        )));
    }
    if !offset.is_finite() {
        return Err(Error::Config(format!("adaptive offset must be finite, got {offset}")));
    }
    Ok(())
}

/// Local-mean binarization of every channel of `image`.
fn adaptive_binarize(
    image: &RasterImage,
    window_size: usize,
    offset: f64,
    border: BorderPolicy,
) -> RasterImage {
    let view = image.view();
    let mut output = Array3::<u8>::zeros(view.dim());

    for (c, mut plane) in output.axis_iter_mut(Axis(2)).enumerate() {
        let integral = IntegralImage::padded(&view, c, window_size / 2, border);
        let window_len = integral.window_len() as f64;
        let input = view.index_axis(Axis(2), c);

        Zip::indexed(&mut plane)
            .and(&input)
            .par_for_each(|(y, x), out, &v| {
                let mean = integral.window_sum(y, x) as f64 / window_len;
                *out = if v as f64 >= mean - offset { 255 } else { 0 };
            });
    }

    RasterImage::from_filtered(output)
}

// ============================================================================
// Per-channel variants
// ============================================================================

fn binarize_channels(image: &RasterImage, levels: &[u8], inclusive: bool) -> RasterImage {
    let mut output = image.view().to_owned();
    for (c, mut plane) in output.axis_iter_mut(Axis(2)).enumerate() {
        let level = levels[c];
        plane.par_mapv_inplace(|v| {
            let white = if inclusive { v >= level } else { v > level };
            if white {
                255
            } else {
                0
            }
        });
    }
    RasterImage::from_filtered(output)
}

/// Binarize every channel at the same fixed level (`v >= t` is white).
pub fn threshold_channels(image: &RasterImage, t: i32) -> Result<ChannelThresholded> {
    let level = check_level(t)?;
    let levels = vec![level; image.channels()];
    let image = binarize_channels(image, &levels, true);
    Ok(ChannelThresholded { levels, image })
}

/// Binarize every channel at its own mean (truncated to an integer).
pub fn mean_threshold_channels(image: &RasterImage) -> ChannelThresholded {
    let levels: Vec<u8> = channel_histograms(image)
        .iter()
        .map(|h| h.mean().floor() as u8)
        .collect();
    let image = binarize_channels(image, &levels, false);
    ChannelThresholded { levels, image }
}

/// Binarize every channel at its own Otsu level.
pub fn otsu_threshold_channels(image: &RasterImage) -> ChannelThresholded {
    let levels: Vec<u8> = channel_histograms(image)
        .iter()
        .map(Histogram::otsu_level)
        .collect();
    let image = binarize_channels(image, &levels, false);
    ChannelThresholded { levels, image }
}

/// Binarize every channel against its own local mean.
///
/// Same rule as [`adaptive_threshold`] (`v >= local_mean - offset`), but
/// the channel count is kept.
pub fn adaptive_threshold_channels(
    image: &RasterImage,
    window_size: usize,
    offset: f64,
    border: BorderPolicy,
) -> Result<RasterImage> {
    check_adaptive(window_size, offset)?;
    Ok(adaptive_binarize(image, window_size, offset, border))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> RasterImage {
        RasterImage::from_fn(16, 16, 1, |x, y, _| (y * 16 + x) as u8).unwrap()
    }

    #[test]
    fn test_threshold_inclusive() {
        let img = RasterImage::from_raw(3, 1, 1, vec![99, 100, 101]).unwrap();
        let result = threshold(&img, 100).unwrap();
        assert_eq!(result.to_vec(), vec![0, 255, 255]);
    }

    #[test]
    fn test_threshold_zero_is_all_white() {
        let result = threshold(&ramp(), 0).unwrap();
        assert!(result.to_vec().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_threshold_color_uses_luma() {
        let img = RasterImage::from_raw(2, 1, 3, vec![50, 50, 50, 200, 200, 200]).unwrap();
        let result = threshold(&img, 128).unwrap();

        assert_eq!(result.channels(), 1);
        assert_eq!(result.to_vec(), vec![0, 255]);
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(matches!(threshold(&ramp(), 256), Err(Error::Config(_))));
        assert!(matches!(threshold(&ramp(), -1), Err(Error::Config(_))));
    }

    #[test]
    fn test_threshold_idempotent() {
        for t in [0, 1, 77, 128, 255] {
            let once = threshold(&ramp(), t).unwrap();
            let twice = threshold(&once, t).unwrap();
            assert_eq!(once, twice, "t = {t}");
        }
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold(" 42 ").unwrap(), 42);
        assert!(matches!(parse_threshold("abc"), Err(Error::Validation(_))));
        assert!(matches!(parse_threshold(""), Err(Error::Validation(_))));
        assert!(matches!(parse_threshold("256"), Err(Error::Config(_))));
        assert!(matches!(parse_threshold("-3"), Err(Error::Config(_))));
        assert!(matches!(parse_threshold("99999999999"), Err(Error::Config(_))));
    }

    #[test]
    fn test_otsu_reproduces_two_level_image() {
        let img = RasterImage::from_fn(8, 8, 1, |x, y, _| if (x * y) % 3 == 0 { 0 } else { 255 }).unwrap();
        let result = otsu_threshold(&img);
        assert_eq!(result.image, img);
    }

    #[test]
    fn test_otsu_bimodal_level() {
        let img = RasterImage::from_fn(10, 10, 1, |x, _, _| if x < 4 { 60 } else { 180 }).unwrap();
        let result = otsu_threshold(&img);

        assert_eq!(result.level, 60);
        assert_eq!(result.image.get(0, 0, 0), 0);
        assert_eq!(result.image.get(9, 9, 0), 255);
    }

    #[test]
    fn test_otsu_deterministic() {
        let img = RasterImage::from_fn(20, 20, 3, |x, y, c| ((x * 13 + y * 7 + c * 31) % 256) as u8).unwrap();
        assert_eq!(otsu_threshold(&img), otsu_threshold(&img));
    }

    #[test]
    fn test_otsu_single_intensity() {
        let img = RasterImage::filled(4, 4, &[90]).unwrap();
        let result = otsu_threshold(&img);

        assert_eq!(result.level, 0);
        assert!(result.image.to_vec().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_adaptive_constant_is_white() {
        let img = RasterImage::filled(15, 13, &[123]).unwrap();
        for border in [BorderPolicy::Replicate, BorderPolicy::Reflect, BorderPolicy::Zero] {
            let result = adaptive_threshold(&img, 11, 0.0, border).unwrap();
            assert!(result.to_vec().iter().all(|&v| v == 255), "{border:?}");
        }
    }

    #[test]
    fn test_adaptive_handles_gradient_illumination() {
        // Dark text strokes on a background that brightens left to right.
        let img = RasterImage::from_fn(40, 20, 1, |x, y, _| {
            let background = 100 + x as u8;
            if y == 10 { background - 40 } else { background }
        })
        .unwrap();

        let result = adaptive_threshold(&img, 11, 2.0, BorderPolicy::Replicate).unwrap();

        for x in 0..40 {
            assert_eq!(result.get(x, 10, 0), 0, "stroke at x={x}");
            assert_eq!(result.get(x, 3, 0), 255, "background at x={x}");
        }
    }

    #[test]
    fn test_adaptive_rejects_bad_windows() {
        let img = ramp();
        for window in [0, 1, 4, 10] {
            assert!(matches!(
                adaptive_threshold(&img, window, 2.0, BorderPolicy::Reflect),
                Err(Error::Config(_))
            ));
        }
    }

    #[test]
    fn test_threshold_channels() {
        let img = RasterImage::from_raw(2, 1, 3, vec![10, 200, 100, 250, 20, 99]).unwrap();
        let result = threshold_channels(&img, 100).unwrap();

        assert_eq!(result.levels, vec![100, 100, 100]);
        assert_eq!(result.image.to_vec(), vec![0, 255, 255, 255, 0, 0]);
    }

    #[test]
    fn test_mean_threshold_channels() {
        let img = RasterImage::from_raw(2, 1, 3, vec![10, 100, 0, 30, 100, 255]).unwrap();
        let result = mean_threshold_channels(&img);

        assert_eq!(result.levels, vec![20, 100, 127]);
        assert_eq!(result.image.to_vec(), vec![0, 0, 0, 255, 0, 255]);
    }

    #[test]
    fn test_otsu_threshold_channels() {
        let img = RasterImage::from_fn(4, 4, 3, |x, _, c| {
            if x < 2 { [0, 40, 100][c] } else { [255, 90, 101][c] }
        })
        .unwrap();
        let result = otsu_threshold_channels(&img);

        assert_eq!(result.levels, vec![0, 40, 100]);
        assert_eq!(result.image.get(0, 0, 1), 0);
        assert_eq!(result.image.get(3, 0, 1), 255);
        assert_eq!(result.image.get(3, 0, 2), 255);
    }

    #[test]
    fn test_adaptive_threshold_channels() {
        // Channel 0 rises left to right, channel 1 is flat, channel 2 falls.
        let img = RasterImage::from_fn(9, 9, 3, |x, _, c| match c {
            0 => 100 + (x * 10) as u8,
            1 => 60,
            _ => 200 - (x * 10) as u8,
        })
        .unwrap();
        let result = adaptive_threshold_channels(&img, 7, 0.0, BorderPolicy::Replicate).unwrap();

        assert_eq!(result.channels(), 3);
        for y in 0..9 {
            assert_eq!(result.get(8, y, 0), 255);
            assert_eq!(result.get(0, y, 0), 0);
            assert_eq!(result.get(4, y, 1), 255);
            assert_eq!(result.get(0, y, 2), 255);
            assert_eq!(result.get(8, y, 2), 0);
        }
        assert!(result.to_vec().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_adaptive_threshold_channels_gray_matches_single() {
        let img = RasterImage::from_fn(12, 8, 1, |x, y, _| ((x * 37 + y * 11) % 256) as u8).unwrap();
        let per_channel = adaptive_threshold_channels(&img, 5, 2.0, BorderPolicy::Reflect).unwrap();
        let single = adaptive_threshold(&img, 5, 2.0, BorderPolicy::Reflect).unwrap();
        assert_eq!(per_channel, single);
    }

    #[test]
    fn test_adaptive_threshold_channels_rejects_bad_window() {
        let img = RasterImage::new(4, 4, 3).unwrap();
        assert!(matches!(
            adaptive_threshold_channels(&img, 1, 0.0, BorderPolicy::Reflect),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            adaptive_threshold_channels(&img, 6, 0.0, BorderPolicy::Reflect),
            Err(Error::Config(_))
        ));
    }
}

//! Noise filters: random-valued impulse noise and salt-and-pepper.
//!
//! Both filters mutate the image in place and draw from a caller-supplied
//! random source, so a seeded generator gives byte-exact output.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1)
//! - **Color**: (height, width, 3) - channels are redrawn independently

use ndarray::Axis;
use rand::Rng;

use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Default fraction of corrupted pixels.
pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.1;

fn check_probability(probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::Config(format!(
            "noise probability must be within [0, 1], got {probability}"
        )));
    }
    Ok(())
}

// ============================================================================
// Random-valued impulse noise
// ============================================================================

/// Redraw a random subset of pixels.
///
/// For every pixel one uniform sample `u` in [0, 1) is drawn; when
/// `u < probability` each channel of that pixel gets its own uniform value
/// in 0-255.
///
/// # Arguments
/// * `image` - Image to corrupt in place
/// * `probability` - Chance per pixel (0.0-1.0)
/// * `rng` - Random source
///
/// # Returns
/// Number of pixels that were redrawn
pub fn add_noise<R: Rng + ?Sized>(
    image: &mut RasterImage,
    probability: f64,
    rng: &mut R,
) -> Result<usize> {
    check_probability(probability)?;

    let mut redrawn = 0;
    let mut view = image.view_mut();
    for mut pixel in view.lanes_mut(Axis(2)) {
        if rng.random::<f64>() < probability {
            for v in pixel.iter_mut() {
                *v = rng.random::<u8>();
            }
            redrawn += 1;
        }
    }

    log::trace!("redrew {redrawn} pixels at p={probability}");
    Ok(redrawn)
}

// ============================================================================
// Salt and pepper
// ============================================================================

/// Set a random subset of pixels to pure black or pure white.
///
/// Per pixel: `u < probability / 2` gives black, `u < probability` gives
/// white, anything else is left alone.
///
/// # Returns
/// Number of pixels that were overwritten
pub fn add_salt_and_pepper<R: Rng + ?Sized>(
    image: &mut RasterImage,
    probability: f64,
    rng: &mut R,
) -> Result<usize> {
    check_probability(probability)?;

    let mut hits = 0;
    let mut view = image.view_mut();
    for mut pixel in view.lanes_mut(Axis(2)) {
        let u = rng.random::<f64>();
        let value = if u < probability / 2.0 {
            0
        } else if u < probability {
            255
        } else {
            continue;
        };
        pixel.fill(value);
        hits += 1;
    }

    Ok(hits)
}

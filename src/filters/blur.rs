//! Convolution filters: box ("triangle"), tent and Gaussian smoothing.
//!
//! ## Supported Formats
//!
//! Grayscale (H, W, 1) and color (H, W, 3) images. Every channel is
//! filtered independently with the same kernel.

use std::str::FromStr;

use ndarray::{Array3, Zip};

use super::border::BorderPolicy;
use super::core::Kernel;
use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Smoothing kernels selectable from the command surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvolutionKind {
    /// Uniform box average (every weight `1 / size²`).
    Triangle,
    Gaussian,
    /// True separable triangle, `[1 2 3 2 1]` outer product for size 5.
    Tent,
}

impl ConvolutionKind {
    /// Build the kernel for this kind.
    ///
    /// # Arguments
    /// * `size` - Kernel width/height (odd)
    /// * `sigma` - Gaussian standard deviation, ignored by the other kinds
    pub fn kernel(self, size: usize, sigma: f32) -> Result<Kernel> {
        match self {
            ConvolutionKind::Triangle => Kernel::box_filter(size),
            ConvolutionKind::Gaussian => Kernel::gaussian(size, sigma),
            ConvolutionKind::Tent => Kernel::tent(size),
        }
    }
}

impl FromStr for ConvolutionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "triangle" | "box" => Ok(ConvolutionKind::Triangle),
            "gaussian" => Ok(ConvolutionKind::Gaussian),
            "tent" => Ok(ConvolutionKind::Tent),
            other => Err(Error::Validation(format!("unknown convolution kind '{other}'"))),
        }
    }
}

/// Convolve every channel with `kernel`.
///
/// The kernel is applied as a correlation (not flipped); all provided
/// kernels are symmetric, so this only matters for custom ones. Sums are
/// rounded to the nearest integer and clamped to 0-255.
///
/// # Arguments
/// * `image` - Grayscale or color image
/// * `kernel` - Odd-sized square kernel
/// * `border` - How samples past the edge are read
///
/// # Returns
/// New image with the same shape
pub fn convolve(image: &RasterImage, kernel: &Kernel, border: BorderPolicy) -> RasterImage {
    let input = image.view();
    let mut output = Array3::<u8>::zeros(input.dim());

    let weights = kernel.weights();
    let r = kernel.radius() as isize;

    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let mut sum = 0.0f32;
        for ((ky, kx), &kv) in weights.indexed_iter() {
            let sy = y as isize + ky as isize - r;
            let sx = x as isize + kx as isize - r;
            sum += border.sample(&input, sy, sx, c) as f32 * kv;
        }
        *out = sum.round().clamp(0.0, 255.0) as u8;
    });

    log::trace!(
        "convolved {}x{}x{} with {}x{} kernel",
        image.width(),
        image.height(),
        image.channels(),
        kernel.size(),
        kernel.size()
    );

    RasterImage::from_filtered(output)
}

/// 5x5 box average, the "triangle" filter of the command surface.
pub fn box_blur(image: &RasterImage, border: BorderPolicy) -> Result<RasterImage> {
    let kernel = Kernel::box_filter(5)?;
    Ok(convolve(image, &kernel, border))
}

/// Gaussian blur with an explicit kernel size and sigma.
///
/// # Arguments
/// * `image` - Grayscale or color image
/// * `size` - Kernel size (odd)
/// * `sigma` - Standard deviation; `<= 0` derives it from `size`
/// * `border` - Edge handling
pub fn gaussian_blur(
    image: &RasterImage,
    size: usize,
    sigma: f32,
    border: BorderPolicy,
) -> Result<RasterImage> {
    let kernel = Kernel::gaussian(size, sigma)?;
    Ok(convolve(image, &kernel, border))
}

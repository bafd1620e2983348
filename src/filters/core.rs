//! Core utilities shared by the windowed filters.
//!
//! This module provides:
//! - Kernel construction (box, tent, Gaussian)
//! - A summed-area table over a border-padded channel for O(1) window sums

use ndarray::{Array2, ArrayView3};

use super::border::BorderPolicy;
use crate::error::{check_odd_size, Error, Result};

// ============================================================================
// Kernel
// ============================================================================

/// Square, odd-sized convolution kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    weights: Array2<f32>,
}

impl Kernel {
    /// Use `weights` as given, without normalization.
    pub fn new(weights: Array2<f32>) -> Result<Self> {
        let (rows, cols) = weights.dim();
        if rows != cols {
            return Err(Error::Config(format!(
                "kernel must be square, got {rows}x{cols}"
            )));
        }
        check_odd_size("kernel size", rows)?;
        Ok(Self { weights })
    }

    /// Scale `weights` so they sum to 1.
    pub fn normalized(weights: Array2<f32>) -> Result<Self> {
        let sum: f32 = weights.sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(Error::Config(format!(
                "cannot normalize kernel with weight sum {sum}"
            )));
        }
        Self::new(weights / sum)
    }

    /// Uniform average, every weight `1 / size²`.
    pub fn box_filter(size: usize) -> Result<Self> {
        check_odd_size("kernel size", size)?;
        Self::normalized(Array2::ones((size, size)))
    }

    /// Separable triangle: outer product of `1, 2, .., r+1, .., 2, 1`.
    ///
    /// For size 5 this is the classic `[1 2 3 2 1]ᵀ[1 2 3 2 1] / 81`.
    pub fn tent(size: usize) -> Result<Self> {
        check_odd_size("kernel size", size)?;
        let half = size / 2;
        let ramp: Vec<f32> = (0..size)
            .map(|i| (half + 1 - i.abs_diff(half)) as f32)
            .collect();
        Self::normalized(outer(&ramp))
    }

    /// Gaussian with weight(i, j) ∝ exp(-(i² + j²) / 2σ²), normalized.
    ///
    /// A non-positive `sigma` is derived from the size as
    /// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
    pub fn gaussian(size: usize, sigma: f32) -> Result<Self> {
        check_odd_size("kernel size", size)?;
        if sigma.is_nan() {
            return Err(Error::Config("gaussian sigma is NaN".into()));
        }
        let k1d = gaussian_kernel_1d(size, sigma);
        Self::normalized(outer(&k1d))
    }

    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn radius(&self) -> usize {
        self.size() / 2
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn sum(&self) -> f32 {
        self.weights.sum()
    }
}

/// Generate a normalized 1D Gaussian of `size` taps.
///
/// # Arguments
/// * `size` - Number of taps (odd)
/// * `sigma` - Standard deviation; `<= 0` picks one from `size`
pub fn gaussian_kernel_1d(size: usize, sigma: f32) -> Vec<f32> {
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let half = (size / 2) as f32;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    // Normalize
    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

fn outer(v: &[f32]) -> Array2<f32> {
    let n = v.len();
    Array2::from_shape_fn((n, n), |(y, x)| v[y] * v[x])
}

// ============================================================================
// Summed-area table
// ============================================================================

/// Summed-area table of one channel, padded by `radius` on every side
/// through a [`BorderPolicy`].
///
/// Window sums of `(2 * radius + 1)²` samples centered on any in-image pixel
/// then cost four lookups.
pub struct IntegralImage {
    table: Array2<u64>,
    radius: usize,
}

impl IntegralImage {
    pub fn padded(input: &ArrayView3<u8>, channel: usize, radius: usize, border: BorderPolicy) -> Self {
        let (height, width, _) = input.dim();
        let ph = height + 2 * radius;
        let pw = width + 2 * radius;
        let r = radius as isize;

        let mut table = Array2::<u64>::zeros((ph + 1, pw + 1));
        for py in 0..ph {
            let mut row_sum = 0u64;
            for px in 0..pw {
                row_sum += border.sample(input, py as isize - r, px as isize - r, channel) as u64;
                table[[py + 1, px + 1]] = table[[py, px + 1]] + row_sum;
            }
        }

        Self { table, radius }
    }

    /// Sum over the window centered on image pixel `(y, x)`.
    #[inline]
    pub fn window_sum(&self, y: usize, x: usize) -> u64 {
        let k = 2 * self.radius + 1;
        let t = &self.table;
        t[[y + k, x + k]] + t[[y, x]] - t[[y, x + k]] - t[[y + k, x]]
    }

    pub fn window_len(&self) -> usize {
        let k = 2 * self.radius + 1;
        k * k
    }
}

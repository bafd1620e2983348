//! Filter modules for raster processing.
//!
//! ## Supported Formats
//!
//! Every filter accepts 8-bit images with 1 or 3 channels:
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! Channel count is carried by [`RasterImage`](crate::raster::RasterImage).
//! Thresholds reduce color input to grayscale first; the other filters work
//! on each channel independently.
//!
//! ## Architecture
//!
//! - **Pure** - Filters return a new image; only noise mutates in place
//! - **Border-aware** - Windowed filters read past the edge through [`border::BorderPolicy`]
//! - **Parallel** - Output pixels are computed with rayon via `ndarray::Zip`
//!
//! ## Filter Categories
//!
//! - **Noise**: add_noise, add_salt_and_pepper
//! - **Convolution**: convolve, box_blur, gaussian_blur (triangle, gaussian, tent kernels)
//! - **Rank**: median
//! - **Regional**: regional_mean, kuwahara
//! - **Color**: to_grayscale, histograms
//! - **Threshold**: manual, Otsu, adaptive, per-channel

pub mod border;
pub mod core;

pub mod blur;
pub mod grayscale;
pub mod histogram;
pub mod noise;
pub mod rank;
pub mod regional;
pub mod threshold;

//! The raster buffer every filter reads and writes.
//!
//! ## Layout
//!
//! | Format | Shape | Channel order |
//! |--------|-------|---------------|
//! | Grayscale | (H, W, 1) | luma |
//! | Color | (H, W, 3) | red, green, blue |
//!
//! Samples are `u8`, row-major with channels interleaved per pixel, which
//! is exactly the standard layout of an `ndarray::Array3<u8>`.

use ndarray::{Array3, ArrayView3, ArrayViewMut3};

use crate::error::{Error, Result};

/// Owned 8-bit image with 1 or 3 interleaved channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pixels: Array3<u8>,
}

impl RasterImage {
    /// Allocate a black image.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self> {
        check_channels(channels)?;
        Ok(Self {
            pixels: Array3::zeros((height, width, channels)),
        })
    }

    /// Allocate an image with every pixel set to `value` (one sample per channel).
    pub fn filled(width: usize, height: usize, value: &[u8]) -> Result<Self> {
        let mut image = Self::new(width, height, value.len())?;
        for mut pixel in image.pixels.lanes_mut(ndarray::Axis(2)) {
            for (dst, &src) in pixel.iter_mut().zip(value) {
                *dst = src;
            }
        }
        Ok(image)
    }

    /// Wrap a raw interleaved buffer of `width * height * channels` samples.
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        check_channels(channels)?;
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| {
                Error::Validation(format!("{width}x{height}x{channels} overflows the address space"))
            })?;
        if data.len() != expected {
            return Err(Error::Validation(format!(
                "buffer holds {} samples, {width}x{height}x{channels} needs {expected}",
                data.len()
            )));
        }
        let pixels = Array3::from_shape_vec((height, width, channels), data)
            .map_err(|e| Error::Validation(e.to_string()))?;
        Ok(Self { pixels })
    }

    /// Adopt an `(height, width, channels)` array.
    pub fn from_array(pixels: Array3<u8>) -> Result<Self> {
        check_channels(pixels.dim().2)?;
        let pixels = if pixels.is_standard_layout() {
            pixels
        } else {
            pixels.as_standard_layout().into_owned()
        };
        Ok(Self { pixels })
    }

    /// Wrap the output of a filter that kept the input's channel count.
    pub(crate) fn from_filtered(pixels: Array3<u8>) -> Self {
        debug_assert!(matches!(pixels.dim().2, 1 | 3));
        debug_assert!(pixels.is_standard_layout());
        Self { pixels }
    }

    /// Build an image by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> u8,
    {
        check_channels(channels)?;
        let pixels = Array3::from_shape_fn((height, width, channels), |(y, x, c)| f(x, y, c));
        Ok(Self { pixels })
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn channels(&self) -> usize {
        self.pixels.dim().2
    }

    pub fn is_grayscale(&self) -> bool {
        self.channels() == 1
    }

    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Sample at column `x`, row `y`, channel `c`. Panics when out of bounds.
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.pixels[[y, x, c]]
    }

    pub fn set(&mut self, x: usize, y: usize, c: usize, value: u8) {
        self.pixels[[y, x, c]] = value;
    }

    /// Borrow as an `(height, width, channels)` view.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.pixels.view_mut()
    }

    /// Copy of the interleaved samples in row-major order.
    pub fn to_vec(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }

    /// Give up ownership of the interleaved samples.
    pub fn into_raw(self) -> Vec<u8> {
        // Standard layout: the samples are contiguous from the offset on.
        let len = self.pixels.len();
        let (mut raw, offset) = self.pixels.into_raw_vec_and_offset();
        raw.drain(..offset.unwrap_or(0));
        raw.truncate(len);
        raw
    }

    pub fn into_array(self) -> Array3<u8> {
        self.pixels
    }
}

fn check_channels(channels: usize) -> Result<()> {
    match channels {
        1 | 3 => Ok(()),
        n => Err(Error::Validation(format!(
            "expected 1 or 3 channels, got {n}"
        ))),
    }
}

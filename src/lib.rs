//! RasterLab
//!
//! Raster image processing engine: impulse noise, smoothing convolutions,
//! median and regional filters, grayscale conversion and thresholding,
//! driven through a command session. Optional Python bindings via PyO3 and
//! WASM bindings for JavaScript.
//!
//! ## Image Format
//! Every filter works on 8-bit images:
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//!
//! Images are held in [`RasterImage`], a row-major `ndarray::Array3<u8>`.
//! Filters return a new image of the same shape (single-level thresholds
//! return one channel). The noise filters are the exception: they corrupt
//! the image in place.
//!
//! ## Errors
//! Every fallible operation returns [`Result`]. Parameters are checked
//! before any pixel is touched.

pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod filters;
pub mod raster;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use command::{Command, Outcome, Session, ThresholdKind};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use filters::blur::ConvolutionKind;
pub use filters::border::BorderPolicy;
pub use raster::RasterImage;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::error::Error;
    use crate::filters::blur::{convolve as convolve_impl, ConvolutionKind};
    use crate::filters::border::BorderPolicy;
    use crate::filters::grayscale::to_grayscale;
    use crate::filters::noise::add_noise as add_noise_impl;
    use crate::filters::rank::median as median_impl;
    use crate::filters::regional::{kuwahara as kuwahara_impl, regional_mean as regional_mean_impl};
    use crate::filters::threshold::{
        adaptive_threshold as adaptive_threshold_impl, otsu_threshold as otsu_threshold_impl,
        threshold as threshold_impl,
    };
    use crate::raster::RasterImage;

    impl From<Error> for PyErr {
        fn from(err: Error) -> Self {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_raster(image: PyReadonlyArray3<'_, u8>) -> PyResult<RasterImage> {
        Ok(RasterImage::from_array(image.as_array().to_owned())?)
    }

    fn to_numpy<'py>(py: Python<'py>, image: RasterImage) -> Bound<'py, PyArray3<u8>> {
        image.into_array().into_pyarray(py)
    }

    // ========================================================================
    // Grayscale
    // ========================================================================

    /// Convert an (H, W, 3) image to (H, W, 1) BT.601 luma.
    #[pyfunction]
    pub fn grayscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_raster(image)?;
        Ok(to_numpy(py, to_grayscale(&input)))
    }

    // ========================================================================
    // Noise
    // ========================================================================

    /// Redraw each pixel with the given probability.
    ///
    /// # Arguments
    /// * `image` - Input image (1 or 3 channels)
    /// * `probability` - Chance per pixel (0.0-1.0)
    /// * `seed` - Random seed for reproducibility
    #[pyfunction]
    #[pyo3(signature = (image, probability=0.1, seed=0))]
    pub fn add_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        probability: f64,
        seed: u64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mut output = to_raster(image)?;
        let mut rng = StdRng::seed_from_u64(seed);
        add_noise_impl(&mut output, probability, &mut rng)?;
        Ok(to_numpy(py, output))
    }

    // ========================================================================
    // Smoothing
    // ========================================================================

    /// Smooth with a named kernel: "triangle", "gaussian" or "tent".
    #[pyfunction]
    #[pyo3(signature = (image, kind="gaussian", size=5, sigma=1.5, border="reflect"))]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kind: &str,
        size: usize,
        sigma: f32,
        border: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_raster(image)?;
        let kernel = kind.parse::<ConvolutionKind>()?.kernel(size, sigma)?;
        let border = border.parse::<BorderPolicy>()?;
        Ok(to_numpy(py, convolve_impl(&input, &kernel, border)))
    }

    #[pyfunction]
    #[pyo3(signature = (image, window_size=5, border="reflect"))]
    pub fn median<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        window_size: usize,
        border: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_raster(image)?;
        let result = median_impl(&input, window_size, border.parse()?)?;
        Ok(to_numpy(py, result))
    }

    /// 5x5 mean over the interior; the 2-pixel margin is copied.
    #[pyfunction]
    pub fn regional_mean<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_raster(image)?;
        Ok(to_numpy(py, regional_mean_impl(&input)))
    }

    #[pyfunction]
    #[pyo3(signature = (image, radius=2, border="reflect"))]
    pub fn kuwahara<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
        border: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_raster(image)?;
        let result = kuwahara_impl(&input, radius, border.parse()?)?;
        Ok(to_numpy(py, result))
    }

    // ========================================================================
    // Threshold
    // ========================================================================

    /// Binarize at a fixed level (`v >= t` is white).
    #[pyfunction]
    pub fn threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        t: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_raster(image)?;
        Ok(to_numpy(py, threshold_impl(&input, t)?))
    }

    /// Binarize at Otsu's level.
    ///
    /// # Returns
    /// Tuple of (level, binary image)
    #[pyfunction]
    pub fn otsu_threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<(u8, Bound<'py, PyArray3<u8>>)> {
        let input = to_raster(image)?;
        let result = otsu_threshold_impl(&input);
        Ok((result.level, to_numpy(py, result.image)))
    }

    #[pyfunction]
    #[pyo3(signature = (image, window_size=11, c=2.0, border="reflect"))]
    pub fn adaptive_threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        window_size: usize,
        c: f64,
        border: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_raster(image)?;
        let result = adaptive_threshold_impl(&input, window_size, c, border.parse()?)?;
        Ok(to_numpy(py, result))
    }

    /// RasterLab Rust extension module
    #[pymodule]
    pub fn rasterlab(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(add_noise, m)?)?;

        // Smoothing
        m.add_function(wrap_pyfunction!(convolve, m)?)?;
        m.add_function(wrap_pyfunction!(median, m)?)?;
        m.add_function(wrap_pyfunction!(regional_mean, m)?)?;
        m.add_function(wrap_pyfunction!(kuwahara, m)?)?;

        // Threshold
        m.add_function(wrap_pyfunction!(threshold, m)?)?;
        m.add_function(wrap_pyfunction!(otsu_threshold, m)?)?;
        m.add_function(wrap_pyfunction!(adaptive_threshold, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::rasterlab;

//! Default parameters for the command session.

use crate::error::{Error, Result};
use crate::filters::border::BorderPolicy;
use crate::filters::noise::DEFAULT_NOISE_PROBABILITY;
use crate::filters::rank::DEFAULT_MEDIAN_WINDOW;
use crate::filters::threshold::{DEFAULT_ADAPTIVE_OFFSET, DEFAULT_ADAPTIVE_WINDOW};

/// Parameters used when a command leaves one unspecified.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Edge handling for every windowed filter.
    pub border: BorderPolicy,
    pub noise_probability: f64,
    /// Size of the triangle, tent and Gaussian kernels.
    pub kernel_size: usize,
    pub gaussian_sigma: f32,
    pub median_window: usize,
    pub adaptive_window: usize,
    /// Subtracted from the local mean by the adaptive threshold.
    pub adaptive_offset: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            border: BorderPolicy::Reflect,
            noise_probability: DEFAULT_NOISE_PROBABILITY,
            kernel_size: 5,
            gaussian_sigma: 1.5,
            median_window: DEFAULT_MEDIAN_WINDOW,
            adaptive_window: DEFAULT_ADAPTIVE_WINDOW,
            adaptive_offset: DEFAULT_ADAPTIVE_OFFSET,
        }
    }
}

impl EngineConfig {
    /// Report the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.noise_probability) {
            return Err(Error::Config(format!(
                "noise_probability must be within [0, 1], got {}",
                self.noise_probability
            )));
        }
        for (name, size, min) in [
            ("kernel_size", self.kernel_size, 1),
            ("median_window", self.median_window, 1),
            ("adaptive_window", self.adaptive_window, 3),
        ] {
            if size < min || size % 2 == 0 {
                return Err(Error::Config(format!(
                    "{name} must be odd and at least {min}, got {size}"
                )));
            }
        }
        if self.gaussian_sigma.is_nan() {
            return Err(Error::Config("gaussian_sigma is NaN".into()));
        }
        if !self.adaptive_offset.is_finite() {
            return Err(Error::Config(format!(
                "adaptive_offset must be finite, got {}",
                self.adaptive_offset
            )));
        }
        Ok(())
    }
}

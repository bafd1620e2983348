//! Command surface: a session owning the current image and applying
//! commands to it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = Session::new(rand::rng());
//! session.execute(Command::LoadImage("in.png".into()))?;
//! session.execute(Command::AddNoise { probability: None })?;
//! session.execute(Command::ApplyMedian { window_size: Some(3) })?;
//! session.execute(Command::SaveImage("out.png".into()))?;
//! ```

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::codec;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::filters::blur::{convolve, ConvolutionKind};
use crate::filters::noise::add_noise;
use crate::filters::rank::median;
use crate::filters::regional::regional_mean;
use crate::filters::threshold::{adaptive_threshold, otsu_threshold, threshold};
use crate::raster::RasterImage;

/// Binarization method for [`Command::ApplyThreshold`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThresholdKind {
    /// Fixed level, `v >= t` is white. Must be within 0-255.
    Manual(i32),
    /// Level chosen from the histogram.
    Otsu,
    /// Local mean minus `c` over a `window_size` square.
    Adaptive {
        window_size: Option<usize>,
        c: Option<f64>,
    },
}

/// One user action. `None` parameters take the session's [`EngineConfig`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    LoadImage(PathBuf),
    SaveImage(PathBuf),
    AddNoise { probability: Option<f64> },
    ApplyConvolution(ConvolutionKind),
    ApplyMedian { window_size: Option<usize> },
    ApplyRegionalSmoothing,
    ApplyThreshold(ThresholdKind),
}

/// What a successful command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Loaded {
        width: usize,
        height: usize,
        channels: usize,
    },
    Saved(PathBuf),
    Noised { redrawn: usize },
    Filtered,
    /// `level` is set when it was computed from the image (Otsu).
    Thresholded { level: Option<u8> },
}

/// Owns the current image, the defaults and the random source.
pub struct Session<R> {
    image: Option<RasterImage>,
    config: EngineConfig,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Empty session with default parameters.
    pub fn new(rng: R) -> Self {
        Self {
            image: None,
            config: EngineConfig::default(),
            rng,
        }
    }

    /// Empty session with custom parameters, rejected if any is invalid.
    pub fn with_config(config: EngineConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            image: None,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current image, if one is loaded.
    pub fn image(&self) -> Option<&RasterImage> {
        self.image.as_ref()
    }

    /// Replace the current image without going through the codec.
    pub fn set_image(&mut self, image: RasterImage) {
        self.image = Some(image);
    }

    pub fn take_image(&mut self) -> Option<RasterImage> {
        self.image.take()
    }

    /// Run one command against the current image.
    ///
    /// Every command except [`Command::LoadImage`] fails with
    /// [`Error::NoImage`] when nothing is loaded. A failing command leaves
    /// the current image as it was.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        log::debug!("executing {command:?}");
        let result = self.dispatch(command);
        if let Err(err) = &result {
            log::warn!("command rejected: {err}");
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        let Some(image) = self.image.as_mut() else {
            return match command {
                Command::LoadImage(path) => {
                    let (loaded, outcome) = load(&path)?;
                    self.image = Some(loaded);
                    Ok(outcome)
                }
                _ => Err(Error::NoImage),
            };
        };

        let config = &self.config;
        match command {
            Command::LoadImage(path) => {
                let (loaded, outcome) = load(&path)?;
                *image = loaded;
                Ok(outcome)
            }
            Command::SaveImage(path) => {
                codec::save(image, &path)?;
                log::info!("saved {}x{} image to {}", image.width(), image.height(), path.display());
                Ok(Outcome::Saved(path))
            }
            Command::AddNoise { probability } => {
                let probability = probability.unwrap_or(config.noise_probability);
                let redrawn = add_noise(image, probability, &mut self.rng)?;
                Ok(Outcome::Noised { redrawn })
            }
            Command::ApplyConvolution(kind) => {
                let kernel = kind.kernel(config.kernel_size, config.gaussian_sigma)?;
                *image = convolve(image, &kernel, config.border);
                Ok(Outcome::Filtered)
            }
            Command::ApplyMedian { window_size } => {
                let window_size = window_size.unwrap_or(config.median_window);
                *image = median(image, window_size, config.border)?;
                Ok(Outcome::Filtered)
            }
            Command::ApplyRegionalSmoothing => {
                *image = regional_mean(image);
                Ok(Outcome::Filtered)
            }
            Command::ApplyThreshold(kind) => {
                let level = match kind {
                    ThresholdKind::Manual(t) => {
                        *image = threshold(image, t)?;
                        None
                    }
                    ThresholdKind::Otsu => {
                        let result = otsu_threshold(image);
                        log::debug!("otsu level {}", result.level);
                        *image = result.image;
                        Some(result.level)
                    }
                    ThresholdKind::Adaptive { window_size, c } => {
                        *image = adaptive_threshold(
                            image,
                            window_size.unwrap_or(config.adaptive_window),
                            c.unwrap_or(config.adaptive_offset),
                            config.border,
                        )?;
                        None
                    }
                };
                Ok(Outcome::Thresholded { level })
            }
        }
    }
}

fn load(path: &Path) -> Result<(RasterImage, Outcome)> {
    let image = codec::load(path)?;
    log::info!(
        "loaded {}x{} image with {} channel(s) from {}",
        image.width(),
        image.height(),
        image.channels(),
        path.display()
    );
    let outcome = Outcome::Loaded {
        width: image.width(),
        height: image.height(),
        channels: image.channels(),
    };
    Ok((image, outcome))
}

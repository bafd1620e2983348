//! 256-bin intensity histograms and Otsu level selection.

use ndarray::ArrayView3;
use rayon::prelude::*;

use super::grayscale::to_grayscale;
use crate::raster::RasterImage;

/// Counts of each 8-bit intensity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; 256],
}

impl Histogram {
    /// Count the samples of channel `channel`.
    pub fn of_channel(input: &ArrayView3<u8>, channel: usize) -> Self {
        let mut bins = [0u64; 256];
        for &v in input.index_axis(ndarray::Axis(2), channel).iter() {
            bins[v as usize] += 1;
        }
        Self { bins }
    }

    /// Histogram of the luma of `image` (the channel itself if grayscale).
    pub fn of_gray(image: &RasterImage) -> Self {
        let gray = to_grayscale(image);
        Self::of_channel(&gray.view(), 0)
    }

    pub fn bins(&self) -> &[u64; 256] {
        &self.bins
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Mean intensity, 0 for an empty histogram.
    pub fn mean(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted: u64 = self.bins.iter().enumerate().map(|(v, &n)| v as u64 * n).sum();
        weighted as f64 / total as f64
    }

    /// Between-class variance `w0 * w1 * (μ0 - μ1)²` for every split.
    ///
    /// Entry `t` puts `[0, t]` in class 0 and `(t, 255]` in class 1. A split
    /// with an empty class scores 0.
    pub fn between_class_variance(&self) -> [f64; 256] {
        let mut scores = [0.0f64; 256];
        let total = self.total();
        if total == 0 {
            return scores;
        }
        let total_f = total as f64;
        let total_sum: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(v, &n)| v as f64 * n as f64)
            .sum();

        let mut count0 = 0u64;
        let mut sum0 = 0.0f64;
        for (t, &n) in self.bins.iter().enumerate() {
            count0 += n;
            sum0 += t as f64 * n as f64;
            let count1 = total - count0;
            if count0 == 0 || count1 == 0 {
                continue;
            }

            let w0 = count0 as f64 / total_f;
            let w1 = count1 as f64 / total_f;
            let mu0 = sum0 / count0 as f64;
            let mu1 = (total_sum - sum0) / count1 as f64;
            scores[t] = w0 * w1 * (mu0 - mu1) * (mu0 - mu1);
        }
        scores
    }

    /// Otsu's threshold: the split maximizing between-class variance.
    ///
    /// Ties pick the smallest level, so a single-intensity or empty
    /// histogram gives 0.
    pub fn otsu_level(&self) -> u8 {
        let scores = self.between_class_variance();
        let mut best = 0usize;
        for (t, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = t;
            }
        }
        best as u8
    }
}

/// One histogram per channel, computed in parallel.
pub fn channel_histograms(image: &RasterImage) -> Vec<Histogram> {
    let view = image.view();
    (0..image.channels())
        .into_par_iter()
        .map(|c| Histogram::of_channel(&view, c))
        .collect()
}

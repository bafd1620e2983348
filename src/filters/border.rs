//! Out-of-bounds sampling shared by every windowed filter.
//!
//! A window centered near the edge asks for coordinates outside the
//! image. [`BorderPolicy`] decides which sample stands in for them:
//!
//! | Policy | Left edge of `abcd` |
//! |--------|---------------------|
//! | Replicate | `aaa\|abcd` |
//! | Reflect | `dcb\|abcd` |
//! | Zero | `000\|abcd` |

use std::str::FromStr;

use ndarray::ArrayView3;

use crate::error::Error;

/// Rule for sampling past the image edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderPolicy {
    /// Clamp to the nearest edge sample.
    Replicate,
    /// Mirror across the edge without repeating the edge sample.
    #[default]
    Reflect,
    /// Treat everything outside the image as 0.
    Zero,
}

impl BorderPolicy {
    /// Map `coord` onto an axis of length `len`.
    ///
    /// Returns `None` when the sample should read as 0, which only happens
    /// for [`BorderPolicy::Zero`] or an empty axis.
    #[inline]
    pub fn resolve(self, coord: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let n = len as isize;
        if (0..n).contains(&coord) {
            return Some(coord as usize);
        }

        match self {
            BorderPolicy::Replicate => Some(coord.clamp(0, n - 1) as usize),
            BorderPolicy::Reflect => {
                if n == 1 {
                    return Some(0);
                }
                // Reflection is periodic with period 2 * (n - 1).
                let period = 2 * (n - 1);
                let i = coord.rem_euclid(period);
                Some(if i < n { i } else { period - i } as usize)
            }
            BorderPolicy::Zero => None,
        }
    }

    /// Read channel `c` at `(y, x)`, applying the policy on both axes.
    #[inline]
    pub fn sample(self, input: &ArrayView3<u8>, y: isize, x: isize, c: usize) -> u8 {
        let (height, width, _) = input.dim();
        match (self.resolve(y, height), self.resolve(x, width)) {
            (Some(sy), Some(sx)) => input[[sy, sx, c]],
            _ => 0,
        }
    }
}

impl FromStr for BorderPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replicate" | "clamp" => Ok(BorderPolicy::Replicate),
            "reflect" | "mirror" => Ok(BorderPolicy::Reflect),
            "zero" | "constant" => Ok(BorderPolicy::Zero),
            other => Err(Error::Validation(format!("unknown border policy '{other}'"))),
        }
    }
}

//! Error type shared by every operation in the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by filters, the codec and the command session.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid kernel/window size or out-of-range parameter.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Malformed input such as an unparsable threshold or a bad buffer.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A command that needs an image was issued with none loaded.
    #[error("no image loaded, nothing to do")]
    NoImage,

    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to encode image '{path}': {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reject even or zero window sizes.
pub(crate) fn check_odd_size(what: &str, size: usize) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(Error::Config(format!(
            "{what} must be odd and positive, got {size}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_odd_size() {
        assert!(check_odd_size("window", 1).is_ok());
        assert!(check_odd_size("window", 5).is_ok());
        assert!(matches!(check_odd_size("window", 0), Err(Error::Config(_))));
        assert!(matches!(check_odd_size("window", 4), Err(Error::Config(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = Error::Config("kernel size must be odd and positive, got 4".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: kernel size must be odd and positive, got 4"
        );
        assert_eq!(Error::NoImage.to_string(), "no image loaded, nothing to do");
    }
}

//! Load and save through the `image` crate.
//!
//! - `load`: decode PNG/JPEG/BMP into a grayscale or RGB [`RasterImage`].
//! - `save`: encode a [`RasterImage`]; the format follows the extension.
use std::path::Path;

use image::{ColorType, DynamicImage};

use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Decode an image file.
///
/// Gray sources (with or without alpha, any bit depth) become 1 channel,
/// everything else RGB 8-bit. Alpha is dropped.
pub fn load(path: impl AsRef<Path>) -> Result<RasterImage> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    from_dynamic(decoded)
}

/// Encode `image` to `path`.
pub fn save(image: &RasterImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let color = match image.channels() {
        1 => ColorType::L8,
        _ => ColorType::Rgb8,
    };
    let (width, height) = dimensions(image)?;
    image::save_buffer(path, &image.to_vec(), width, height, color).map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert an already decoded image.
pub fn from_dynamic(decoded: DynamicImage) -> Result<RasterImage> {
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;
    match decoded.color() {
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            RasterImage::from_raw(width, height, 1, decoded.into_luma8().into_raw())
        }
        _ => RasterImage::from_raw(width, height, 3, decoded.into_rgb8().into_raw()),
    }
}

fn dimensions(image: &RasterImage) -> Result<(u32, u32)> {
    let width = u32::try_from(image.width())
        .map_err(|_| Error::Validation(format!("width {} too large to encode", image.width())))?;
    let height = u32::try_from(image.height())
        .map_err(|_| Error::Validation(format!("height {} too large to encode", image.height())))?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rasterlab-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_png_roundtrip_rgb() {
        let img = RasterImage::from_fn(5, 4, 3, |x, y, c| (x * 40 + y * 10 + c) as u8).unwrap();
        let path = temp_path("rgb.png");

        save(&img, &path).unwrap();
        let loaded = load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, img);
    }

    #[test]
    fn test_png_roundtrip_gray() {
        let img = RasterImage::from_fn(3, 3, 1, |x, y, _| (x * 80 + y) as u8).unwrap();
        let path = temp_path("gray.png");

        save(&img, &path).unwrap();
        let loaded = load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.channels(), 1);
        assert_eq!(loaded, img);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(temp_path("does-not-exist.png")).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_save_unknown_extension() {
        let img = RasterImage::new(2, 2, 1).unwrap();
        let err = save(&img, temp_path("out.unknownext")).unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let rgba = image::RgbaImage::from_pixel(2, 1, image::Rgba([10, 20, 30, 40]));
        let img = from_dynamic(DynamicImage::ImageRgba8(rgba)).unwrap();

        assert_eq!(img.channels(), 3);
        assert_eq!(img.to_vec(), vec![10, 20, 30, 10, 20, 30]);
    }
}

//! Per-sample geometry and structural feature.

use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::error::{Error, Result};
use crate::table::SampleInfo;

/// Node count of the component tree built over a raw 8-bit buffer.
///
/// Implementations receive the row-major pixels and the image size and must
/// use 4-connectivity. Failures propagate; callers never substitute a value.
pub trait StructuralOracle {
    fn node_count(&self, pixels: &[u8], width: u32, height: u32) -> Result<u64>;
}

/// Decode `path` keeping its native pixel format.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode `path` as 8-bit grayscale.
///
/// 8-bit color inputs are reduced to luma. Deeper samples (16-bit, float) are
/// an error, never requantized.
pub fn load_gray(path: &Path) -> Result<GrayImage> {
    match open_image(path)? {
        DynamicImage::ImageLuma8(gray) => Ok(gray),
        img @ (DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_)) => Ok(img.into_luma8()),
        other => Err(Error::UnsupportedPixelFormat {
            path: path.to_path_buf(),
            color: other.color(),
        }),
    }
}

/// Width, height and pixel count of `path`, plus the oracle's node count when given one.
pub fn inspect(
    name: &str,
    path: &Path,
    oracle: Option<&dyn StructuralOracle>,
) -> Result<SampleInfo> {
    let img = load_gray(path)?;
    let (width, height) = img.dimensions();

    let structural_feature = match oracle {
        Some(oracle) => Some(oracle.node_count(img.as_raw(), width, height)?),
        None => None,
    };

    tracing::debug!(
        sample = name,
        width,
        height,
        nnodes = ?structural_feature,
        "sample inspected"
    );

    Ok(SampleInfo {
        name: name.to_string(),
        width,
        height,
        pixel_count: u64::from(width) * u64::from(height),
        structural_feature,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use image::{ColorType, ImageBuffer, Luma, Rgb, RgbImage};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_geometry_and_node_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.pgm");
        write_gray(&path, 5, 3, |x, _| (x * 10) as u8);

        let info = inspect("a.pgm", &path, Some(&LevelCountOracle)).unwrap();
        assert_eq!(info.width, 5);
        assert_eq!(info.height, 3);
        assert_eq!(info.pixel_count, 15);
        assert_eq!(info.structural_feature, Some(5));
    }

    #[test]
    fn skips_oracle_when_none_given() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.png");
        write_gray(&path, 2, 2, |_, _| 0);

        let info = inspect("b.png", &path, None).unwrap();
        assert_eq!(info.structural_feature, None);
        assert_eq!(info.pixel_count, 4);
    }

    #[test]
    fn oracle_failure_propagates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.pgm");
        write_gray(&path, 2, 2, |_, _| 1);

        assert!(matches!(
            inspect("c.pgm", &path, Some(&FailingOracle)),
            Err(Error::Oracle(_))
        ));
    }

    #[test]
    fn sixteen_bit_samples_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deep.png");
        ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(4, 1, |x, _| Luma([1000 + x as u16]))
            .save(&path)
            .unwrap();

        let err = inspect("deep.png", &path, Some(&LevelCountOracle)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedPixelFormat {
                color: ColorType::L16,
                ..
            }
        ));
    }

    #[test]
    fn eight_bit_color_is_reduced_to_luma() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        RgbImage::from_fn(3, 1, |x, _| Rgb([x as u8 * 50; 3]))
            .save(&path)
            .unwrap();

        let info = inspect("rgb.png", &path, Some(&LevelCountOracle)).unwrap();
        assert_eq!(info.pixel_count, 3);
        assert_eq!(info.structural_feature, Some(3));
    }

    #[test]
    fn undecodable_file_is_an_image_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.pgm");
        fs::write(&path, b"not an image").unwrap();

        assert!(matches!(
            inspect("junk.pgm", &path, None),
            Err(Error::Image { .. })
        ));
    }
}

//! Synthetic checkerboard images, the worst case for contour length per node.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::{Error, Result};

pub const DEFAULT_FILE: &str = "checkboard.pgm";

/// `size` x `size` board: 255 where `x % 2 == y % 2`, 0 elsewhere.
pub fn checkerboard(size: u32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        Luma([if x % 2 == y % 2 { 255 } else { 0 }])
    })
}

pub fn run(size: u32, out: &Path) -> Result<()> {
    if size == 0 {
        return Err(Error::Config("checkerboard size must be positive".into()));
    }
    checkerboard(size).save(out).map_err(|source| Error::Image {
        path: out.to_path_buf(),
        source,
    })?;
    tracing::info!(size, path = %out.display(), "checkerboard written");
    Ok(())
}

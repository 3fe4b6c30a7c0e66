//! Seeded subsample of a corpus, downscaled into a new folder.
//!
//! Uses the same selector as the measurement suites, so a seed that picks a
//! subset here picks the same subset there. Output keeps the input's pixel
//! format.

use std::fs;
use std::path::PathBuf;

use image::imageops::FilterType;

use crate::corpus::{select_corpus, Corpus};
use crate::error::{Error, Result};
use crate::harness::HarnessConfig;
use crate::inspect::open_image;

#[derive(Clone, Debug)]
pub struct RescaleArgs {
    pub in_folder: PathBuf,
    pub out_folder: PathBuf,
    pub scale: f64,
    pub dry_run: bool,
}

/// Target size for `(width, height)` scaled by `scale`, never below one pixel.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let dim = |v: u32| ((f64::from(v) * scale).round() as u32).max(1);
    (dim(width), dim(height))
}

pub fn run(cfg: &HarnessConfig, args: &RescaleArgs) -> Result<Corpus> {
    if !(args.scale.is_finite() && args.scale > 0.0) {
        return Err(Error::Config(format!(
            "scale must be a positive number, got {}",
            args.scale
        )));
    }

    let corpus = select_corpus(&args.in_folder, cfg)?;
    if args.dry_run {
        for name in corpus.names() {
            tracing::info!(sample = %name, "selected");
        }
        return Ok(corpus);
    }

    fs::create_dir_all(&args.out_folder)?;
    for (n, name) in corpus.names().iter().enumerate() {
        let img = open_image(&corpus.path_of(name))?;
        let (w, h) = scaled_dimensions(img.width(), img.height(), args.scale);
        let resized = img.resize_exact(w, h, FilterType::Triangle);

        let out = args.out_folder.join(name);
        resized.save(&out).map_err(|source| Error::Image {
            path: out.clone(),
            source,
        })?;
        tracing::info!(
            sample = %name,
            progress = %format!("{}/{}", n + 1, corpus.len()),
            from = %format!("{}x{}", img.width(), img.height()),
            to = %format!("{w}x{h}"),
            "rescaled"
        );
    }
    Ok(corpus)
}

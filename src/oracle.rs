//! Node-count oracle backed by the external tree-statistics program.
//!
//! The buffer is written to a scratch PGM so the program sees exactly the pixels
//! the harness decoded, then `nnodes` is read back from its output.

use std::path::{Path, PathBuf};

use image::GrayImage;
use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::extract::MetricPattern;
use crate::inspect::StructuralOracle;
use crate::invoke::{self, ProgramCall};

pub struct TreeProgramOracle {
    program: PathBuf,
    pattern: MetricPattern,
    scratch: TempDir,
}

impl TreeProgramOracle {
    pub fn new(program: &Path) -> Result<Self> {
        Ok(Self {
            program: program.to_path_buf(),
            pattern: MetricPattern::node_count(),
            scratch: TempDir::new()?,
        })
    }
}

impl StructuralOracle for TreeProgramOracle {
    fn node_count(&self, pixels: &[u8], width: u32, height: u32) -> Result<u64> {
        let expected = u64::from(width) * u64::from(height);
        if pixels.len() as u64 != expected {
            return Err(Error::Oracle(format!(
                "buffer holds {} bytes, {width}x{height} needs {expected}",
                pixels.len()
            )));
        }

        let img = GrayImage::from_raw(width, height, pixels.to_vec())
            .ok_or_else(|| Error::Oracle("buffer rejected by image encoder".into()))?;
        let path = self.scratch.path().join("oracle_input.pgm");
        img.save(&path).map_err(|source| Error::Image {
            path: path.clone(),
            source,
        })?;

        let call = ProgramCall::on_sample(&self.program, &path);
        let inv = invoke::run(&call)?;
        let record = self
            .pattern
            .extract(&inv.stdout)
            .map_err(|source| Error::Extract {
                command: inv.command,
                source,
            })?;
        record
            .get("nnodes")
            .ok_or_else(|| Error::Oracle("node count field missing".into()))
    }
}

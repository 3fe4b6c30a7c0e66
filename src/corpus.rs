//! Corpus selection: which images a run touches, and in which order.
//!
//! Selection is split in two so that independent runs can draw matching subsets:
//!
//! 1. With a seed, the lexicographically sorted listing is shuffled by a
//!    `ChaCha8Rng` seeded from it. The same seed over the same listing always
//!    yields the same permutation.
//! 2. With a sample count `N`, the first `N` entries of that sequence are kept
//!    and re-sorted, so "which files" is random while "in what order" is not.
//!
//! Without a seed the platform's directory listing order is kept as-is.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::harness::HarnessConfig;

/// Ordered list of file names drawn from one corpus directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corpus {
    root: PathBuf,
    names: Vec<String>,
}

impl Corpus {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// SHA-256 over the selected names, newline separated, as lowercase hex.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for name in &self.names {
            hasher.update(name.as_bytes());
            hasher.update(b"\n");
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

/// Regular files directly under `dir`, in listing order.
///
/// Symlinks count when they resolve to a regular file. A name that is not
/// valid UTF-8 fails the listing instead of being mangled.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| Error::Corpus {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_str().ok_or_else(|| Error::NonUtf8Name {
            dir: dir.to_path_buf(),
            name: entry.file_name().to_os_string(),
        })?;
        names.push(name.to_string());
    }
    Ok(names)
}

/// Apply the seeded shuffle and truncation to an existing listing.
pub fn select(
    mut names: Vec<String>,
    rng: Option<&mut ChaCha8Rng>,
    samples: Option<usize>,
) -> Vec<String> {
    if let Some(rng) = rng {
        names.sort();
        names.shuffle(rng);
    }

    if let Some(n) = samples {
        names.truncate(n);
        names.sort();
    }

    names
}

/// List `dir` and select from it according to `cfg`.
pub fn select_corpus(dir: &Path, cfg: &HarnessConfig) -> Result<Corpus> {
    let listing = list_files(dir)?;
    let total = listing.len();
    let mut rng = cfg.rng();
    let names = select(listing, rng.as_mut(), cfg.samples);

    tracing::info!(
        dir = %dir.display(),
        total,
        selected = names.len(),
        seed = ?cfg.seed,
        "corpus selected"
    );

    Ok(Corpus {
        root: dir.to_path_buf(),
        names,
    })
}

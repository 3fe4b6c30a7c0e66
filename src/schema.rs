use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::error::Result;
use crate::harness::HarnessConfig;

pub const SCHEMA_VERSION: u32 = 1;

/// Sidecar describing how a dataset was produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub suite: String,
    pub profile: String,
    pub seed: Option<u64>,
    pub samples: Option<usize>,
    pub order: Option<String>,
    pub settle_ms: u64,
    pub input_dir: String,
    pub selection: Vec<String>,
    pub selection_sha256: String,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

impl RunMeta {
    pub fn new(suite: &str, cfg: &HarnessConfig, corpus: &Corpus, order: Option<&str>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            bench_version: env!("CARGO_PKG_VERSION").to_string(),
            suite: suite.to_string(),
            profile: cfg.profile.as_str().to_string(),
            seed: cfg.seed,
            samples: cfg.samples,
            order: order.map(str::to_string),
            settle_ms: cfg.settle.as_millis() as u64,
            input_dir: corpus.root().display().to_string(),
            selection: corpus.names().to_vec(),
            selection_sha256: corpus.fingerprint(),
            timestamp_utc: now_utc(),
            git_sha: git_sha_short(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Commit the run was built from, as exported by CI or the caller's shell.
fn git_sha_short() -> Option<String> {
    ["GIT_SHA", "GITHUB_SHA"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .map(|sha| sha.trim().chars().take(12).collect())
}

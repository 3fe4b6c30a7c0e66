//! Tree-statistics dataset: geometry plus the five counters printed by the
//! tree-statistics program for every selected image.

use std::path::PathBuf;

use crate::corpus::{select_corpus, Corpus};
use crate::error::Result;
use crate::harness::HarnessConfig;
use crate::registry::{Registry, Variant};
use crate::schedule::OrderCode;
use crate::table::Dataset;

pub const VARIANT_ID: char = 'T';

#[derive(Clone, Debug)]
pub struct TreeStatsArgs {
    pub input_dir: PathBuf,
    pub program: PathBuf,
}

pub fn run(cfg: &HarnessConfig, args: &TreeStatsArgs) -> Result<(Corpus, Dataset)> {
    let registry = Registry::new(vec![Variant::tree_stats(VARIANT_ID, args.program.clone())]);
    let order = OrderCode::parse(&registry.ids(), &registry)?;
    let corpus = select_corpus(&args.input_dir, cfg)?;

    // A single program per sample has nothing to settle between.
    let cfg = HarnessConfig {
        settle_before_first: false,
        ..cfg.clone()
    };
    let dataset = super::measure_corpus(&cfg, &corpus, &registry, &order, None, None)?;
    Ok((corpus, dataset))
}

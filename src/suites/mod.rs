//! Entry points. Each one is an explicit `run` taking its configuration; nothing
//! executes on load.
//!
//! Timing and tree-statistics datasets share [`measure_corpus`]: one sequential
//! pass over the corpus, one schedule per sample, one row per sample.

use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::harness::{settle, ExitPolicy, HarnessConfig};
use crate::inspect::{inspect, StructuralOracle};
use crate::invoke;
use crate::registry::Registry;
use crate::schedule::{OrderCode, Schedule, Step};
use crate::table::{Dataset, MeasurementRow};

pub mod checkerboard;
pub mod rescale;
pub mod runtime;
pub mod tree_stats;

/// Run every variant of `registry` on one sample following `schedule`, and
/// return the metrics in registry column order.
pub fn measure_sample(
    sample: &std::path::Path,
    registry: &Registry,
    schedule: &Schedule,
    exit_policy: ExitPolicy,
) -> Result<Vec<u64>> {
    let mut slots = vec![None; registry.len()];

    for step in schedule.steps() {
        match *step {
            Step::Settle(delay) => settle(delay),
            Step::Invoke(idx) => {
                let variant = &registry.variants()[idx];
                let inv = invoke::run(&variant.call(sample))?.check(exit_policy)?;
                let record = variant
                    .pattern
                    .extract(&inv.stdout)
                    .map_err(|source| Error::Extract {
                        command: inv.command,
                        source,
                    })?;
                slots[idx] = Some(record);
            }
        }
    }

    let mut metrics = Vec::new();
    for (slot, variant) in slots.into_iter().zip(registry.variants()) {
        let record = slot.ok_or_else(|| Error::VariantNotInvoked {
            sample: sample.display().to_string(),
            variant: variant.id,
        })?;
        metrics.extend(record.values());
    }
    Ok(metrics)
}

/// Measure every sample of `corpus` in corpus order.
///
/// Nothing is kept from a failed run: the first error aborts and no dataset is
/// returned.
pub fn measure_corpus(
    cfg: &HarnessConfig,
    corpus: &Corpus,
    registry: &Registry,
    order: &OrderCode,
    oracle: Option<&dyn StructuralOracle>,
    structural_column: Option<&str>,
) -> Result<Dataset> {
    let schedule = Schedule::from_config(order, cfg);
    tracing::debug!(order = %order, steps = ?schedule.steps(), "schedule");

    let mut dataset = Dataset::new(structural_column, registry.columns());
    for (n, name) in corpus.names().iter().enumerate() {
        tracing::info!(sample = %name, progress = %format!("{}/{}", n + 1, corpus.len()), "measuring");
        let path = corpus.path_of(name);
        let info = inspect(name, &path, oracle)?;
        let metrics = measure_sample(&path, registry, &schedule, cfg.exit_policy)?;
        dataset.push(MeasurementRow {
            sample: info,
            metrics,
        })?;
    }
    Ok(dataset)
}

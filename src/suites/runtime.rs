//! Counterbalanced runtime dataset: geometry, node count and one elapsed time
//! per contour variant for every selected image.

use std::path::PathBuf;

use crate::corpus::{select_corpus, Corpus};
use crate::error::Result;
use crate::harness::HarnessConfig;
use crate::inspect::StructuralOracle;
use crate::registry::Registry;
use crate::schedule::OrderCode;
use crate::table::Dataset;

pub const STRUCTURAL_COLUMN: &str = "nnodes";

#[derive(Clone, Debug)]
pub struct RuntimeArgs {
    pub input_dir: PathBuf,
    pub registry: Registry,
    pub order: String,
}

#[derive(Debug)]
pub struct RuntimeRun {
    pub corpus: Corpus,
    pub order: OrderCode,
    pub dataset: Dataset,
}

pub fn run(
    cfg: &HarnessConfig,
    args: &RuntimeArgs,
    oracle: &dyn StructuralOracle,
) -> Result<RuntimeRun> {
    // Reject a bad order code before any image is read.
    let order = OrderCode::parse(&args.order, &args.registry)?;
    let corpus = select_corpus(&args.input_dir, cfg)?;

    tracing::info!(
        order = %order,
        variants = %args.registry.ids(),
        settle_ms = cfg.settle.as_millis() as u64,
        "runtime run starting"
    );

    let dataset = super::measure_corpus(
        cfg,
        &corpus,
        &args.registry,
        &order,
        Some(oracle),
        Some(STRUCTURAL_COLUMN),
    )?;

    Ok(RuntimeRun {
        corpus,
        order,
        dataset,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::{Error, OrderCodeError};
    use crate::inspect::test_support::{write_gray, LevelCountOracle};
    use crate::invoke::test_support::stub_program;
    use crate::registry::{Variant, VariantSet};
    use crate::schedule::permutations;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;

    fn quiet_config() -> HarnessConfig {
        HarnessConfig {
            settle: Duration::ZERO,
            ..HarnessConfig::default()
        }
    }

    fn corpus_dir(root: &Path) -> PathBuf {
        let dir = root.join("imgs");
        fs::create_dir(&dir).unwrap();
        write_gray(&dir.join("a.pgm"), 3, 2, |x, _| x as u8);
        write_gray(&dir.join("b.pgm"), 4, 4, |x, y| ((x + y) % 2) as u8);
        write_gray(&dir.join("c.pgm"), 2, 5, |_, _| 9);
        dir
    }

    fn stub_registry(root: &Path) -> Registry {
        let bin = root.join("bin");
        fs::create_dir(&bin).unwrap();
        let log = root.join("calls.log");
        let mut variants = Vec::new();
        for (id, ms) in [('R', 10), ('H', 20), ('N', 30)] {
            let prog = stub_program(
                &bin,
                &format!("perf_{id}"),
                &format!(
                    "echo {id} >> '{}'\necho 'reading image'\necho 'time elapsed: {ms}'",
                    log.display()
                ),
            );
            variants.push(Variant::timing(id, prog, &format!("runtime_{id}")));
        }
        Registry::new(variants)
    }

    #[test]
    fn every_order_code_yields_the_same_table_shape() {
        let root = tempdir().unwrap();
        let input_dir = corpus_dir(root.path());
        let registry = stub_registry(root.path());
        let cfg = HarnessConfig {
            seed: Some(42),
            samples: Some(3),
            ..quiet_config()
        };

        let mut rendered = Vec::new();
        for code in permutations(&registry) {
            let args = RuntimeArgs {
                input_dir: input_dir.clone(),
                registry: registry.clone(),
                order: code.as_str().to_string(),
            };
            let out = run(&cfg, &args, &LevelCountOracle).unwrap();
            assert_eq!(out.dataset.len(), 3);
            assert_eq!(out.corpus.names(), ["a.pgm", "b.pgm", "c.pgm"]);
            rendered.push(out.dataset.render());
        }
        assert_eq!(rendered.len(), 6);
        assert!(rendered.windows(2).all(|w| w[0] == w[1]));
        assert!(rendered[0].starts_with(";image;nnodes;width;height;npixels;runtime_R;runtime_H;runtime_N\n"));
        assert!(rendered[0].contains("\n0;a.pgm;3;3;2;6;10;20;30\n"));
    }

    #[test]
    fn invocation_follows_the_order_code() {
        let root = tempdir().unwrap();
        let input_dir = corpus_dir(root.path());
        let registry = stub_registry(root.path());
        let cfg = HarnessConfig {
            samples: Some(1),
            seed: Some(1),
            ..quiet_config()
        };

        let args = RuntimeArgs {
            input_dir,
            registry,
            order: "nrh".to_string(),
        };
        let out = run(&cfg, &args, &LevelCountOracle).unwrap();
        assert_eq!(out.order.as_str(), "NRH");

        let calls = fs::read_to_string(root.path().join("calls.log")).unwrap();
        assert_eq!(calls, "N\nR\nH\n");
    }

    #[test]
    fn invalid_order_code_fails_before_measuring() {
        let root = tempdir().unwrap();
        let input_dir = corpus_dir(root.path());
        let registry = stub_registry(root.path());

        let args = RuntimeArgs {
            input_dir,
            registry,
            order: "RHB".to_string(),
        };
        let err = run(&quiet_config(), &args, &LevelCountOracle).unwrap_err();
        assert!(matches!(
            err,
            Error::OrderCode(OrderCodeError::UnknownVariant('B'))
        ));
        assert!(!root.path().join("calls.log").exists());
    }

    #[test]
    fn unparsable_output_aborts_the_run() {
        let root = tempdir().unwrap();
        let input_dir = corpus_dir(root.path());
        let bin = root.path().join("bin");
        fs::create_dir(&bin).unwrap();
        let good = stub_program(&bin, "good", "echo 'time elapsed: 1'");
        let bad = stub_program(&bin, "bad", "echo 'killed'");
        let registry = Registry::new(vec![
            Variant::timing('I', good, "runtime_incr_contour"),
            Variant::timing('N', bad, "runtime_non_incr_contour"),
        ]);

        let args = RuntimeArgs {
            input_dir,
            registry,
            order: VariantSet::TwoWay.default_order().to_string(),
        };
        assert!(matches!(
            run(&quiet_config(), &args, &LevelCountOracle),
            Err(Error::Extract { .. })
        ));
    }
}

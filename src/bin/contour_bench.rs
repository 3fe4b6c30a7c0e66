use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use contour_bench::harness::{ExitPolicy, HarnessConfig, Profile};
use contour_bench::oracle::TreeProgramOracle;
use contour_bench::schedule::permutations;
use contour_bench::schema::RunMeta;
use contour_bench::suites::{checkerboard, rescale, runtime, tree_stats};
use contour_bench::{Result, VariantSet};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Counterbalanced runtime dataset over the contour tracing variants.
    Runtime {
        /// Directory holding the input images.
        #[arg(short, long, value_name = "DIR", default_value = "../dataset-icdar/validation")]
        input_dir: PathBuf,

        /// Where to write the `;`-separated dataset.
        #[arg(short, long, value_name = "FILE", default_value = "runtime/runtime_0.csv")]
        output: PathBuf,

        /// Invocation order, one variant id per character (e.g. RHN, nhr).
        /// Defaults to the registry order of the chosen variant set.
        #[arg(short = 'e', long)]
        order: Option<String>,

        /// Which set of contour programs to benchmark.
        #[arg(long, value_enum, default_value_t = VariantSet::ThreeWay)]
        variants: VariantSet,

        /// Directory holding the perf_* programs.
        #[arg(long, value_name = "DIR", default_value = "../programs/build")]
        programs_dir: PathBuf,

        /// Tree-statistics program used to count max-tree nodes.
        #[arg(long, value_name = "PATH", default_value = "../programs/build/mtree_data")]
        tree_program: PathBuf,

        /// Abort when a variant exits non-zero, even if it printed its timing.
        #[arg(long, default_value_t = false)]
        require_success: bool,
    },

    /// Tree-statistics dataset (node and contour counters) per image.
    TreeStats {
        #[arg(short, long, value_name = "DIR", default_value = "../dataset-icdar/1920x1080/test")]
        input_dir: PathBuf,

        #[arg(short, long, value_name = "FILE", default_value = "tree_data/tree_data_0.csv")]
        output: PathBuf,

        #[arg(long, value_name = "PATH", default_value = "../programs/build/mtree_data")]
        program: PathBuf,
    },

    /// Downscale a seeded subsample of a corpus into another folder.
    Rescale {
        #[arg(short, long, value_name = "DIR", default_value = "1920x1080/test")]
        in_folder: PathBuf,

        #[arg(short, long, value_name = "DIR", default_value = "960x540/test")]
        out_folder: PathBuf,

        /// Scale factor applied to both dimensions.
        #[arg(short = 'r', long, default_value_t = 0.5)]
        scale: f64,

        /// Only log which files would be rescaled.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Write a synthetic N x N checkerboard image.
    Checkerboard {
        /// Side length in pixels.
        #[arg(long, default_value_t = 512)]
        size: u32,

        #[arg(short, long, value_name = "FILE", default_value = checkerboard::DEFAULT_FILE)]
        output: PathBuf,
    },

    /// Print every valid order code for a variant set, one per line.
    Orders {
        #[arg(long, value_enum, default_value_t = VariantSet::ThreeWay)]
        variants: VariantSet,
    },
}

#[derive(Parser, Debug)]
#[command(name = "contour-bench")]
#[command(about = "Counterbalanced contour tracing benchmark harness (;-separated datasets)")]
struct Args {
    /// Settling delay preset between program invocations (quick: 2s, full: 5s).
    #[arg(long, value_enum, default_value_t = ProfileArg::Quick, global = true)]
    profile: ProfileArg,

    /// Override the settling delay, in milliseconds.
    #[arg(long, global = true)]
    settle_ms: Option<u64>,

    /// Seed for shuffling the corpus; without it the listing order is used.
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Number of images to keep after shuffling.
    #[arg(short = 'n', long = "samples", global = true)]
    samples: Option<usize>,

    /// Also write a JSON run-metadata sidecar to this path.
    #[arg(long, value_name = "FILE", global = true)]
    meta: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

fn harness_config(args: &Args) -> HarnessConfig {
    let mut cfg = HarnessConfig::new(args.profile.into());
    cfg.seed = args.seed;
    cfg.samples = args.samples;
    if let Some(ms) = args.settle_ms {
        cfg.settle = Duration::from_millis(ms);
    }
    cfg
}

fn run(args: Args) -> Result<()> {
    let mut cfg = harness_config(&args);

    match args.cmd {
        Command::Runtime {
            input_dir,
            output,
            order,
            variants,
            programs_dir,
            tree_program,
            require_success,
        } => {
            if require_success {
                cfg.exit_policy = ExitPolicy::RequireSuccess;
            }
            let rt_args = runtime::RuntimeArgs {
                input_dir,
                registry: variants.registry(&programs_dir),
                order: order.unwrap_or_else(|| variants.default_order().to_string()),
            };
            let oracle = TreeProgramOracle::new(&tree_program)?;
            let out = runtime::run(&cfg, &rt_args, &oracle)?;
            out.dataset.write(&output)?;

            if let Some(meta) = &args.meta {
                RunMeta::new("runtime", &cfg, &out.corpus, Some(out.order.as_str())).write(meta)?;
            }
        }
        Command::TreeStats {
            input_dir,
            output,
            program,
        } => {
            let ts_args = tree_stats::TreeStatsArgs { input_dir, program };
            let (corpus, dataset) = tree_stats::run(&cfg, &ts_args)?;
            dataset.write(&output)?;

            if let Some(meta) = &args.meta {
                RunMeta::new("tree-stats", &cfg, &corpus, None).write(meta)?;
            }
        }
        Command::Rescale {
            in_folder,
            out_folder,
            scale,
            dry_run,
        } => {
            let rs_args = rescale::RescaleArgs {
                in_folder,
                out_folder,
                scale,
                dry_run,
            };
            let corpus = rescale::run(&cfg, &rs_args)?;

            if let Some(meta) = &args.meta {
                RunMeta::new("rescale", &cfg, &corpus, None).write(meta)?;
            }
        }
        Command::Checkerboard { size, output } => {
            checkerboard::run(size, &output)?;
        }
        Command::Orders { variants } => {
            let registry = variants.registry(&PathBuf::new());
            for code in permutations(&registry) {
                println!("{code}");
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "arguments");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

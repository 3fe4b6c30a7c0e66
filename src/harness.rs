use std::thread;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Short settling delay, for smoke runs and small corpora.
    #[default]
    Quick,
    /// Long settling delay, for the datasets that go into analysis.
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }

    pub fn settle_delay(&self) -> Duration {
        match self {
            Profile::Quick => Duration::from_secs(2),
            Profile::Full => Duration::from_secs(5),
        }
    }
}

/// What to do with a variant that exits non-zero but still prints its metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Only the output content decides success.
    #[default]
    Ignore,
    /// A non-zero exit aborts the run.
    RequireSuccess,
}

#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub profile: Profile,
    pub seed: Option<u64>,
    pub samples: Option<usize>,
    pub settle: Duration,
    pub settle_before_first: bool,
    pub exit_policy: ExitPolicy,
}

impl HarnessConfig {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            seed: None,
            samples: None,
            settle: profile.settle_delay(),
            settle_before_first: true,
            exit_policy: ExitPolicy::Ignore,
        }
    }

    /// Seeded generator for corpus shuffling, `None` when the run is not reproducible.
    pub fn rng(&self) -> Option<ChaCha8Rng> {
        self.seed.map(ChaCha8Rng::seed_from_u64)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new(Profile::default())
    }
}

/// Unconditional pause between external invocations.
pub fn settle(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

/// Run `f` and report the wall-clock time it took alongside its result.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

//! Counterbalanced invocation order.
//!
//! An order code is a permutation of the registry's variant ids. One run uses a
//! single code for every sample; bias from cache state, thermal drift and OS
//! scheduling is cancelled across runs by cycling through all codes, never by
//! reordering within a run.

use std::fmt;
use std::time::Duration;

use crate::error::OrderCodeError;
use crate::harness::HarnessConfig;
use crate::registry::Registry;

/// Validated total ordering of a registry, stored as variant indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderCode {
    code: String,
    order: Vec<usize>,
}

impl OrderCode {
    /// Parse `code` against `registry`, case-insensitively.
    pub fn parse(code: &str, registry: &Registry) -> Result<Self, OrderCodeError> {
        let chars: Vec<char> = code.chars().map(|c| c.to_ascii_uppercase()).collect();
        if chars.len() != registry.len() {
            return Err(OrderCodeError::WrongLength {
                code: code.to_string(),
                got: chars.len(),
                expected: registry.len(),
            });
        }

        let mut seen = vec![false; registry.len()];
        let mut order = Vec::with_capacity(chars.len());
        for &c in &chars {
            let idx = registry
                .position(c)
                .ok_or(OrderCodeError::UnknownVariant(c))?;
            if seen[idx] {
                return Err(OrderCodeError::Repeated(c));
            }
            seen[idx] = true;
            order.push(idx);
        }

        Ok(Self {
            code: chars.into_iter().collect(),
            order,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Variant indices in invocation order.
    pub fn indices(&self) -> &[usize] {
        &self.order
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Every order code for `registry`, lexicographic in variant index.
pub fn permutations(registry: &Registry) -> Vec<OrderCode> {
    let ids: Vec<char> = registry.variants().iter().map(|v| v.id).collect();
    let mut current: Vec<usize> = (0..ids.len()).collect();
    let mut out = Vec::new();

    loop {
        out.push(OrderCode {
            code: current.iter().map(|&i| ids[i]).collect(),
            order: current.clone(),
        });
        if !next_permutation(&mut current) {
            break;
        }
    }
    out
}

fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Settle(Duration),
    Invoke(usize),
}

/// The per-sample invocation sequence for one order code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    steps: Vec<Step>,
}

impl Schedule {
    pub fn new(order: &OrderCode, settle: Duration, settle_before_first: bool) -> Self {
        let mut steps = Vec::with_capacity(order.indices().len() * 2);
        for (n, &idx) in order.indices().iter().enumerate() {
            if n > 0 || settle_before_first {
                steps.push(Step::Settle(settle));
            }
            steps.push(Step::Invoke(idx));
        }
        Self { steps }
    }

    pub fn from_config(order: &OrderCode, cfg: &HarnessConfig) -> Self {
        Self::new(order, cfg.settle, cfg.settle_before_first)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

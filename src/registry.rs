//! Named algorithm variants and the programs behind them.

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::extract::MetricPattern;
use crate::invoke::ProgramCall;

/// One benchmarked implementation reached through `<program> <sample>`.
#[derive(Clone, Debug)]
pub struct Variant {
    pub id: char,
    pub program: PathBuf,
    pub pattern: MetricPattern,
    /// Dataset column for each pattern field, same order as `pattern.fields()`.
    pub columns: Vec<String>,
}

impl Variant {
    /// Single-field timing variant writing its `runtime` into `column`.
    pub fn timing(id: char, program: PathBuf, column: &str) -> Self {
        Self {
            id: id.to_ascii_uppercase(),
            program,
            pattern: MetricPattern::runtime(),
            columns: vec![column.to_string()],
        }
    }

    /// Tree-statistics variant; columns are named after the pattern fields.
    pub fn tree_stats(id: char, program: PathBuf) -> Self {
        let pattern = MetricPattern::tree_stats();
        let columns = pattern.fields().to_vec();
        Self {
            id: id.to_ascii_uppercase(),
            program,
            pattern,
            columns,
        }
    }

    pub fn call(&self, sample: &Path) -> ProgramCall {
        ProgramCall::on_sample(&self.program, sample)
    }
}

/// Fixed, ordered set of variants for one run.
#[derive(Clone, Debug)]
pub struct Registry {
    variants: Vec<Variant>,
}

impl Registry {
    pub fn new(variants: Vec<Variant>) -> Self {
        Self { variants }
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn position(&self, id: char) -> Option<usize> {
        let id = id.to_ascii_uppercase();
        self.variants.iter().position(|v| v.id == id)
    }

    pub fn ids(&self) -> String {
        self.variants.iter().map(|v| v.id).collect()
    }

    /// Metric columns in registry order, independent of invocation order.
    pub fn columns(&self) -> Vec<String> {
        self.variants
            .iter()
            .flat_map(|v| v.columns.iter().cloned())
            .collect()
    }
}

/// Built-in sets of contour tracing programs.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum VariantSet {
    /// Red-black tree incremental, hashmap incremental, non-incremental (R, H, N).
    #[default]
    ThreeWay,
    /// Incremental and non-incremental (I, N).
    TwoWay,
}

impl VariantSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantSet::ThreeWay => "three-way",
            VariantSet::TwoWay => "two-way",
        }
    }

    pub fn default_order(&self) -> &'static str {
        match self {
            VariantSet::ThreeWay => "RHN",
            VariantSet::TwoWay => "IN",
        }
    }

    pub fn registry(&self, programs_dir: &Path) -> Registry {
        let non_incremental = Variant::timing(
            'N',
            programs_dir.join("perf_non_incr_contour"),
            "runtime_non_incr_contour",
        );
        match self {
            VariantSet::ThreeWay => Registry::new(vec![
                Variant::timing(
                    'R',
                    programs_dir.join("perf_incr_contour_red_black_tree"),
                    "runtime_incr_contour_rb",
                ),
                Variant::timing(
                    'H',
                    programs_dir.join("perf_incr_contour_hashmap"),
                    "runtime_incr_contour_hm",
                ),
                non_incremental,
            ]),
            VariantSet::TwoWay => Registry::new(vec![
                Variant::timing(
                    'I',
                    programs_dir.join("perf_incr_contour"),
                    "runtime_incr_contour",
                ),
                non_incremental,
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_way_registry_layout() {
        let reg = VariantSet::ThreeWay.registry(Path::new("/p"));
        assert_eq!(reg.ids(), "RHN");
        assert_eq!(
            reg.columns(),
            vec![
                "runtime_incr_contour_rb",
                "runtime_incr_contour_hm",
                "runtime_non_incr_contour"
            ]
        );
        assert_eq!(
            reg.variants()[1].program,
            Path::new("/p/perf_incr_contour_hashmap")
        );
    }

    #[test]
    fn two_way_registry_layout() {
        let reg = VariantSet::TwoWay.registry(Path::new("build"));
        assert_eq!(reg.ids(), VariantSet::TwoWay.default_order());
        assert_eq!(reg.columns(), vec!["runtime_incr_contour", "runtime_non_incr_contour"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let reg = VariantSet::ThreeWay.registry(Path::new("."));
        assert_eq!(reg.position('h'), Some(1));
        assert_eq!(reg.position('N'), Some(2));
        assert_eq!(reg.position('x'), None);
    }

    #[test]
    fn tree_stats_variant_columns_follow_pattern() {
        let v = Variant::tree_stats('t', PathBuf::from("mtree_data"));
        assert_eq!(v.id, 'T');
        assert_eq!(v.columns.len(), 5);
        assert_eq!(v.columns[0], "nnodes");
        assert_eq!(v.call(Path::new("a.png")).display(), "mtree_data a.png");
    }
}

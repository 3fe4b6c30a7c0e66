//! Metric extraction from unstructured program output.
//!
//! Patterns are searched, never anchored: anything around the match is ignored.
//! A miss is an error, never a default value.

use regex::Regex;

use crate::error::{ExtractError, Result};

/// Single `runtime` field printed by the timing programs.
pub const RUNTIME_PATTERN: &str = r"time elapsed:\s+(?P<runtime>\d+)";

/// The five consecutive lines printed by the tree-statistics program.
pub const TREE_STATS_PATTERN: &str = concat!(
    r"nnodes=\s*(?P<nnodes>\d+)[ \t]*\r?\n",
    r"sum_children=\s*(?P<sum_children>\d+)[ \t]*\r?\n",
    r"max_children=\s*(?P<max_children>\d+)[ \t]*\r?\n",
    r"sum_contour=\s*(?P<sum_contour>\d+)[ \t]*\r?\n",
    r"max_contour=\s*(?P<max_contour>\d+)",
);

/// Node count alone, used by the structural oracle.
pub const NODE_COUNT_PATTERN: &str = r"nnodes=\s*(?P<nnodes>\d+)";

/// Compiled pattern whose named groups are the fields it yields.
#[derive(Clone, Debug)]
pub struct MetricPattern {
    regex: Regex,
    fields: Vec<String>,
}

impl MetricPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        let fields = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();
        Ok(Self { regex, fields })
    }

    pub fn runtime() -> Self {
        Self::compiled(RUNTIME_PATTERN)
    }

    pub fn tree_stats() -> Self {
        Self::compiled(TREE_STATS_PATTERN)
    }

    pub fn node_count() -> Self {
        Self::compiled(NODE_COUNT_PATTERN)
    }

    // Only for the patterns defined in this module.
    fn compiled(pattern: &str) -> Self {
        match Self::new(pattern) {
            Ok(p) => p,
            Err(e) => unreachable!("built-in pattern failed to compile: {e}"),
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Named groups in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// First match in `text`, converted field by field.
    pub fn extract(&self, text: &str) -> std::result::Result<MetricRecord, ExtractError> {
        let caps = self
            .regex
            .captures(text)
            .ok_or_else(|| ExtractError::PatternMissing {
                pattern: self.regex.as_str().to_string(),
            })?;

        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let raw = caps.name(field).map(|m| m.as_str()).unwrap_or_default();
            let value = raw
                .parse::<u64>()
                .map_err(|_| ExtractError::NotAnInteger {
                    field: field.clone(),
                    value: raw.to_string(),
                })?;
            values.push((field.clone(), value));
        }
        Ok(MetricRecord { values })
    }
}

/// `{field: value}` pairs in pattern order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricRecord {
    values: Vec<(String, u64)>,
}

impl MetricRecord {
    pub fn get(&self, field: &str) -> Option<u64> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| *v)
    }

    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.values.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_is_found_anywhere_in_output() {
        let out = "loading img/lena.pgm\nbuilding tree\ntime elapsed: 1234\nbye\n";
        let rec = MetricPattern::runtime().extract(out).unwrap();
        assert_eq!(rec.get("runtime"), Some(1234));
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn first_match_wins() {
        let out = "time elapsed: 7\ntime elapsed: 9\n";
        let rec = MetricPattern::runtime().extract(out).unwrap();
        assert_eq!(rec.get("runtime"), Some(7));
    }

    #[test]
    fn tree_stats_yield_all_five_fields_in_order() {
        let out = "node.id= 0\n\nnnodes= 17\nsum_children= 16\nmax_children= 4\n\
                   sum_contour= 230\nmax_contour= 64\ntrailing noise\n";
        let pattern = MetricPattern::tree_stats();
        assert_eq!(
            pattern.fields(),
            ["nnodes", "sum_children", "max_children", "sum_contour", "max_contour"]
        );

        let rec = pattern.extract(out).unwrap();
        assert_eq!(rec.values().collect::<Vec<_>>(), vec![17, 16, 4, 230, 64]);
    }

    #[test]
    fn tree_stats_out_of_order_is_a_miss() {
        let out = "sum_children= 16\nnnodes= 17\nmax_children= 4\nsum_contour= 230\nmax_contour= 64\n";
        assert!(matches!(
            MetricPattern::tree_stats().extract(out),
            Err(ExtractError::PatternMissing { .. })
        ));
    }

    #[test]
    fn missing_pattern_is_an_error() {
        let err = MetricPattern::runtime()
            .extract("Segmentation fault\n")
            .unwrap_err();
        assert!(matches!(err, ExtractError::PatternMissing { .. }));
    }

    #[test]
    fn overflowing_value_is_rejected() {
        let err = MetricPattern::runtime()
            .extract("time elapsed: 99999999999999999999999\n")
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotAnInteger { ref field, .. } if field == "runtime"));
    }

    #[test]
    fn custom_patterns_expose_their_groups() {
        let p = MetricPattern::new(r"peak=(?P<peak>\d+) rss=(?P<rss>\d+)").unwrap();
        assert_eq!(p.fields(), ["peak", "rss"]);
        let rec = p.extract("peak=3 rss=4096").unwrap();
        assert_eq!(rec.get("rss"), Some(4096));
        assert_eq!(rec.get("nope"), None);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(MetricPattern::new("(?P<x>").is_err());
    }
}

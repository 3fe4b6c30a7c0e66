//! Tidy per-sample dataset and its delimited serialisation.
//!
//! Rows are appended in corpus order once a sample is fully measured and the
//! table is written once, at the end of a successful run.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Column separator; distinct from `,` and `.` used inside numbers elsewhere.
pub const DELIMITER: char = ';';

/// Identity and geometry of one corpus item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixel_count: u64,
    pub structural_feature: Option<u64>,
}

/// Quote a text field the way a CSV reader expects when it holds the
/// delimiter, a quote or a line break. Embedded quotes are doubled.
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([DELIMITER, '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasurementRow {
    pub sample: SampleInfo,
    /// One value per metric column, in column order.
    pub metrics: Vec<u64>,
}

#[derive(Clone, Debug)]
pub struct Dataset {
    structural_column: Option<String>,
    metric_columns: Vec<String>,
    rows: Vec<MeasurementRow>,
}

impl Dataset {
    pub fn new(structural_column: Option<&str>, metric_columns: Vec<String>) -> Self {
        Self {
            structural_column: structural_column.map(str::to_string),
            metric_columns,
            rows: Vec::new(),
        }
    }

    /// Full header, excluding the unnamed index column.
    pub fn columns(&self) -> Vec<String> {
        let mut cols = vec!["image".to_string()];
        if let Some(s) = &self.structural_column {
            cols.push(s.clone());
        }
        cols.extend(["width", "height", "npixels"].map(str::to_string));
        cols.extend(self.metric_columns.iter().cloned());
        cols
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a complete row; partial or duplicate rows are rejected.
    pub fn push(&mut self, row: MeasurementRow) -> Result<()> {
        if row.metrics.len() != self.metric_columns.len() {
            return Err(Error::RowShape {
                sample: row.sample.name,
                got: row.metrics.len(),
                expected: self.metric_columns.len(),
            });
        }
        if self.structural_column.is_some() && row.sample.structural_feature.is_none() {
            return Err(Error::MissingStructuralFeature(row.sample.name));
        }
        if self.rows.iter().any(|r| r.sample.name == row.sample.name) {
            return Err(Error::DuplicateSample(row.sample.name));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for col in self.columns() {
            out.push(DELIMITER);
            out.push_str(&quote_field(&col));
        }
        out.push('\n');

        for (idx, row) in self.rows.iter().enumerate() {
            let s = &row.sample;
            let _ = write!(out, "{idx}{DELIMITER}{}", quote_field(&s.name));
            if self.structural_column.is_some() {
                let _ = write!(out, "{DELIMITER}{}", s.structural_feature.unwrap_or_default());
            }
            let _ = write!(
                out,
                "{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
                s.width, s.height, s.pixel_count
            );
            for v in &row.metrics {
                let _ = write!(out, "{DELIMITER}{v}");
            }
            out.push('\n');
        }
        out
    }

    /// Serialise the whole table to `path` in one write.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        tracing::info!(path = %path.display(), rows = self.len(), "dataset written");
        Ok(())
    }
}

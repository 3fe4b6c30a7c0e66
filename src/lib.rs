//! Measurement harness for contour tracing programs.
//!
//! Selects images from a corpus, runs externally built variants on each one in
//! a counterbalanced order with settling pauses in between, extracts the numbers
//! they print, and writes one tidy `;`-separated row per image.

pub mod corpus;
pub mod error;
pub mod extract;
pub mod harness;
pub mod inspect;
pub mod invoke;
pub mod oracle;
pub mod registry;
pub mod schedule;
pub mod schema;
pub mod suites;
pub mod table;

pub use error::{Error, Result};
pub use registry::VariantSet;

//! Error types shared by every harness component.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failure to pull metric fields out of a program's output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("output did not contain a match for pattern `{pattern}`")]
    PatternMissing { pattern: String },

    #[error("field `{field}` captured `{value}`, which is not a non-negative integer")]
    NotAnInteger { field: String, value: String },
}

/// Rejections for an order code that is not a total ordering of the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderCodeError {
    #[error("order code `{code}` has {got} entries, the registry has {expected} variants")]
    WrongLength {
        code: String,
        got: usize,
        expected: usize,
    },

    #[error("order code names unknown variant `{0}`")]
    UnknownVariant(char),

    #[error("order code repeats variant `{0}`")]
    Repeated(char),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to list corpus directory {path}: {source}")]
    Corpus {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("corpus {dir} holds a file name that is not valid UTF-8: {name:?}")]
    NonUtf8Name { dir: PathBuf, name: OsString },

    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} has unsupported pixel format {color:?}; only 8-bit samples are accepted")]
    UnsupportedPixelFormat {
        path: PathBuf,
        color: image::ColorType,
    },

    #[error("structural oracle failed: {0}")]
    Oracle(String),

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    ExitStatus { command: String, status: ExitStatus },

    #[error("extraction failed for `{command}`: {source}")]
    Extract {
        command: String,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    OrderCode(#[from] OrderCodeError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("sample `{0}` already has a row in the dataset")]
    DuplicateSample(String),

    #[error("row for `{sample}` carries {got} metrics, dataset expects {expected}")]
    RowShape {
        sample: String,
        got: usize,
        expected: usize,
    },

    #[error("schedule for `{sample}` never invoked variant `{variant}`")]
    VariantNotInvoked { sample: String, variant: char },

    #[error("row for `{0}` is missing its structural feature")]
    MissingStructuralFeature(String),

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Errors raised while reading, translating and writing instance files

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::Format;

/// Everything that can go wrong during a conversion
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source path does not resolve to a file
    #[error("Instance file not found: {0}")]
    NotFound(PathBuf),
    /// The source extension is outside of [Format::SUPPORTED_INPUT]
    #[error("Input file format is not supported: `{0}`")]
    UnsupportedInputFormat(String),
    /// The target extension is outside of [Format::SUPPORTED_OUTPUT]
    #[error("Output file format is not supported: `{0}`")]
    UnsupportedOutputFormat(String),
    /// No hand-written translator exists for the dialect
    #[error("Parsing for the format is not implemented: {0}")]
    NoParser(Format),
    /// A required structural marker is missing or does not match
    #[error("{context} is malformed: {reason}")]
    Malformed {
        /// file name or buffer description
        context: String,
        /// what was expected
        reason: String,
    },
    /// The input uses a construct the requested conversion cannot express
    #[error("construct not supported: {0}")]
    UnsupportedConstruct(String),
    /// Stochastic models can only be written as SMPS
    #[error("Stochastic models can only be exported to mps, not to {0}")]
    StochasticExport(Format),
    /// A vector datum backed by a data file is declared dense
    #[error("Vector data in data files should be stored in sparse form. It is not like that for: {0}")]
    DenseData(String),
    /// String data cannot be stored in external data files
    #[error("String data is not supported in external data files: {0}")]
    StringData(String),
    /// A model instance was asked to read a second file
    #[error("The Model can read the file only once (already loaded from {0})")]
    ReadOnlyOnce(PathBuf),
    /// The model has not read any file yet
    #[error("No model file has been read")]
    NotLoaded,
    /// `set` was called with a name the store does not track
    #[error("`{0}` is an unknown data item. Check the name provided.")]
    UnknownDataItem(String),
    /// `set` was called with a value of the other shape
    #[error("new value for `{0}` does not match its kind")]
    DataKindMismatch(String),
    /// The modeling engine collaborator reported a failure
    #[error("modeling engine error: {0}")]
    Engine(String),
    /// Reading or writing a file failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ConvertError {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::Malformed {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConvertError>;

//! The instance file formats known to the converter
use std::fmt;
use std::path::Path;

use crate::error::{ConvertError, Result};

/// A file format, identified by its extension
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Format {
    /// The MPL modeling language (`.mpl`)
    Mpl,
    /// The MPS matrix format (`.mps`), or its SMPS triple when stochastic
    Mps,
    /// The CPLEX-style LP format (`.lp`)
    Lp,
}

impl Format {
    /// Formats a model can be read from
    pub const SUPPORTED_INPUT: [Format; 3] = [Format::Mpl, Format::Mps, Format::Lp];
    /// Formats a model can be written to
    pub const SUPPORTED_OUTPUT: [Format; 3] = [Format::Mpl, Format::Mps, Format::Lp];

    /// The extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            Format::Mpl => "mpl",
            Format::Mps => "mps",
            Format::Lp => "lp",
        }
    }

    /// Case-insensitive lookup of an extension, with or without the dot
    ///
    /// ```
    /// use opt_convert::format::Format;
    ///
    /// assert_eq!(Format::from_extension("LP"), Some(Format::Lp));
    /// assert_eq!(Format::from_extension(".mps"), Some(Format::Mps));
    /// assert_eq!(Format::from_extension("trk"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Format> {
        let ext = ext.trim_start_matches('.');
        Self::SUPPORTED_INPUT
            .iter()
            .chain(Self::SUPPORTED_OUTPUT.iter())
            .copied()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    /// Classify a source file by its extension
    pub fn input_of(path: &Path) -> Result<Format> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
            .filter(|f| Self::SUPPORTED_INPUT.contains(f))
            .ok_or_else(|| ConvertError::UnsupportedInputFormat(ext.to_string()))
    }

    /// Classify a requested output format name
    pub fn output(name: &str) -> Result<Format> {
        Self::from_extension(name)
            .filter(|f| Self::SUPPORTED_OUTPUT.contains(f))
            .ok_or_else(|| ConvertError::UnsupportedOutputFormat(name.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

//! Per-conversion settings, passed explicitly to every component
use std::path::{Path, PathBuf};

/// Settings threaded through the translator, the splitter and the model
#[derive(Debug, Clone)]
pub struct Options {
    debug: bool,
    smps_compat: bool,
    output_dir: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    /// No debug artifacts, SMPS compatibility checks on,
    /// output written next to the source file
    pub fn new() -> Options {
        Options {
            debug: false,
            smps_compat: true,
            output_dir: None,
        }
    }

    /// Keep the intermediate MPL text produced when reading an .lp file
    pub fn with_debug(self, debug: bool) -> Options {
        Options { debug, ..self }
    }

    /// Reject explicit (INDEP) distributions when splitting SMPS files
    pub fn with_smps_compat(self, smps_compat: bool) -> Options {
        Options {
            smps_compat,
            ..self
        }
    }

    /// Write converted files into `dir` instead of the source directory
    pub fn with_output_dir(self, dir: impl Into<PathBuf>) -> Options {
        Options {
            output_dir: Some(dir.into()),
            ..self
        }
    }

    /// Whether debug artifacts are kept
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Whether the SMPS compatibility checks are enabled
    pub fn smps_compat(&self) -> bool {
        self.smps_compat
    }

    /// The directory output files go to, for a given source file
    pub fn output_dir_for<'a>(&'a self, source: &'a Path) -> &'a Path {
        match &self.output_dir {
            Some(dir) => dir,
            None => source.parent().unwrap_or_else(|| Path::new("")),
        }
    }
}

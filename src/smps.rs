//! Splitting of a combined stochastic .mps text into the SMPS triple
//! (`.cor`, `.tim`, `.sto`) and detection of stochastic .mps files.
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::options::Options;
use crate::util::{first_token, with_extension_appended, write_lines};

/// First token of the line opening the time section
pub const TIME_MARKER: &str = "TIME";
/// First token of the line opening the stochastic section
pub const STOCH_MARKER: &str = "STOCH";
/// Explicit distributions, rejected in compatibility mode
pub const INDEP_MARKER: &str = "INDEP";
/// End-of-data line of core and time files
pub const END_MARKER: &str = "ENDATA";

const DETECTION_MARKERS: [&str; 3] = [TIME_MARKER, "PERIODS", STOCH_MARKER];
const DETECTION_THRESHOLD: usize = 3;

/// The three parts of an SMPS model
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Section {
    /// deterministic core matrix
    Core,
    /// stage boundaries
    Time,
    /// scenario data
    Stochastic,
}

impl Section {
    /// Extension of the file holding this section
    pub fn extension(self) -> &'static str {
        match self {
            Section::Core => "cor",
            Section::Time => "tim",
            Section::Stochastic => "sto",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Core => "core",
            Section::Time => "time",
            Section::Stochastic => "stochastic",
        })
    }
}

/// The lines of a combined stochastic .mps text, by section
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StochasticSections {
    /// core lines, terminated by `ENDATA`
    pub core: Vec<String>,
    /// time lines, terminated by `ENDATA`
    pub time: Vec<String>,
    /// stochastic lines, left unterminated
    pub stochastic: Vec<String>,
}

impl StochasticSections {
    /// Lines of one section
    pub fn lines(&self, section: Section) -> &[String] {
        match section {
            Section::Core => &self.core,
            Section::Time => &self.time,
            Section::Stochastic => &self.stochastic,
        }
    }

    fn lines_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Core => &mut self.core,
            Section::Time => &mut self.time,
            Section::Stochastic => &mut self.stochastic,
        }
    }

    /// Write `<target>.cor`, `<target>.tim` and `<target>.sto`.
    /// `target` is a path without extension.
    pub fn write(&self, target: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(3);
        for section in [Section::Core, Section::Time, Section::Stochastic].iter().copied() {
            let path = with_extension_appended(target, section.extension());
            write_lines(&path, self.lines(section))?;
            debug!(path = %path.display(), %section, "smps file written");
            written.push(path);
        }
        Ok(written)
    }
}

/// Split a combined stochastic .mps text.
///
/// Lines go to the core section until a line starting with `TIME`, then to
/// the time section until a line starting with `STOCH`, then to the
/// stochastic section. The section only ever moves forward.
pub fn split(text: &str, options: &Options) -> Result<StochasticSections> {
    let mut sections = StochasticSections::default();
    let mut current = Section::Core;
    for (idx, line) in text.lines().enumerate() {
        let token = first_token(line);
        current = match (current, token) {
            (Section::Core, Some(TIME_MARKER)) => Section::Time,
            (Section::Time, Some(STOCH_MARKER)) => Section::Stochastic,
            (Section::Stochastic, Some(INDEP_MARKER)) if options.smps_compat() => {
                return Err(ConvertError::UnsupportedConstruct(format!(
                    "explicit {} distributions (line {})",
                    INDEP_MARKER,
                    idx + 1
                )));
            }
            (section, _) => section,
        };
        sections.lines_mut(current).push(line.to_string());
    }
    sections.core.push(END_MARKER.to_string());
    sections.time.push(END_MARKER.to_string());
    Ok(sections)
}

/// Split the combined file `combined` into the SMPS triple next to
/// `target` (a path without extension), then delete `combined`.
///
/// Nothing is written when splitting fails. The three files are not
/// written atomically.
pub fn split_file(combined: &Path, target: &Path, options: &Options) -> Result<Vec<PathBuf>> {
    let text = fs::read_to_string(combined)?;
    let sections = split(&text, options)?;
    let written = sections.write(target)?;
    fs::remove_file(combined)?;
    debug!(source = %combined.display(), "combined stochastic file removed");
    Ok(written)
}

/// Whether an .mps text describes a stochastic model, i.e. has at least
/// three lines opening a TIME, PERIODS or STOCH section.
///
/// ```
/// use opt_convert::smps::is_stochastic;
///
/// assert!(is_stochastic("NAME x\nTIME x\nPERIODS\nSTOCH x\n"));
/// assert!(!is_stochastic("NAME x\nROWS\nENDATA\n"));
/// ```
pub fn is_stochastic(text: &str) -> bool {
    let mut found = 0;
    for line in text.lines() {
        if let Some(token) = first_token(line) {
            if DETECTION_MARKERS.contains(&token) {
                found += 1;
                if found >= DETECTION_THRESHOLD {
                    return true;
                }
            }
        }
    }
    false
}

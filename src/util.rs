//! Small text helpers shared by the line-oriented readers
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// First whitespace-separated token of a line, if any
///
/// ```
/// use opt_convert::util::first_token;
///
/// assert_eq!(first_token("  TIME   SNDP"), Some("TIME"));
/// assert_eq!(first_token("   "), None);
/// ```
pub fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Whether `word` appears in `line` as a whole word, ignoring ASCII case
///
/// ```
/// use opt_convert::util::contains_word_ignore_case;
///
/// assert!(contains_word_ignore_case("x FREE", "free"));
/// assert!(contains_word_ignore_case("-inf <= y", "inf"));
/// assert!(!contains_word_ignore_case("freedom >= 0", "free"));
/// ```
pub fn contains_word_ignore_case(line: &str, word: &str) -> bool {
    line.split(|c: char| !is_name_char(c))
        .any(|w| w.eq_ignore_ascii_case(word))
}

/// Characters that may appear inside an LP variable or row name
pub(crate) fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || "_.!\"#$%&()/,;?@'`{}|~[]".contains(c)
}

/// Write lines separated by `\n`, with a final line break
pub(crate) fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> io::Result<()> {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    fs::write(path, out)
}

/// `stem` with `.ext` appended, keeping any dots already in the file name
pub(crate) fn with_extension_appended(stem: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// File name of `path` without its extension
pub(crate) fn file_stem(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ConvertError::malformed(path.display().to_string(), "no file stem"))
}

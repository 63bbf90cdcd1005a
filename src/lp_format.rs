//! Vocabulary of the .lp file format, and the fix-up applied to .lp files
//! written by the modeling engine
use std::collections::HashSet;

/// Comment marker of the .lp format
pub const COMMENT: char = '\\';

/// A section header of an .lp file
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Header {
    /// maximize objective
    Maximize,
    /// minimize objective
    Minimize,
    /// constraints ("subject to")
    Constraints,
    /// variable bounds
    Bounds,
    /// general integer declarations
    Integer,
    /// binary declarations
    Binary,
    /// end of the problem
    End,
}

const SYNONYMS: [(Header, &[&str]); 7] = [
    (Header::Maximize, &["maximize", "maximise", "maximum", "max"]),
    (Header::Minimize, &["minimize", "minimise", "minimum", "min"]),
    (Header::Constraints, &["subject to", "such that", "st", "s.t."]),
    (Header::Bounds, &["bounds", "bound"]),
    (Header::Integer, &["generals", "general", "gen", "integers", "integer"]),
    (Header::Binary, &["binaries", "binary", "bin"]),
    (Header::End, &["end"]),
];

impl Header {
    /// Recognize a header line. The whole line must be one of the synonyms,
    /// ignoring case and surrounding whitespace.
    ///
    /// ```
    /// use opt_convert::lp_format::Header;
    ///
    /// assert_eq!(Header::recognize("  Subject  To "), Some(Header::Constraints));
    /// assert_eq!(Header::recognize("MINIMIZE"), Some(Header::Minimize));
    /// assert_eq!(Header::recognize("max: x + y"), None);
    /// ```
    pub fn recognize(line: &str) -> Option<Header> {
        let normalized = line
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        if normalized.is_empty() {
            return None;
        }
        SYNONYMS
            .iter()
            .find(|(_, words)| words.contains(&normalized.as_str()))
            .map(|(header, _)| *header)
    }

    fn is_declaration(self) -> bool {
        matches!(self, Header::Integer | Header::Binary)
    }
}

/// The modeling engine writes every binary variable as a general integer.
/// Remove the given names from the declaration sections of an .lp text and
/// declare them again in a single `Binary` section placed right before `End`.
///
/// Declaration sections left without entries are dropped. Inside them, only
/// lines that are not indented can be headers.
pub fn patch_binaries<S: AsRef<str>>(lp: &str, binaries: &[S]) -> String {
    let mut names: Vec<&str> = Vec::with_capacity(binaries.len());
    for name in binaries {
        if !names.contains(&name.as_ref()) {
            names.push(name.as_ref());
        }
    }
    if names.is_empty() {
        return lp.to_string();
    }
    let binary: HashSet<&str> = names.iter().copied().collect();

    let mut out: Vec<String> = Vec::new();
    let mut section: Option<DeclarationSection> = None;
    let mut inserted = false;
    for line in lp.lines() {
        // declaration entries are indented, and may be named like a header
        let header = match section {
            Some(_) if line.starts_with(char::is_whitespace) => None,
            _ => Header::recognize(line),
        };
        match header {
            Some(header) => {
                if let Some(s) = section.take() {
                    s.flush_into(&mut out);
                }
                if header == Header::End && !inserted {
                    push_binary_section(&mut out, &names);
                    inserted = true;
                }
                if header.is_declaration() {
                    section = Some(DeclarationSection::new(line));
                } else {
                    out.push(line.to_string());
                }
            }
            None => match section.as_mut() {
                Some(s) => s.push(line, &binary),
                None => out.push(line.to_string()),
            },
        }
    }
    if let Some(s) = section.take() {
        s.flush_into(&mut out);
    }
    if !inserted {
        push_binary_section(&mut out, &names);
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn push_binary_section(out: &mut Vec<String>, names: &[&str]) {
    out.push("Binary".to_string());
    out.extend(names.iter().map(|name| format!("  {}", name)));
    out.push(String::new());
}

/// Lines of a Generals/Binary section being filtered
struct DeclarationSection {
    lines: Vec<String>,
    entries: usize,
}

impl DeclarationSection {
    fn new(header: &str) -> Self {
        DeclarationSection {
            lines: vec![header.to_string()],
            entries: 0,
        }
    }

    fn push(&mut self, line: &str, binary: &HashSet<&str>) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            self.lines.push(line.to_string());
            return;
        }
        let kept: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|t| !binary.contains(t))
            .collect();
        if kept.is_empty() {
            return;
        }
        self.entries += kept.len();
        if kept.len() == tokens.len() {
            self.lines.push(line.to_string());
        } else {
            self.lines.push(format!("  {}", kept.join(" ")));
        }
    }

    fn flush_into(self, out: &mut Vec<String>) {
        if self.entries > 0 {
            out.extend(self.lines);
        } else {
            // keep the spacing, drop the empty header
            out.extend(self.lines.into_iter().skip(1));
        }
    }
}

//! Translation of .lp text into the MPL modeling language.
//!
//! The .lp text is read line by line by a small state machine. The current
//! [Block] decides what happens to a line, and only a recognized
//! [Header] line moves the machine to another block. Free, binary and integer
//! declarations are collected on the way and written as MPL sections right
//! before the closing `END`.
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::lp_format::{self, Header};
use crate::util::{contains_word_ignore_case, first_token};

/// Finite value written in place of infinite bounds
pub const BIG_NUMBER: &str = "900000000000000000000";

const MPL_COMMENT: char = '!';
const MPL_END: &str = "END";
const SUBSTITUTION_NOTE: &str = "! Infinite bounds were replaced with 900000000000000000000";

/// Translate a model written in `dialect` into MPL text.
///
/// Only the .lp dialect has a translator; .mps and .mpl are read by the
/// modeling engine directly.
pub fn translate(dialect: Format, text: &str) -> Result<String> {
    match dialect {
        Format::Lp => LpTranslator::new().translate(text),
        Format::Mpl | Format::Mps => Err(ConvertError::NoParser(dialect)),
    }
}

/// The part of the .lp file being read
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Block {
    /// before the first header
    None,
    /// objective function
    Objective,
    /// constraints
    Constraints,
    /// variable bounds
    Bounds,
    /// general integer declarations
    IntegerDecl,
    /// binary declarations
    BinaryDecl,
}

impl Block {
    /// The block entered on a header line, `None` once the problem ends.
    pub fn enter(header: Header) -> Option<Block> {
        match header {
            Header::Maximize | Header::Minimize => Some(Block::Objective),
            Header::Constraints => Some(Block::Constraints),
            Header::Bounds => Some(Block::Bounds),
            Header::Integer => Some(Block::IntegerDecl),
            Header::Binary => Some(Block::BinaryDecl),
            Header::End => None,
        }
    }
}

/// MPL header written when switching blocks. Declaration headers are
/// deferred until the end of the problem.
fn mpl_header(header: Header) -> Option<&'static str> {
    match header {
        Header::Maximize => Some("MAXIMIZE"),
        Header::Minimize => Some("MINIMIZE"),
        Header::Constraints => Some("SUBJECT TO"),
        Header::Bounds => Some("BOUNDS"),
        Header::Integer | Header::Binary | Header::End => None,
    }
}

/// Kind of a declared variable
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Category {
    /// no bounds
    Free,
    /// 0 or 1
    Binary,
    /// general integer
    Integer,
}

impl Category {
    const ALL: [Category; 3] = [Category::Free, Category::Binary, Category::Integer];

    fn mpl_header(self) -> &'static str {
        match self {
            Category::Free => "FREE",
            Category::Binary => "BINARY",
            Category::Integer => "INTEGER",
        }
    }
}

/// Declared variables by category. A name is kept in one category only:
/// declaring it again under another category moves it there.
#[derive(Debug, Default, Clone)]
pub struct VariableBuckets {
    free: Vec<String>,
    binary: Vec<String>,
    integer: Vec<String>,
}

impl VariableBuckets {
    /// Record `name` under `category`
    ///
    /// ```
    /// use opt_convert::translate::{Category, VariableBuckets};
    ///
    /// let mut buckets = VariableBuckets::default();
    /// buckets.classify("x", Category::Free);
    /// buckets.classify("x", Category::Integer);
    /// assert!(buckets.get(Category::Free).is_empty());
    /// assert_eq!(buckets.get(Category::Integer), ["x"]);
    /// ```
    pub fn classify(&mut self, name: &str, category: Category) {
        for other in Category::ALL.iter().copied().filter(|c| *c != category) {
            self.bucket_mut(other).retain(|n| n != name);
        }
        let bucket = self.bucket_mut(category);
        if !bucket.iter().any(|n| n == name) {
            bucket.push(name.to_string());
        }
    }

    /// Names declared under `category`, in declaration order
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Free => &self.free,
            Category::Binary => &self.binary,
            Category::Integer => &self.integer,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Free => &mut self.free,
            Category::Binary => &mut self.binary,
            Category::Integer => &mut self.integer,
        }
    }
}

fn infinity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\binf(?:inity)?\b").expect("constant pattern"))
}

fn has_relation(line: &str) -> bool {
    line.contains(|c: char| c == '<' || c == '>' || c == '=')
}

fn explicit_label(line: &str) -> Option<&str> {
    let (label, _) = line.split_at(line.find(':')?);
    let label = label.trim();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// One-shot translator from .lp to MPL
#[derive(Debug)]
pub struct LpTranslator {
    block: Block,
    out: Vec<String>,
    buckets: VariableBuckets,
    pending_label: Option<String>,
    constraints: usize,
    substituted: bool,
    line_no: usize,
}

impl Default for LpTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl LpTranslator {
    /// A translator positioned before the first header
    pub fn new() -> LpTranslator {
        LpTranslator {
            block: Block::None,
            out: Vec::new(),
            buckets: VariableBuckets::default(),
            pending_label: None,
            constraints: 0,
            substituted: false,
            line_no: 0,
        }
    }

    /// Translate a complete .lp text. Lines after `End` are ignored.
    pub fn translate(mut self, text: &str) -> Result<String> {
        for raw in text.lines() {
            self.line_no += 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix(lp_format::COMMENT) {
                self.out.push(format!("{}{}", MPL_COMMENT, comment));
                continue;
            }
            match Header::recognize(line) {
                Some(header) => {
                    self.close_constraint()?;
                    match Block::enter(header) {
                        Some(block) => self.switch(block, header),
                        None => return self.finish(),
                    }
                }
                None => self.statement(line)?,
            }
        }
        Err(ConvertError::malformed(
            "lp text",
            format!("missing `End` after line {}", self.line_no),
        ))
    }

    fn switch(&mut self, block: Block, header: Header) {
        debug!(line = self.line_no, from = ?self.block, to = ?block, "lp block switch");
        self.block = block;
        if let Some(mpl) = mpl_header(header) {
            self.out.push(String::new());
            self.out.push(mpl.to_string());
        }
    }

    fn statement(&mut self, line: &str) -> Result<()> {
        match self.block {
            Block::None => {
                return Err(ConvertError::malformed(
                    "lp text",
                    format!("line {} is outside of any section: `{}`", self.line_no, line),
                ))
            }
            Block::Objective => self.out.push(line.replacen(": ", " = ", 1)),
            Block::Constraints => self.constraint(line),
            Block::Bounds => self.bound(line),
            Block::IntegerDecl => self.declare(line, Category::Integer),
            Block::BinaryDecl => self.declare(line, Category::Binary),
        }
        Ok(())
    }

    fn constraint(&mut self, line: &str) {
        let mut statement = line.to_string();
        if self.pending_label.is_none() {
            self.constraints += 1;
            let label = match explicit_label(line) {
                Some(label) => label.to_string(),
                None => {
                    let label = format!("c{}", self.constraints);
                    statement = format!("{}: {}", label, line);
                    label
                }
            };
            self.pending_label = Some(label);
        }
        if has_relation(line) {
            statement.push(';');
            self.pending_label = None;
        }
        self.out.push(statement);
    }

    fn bound(&mut self, line: &str) {
        if contains_word_ignore_case(line, "free") {
            if let Some(name) = first_token(line) {
                self.buckets.classify(name, Category::Free);
            }
            return;
        }
        let pattern = infinity_pattern();
        let statement = if pattern.is_match(line) {
            if !self.substituted {
                warn!(line = self.line_no, "infinite bound replaced with {}", BIG_NUMBER);
            }
            self.substituted = true;
            pattern.replace_all(line, BIG_NUMBER).into_owned()
        } else {
            line.to_string()
        };
        self.out.push(statement + ";");
    }

    fn declare(&mut self, line: &str, category: Category) {
        for name in line.split_whitespace() {
            self.buckets.classify(name, category);
        }
    }

    fn close_constraint(&self) -> Result<()> {
        match &self.pending_label {
            Some(label) => Err(ConvertError::malformed(
                "lp text",
                format!("constraint `{}` has no relational operator", label),
            )),
            None => Ok(()),
        }
    }

    fn finish(mut self) -> Result<String> {
        for category in Category::ALL.iter().copied() {
            let names = self.buckets.get(category);
            if names.is_empty() {
                continue;
            }
            self.out.push(String::new());
            self.out.push(category.mpl_header().to_string());
            self.out.extend(names.iter().map(|name| format!("{};", name)));
        }
        if self.substituted {
            self.out.push(SUBSTITUTION_NOTE.to_string());
        }
        self.out.push(String::new());
        self.out.push(MPL_END.to_string());
        debug!(
            constraints = self.constraints,
            lines = self.out.len(),
            "lp text translated"
        );

        let mut text = self.out.join("\n");
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_enter_their_block() {
        assert_eq!(Block::enter(Header::Maximize), Some(Block::Objective));
        assert_eq!(Block::enter(Header::Minimize), Some(Block::Objective));
        assert_eq!(Block::enter(Header::Constraints), Some(Block::Constraints));
        assert_eq!(Block::enter(Header::Bounds), Some(Block::Bounds));
        assert_eq!(Block::enter(Header::Integer), Some(Block::IntegerDecl));
        assert_eq!(Block::enter(Header::Binary), Some(Block::BinaryDecl));
        assert_eq!(Block::enter(Header::End), None);
    }

    #[test]
    fn declaration_headers_are_deferred() {
        assert_eq!(mpl_header(Header::Integer), None);
        assert_eq!(mpl_header(Header::Binary), None);
        assert_eq!(mpl_header(Header::Constraints), Some("SUBJECT TO"));
    }

    #[test]
    fn labels() {
        assert_eq!(explicit_label("cap: x + y <= 3"), Some("cap"));
        assert_eq!(explicit_label(" : x"), None);
        assert_eq!(explicit_label("x + y <= 3"), None);
    }

    #[test]
    fn continuation_keeps_label() {
        let mut t = LpTranslator::new();
        t.block = Block::Constraints;
        t.constraint("x + y");
        t.constraint("+ z >= 2");
        t.constraint("x <= 4");
        assert_eq!(t.out, ["c1: x + y", "+ z >= 2;", "c2: x <= 4;"]);
    }

    #[test]
    fn free_word_only() {
        let mut t = LpTranslator::new();
        t.bound("freedom <= 3");
        t.bound("x FREE");
        assert_eq!(t.out, ["freedom <= 3;"]);
        assert_eq!(t.buckets.get(Category::Free), ["x"]);
        assert!(!t.substituted);
    }
}

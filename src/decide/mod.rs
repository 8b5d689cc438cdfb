use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

// ===================================================================
// Line filter
// ===================================================================

/// Minimum trimmed length (in characters) for a line to be worth
/// annotating.
const MIN_LINE_LEN: usize = 10;

/// Markers that mark a trimmed line as a comment. `*` covers the
/// interior lines of block comments.
const COMMENT_MARKERS: &[&str] = &["//", "#", "/*", "*", "<!--"];

/// Why the filter rejected a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Blank,
    TooShort,
    Comment,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Blank => write!(f, "blank line"),
            Rejection::TooShort => write!(f, "shorter than {MIN_LINE_LEN} characters"),
            Rejection::Comment => write!(f, "comment line"),
        }
    }
}

/// Filter outcome for a single raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Annotatable. `code_start` is the character offset of the first
    /// non-whitespace character, where the annotation span begins.
    Eligible { code_start: usize },
    Ineligible(Rejection),
}

/// Decide whether a raw line is a candidate for annotation at all,
/// independent of the gate.
pub fn classify_line(raw: &str) -> LineClass {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LineClass::Ineligible(Rejection::Blank);
    }
    if trimmed.chars().count() < MIN_LINE_LEN {
        return LineClass::Ineligible(Rejection::TooShort);
    }
    if COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
        return LineClass::Ineligible(Rejection::Comment);
    }
    let code_start = raw.chars().take_while(|c| c.is_whitespace()).count();
    LineClass::Eligible { code_start }
}

// ===================================================================
// Message selector
// ===================================================================

/// The hash-derived values behind one line's decision, exposed so the
/// `explain` command can show its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derivation {
    pub digest: [u8; 32],
    /// Leading 32 bits of the digest, big-endian. `gate_value % 100`
    /// is compared against the gate percentage.
    pub gate_value: u32,
    /// Trailing 32 bits of the digest, big-endian. Indexes the catalog
    /// modulo its length.
    pub message_value: u32,
}

/// Hash a trimmed line and slice out the gate and message values.
pub fn derive(trimmed: &str) -> Derivation {
    let digest: [u8; 32] = Sha256::digest(trimmed.as_bytes()).into();
    let gate_value = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let message_value = u32::from_be_bytes([digest[28], digest[29], digest[30], digest[31]]);
    Derivation {
        digest,
        gate_value,
        message_value,
    }
}

/// Deterministically decide whether `trimmed` gets a message and which
/// one. Total over all strings: the same input and percentage always
/// produce the same answer, and nothing here can fail.
pub fn select_message<'a>(trimmed: &str, percentage: u8, catalog: &'a Catalog) -> Option<&'a str> {
    let derivation = derive(trimmed);
    if derivation.gate_value % 100 >= u32::from(percentage) {
        return None;
    }
    let index = derivation.message_value as usize % catalog.len();
    Some(catalog.get(index))
}

// ===================================================================
// Document annotation
// ===================================================================

/// One annotation anchored to a document line. `line` is 0-based;
/// columns are character offsets, spanning the trimmed text rather
/// than the indentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub message: String,
}

/// Run the filter and selector over every line of a document.
pub fn annotate_text(text: &str, percentage: u8, catalog: &Catalog) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    for (line, raw) in text.lines().enumerate() {
        let code_start = match classify_line(raw) {
            LineClass::Eligible { code_start } => code_start,
            LineClass::Ineligible(_) => continue,
        };
        let trimmed = raw.trim();
        if let Some(message) = select_message(trimmed, percentage, catalog) {
            annotations.push(Annotation {
                line,
                start_column: code_start,
                end_column: code_start + trimmed.chars().count(),
                message: message.to_string(),
            });
        }
    }
    annotations
}

//! Markup normalization: raw page text → logical lines.
//!
//! Three steps, always in this order:
//!
//! 1. drop every `<!-- ... -->` span (non-greedy, may cross lines)
//! 2. fold cell continuations back onto the row they belong to
//! 3. split on `\n`
//!
//! ```text
//! |-                          |-
//! | Some article       ──►    | Some article|| {{Status|pass|5}}
//! | {{Status|pass|5}}
//! ```
//!
//! [`source_lines`] keeps, for every logical line, where its bytes came from
//! in the raw page, so patches can be written back without normalizing the
//! rest of the page.

use crate::schema::Schema;
use std::{borrow::Cow, ops::Range};

/// Leading-token classification of a physical or logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    TableOpen,
    TableClose,
    RowSeparator,
    Caption,
    /// Starts with the cell token and is none of the above.
    Cell,
    Other,
}

impl LineKind {
    pub fn of(line: &str, schema: &Schema) -> Self {
        let line = line.trim_start();
        if line.starts_with(&schema.table_open) {
            Self::TableOpen
        } else if line.starts_with(&schema.table_close) {
            Self::TableClose
        } else if line.starts_with(&schema.row_separator) {
            Self::RowSeparator
        } else if !schema.caption_token.is_empty() && line.starts_with(&schema.caption_token) {
            Self::Caption
        } else if line.starts_with(&schema.cell_start) {
            Self::Cell
        } else {
            Self::Other
        }
    }
}

/// Raw byte ranges left over once every comment span is removed.
///
/// An opener without a matching closer is kept verbatim.
fn kept_spans(text: &str, schema: &Schema) -> Vec<Range<usize>> {
    let open = schema.comment_open.as_str();
    let close = schema.comment_close.as_str();

    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(start) = text[pos..].find(open).map(|i| pos + i) {
        let body = start + open.len();
        let Some(end) = text[body..].find(close) else {
            break;
        };
        spans.push(pos..start);
        pos = body + end + close.len();
    }
    spans.push(pos..text.len());
    spans.retain(|span| !span.is_empty());
    spans
}

/// Remove every comment span.
///
/// An opener without a matching closer is kept verbatim.
pub fn strip_comments<'a>(text: &'a str, schema: &Schema) -> Cow<'a, str> {
    if !text.contains(schema.comment_open.as_str()) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        kept_spans(text, schema)
            .into_iter()
            .map(|span| &text[span])
            .collect(),
    )
}

/// A stretch of comment-free text copied verbatim from the raw page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    /// Offset in the logical line (or in the stripped text while building).
    at: usize,
    /// Offset in the raw page.
    raw: usize,
    len: usize,
}

/// A logical line and the raw page bytes it was assembled from.
///
/// Bytes outside every run were synthesized while folding a continuation
/// (the inserted cell separator).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    runs: Vec<Run>,
}

impl SourceLine {
    /// Raw page range holding `range` of this line, if those bytes were
    /// copied from one contiguous raw span.
    pub fn raw_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        let run = self
            .runs
            .iter()
            .find(|run| run.at <= range.start && range.end <= run.at + run.len)?;
        let start = run.raw + (range.start - run.at);
        Some(start..start + range.len())
    }

    /// Append `stripped[range]`, recording which raw bytes it came from.
    fn append(&mut self, stripped: &str, range: Range<usize>, chunks: &[Run]) {
        let base = self.text.len();
        self.text.push_str(&stripped[range.clone()]);

        let first = chunks.partition_point(|chunk| chunk.at + chunk.len <= range.start);
        for chunk in chunks[first..].iter().take_while(|chunk| chunk.at < range.end) {
            let lo = range.start.max(chunk.at);
            let hi = range.end.min(chunk.at + chunk.len);
            if lo < hi {
                self.runs.push(Run {
                    at: base + (lo - range.start),
                    raw: chunk.raw + (lo - chunk.at),
                    len: hi - lo,
                });
            }
        }
    }
}

/// Normalize `text` into logical lines that remember their raw origin.
///
/// Continuations are only folded inside a table, and only onto a previous
/// line that is itself a cell line, so template parameters written one per
/// line outside tables never merge.
pub fn source_lines(text: &str, schema: &Schema) -> Vec<SourceLine> {
    let mut stripped = String::with_capacity(text.len());
    let mut chunks = Vec::new();
    for span in kept_spans(text, schema) {
        chunks.push(Run {
            at: stripped.len(),
            raw: span.start,
            len: span.len(),
        });
        stripped.push_str(&text[span]);
    }

    let mut lines: Vec<SourceLine> = Vec::new();
    let mut in_table = false;
    let mut offset = 0;

    for physical in stripped.split('\n') {
        let start = offset;
        let end = start + physical.len();
        offset = end + 1;
        let kind = LineKind::of(physical, schema);

        let continues_cell = in_table
            && kind == LineKind::Cell
            && lines
                .last()
                .is_some_and(|prev| LineKind::of(&prev.text, schema) == LineKind::Cell);

        if continues_cell && let Some(prev) = lines.last_mut() {
            let trimmed = physical.trim_start();
            let rest = trimmed
                .strip_prefix(schema.cell_separator.as_str())
                .or_else(|| trimmed.strip_prefix(schema.cell_start.as_str()))
                .unwrap_or(trimmed);
            prev.text.push_str(&schema.cell_separator);
            prev.append(&stripped, end - rest.len()..end, &chunks);
            continue;
        }

        match kind {
            LineKind::TableOpen => in_table = true,
            LineKind::TableClose => in_table = false,
            _ => {}
        }
        let mut line = SourceLine::default();
        line.append(&stripped, start..end, &chunks);
        lines.push(line);
    }

    lines
}

/// Normalize `text` into its logical line sequence.
pub fn logical_lines(text: &str, schema: &Schema) -> Vec<String> {
    source_lines(text, schema)
        .into_iter()
        .map(|line| line.text)
        .collect()
}

/// Logical lines joined back into one document.
pub fn normalized_text(text: &str, schema: &Schema) -> String {
    logical_lines(text, schema).join("\n")
}

// ============================================================================
// Tests
// ============================================================================

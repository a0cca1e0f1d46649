//! Surgical status-marker rewriting.
//!
//! Edits are addressed by `(line_number, template_index)` in the logical
//! line space produced by [`crate::normalize::logical_lines`], and anchored by
//! the exact marker text captured at extraction. Each splice is mapped back
//! onto the raw page, so comments, split rows and line endings outside the
//! spliced spans are reproduced byte for byte.
//!
//! An edit whose anchor is no longer on its line is skipped. Callers treat
//! that as "already applied or invalidated" and re-extract before the next
//! round of edits.

use crate::extract::StatusEntry;
use crate::normalize::{SourceLine, source_lines};
use crate::schema::Grammar;
use std::{collections::BTreeMap, ops::Range};

/// Desired new state for one extracted marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EntryEdit {
    pub line_number: usize,
    pub template_index: usize,
    pub original_template: String,
    /// Offset of the marker within its line at extraction time. Preferred
    /// over a first-occurrence search when it still points at the anchor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub relative_position: Option<usize>,
    pub new_status: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub new_score: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub new_remark: Option<String>,
}

impl EntryEdit {
    /// Start an edit from an extracted entry.
    pub fn for_entry(entry: &StatusEntry, new_status: impl Into<String>) -> Self {
        Self {
            line_number: entry.line_number,
            template_index: entry.template_index,
            original_template: entry.original_template.clone(),
            relative_position: Some(entry.relative_position),
            new_status: new_status.into(),
            new_score: None,
            new_remark: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.new_score = Some(score);
        self
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.new_remark = Some(remark.into());
        self
    }
}

/// Patched text plus what happened to each edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    pub applied: usize,
    pub skipped: usize,
}

impl Patched {
    pub fn is_unchanged(&self) -> bool {
        self.applied == 0
    }
}

/// Apply `edits` to the raw page `text`.
///
/// Only the spliced marker spans change. A marker that cannot be traced to
/// one contiguous stretch of the raw page (it straddles a removed comment
/// or a folded line break) is skipped like a stale one.
pub fn apply_edits(text: &str, edits: &[EntryEdit], grammar: &Grammar) -> Patched {
    let lines = source_lines(text, grammar.schema());

    let mut by_line: BTreeMap<usize, Vec<&EntryEdit>> = BTreeMap::new();
    for edit in edits {
        by_line.entry(edit.line_number).or_default().push(edit);
    }

    let mut raw_splices = Vec::new();
    let mut applied = 0;
    let mut skipped = 0;
    for (line_number, mut group) in by_line {
        let Some(source) = lines.get(line_number) else {
            skipped += group.len();
            continue;
        };
        group.sort_by_key(|edit| edit.template_index);

        let mut line = LineEdits::new(source);
        for edit in group {
            match line.apply(edit, grammar) {
                Some(splice) => {
                    raw_splices.push(splice);
                    applied += 1;
                }
                None => skipped += 1,
            }
        }
    }

    Patched {
        text: splice_raw(text, raw_splices),
        applied,
        skipped,
    }
}

/// Replace each raw range with its text. Ranges never overlap.
fn splice_raw(text: &str, mut splices: Vec<(Range<usize>, String)>) -> String {
    splices.sort_by_key(|(range, _)| range.start);

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for (range, replacement) in splices {
        out.push_str(&text[pos..range.start]);
        out.push_str(&replacement);
        pos = range.end;
    }
    out.push_str(&text[pos..]);
    out
}

/// A splice already made on a line, in both coordinate spaces.
struct Splice {
    current: Range<usize>,
    original: Range<usize>,
}

impl Splice {
    fn delta(&self) -> isize {
        self.current.len() as isize - self.original.len() as isize
    }
}

/// One logical line under edit.
struct LineEdits<'a> {
    source: &'a SourceLine,
    current: String,
    done: Vec<Splice>,
}

impl<'a> LineEdits<'a> {
    fn new(source: &'a SourceLine) -> Self {
        Self {
            source,
            current: source.text.clone(),
            done: Vec::new(),
        }
    }

    /// Splice `edit` into the line, returning the raw page range it replaces.
    fn apply(&mut self, edit: &EntryEdit, grammar: &Grammar) -> Option<(Range<usize>, String)> {
        let anchor = edit.original_template.as_str();
        if anchor.is_empty() {
            return None;
        }

        let hinted = edit
            .relative_position
            .and_then(|pos| self.to_current(pos))
            .filter(|&pos| {
                self.current
                    .get(pos..)
                    .is_some_and(|rest| rest.starts_with(anchor))
            })
            .map(|pos| pos..pos + anchor.len())
            .filter(|range| self.is_untouched(range));
        let range = hinted.or_else(|| {
            self.current
                .match_indices(anchor)
                .map(|(pos, _)| pos..pos + anchor.len())
                .find(|range| self.is_untouched(range))
        })?;

        let original = self.to_original(&range);
        let raw = self.source.raw_range(original.clone())?;
        let replacement = render_marker(edit, &self.current[range.end..], grammar);

        self.current.replace_range(range.clone(), &replacement);
        let splice = Splice {
            current: range.start..range.start + replacement.len(),
            original,
        };
        for earlier in &mut self.done {
            if earlier.current.start >= range.end {
                earlier.current = shift(&earlier.current, splice.delta());
            }
        }
        self.done.push(splice);

        Some((raw, replacement))
    }

    fn is_untouched(&self, range: &Range<usize>) -> bool {
        self.done
            .iter()
            .all(|s| range.end <= s.current.start || s.current.end <= range.start)
    }

    /// Current offset of original offset `pos`, unless it was spliced away.
    fn to_current(&self, pos: usize) -> Option<usize> {
        let mut delta = 0;
        for s in &self.done {
            if s.original.end <= pos {
                delta += s.delta();
            } else if s.original.start <= pos {
                return None;
            }
        }
        pos.checked_add_signed(delta)
    }

    /// Original range of an untouched current range.
    fn to_original(&self, range: &Range<usize>) -> Range<usize> {
        let delta: isize = self
            .done
            .iter()
            .filter(|s| s.current.end <= range.start)
            .map(Splice::delta)
            .sum();
        shift(range, -delta)
    }
}

fn shift(range: &Range<usize>, delta: isize) -> Range<usize> {
    let start = range.start.saturating_add_signed(delta);
    start..start + range.len()
}

/// Marker text for `edit`, plus a remark annotation when one is due.
///
/// `following` is the line text right after the original marker.
fn render_marker(edit: &EntryEdit, following: &str, grammar: &Grammar) -> String {
    let schema = grammar.schema();
    let accepted = schema.is_accepted_status(&edit.new_status);

    let mut marker = format!("{{{{{}|{}", schema.marker_template, edit.new_status);
    if accepted && let Some(score) = edit.new_score.filter(|s| s.is_finite()) {
        marker.push('|');
        marker.push_str(&score.to_string());
    }
    marker.push_str("}}");

    let remark = edit
        .new_remark
        .as_deref()
        .map(str::trim)
        .filter(|remark| !remark.is_empty());
    if accepted
        && let Some(remark) = remark
        && !grammar.remark().is_match(following)
    {
        marker.push_str(&schema.remark_prefix);
        marker.push_str(remark);
        marker.push_str(&schema.remark_suffix);
    }

    marker
}

// ============================================================================
// Tests
// ============================================================================

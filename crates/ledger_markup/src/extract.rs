//! Status entry extraction.
//!
//! This is the only place status markers are recognized. Tallying, pending
//! listings and edit provenance all come out of [`parse_ledger`].

use crate::normalize::logical_lines;
use crate::scan::table_rows;
use crate::schema::{Grammar, Schema};

/// One status marker found in a table row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatusEntry {
    /// Text of the row's first cell.
    pub entry_name: String,
    /// First marker argument, verbatim. Empty means unreviewed.
    pub status: String,
    pub score: Option<f64>,
    /// Index into the logical line sequence.
    pub line_number: usize,
    /// Ordinal of this marker within its line, left to right.
    pub template_index: usize,
    /// Byte offset of the marker within its line.
    pub relative_position: usize,
    /// Byte offset of the first occurrence of the marker text in the
    /// normalized document. Diagnostic only.
    pub absolute_position: usize,
    /// Exact matched marker text; the patch anchor.
    pub original_template: String,
    pub original_line: String,
}

impl StatusEntry {
    pub fn is_pending(&self, schema: &Schema) -> bool {
        schema.is_pending_status(&self.status)
    }
}

/// Per-page tally.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Aggregate {
    pub entry_count: usize,
    /// Unrounded sum; see [`crate::score::format_score`].
    pub total_score: f64,
}

impl Aggregate {
    fn record(&mut self, score: Option<f64>) {
        self.entry_count += 1;
        if let Some(score) = score {
            self.total_score += score;
        }
    }
}

/// Result of parsing one ledger page.
#[derive(Debug, Clone, Default)]
pub struct LedgerParse {
    pub entries: Vec<StatusEntry>,
    pub aggregate: Aggregate,
}

impl LedgerParse {
    /// Entries still awaiting review, in document order. Rows carrying a
    /// review-skip token are left out; they still count in the aggregate.
    pub fn pending<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = &'a StatusEntry> {
        self.entries.iter().filter(move |entry| {
            entry.is_pending(schema) && !schema.is_review_skipped(&entry.original_line)
        })
    }
}

/// Parse a raw ledger page into entries and its aggregate.
pub fn parse_ledger(text: &str, grammar: &Grammar) -> LedgerParse {
    let schema = grammar.schema();
    let lines = logical_lines(text, schema);
    let document = lines.join("\n");

    let mut parse = LedgerParse::default();
    for (line_number, line) in table_rows(&lines, schema) {
        let mut entry_name = None;

        for (template_index, caps) in grammar.marker().captures_iter(line).enumerate() {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let status = caps.get(1).map_or("", |m| m.as_str());
            let score = caps.get(2).and_then(|m| parse_score(m.as_str()));

            parse.aggregate.record(score);
            parse.entries.push(StatusEntry {
                entry_name: entry_name
                    .get_or_insert_with(|| first_cell_text(line, schema))
                    .clone(),
                status: status.to_owned(),
                score,
                line_number,
                template_index,
                relative_position: whole.start(),
                absolute_position: document.find(whole.as_str()).unwrap_or(0),
                original_template: whole.as_str().to_owned(),
                original_line: line.to_owned(),
            });
        }
    }

    parse
}

/// Numeric marker argument, read from its longest `digits[.digits]` prefix:
/// `1.2.3` scores 1.2, a bare `.` has no score.
fn parse_score(raw: &str) -> Option<f64> {
    let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut end = digits(raw);
    if raw[end..].starts_with('.') {
        end += 1 + digits(&raw[end + 1..]);
    }
    raw[..end].parse::<f64>().ok().filter(|score| score.is_finite())
}

/// Text of the first cell: after the leading cell token, up to the next
/// inline separator, minus one leading list marker.
fn first_cell_text(line: &str, schema: &Schema) -> String {
    let trimmed = line.trim_start();
    let Some(rest) = trimmed.strip_prefix(schema.cell_start.as_str()) else {
        return String::new();
    };
    let cell = rest
        .split(schema.cell_separator.as_str())
        .next()
        .unwrap_or(rest)
        .trim();
    let cell = cell
        .strip_prefix(|c: char| schema.entry_name_markers.contains(c))
        .unwrap_or(cell);
    cell.trim().to_owned()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const T: &str = "2026SFEditasonStatus";

    fn page<S: AsRef<str>>(rows: &[S]) -> String {
        let mut text = String::from("{| class=\"wikitable\"\n! 条目 !! 状态\n");
        for row in rows {
            text.push_str("|-\n");
            text.push_str(row.as_ref());
            text.push('\n');
        }
        text.push_str("|}\n");
        text
    }

    fn parse(text: &str) -> LedgerParse {
        parse_ledger(text, Grammar::standard())
    }

    #[test]
    fn test_no_markers_no_entries() {
        let result = parse(&page(&["| [[A]] || nothing here"]));
        assert!(result.entries.is_empty());
        assert_eq!(result.aggregate, Aggregate::default());
    }

    #[test]
    fn test_counts_and_sums() {
        let text = page(&[
            format!("| [[A]] || {{{{{T}|pass|5}}}}"),
            format!("| [[B]] || {{{{{T}|pending}}}}"),
            format!("| [[C]] || {{{{{T}|pass|2.25}}}}"),
        ]);
        let result = parse(&text);
        assert_eq!(result.aggregate.entry_count, 3);
        assert_eq!(result.aggregate.total_score, 7.25);
        assert_eq!(result.entries[1].score, None);
    }

    #[test]
    fn test_markers_outside_tables_do_not_count() {
        let text = format!("{{{{{T}|pass|5}}}}\n{}", page::<&str>(&[]));
        assert_eq!(parse(&text).aggregate.entry_count, 0);
    }

    #[test]
    fn test_commented_marker_does_not_count() {
        let text = page(&[format!("| [[A]] || <!-- {{{{{T}|pass|5}}}} -->")]);
        assert_eq!(parse(&text).aggregate.entry_count, 0);
    }

    #[test]
    fn test_import_log_row_with_marker_does_not_count() {
        let text = page(&[format!(
            "| [[Special:日志/import|导入]] type=import || {{{{{T}|pass|5}}}}"
        )]);
        assert_eq!(parse(&text).aggregate.entry_count, 0);
    }

    #[test]
    fn test_malformed_score_uses_numeric_prefix() {
        let text = page(&[format!("| [[A]] || {{{{{T}|pass|1.2.3}}}}")]);
        let result = parse(&text);
        assert_eq!(result.aggregate.entry_count, 1);
        assert_eq!(result.aggregate.total_score, 1.2);
        assert_eq!(result.entries[0].score, Some(1.2));
        assert_eq!(result.entries[0].status, "pass");
    }

    #[test]
    fn test_bare_dot_counts_without_score() {
        let text = page(&[format!("| [[A]] || {{{{{T}|pass|.}}}}")]);
        let result = parse(&text);
        assert_eq!(result.aggregate.entry_count, 1);
        assert_eq!(result.aggregate.total_score, 0.0);
        assert_eq!(result.entries[0].score, None);
    }

    #[test]
    fn test_parse_score_prefixes() {
        assert_eq!(parse_score("5"), Some(5.0));
        assert_eq!(parse_score("2.25"), Some(2.25));
        assert_eq!(parse_score("3."), Some(3.0));
        assert_eq!(parse_score(".5"), Some(0.5));
        assert_eq!(parse_score("1..2"), Some(1.0));
        assert_eq!(parse_score("."), None);
    }

    #[test]
    fn test_empty_status_is_unreviewed_entry() {
        let text = page(&[format!("| [[A]] || {{{{{T}|}}}}")]);
        let result = parse(&text);
        assert_eq!(result.aggregate.entry_count, 1);
        assert!(result.entries[0].is_pending(Grammar::standard().schema()));
    }

    #[test]
    fn test_multiple_markers_on_one_line() {
        let line = format!("| [[A]] || {{{{{T}|pass|1}}}} {{{{{T}|pending}}}}");
        let result = parse(&page(&[&line]));
        assert_eq!(result.entries.len(), 2);

        let first = &result.entries[0];
        let second = &result.entries[1];
        assert_eq!(first.template_index, 0);
        assert_eq!(second.template_index, 1);
        assert_eq!(first.line_number, second.line_number);
        assert!(first.relative_position < second.relative_position);
    }

    #[test]
    fn test_provenance_reproduces_matched_text() {
        let line = format!("| [[A]] || {{{{{T}|pass|1}}}} and {{{{{T}|doing}}}}");
        let text = page(&[&line]);
        let result = parse(&text);
        let lines = logical_lines(&text, Grammar::standard().schema());

        for entry in &result.entries {
            let logical = &lines[entry.line_number];
            let span = &logical[entry.relative_position..][..entry.original_template.len()];
            assert_eq!(span, entry.original_template);
            assert_eq!(logical, &entry.original_line);
        }
    }

    #[test]
    fn test_absolute_position_points_into_document() {
        let text = page(&[format!("| [[A]] || {{{{{T}|pass|3}}}}")]);
        let result = parse(&text);
        let document = logical_lines(&text, Grammar::standard().schema()).join("\n");
        let entry = &result.entries[0];
        assert!(document[entry.absolute_position..].starts_with(&entry.original_template));
    }

    #[test]
    fn test_entry_name_from_first_cell() {
        let text = page(&[
            format!("| *[[Alpha]] || {{{{{T}|pass|1}}}}"),
            format!("| [[Beta|b]] || {{{{{T}|pass|1}}}}"),
        ]);
        let result = parse(&text);
        assert_eq!(result.entries[0].entry_name, "[[Alpha]]");
        assert_eq!(result.entries[1].entry_name, "[[Beta|b]]");
    }

    #[test]
    fn test_entry_name_for_split_row() {
        let text = format!("{{|\n|-\n| # [[Gamma]]\n| {{{{{T}|pending}}}}\n|}}");
        let result = parse(&text);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].entry_name, "[[Gamma]]");
    }

    #[test]
    fn test_pending_filter() {
        let text = page(&[
            format!("| [[A]] || {{{{{T}|pass|5}}}}"),
            format!("| [[B]] || {{{{{T}|Pending}}}}"),
            format!("| [[C]] || {{{{{T}|审核中}}}}"),
        ]);
        let result = parse(&text);
        let schema = Grammar::standard().schema();
        let names: Vec<&str> = result.pending(schema).map(|e| e.entry_name.as_str()).collect();
        assert_eq!(names, vec!["[[B]]", "[[C]]"]);
    }

    #[test]
    fn test_pending_skips_import_summary_rows() {
        let text = page(&[
            format!("| 导入日志汇总 || {{{{{T}|pending}}}}"),
            format!("| [[B]] || {{{{{T}|pending}}}}"),
        ]);
        let result = parse(&text);
        let schema = Grammar::standard().schema();
        let names: Vec<&str> = result.pending(schema).map(|e| e.entry_name.as_str()).collect();
        assert_eq!(names, vec!["[[B]]"]);
        assert_eq!(result.aggregate.entry_count, 2);
    }
}

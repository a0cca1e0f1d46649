//! Leaderboard rows and page assembly.

use crate::schema::Grammar;
use crate::score::format_score;
use crate::section::replace_table_section;
use crate::timestamp::{StampOutcome, update_timestamp_at};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// One participant as shown on the leaderboard.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ParticipantRecord {
    pub username: String,
    pub entry_count: usize,
    /// Already formatted with [`format_score`].
    pub total_score: f64,
    pub is_veteran: bool,
    pub page_title: String,
}

/// How usernames are decorated in a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStyle {
    #[default]
    Plain,
    /// Prefix non-veterans with the newcomer glyph.
    MarkNewcomers,
}

/// Sort by score, then entry count, both descending. Stable.
pub fn rank<'a, I>(records: I) -> Vec<&'a ParticipantRecord>
where
    I: IntoIterator<Item = &'a ParticipantRecord>,
{
    let mut ranked: Vec<_> = records.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| b.entry_count.cmp(&a.entry_count))
    });
    ranked
}

/// Render body rows for `records` in ranked order.
///
/// The result starts with a row separator and has no trailing newline, as
/// [`replace_table_section`] expects.
pub fn render_rows<'a, I>(records: I, style: RowStyle, grammar: &Grammar) -> String
where
    I: IntoIterator<Item = &'a ParticipantRecord>,
{
    let schema = grammar.schema();
    let ranked = rank(records);

    if ranked.is_empty() {
        return format!(
            "{}\n{} colspan=\"{}\" style=\"text-align: center;\" {} {}",
            schema.row_separator,
            schema.cell_start,
            schema.column_count,
            schema.cell_start,
            schema.no_data_label
        );
    }

    let mut out = String::new();
    for (index, record) in ranked.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let glyph = match style {
            RowStyle::MarkNewcomers if !record.is_veteran => schema.newcomer_glyph.as_str(),
            _ => "",
        };
        let sep = &schema.cell_separator;
        let _ = write!(
            out,
            "{row}\n{cell} {rank} {sep} {glyph}[[{ns}:{user}|{user}]] {sep} {count} {sep} {score} {sep} [[{page}|{label}]]",
            row = schema.row_separator,
            cell = schema.cell_start,
            rank = index + 1,
            ns = schema.user_namespace,
            user = record.username,
            count = record.entry_count,
            score = format_score(record.total_score),
            page = record.page_title,
            label = schema.page_link_label,
        );
    }
    out
}

/// Result of rebuilding the leaderboard page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub text: String,
    pub stamp: StampOutcome,
}

/// Refresh the stamp and rebuild all three ranking tables of `page`.
///
/// Sections whose anchors are missing are left as they are.
pub fn render_leaderboard(
    page: &str,
    records: &[ParticipantRecord],
    grammar: &Grammar,
    now: DateTime<Utc>,
) -> Leaderboard {
    let schema = grammar.schema();
    let stamped = update_timestamp_at(page, grammar, now);

    let all = render_rows(records, RowStyle::MarkNewcomers, grammar);
    let veterans = render_rows(records.iter().filter(|r| r.is_veteran), RowStyle::Plain, grammar);
    let newcomers = render_rows(records.iter().filter(|r| !r.is_veteran), RowStyle::Plain, grammar);

    let text = replace_table_section(&stamped.text, &schema.section_all, &all, schema);
    let text = replace_table_section(&text, &schema.section_veteran, &veterans, schema);
    let text = replace_table_section(&text, &schema.section_newcomer, &newcomers, schema);

    Leaderboard {
        text,
        stamp: stamped.outcome,
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Document-schema anchors and the compiled marker grammar.
//!
//! Every fixed substring the engine searches for lives in [`Schema`]. The
//! defaults describe the current revision of the editathon pages; a page
//! layout change is a schema change, never an algorithm change.
//!
//! [`Grammar`] compiles the regex-backed parts of a schema once so that
//! every component borrows the same patterns:
//!
//! | Pattern    | Matches                                                   |
//! |------------|-----------------------------------------------------------|
//! | marker     | `{{2026SFEditasonStatus|pass|5}}`, `{{...|pending}}`      |
//! | banner     | `{{mbox|type=policy|text={{center|已提交条目数：'''3'''...` |
//! | remark     | `<br><small>` directly after a marker                     |
//! | timestamp  | `{{center|（最近更新：...）}}`                              |

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use thiserror::Error;

/// Errors raised while compiling a [`Schema`] into a [`Grammar`].
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema field `{0}` must not be empty")]
    Empty(&'static str),

    #[error("schema field `{field}` produced an invalid pattern")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

// ============================================================================
// Schema
// ============================================================================

/// Fixed textual anchors of the ledger and leaderboard pages.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Schema {
    pub comment_open: String,
    pub comment_close: String,

    pub table_open: String,
    pub table_close: String,
    pub row_separator: String,
    pub caption_token: String,
    /// Token that opens a data cell at the start of a line.
    pub cell_start: String,
    /// Token separating inline cells on one line.
    pub cell_separator: String,

    /// Name of the status template, e.g. `{{2026SFEditasonStatus|pass|5}}`.
    pub marker_template: String,
    pub accepted_status: String,
    /// Compared case-insensitively. A blank status is always pending.
    pub pending_statuses: Vec<String>,
    /// Characters stripped from the front of an entry name (list markers).
    pub entry_name_markers: String,

    /// Import-log rows mention one of these namespaces...
    pub log_namespaces: Vec<String>,
    /// ...together with this type marker.
    pub import_marker: String,
    /// Rows containing any of these are left out of pending listings.
    pub review_skip_tokens: Vec<String>,

    pub banner_open: String,
    pub banner_count_label: String,
    pub banner_score_label: String,
    pub banner_emphasis: String,
    pub banner_close: String,

    pub remark_prefix: String,
    pub remark_suffix: String,

    /// Label of the last header column of every leaderboard table.
    pub header_anchor: String,
    pub section_all: String,
    pub section_veteran: String,
    pub section_newcomer: String,
    pub newcomer_glyph: String,
    pub no_data_label: String,
    pub page_link_label: String,
    pub user_namespace: String,
    pub column_count: usize,

    /// Static line the freshness stamp is kept under.
    pub timestamp_prompt: String,
    pub timestamp_open: String,
    pub timestamp_close: String,
    /// Characters after the prompt line searched for an existing stamp.
    pub timestamp_window: usize,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            comment_open: "<!--".into(),
            comment_close: "-->".into(),
            table_open: "{|".into(),
            table_close: "|}".into(),
            row_separator: "|-".into(),
            caption_token: "|+".into(),
            cell_start: "|".into(),
            cell_separator: "||".into(),
            marker_template: "2026SFEditasonStatus".into(),
            accepted_status: "pass".into(),
            pending_statuses: ["pending", "待审核", "doing", "审核中"]
                .map(String::from)
                .to_vec(),
            entry_name_markers: "*#".into(),
            log_namespaces: vec!["Special:日志".into(), "Special:Log".into()],
            import_marker: "type=import".into(),
            review_skip_tokens: vec!["导入日志".into()],
            banner_open: "{{mbox|type=policy|text={{center|".into(),
            banner_count_label: "已提交条目数：".into(),
            banner_score_label: "目前得分：".into(),
            banner_emphasis: "'''".into(),
            banner_close: "}}}}".into(),
            remark_prefix: "<br><small>（".into(),
            remark_suffix: "）</small>".into(),
            header_anchor: "贡献详情页".into(),
            section_all: "编者总榜".into(),
            section_veteran: "熟练编者排行榜".into(),
            section_newcomer: "新星编者排行榜".into(),
            newcomer_glyph: "🌱".into(),
            no_data_label: "暂无数据".into(),
            page_link_label: "查看页面".into(),
            user_namespace: "User".into(),
            column_count: 5,
            timestamp_prompt: "{{center|（以下排行约每小时更新一次）}}".into(),
            timestamp_open: "{{center|（最近更新：".into(),
            timestamp_close: "）}}".into(),
            timestamp_window: 100,
        }
    }
}

impl Schema {
    /// Whether `status` counts as awaiting review.
    pub fn is_pending_status(&self, status: &str) -> bool {
        let status = status.trim();
        status.is_empty()
            || self
                .pending_statuses
                .iter()
                .any(|p| p.to_lowercase() == status.to_lowercase())
    }

    pub fn is_accepted_status(&self, status: &str) -> bool {
        status.trim() == self.accepted_status
    }

    /// Whether a row must stay out of pending listings.
    pub fn is_review_skipped(&self, line: &str) -> bool {
        self.review_skip_tokens
            .iter()
            .any(|token| !token.is_empty() && line.contains(token.as_str()))
    }

    /// Reject anchors whose emptiness would make every search succeed at 0.
    fn validate(&self) -> Result<(), SchemaError> {
        let required = [
            ("comment_open", &self.comment_open),
            ("comment_close", &self.comment_close),
            ("table_open", &self.table_open),
            ("table_close", &self.table_close),
            ("row_separator", &self.row_separator),
            ("cell_start", &self.cell_start),
            ("cell_separator", &self.cell_separator),
            ("marker_template", &self.marker_template),
            ("accepted_status", &self.accepted_status),
            ("import_marker", &self.import_marker),
            ("banner_open", &self.banner_open),
            ("header_anchor", &self.header_anchor),
            ("timestamp_prompt", &self.timestamp_prompt),
            ("timestamp_open", &self.timestamp_open),
            ("timestamp_close", &self.timestamp_close),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(SchemaError::Empty(field));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Grammar
// ============================================================================

/// A [`Schema`] together with its compiled patterns.
#[derive(Debug, Clone)]
pub struct Grammar {
    schema: Schema,
    marker: Regex,
    banner: Regex,
    remark: Regex,
    timestamp: Regex,
}

static STANDARD: LazyLock<Grammar> =
    LazyLock::new(|| Grammar::new(Schema::default()).expect("default schema compiles"));

impl Grammar {
    pub fn new(schema: Schema) -> Result<Self, SchemaError> {
        schema.validate()?;

        // {{T|status}} or {{T|status|12.5}}; the status is lazy so the
        // optional numeric argument gets the first chance at a trailing `|`.
        let template = regex::escape(&schema.marker_template);
        let marker = compile(
            "marker_template",
            &[r"\{\{", template.as_str(), r"\|(.*?)(?:\|([\d.]+))?\}\}"].concat(),
            false,
        )?;

        let open = regex::escape(&schema.banner_open);
        let count_label = regex::escape(&schema.banner_count_label);
        let score_label = regex::escape(&schema.banner_score_label);
        let emphasis = regex::escape(&schema.banner_emphasis);
        let close = regex::escape(&schema.banner_close);
        let banner = compile(
            "banner_open",
            &format!(
                r"({open}{count_label}{emphasis})(\d+)({emphasis}\s*{score_label}{emphasis})([\d.]+)({emphasis}{close})"
            ),
            true,
        )?;

        let remark = compile("remark_prefix", r"^\s*<br\s*/?>\s*<small>", true)?;

        let timestamp = compile(
            "timestamp_open",
            &[
                regex::escape(&schema.timestamp_open),
                ".*?".into(),
                regex::escape(&schema.timestamp_close),
            ]
            .concat(),
            false,
        )?;

        Ok(Self {
            schema,
            marker,
            banner,
            remark,
            timestamp,
        })
    }

    /// Grammar for the built-in schema, compiled once.
    pub fn standard() -> &'static Grammar {
        &STANDARD
    }

    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Status marker. Group 1 is the status, group 2 the optional score.
    #[inline]
    pub fn marker(&self) -> &Regex {
        &self.marker
    }

    /// Count/score banner. Groups 2 and 4 are the numeric fields; groups
    /// 1, 3 and 5 are the surrounding text.
    #[inline]
    pub fn banner(&self) -> &Regex {
        &self.banner
    }

    /// Remark annotation anchored at the start of the haystack.
    #[inline]
    pub fn remark(&self) -> &Regex {
        &self.remark
    }

    #[inline]
    pub fn timestamp(&self) -> &Regex {
        &self.timestamp
    }
}

fn compile(field: &'static str, pattern: &str, case_insensitive: bool) -> Result<Regex, SchemaError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| SchemaError::Pattern { field, source })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grammar_compiles() {
        let grammar = Grammar::standard();
        assert_eq!(grammar.schema().marker_template, "2026SFEditasonStatus");
    }

    #[test]
    fn test_marker_captures_status_and_score() {
        let re = Grammar::standard().marker();

        let caps = re.captures("{{2026SFEditasonStatus|pass|11.3}}").unwrap();
        assert_eq!(&caps[1], "pass");
        assert_eq!(&caps[2], "11.3");

        let caps = re.captures("{{2026SFEditasonStatus|pending}}").unwrap();
        assert_eq!(&caps[1], "pending");
        assert!(caps.get(2).is_none());
    }

    #[test]
    fn test_marker_accepts_empty_status() {
        let caps = Grammar::standard()
            .marker()
            .captures("{{2026SFEditasonStatus|}}")
            .unwrap();
        assert_eq!(&caps[1], "");
    }

    #[test]
    fn test_marker_non_numeric_second_argument_folds_into_status() {
        let caps = Grammar::standard()
            .marker()
            .captures("{{2026SFEditasonStatus|pass|abc}}")
            .unwrap();
        assert_eq!(&caps[1], "pass|abc");
        assert!(caps.get(2).is_none());
    }

    #[test]
    fn test_marker_template_name_is_escaped() {
        let schema = Schema {
            marker_template: "Status.v2".into(),
            ..Schema::default()
        };
        let grammar = Grammar::new(schema).unwrap();
        assert!(grammar.marker().is_match("{{Status.v2|pass}}"));
        assert!(!grammar.marker().is_match("{{StatusXv2|pass}}"));
    }

    #[test]
    fn test_banner_is_case_insensitive() {
        let text = "{{MBOX|type=policy|text={{center|已提交条目数：'''0'''目前得分：'''0'''}}}}";
        let caps = Grammar::standard().banner().captures(text).unwrap();
        assert_eq!(&caps[2], "0");
        assert_eq!(&caps[4], "0");
    }

    #[test]
    fn test_empty_anchor_rejected() {
        let schema = Schema {
            header_anchor: String::new(),
            ..Schema::default()
        };
        let err = Grammar::new(schema).unwrap_err();
        assert!(matches!(err, SchemaError::Empty("header_anchor")));
    }

    #[test]
    fn test_pending_status_matching() {
        let schema = Schema::default();
        assert!(schema.is_pending_status("pending"));
        assert!(schema.is_pending_status("PENDING"));
        assert!(schema.is_pending_status("审核中"));
        assert!(schema.is_pending_status("  "));
        assert!(!schema.is_pending_status("pass"));
        assert!(!schema.is_pending_status("fail"));
    }

    #[test]
    fn test_accepted_status_matching() {
        let schema = Schema::default();
        assert!(schema.is_accepted_status("pass"));
        assert!(schema.is_accepted_status(" pass "));
        assert!(!schema.is_accepted_status("pending"));
    }

    #[test]
    fn test_review_skip_tokens() {
        let schema = Schema::default();
        assert!(schema.is_review_skipped("| 导入日志 || {{2026SFEditasonStatus|}}"));
        assert!(!schema.is_review_skipped("| [[A]] || {{2026SFEditasonStatus|}}"));
    }
}

//! Anchored replacement of a leaderboard table body.
//!
//! ```text
//! == 编者总榜 ==          <- section name
//! {| class="wikitable"    <- table open
//! ! 排名 !! ... !! 贡献详情页
//! |-                      <- split point: first row separator after the header anchor
//! | 1 || ...              ┐
//! |-                      │ replaced
//! | 2 || ...              ┘
//! |}                      <- table close
//! ```
//!
//! Every anchor must be found, otherwise the page comes back untouched.

use crate::schema::Schema;

/// Replace the body rows of the table that follows `section`.
///
/// `rows` is newline-joined row text starting with a row separator. A
/// newline is kept between the new rows and the table close.
pub fn replace_table_section(text: &str, section: &str, rows: &str, schema: &Schema) -> String {
    match body_span(text, section, schema) {
        Some((start, end)) => {
            let mut out = String::with_capacity(text.len() + rows.len());
            out.push_str(&text[..start]);
            out.push_str(rows);
            out.push('\n');
            out.push_str(&text[end..]);
            out
        }
        None => text.to_owned(),
    }
}

/// Byte span of the replaceable body: from the split point up to the table
/// close token.
fn body_span(text: &str, section: &str, schema: &Schema) -> Option<(usize, usize)> {
    if section.is_empty() {
        return None;
    }
    let section_at = text.find(section)?;
    let open_at = section_at + text[section_at..].find(&schema.table_open)?;
    let content_at = open_at + schema.table_open.len();
    let close_at = content_at + text[content_at..].find(&schema.table_close)?;

    let table = &text[content_at..close_at];
    let anchor_at = table.find(&schema.header_anchor)?;
    let split_at = anchor_at + table[anchor_at..].find(&schema.row_separator)?;

    Some((content_at + split_at, close_at))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
== 编者总榜 ==
{| class=\"wikitable\"
! 排名 !! 用户 !! 条目数 !! 得分 !! 贡献详情页
|-
| 1 || old || 1 || 1 || x
|}
== 熟练编者排行榜 ==
{| class=\"wikitable\"
! 排名 !! 用户 !! 条目数 !! 得分 !! 贡献详情页
|-
| colspan=\"5\" | 暂无数据
|}
";

    fn replace(text: &str, section: &str, rows: &str) -> String {
        replace_table_section(text, section, rows, &Schema::default())
    }

    #[test]
    fn test_replaces_only_named_section() {
        let rows = "|-\n| 1 || new || 2 || 3 || y";
        let out = replace(PAGE, "编者总榜", rows);

        assert!(out.contains("| 1 || new || 2 || 3 || y\n|}\n== 熟练编者排行榜 =="));
        assert!(!out.contains("old"));
        assert!(out.contains("| colspan=\"5\" | 暂无数据"));
    }

    #[test]
    fn test_header_is_preserved() {
        let out = replace(PAGE, "熟练编者排行榜", "|-\n| a");
        let tail = &out[out.find("熟练编者排行榜").unwrap()..];
        assert!(tail.contains("! 排名 !! 用户 !! 条目数 !! 得分 !! 贡献详情页\n|-\n| a\n|}"));
        assert!(out.starts_with("== 编者总榜 ==\n{| class=\"wikitable\"\n! 排名"));
    }

    #[test]
    fn test_idempotent() {
        let rows = "|-\n| 1 || u || 1 || 2 || p\n|-\n| 2 || v || 1 || 1 || q";
        let once = replace(PAGE, "编者总榜", rows);
        let twice = replace(&once, "编者总榜", rows);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_section_is_noop() {
        assert_eq!(replace(PAGE, "nonexistent-section", "|-\n| x"), PAGE);
        assert_eq!(replace(PAGE, "", "|-\n| x"), PAGE);
    }

    #[test]
    fn test_missing_table_close_is_noop() {
        let text = "== 编者总榜 ==\n{|\n! 贡献详情页\n|-\n| 1";
        assert_eq!(replace(text, "编者总榜", "|-\n| x"), text);
    }

    #[test]
    fn test_missing_header_anchor_is_noop() {
        let text = "== 编者总榜 ==\n{|\n! 排名\n|-\n| 1\n|}";
        assert_eq!(replace(text, "编者总榜", "|-\n| x"), text);
    }

    #[test]
    fn test_anchor_in_later_table_is_not_used() {
        let text = "== 编者总榜 ==\n{|\n! 排名\n|-\n| 1\n|}\n{|\n! 贡献详情页\n|-\n| 2\n|}";
        assert_eq!(replace(text, "编者总榜", "|-\n| x"), text);
    }

    #[test]
    fn test_missing_split_row_is_noop() {
        let text = "== 编者总榜 ==\n{|\n! 贡献详情页\n|}";
        assert_eq!(replace(text, "编者总榜", "|-\n| x"), text);
    }
}

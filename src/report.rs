//! Human-readable run outputs.
//!
//! - the plain-text pending report (`pending_reviews.txt`)
//! - the markdown run summary appended after `tally`

use crate::review::PendingItem;
use crate::tally::TallyRun;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use ledger_markup::{format_score, format_timestamp};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

/// Plain-text listing of pending entries.
pub fn pending_report(items: &[PendingItem], title: &str, now: DateTime<Utc>) -> String {
    let header = format!("{title} - 生成时间: {}", format_timestamp(now));
    if items.is_empty() {
        return format!("{header}\n\n未找到待审核项目");
    }

    let mut lines = vec![
        format!("{header}\n"),
        format!("共找到 {} 个待审核项目\n", items.len()),
    ];
    for (index, item) in items.iter().enumerate() {
        lines.push(format!("{}. 用户: {}", index + 1, item.user));
        lines.push(format!("   页面: {}", item.page));
        lines.push(format!("   行内容: {}", item.original_line));
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Markdown summary of a tally run.
pub fn run_summary(run: &TallyRun, title: &str, now: DateTime<Utc>) -> String {
    let mut participants: Vec<_> = run.participants.iter().collect();
    participants.sort_by(|a, b| b.record.total_score.total_cmp(&a.record.total_score));

    let mut md = format!("## {title}\n\n");
    md.push_str(&format!("- **参与总人数**: {}\n", run.participants.len()));
    md.push_str(&format!("- **本次更新页面数**: {}\n", run.updated_pages()));
    md.push_str(&format!("- **总条目数**: {}\n", run.total_entries()));
    md.push_str(&format!("- **总得分**: {}\n", run.total_score()));
    if run.failed > 0 {
        md.push_str(&format!("- **处理失败页面数**: {}\n", run.failed));
    }
    md.push('\n');

    md.push_str("### 参与者详情\n\n");
    md.push_str("| 用户 | 条目数 | 得分 | 资历 | 状态 |\n");
    md.push_str("| --- | --- | --- | --- | --- |\n");
    for participant in participants {
        let record = &participant.record;
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            record.username,
            record.entry_count,
            format_score(record.total_score),
            if record.is_veteran { "✅" } else { "🆕" },
            if participant.updated { "📝 已更新" } else { "无变化" },
        ));
    }

    md.push_str(&format!(
        "\n摘要生成于 {}\n",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    md
}

/// Append `markdown` to the summary file at `path`.
pub fn append_summary(path: &Path, markdown: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open summary file {}", path.display()))?;
    file.write_all(markdown.as_bytes())
        .with_context(|| format!("cannot write summary file {}", path.display()))
}

/// Write `pending_data.json` and `pending_reviews.txt`.
pub fn write_pending_outputs(
    items: &[PendingItem],
    json_path: &Path,
    report_path: &Path,
    title: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    for path in [json_path, report_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(items)?;
    fs::write(json_path, json).with_context(|| format!("cannot write {}", json_path.display()))?;

    fs::write(report_path, pending_report(items, title, now))
        .with_context(|| format!("cannot write {}", report_path.display()))?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

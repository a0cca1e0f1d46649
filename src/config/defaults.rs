//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [event] Section Defaults
// ============================================================================

pub mod event {
    pub fn ledger_prefix() -> String {
        "Qiuwen:2026年春节编辑松/提交/".into()
    }

    pub fn ledger_suffix() -> String {
        "的贡献".into()
    }

    pub fn leaderboard_title() -> String {
        "Qiuwen:2026年春节编辑松/提交".into()
    }

    pub fn tally_summary() -> String {
        "bot: 更新贡献状态统计 (2026新春编辑马拉松)".into()
    }

    pub fn leaderboard_summary() -> String {
        "bot: 更新排行榜数据 (2026春节编辑松)".into()
    }

    pub fn review_summary() -> String {
        "快速审核（2026年春节编辑松小工具）".into()
    }
}

// ============================================================================
// [store] Section Defaults
// ============================================================================

pub mod store {
    use std::path::PathBuf;

    pub fn root() -> PathBuf {
        "pages".into()
    }

    pub fn extension() -> String {
        "wiki".into()
    }
}

// ============================================================================
// [tenure] Section Defaults
// ============================================================================

pub mod tenure {
    pub fn min_edits() -> u32 {
        50
    }

    pub fn cutoff() -> String {
        "2026-02-01T00:00:00Z".into()
    }
}

// ============================================================================
// [summary] Section Defaults
// ============================================================================

pub mod summary {
    use std::path::PathBuf;

    pub fn title() -> String {
        "2026年春节编辑松机器人运行摘要 🚀".into()
    }

    pub fn pending_title() -> String {
        "2026年春节编辑松待审核项目报告".into()
    }

    pub fn pending_json() -> PathBuf {
        "pending_data.json".into()
    }

    pub fn pending_report() -> PathBuf {
        "pending_reviews.txt".into()
    }
}

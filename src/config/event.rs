//! `[event]` section configuration.
//!
//! Page titles and edit summaries of one editathon.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[event]` section in ledgerbot.toml.
///
/// # Example
/// ```toml
/// [event]
/// ledger_prefix = "Qiuwen:2026年春节编辑松/提交/"
/// ledger_suffix = "的贡献"
/// leaderboard_title = "Qiuwen:2026年春节编辑松/提交"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct EventConfig {
    /// Title prefix shared by every ledger page.
    #[serde(default = "defaults::event::ledger_prefix")]
    #[educe(Default = defaults::event::ledger_prefix())]
    pub ledger_prefix: String,

    /// Title suffix of ledger pages; the username sits between prefix and suffix.
    #[serde(default = "defaults::event::ledger_suffix")]
    #[educe(Default = defaults::event::ledger_suffix())]
    pub ledger_suffix: String,

    /// Shared leaderboard page.
    #[serde(default = "defaults::event::leaderboard_title")]
    #[educe(Default = defaults::event::leaderboard_title())]
    pub leaderboard_title: String,

    /// Edit summary for banner updates on ledger pages.
    #[serde(default = "defaults::event::tally_summary")]
    #[educe(Default = defaults::event::tally_summary())]
    pub tally_summary: String,

    #[serde(default = "defaults::event::leaderboard_summary")]
    #[educe(Default = defaults::event::leaderboard_summary())]
    pub leaderboard_summary: String,

    /// Fallback summary for review edits that carry none.
    #[serde(default = "defaults::event::review_summary")]
    #[educe(Default = defaults::event::review_summary())]
    pub review_summary: String,
}

impl EventConfig {
    /// Username encoded in a ledger page title, if `title` is one.
    pub fn ledger_user<'a>(&self, title: &'a str) -> Option<&'a str> {
        let user = title
            .strip_prefix(self.ledger_prefix.as_str())?
            .strip_suffix(self.ledger_suffix.as_str())?;
        (!user.is_empty() && !user.contains('/')).then_some(user)
    }
}

#[cfg(test)]
mod tests {
    use super::super::BotConfig;
    use super::*;

    #[test]
    fn test_event_config_defaults() {
        let config = BotConfig::from_str("").unwrap();
        assert_eq!(config.event.ledger_prefix, "Qiuwen:2026年春节编辑松/提交/");
        assert_eq!(config.event.leaderboard_title, "Qiuwen:2026年春节编辑松/提交");
    }

    #[test]
    fn test_ledger_user() {
        let event = EventConfig::default();
        assert_eq!(
            event.ledger_user("Qiuwen:2026年春节编辑松/提交/UserA的贡献"),
            Some("UserA")
        );
        assert_eq!(event.ledger_user("Qiuwen:2026年春节编辑松/提交"), None);
        assert_eq!(event.ledger_user("Qiuwen:2026年春节编辑松/提交/的贡献"), None);
        assert_eq!(event.ledger_user("Qiuwen:2026年春节编辑松/提交/A/B的贡献"), None);
        assert_eq!(event.ledger_user("Qiuwen:2026年春节编辑松/提交/UserA"), None);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result = BotConfig::from_str(
            r#"
            [event]
            unknown = 1
        "#,
        );
        assert!(result.is_err());
    }
}

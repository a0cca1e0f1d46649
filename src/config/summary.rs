//! `[summary]` section configuration.
//!
//! Titles and output files of the run summary and the pending-review report.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[summary]` section in ledgerbot.toml.
///
/// # Example
/// ```toml
/// [summary]
/// title = "Run summary"
/// path = "summary.md"   # append the markdown run summary here after `tally`
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SummaryConfig {
    /// Heading of the markdown run summary.
    #[serde(default = "defaults::summary::title")]
    #[educe(Default = defaults::summary::title())]
    pub title: String,

    /// File the run summary is appended to. Falls back to `GITHUB_STEP_SUMMARY`.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Heading of the plain-text pending report.
    #[serde(default = "defaults::summary::pending_title")]
    #[educe(Default = defaults::summary::pending_title())]
    pub pending_title: String,

    /// Pending list written by `pending`, relative to the project root.
    #[serde(default = "defaults::summary::pending_json")]
    #[educe(Default = defaults::summary::pending_json())]
    pub pending_json: PathBuf,

    /// Plain-text pending report written by `pending`.
    #[serde(default = "defaults::summary::pending_report")]
    #[educe(Default = defaults::summary::pending_report())]
    pub pending_report: PathBuf,
}

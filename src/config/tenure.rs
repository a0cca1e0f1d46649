//! `[tenure]` section configuration.
//!
//! Veteran status is decided outside the bot (an edit-history query against
//! the wiki). This section carries its results: explicit veterans plus known
//! pre-cutoff edit counts.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `[tenure]` section in ledgerbot.toml.
///
/// # Example
/// ```toml
/// [tenure]
/// veterans = ["UserA"]
/// min_edits = 50
///
/// [tenure.edits]
/// UserB = 120
/// UserC = 3
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct TenureConfig {
    /// Users treated as veterans regardless of edit counts.
    #[serde(default)]
    pub veterans: Vec<String>,

    /// Edits made before `cutoff`, per user.
    #[serde(default)]
    pub edits: BTreeMap<String, u32>,

    /// Edits before the cutoff needed to count as a veteran.
    #[serde(default = "defaults::tenure::min_edits")]
    #[educe(Default = defaults::tenure::min_edits())]
    pub min_edits: u32,

    /// Instant the edit counts were taken against (RFC 3339).
    #[serde(default = "defaults::tenure::cutoff")]
    #[educe(Default = defaults::tenure::cutoff())]
    pub cutoff: String,
}

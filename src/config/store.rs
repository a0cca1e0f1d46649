//! `[store]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[store]` section in ledgerbot.toml - where page texts live.
///
/// # Example
/// ```toml
/// [store]
/// root = "~/editathon/pages"
/// extension = "wiki"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Page directory, relative to the project root. `~` is expanded.
    #[serde(default = "defaults::store::root")]
    #[educe(Default = defaults::store::root())]
    pub root: PathBuf,

    /// File extension of stored pages, without the dot.
    #[serde(default = "defaults::store::extension")]
    #[educe(Default = defaults::store::extension())]
    pub extension: String,
}

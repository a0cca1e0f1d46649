//! Veteran / newcomer classification.
//!
//! How tenure is established (an edit-count query against the wiki before
//! the event's cutoff) is outside the bot. It only consumes the answer
//! through [`TenureOracle`], and a failed lookup files the user under
//! newcomers rather than aborting the run.

use crate::config::TenureConfig;
use crate::log;
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Answers "is this user a veteran?".
pub trait TenureOracle: Sync {
    fn is_veteran(&self, username: &str) -> Result<bool>;
}

/// Veteran status from the `[tenure]` config section.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    veterans: BTreeSet<String>,
    edits: BTreeMap<String, u32>,
    min_edits: u32,
}

impl StaticRoster {
    pub fn from_config(config: &TenureConfig) -> Self {
        Self {
            veterans: config.veterans.iter().cloned().collect(),
            edits: config.edits.clone(),
            min_edits: config.min_edits,
        }
    }
}

impl TenureOracle for StaticRoster {
    fn is_veteran(&self, username: &str) -> Result<bool> {
        if self.veterans.contains(username) {
            return Ok(true);
        }
        Ok(self
            .edits
            .get(username)
            .is_some_and(|&count| count >= self.min_edits))
    }
}

/// Ask `oracle`, treating a failed lookup as "not a veteran".
pub fn classify(oracle: &dyn TenureOracle, username: &str) -> bool {
    match oracle.is_veteran(username) {
        Ok(veteran) => veteran,
        Err(err) => {
            log!("warn"; "tenure lookup failed for {username}, listing as newcomer: {err:#}");
            false
        }
    }
}

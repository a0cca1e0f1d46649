//! Bot configuration management for `ledgerbot.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `[event]`   | Ledger/leaderboard titles, edit summaries          |
//! | `[schema]`  | Page anchors (template name, section labels, ...)  |
//! | `[store]`   | Page directory                                     |
//! | `[tenure]`  | Veteran roster and pre-cutoff edit counts          |
//! | `[summary]` | Run summary and pending report outputs             |
//!
//! Every section is optional; an empty file describes the 2026 Spring
//! Festival editathon.
//!
//! # Example
//!
//! ```toml
//! [event]
//! ledger_prefix = "Qiuwen:2026年春节编辑松/提交/"
//!
//! [schema]
//! marker_template = "2026SFEditasonStatus"
//!
//! [store]
//! root = "pages"
//!
//! [tenure]
//! veterans = ["UserA"]
//! ```

pub mod defaults;
mod error;
mod event;
mod store;
mod summary;
mod tenure;

pub use error::ConfigError;
pub use event::EventConfig;
pub use store::StoreConfig;
pub use summary::SummaryConfig;
pub use tenure::TenureConfig;

use crate::cli::{Cli, Commands};
use crate::log;
use anyhow::{Result, bail};
use chrono::DateTime;
use educe::Educe;
use ledger_markup::{Grammar, Schema};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable CI runners set to collect step summaries.
const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing ledgerbot.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root; relative paths below resolve against it
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    #[serde(default)]
    pub event: EventConfig,

    #[serde(default)]
    pub schema: Schema,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub tenure: TenureConfig,

    #[serde(default)]
    pub summary: SummaryConfig,
}

impl BotConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: BotConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config named by `cli`, apply CLI overrides and validate.
    ///
    /// A missing config file is not an error: every field has a default.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            log!("config"; "{} not found, using defaults", config_path.display());
            Self::default()
        };
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Compile the `[schema]` section.
    pub fn grammar(&self) -> Result<Grammar, ConfigError> {
        Ok(Grammar::new(self.schema.clone())?)
    }

    /// Where the markdown run summary goes, if anywhere.
    pub fn summary_path(&self) -> Option<PathBuf> {
        self.summary.path.clone().or_else(|| {
            std::env::var_os(STEP_SUMMARY_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| self.root.clone());
        let root = Self::normalize_path(&root);
        self.config_path = Self::normalize_path(&root.join(&cli.config));

        Self::update_option(&mut self.store.root, cli.pages.as_ref());

        match &cli.command {
            Commands::Tally { summary, .. } => {
                if summary.is_some() {
                    self.summary.path = summary.clone();
                }
            }
            Commands::Pending { json, report } => {
                Self::update_option(&mut self.summary.pending_json, json.as_ref());
                Self::update_option(&mut self.summary.pending_report, report.as_ref());
            }
            Commands::Apply { .. } => {}
        }

        self.update_path_with_root(&root);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every configured path against `root`.
    fn update_path_with_root(&mut self, root: &Path) {
        self.root = root.to_path_buf();

        let expanded = shellexpand::tilde(&self.store.root.to_string_lossy()).into_owned();
        self.store.root = Self::resolve(root, Path::new(&expanded));

        self.summary.pending_json = Self::resolve(root, &self.summary.pending_json);
        self.summary.pending_report = Self::resolve(root, &self.summary.pending_report);
        if let Some(path) = self.summary.path.take() {
            self.summary.path = Some(Self::resolve(root, &path));
        }
    }

    fn resolve(root: &Path, path: &Path) -> PathBuf {
        if path.is_relative() {
            Self::normalize_path(&root.join(path))
        } else {
            Self::normalize_path(path)
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.event.ledger_prefix.is_empty() {
            bail!(ConfigError::Validation(
                "[event.ledger_prefix] must not be empty".into()
            ));
        }

        if self.event.leaderboard_title.is_empty() {
            bail!(ConfigError::Validation(
                "[event.leaderboard_title] must not be empty".into()
            ));
        }

        if self.event.ledger_user(&self.event.leaderboard_title).is_some() {
            bail!(ConfigError::Validation(
                "[event.leaderboard_title] must not look like a ledger page".into()
            ));
        }

        if self.store.extension.is_empty() || self.store.extension.contains('.') {
            bail!(ConfigError::Validation(
                "[store.extension] must be a bare extension such as \"wiki\"".into()
            ));
        }

        if DateTime::parse_from_rfc3339(&self.tenure.cutoff).is_err() {
            bail!(ConfigError::Validation(format!(
                "[tenure.cutoff] `{}` is not an RFC 3339 timestamp",
                self.tenure.cutoff
            )));
        }

        self.grammar()?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

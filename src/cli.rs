//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scoring-ledger bot for wiki editathons
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the root (default: ledgerbot.toml)
    #[arg(short = 'C', long, default_value = "ledgerbot.toml")]
    pub config: PathBuf,

    /// Page store directory, overrides [store.root]
    #[arg(short, long)]
    pub pages: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Recount every ledger page, refresh banners and rebuild the leaderboard
    Tally {
        /// Append a markdown run summary to this file (default: $GITHUB_STEP_SUMMARY)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Compute everything but save nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// List entries awaiting review
    Pending {
        /// Output path of the JSON pending list
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output path of the plain-text pending report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Apply review edits from a JSON file to ledger pages
    Apply {
        /// JSON array of `{ title, items, summary? }`
        edits: PathBuf,

        /// Compute everything but save nothing
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    pub const fn is_dry_run(&self) -> bool {
        matches!(
            self.command,
            Commands::Tally { dry_run: true, .. } | Commands::Apply { dry_run: true, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("ledgerbot").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_tally() {
        let cli = parse(&["tally", "--summary", "s.md"]);
        assert!(matches!(
            cli.command,
            Commands::Tally { summary: Some(ref p), dry_run: false } if p == &PathBuf::from("s.md")
        ));
        assert_eq!(cli.config, PathBuf::from("ledgerbot.toml"));
    }

    #[test]
    fn test_parse_apply_dry_run() {
        let cli = parse(&["-C", "alt.toml", "apply", "edits.json", "--dry-run"]);
        assert!(cli.is_dry_run());
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert!(matches!(cli.command, Commands::Apply { ref edits, .. } if edits == &PathBuf::from("edits.json")));
    }

    #[test]
    fn test_parse_pending_is_never_dry_run() {
        let cli = parse(&["pending"]);
        assert!(!cli.is_dry_run());
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["ledgerbot"]).is_err());
    }
}

//! Batch recount of every ledger page and leaderboard rebuild.
//!
//! ```text
//! list ledger pages
//!   └─► read + parse + patch banner        (parallel, rayon)
//!         └─► save changed pages           (sequential)
//!               └─► tenure lookup
//!                     └─► rebuild leaderboard, save
//! ```
//!
//! One failing page is logged and left out; it never stops the batch.

use crate::config::{BotConfig, EventConfig};
use crate::log;
use crate::store::PageStore;
use crate::tenure::{TenureOracle, classify};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ledger_markup::{
    Grammar, ParticipantRecord, StampOutcome, format_score, parse_ledger, render_leaderboard,
    update_banner,
};
use rayon::prelude::*;

/// A ledger page and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPage {
    pub title: String,
    pub username: String,
}

/// Every ledger page in the store, sorted by title.
pub fn ledger_pages(store: &dyn PageStore, event: &EventConfig) -> Result<Vec<LedgerPage>> {
    let titles = store
        .list_pages(&event.ledger_prefix)
        .context("cannot list ledger pages")?;
    Ok(titles
        .into_iter()
        .filter_map(|title| {
            let username = event.ledger_user(&title)?.to_owned();
            Some(LedgerPage { title, username })
        })
        .collect())
}

/// Outcome for one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantTally {
    pub record: ParticipantRecord,
    /// Whether the banner changed and the page was saved.
    pub updated: bool,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TallyRun {
    pub participants: Vec<ParticipantTally>,
    pub failed: usize,
    pub leaderboard_saved: bool,
}

impl TallyRun {
    pub fn total_entries(&self) -> usize {
        self.participants.iter().map(|p| p.record.entry_count).sum()
    }

    pub fn total_score(&self) -> f64 {
        format_score(self.participants.iter().map(|p| p.record.total_score).sum())
    }

    pub fn updated_pages(&self) -> usize {
        self.participants.iter().filter(|p| p.updated).count()
    }
}

/// A ledger page read and recounted, not yet saved.
struct Recount {
    page: LedgerPage,
    entry_count: usize,
    total_score: f64,
    /// Patched text when the banner changed.
    patched: Option<String>,
}

fn recount(store: &dyn PageStore, page: LedgerPage, grammar: &Grammar) -> Result<Recount> {
    let text = store
        .read_page(&page.title)
        .with_context(|| format!("cannot read {}", page.title))?;
    let aggregate = parse_ledger(&text, grammar).aggregate;
    let total_score = format_score(aggregate.total_score);
    let updated = update_banner(&text, aggregate.entry_count, total_score, grammar);

    Ok(Recount {
        page,
        entry_count: aggregate.entry_count,
        total_score,
        patched: (updated != text).then_some(updated),
    })
}

/// Recount every ledger page, then rebuild the leaderboard.
pub fn run_tally(
    store: &dyn PageStore,
    oracle: &dyn TenureOracle,
    config: &BotConfig,
    grammar: &Grammar,
    now: DateTime<Utc>,
) -> Result<TallyRun> {
    let pages = ledger_pages(store, &config.event)?;
    log!("tally"; "{} ledger pages", pages.len());

    let recounts: Vec<(String, Result<Recount>)> = pages
        .into_par_iter()
        .map(|page| (page.title.clone(), recount(store, page, grammar)))
        .collect();

    let mut run = TallyRun::default();
    for (title, recount) in recounts {
        let recount = match recount {
            Ok(recount) => recount,
            Err(err) => {
                log!("error"; "{title}: {err:#}");
                run.failed += 1;
                continue;
            }
        };

        let username = &recount.page.username;
        let updated = match &recount.patched {
            Some(text) => {
                log!(
                    "tally";
                    "{username}: {} entries, score {}",
                    recount.entry_count,
                    recount.total_score
                );
                if let Err(err) = store.save_page(&title, text, &config.event.tally_summary) {
                    log!("error"; "{title}: {err:#}");
                    run.failed += 1;
                    continue;
                }
                true
            }
            None => false,
        };

        let is_veteran = classify(oracle, username);
        run.participants.push(ParticipantTally {
            record: ParticipantRecord {
                username: recount.page.username,
                entry_count: recount.entry_count,
                total_score: recount.total_score,
                is_veteran,
                page_title: recount.page.title,
            },
            updated,
        });
    }

    run.leaderboard_saved = match update_leaderboard(store, &run.participants, config, grammar, now) {
        Ok(saved) => saved,
        Err(err) => {
            log!("error"; "leaderboard: {err:#}");
            false
        }
    };

    Ok(run)
}

/// Rebuild and save the leaderboard page. Returns whether it was saved.
pub fn update_leaderboard(
    store: &dyn PageStore,
    participants: &[ParticipantTally],
    config: &BotConfig,
    grammar: &Grammar,
    now: DateTime<Utc>,
) -> Result<bool> {
    let title = &config.event.leaderboard_title;
    log!("leaderboard"; "rebuilding {title}");

    let text = store
        .read_page(title)
        .with_context(|| format!("cannot read {title}"))?;
    let records: Vec<ParticipantRecord> =
        participants.iter().map(|p| p.record.clone()).collect();
    let board = render_leaderboard(&text, &records, grammar, now);

    if board.stamp == StampOutcome::PromptMissing {
        log!("warn"; "update prompt not found on {title}, timestamp skipped");
    }
    if board.text == text {
        log!("leaderboard"; "no changes");
        return Ok(false);
    }

    store
        .save_page(title, &board.text, &config.event.leaderboard_summary)
        .with_context(|| format!("cannot save {title}"))?;
    Ok(true)
}

// ============================================================================
// Tests
// ============================================================================

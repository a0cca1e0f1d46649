//! Pending-review listing and review-edit push.
//!
//! `pending` produces [`PendingItem`]s for a review front end; the front end
//! answers with [`PageEdits`] which `apply` splices back into the pages.
//! Both sides share the provenance fields captured at extraction, so a
//! page that changed in between simply has its stale edits skipped.

use crate::config::BotConfig;
use crate::log;
use crate::store::PageStore;
use crate::tally::ledger_pages;
use anyhow::{Context, Result};
use ledger_markup::{EntryEdit, Grammar, StatusEntry, apply_edits, parse_ledger};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// One entry awaiting review, as handed to the review front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItem {
    pub page: String,
    pub user: String,
    pub original_line: String,
    pub entry_name: String,
    pub status: String,
    pub score: Option<f64>,
    pub absolute_position: usize,
    pub relative_position: usize,
    pub line_number: usize,
    pub template_index: usize,
    pub original_template: String,
}

impl PendingItem {
    fn new(page: &str, user: &str, entry: &StatusEntry) -> Self {
        Self {
            page: page.to_owned(),
            user: user.to_owned(),
            original_line: entry.original_line.trim().to_owned(),
            entry_name: entry.entry_name.clone(),
            status: entry.status.clone(),
            score: entry.score,
            absolute_position: entry.absolute_position,
            relative_position: entry.relative_position,
            line_number: entry.line_number,
            template_index: entry.template_index,
            original_template: entry.original_template.clone(),
        }
    }

    /// Start a review edit for this item.
    pub fn edit(&self, new_status: impl Into<String>) -> EntryEdit {
        EntryEdit {
            line_number: self.line_number,
            template_index: self.template_index,
            original_template: self.original_template.clone(),
            relative_position: Some(self.relative_position),
            new_status: new_status.into(),
            new_score: None,
            new_remark: None,
        }
    }
}

/// Every pending entry across all ledger pages, in page then document order.
pub fn collect_pending(
    store: &dyn PageStore,
    config: &BotConfig,
    grammar: &Grammar,
) -> Result<Vec<PendingItem>> {
    let schema = grammar.schema();
    let mut items = Vec::new();

    for page in ledger_pages(store, &config.event)? {
        let text = match store.read_page(&page.title) {
            Ok(text) => text,
            Err(err) => {
                log!("error"; "{}: {err:#}", page.title);
                continue;
            }
        };

        let parse = parse_ledger(&text, grammar);
        for entry in parse.pending(schema) {
            log!("pending"; "{} - {}", page.title, entry.original_line.trim());
            items.push(PendingItem::new(&page.title, &page.username, entry));
        }
    }

    Ok(items)
}

/// Review edits for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEdits {
    pub title: String,
    pub items: Vec<EntryEdit>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Read a JSON array of [`PageEdits`].
pub fn load_edits(path: &Path) -> Result<Vec<PageEdits>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid edit file {}", path.display()))
}

/// Counters for an `apply` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyRun {
    pub saved: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub applied: usize,
    pub skipped: usize,
}

/// Patch and save each page in `batch`. Failures are logged per page.
pub fn apply_page_edits(
    store: &dyn PageStore,
    batch: &[PageEdits],
    config: &BotConfig,
    grammar: &Grammar,
) -> ApplyRun {
    let mut run = ApplyRun::default();

    for page in batch {
        log!("apply"; "{} ({} edits)", page.title, page.items.len());
        let text = match store.read_page(&page.title) {
            Ok(text) => text,
            Err(err) => {
                log!("error"; "{}: {err:#}", page.title);
                run.failed += 1;
                continue;
            }
        };

        let patched = apply_edits(&text, &page.items, grammar);
        run.applied += patched.applied;
        run.skipped += patched.skipped;
        if patched.skipped > 0 {
            log!("warn"; "{}: {} stale edits skipped", page.title, patched.skipped);
        }
        if patched.is_unchanged() {
            run.unchanged += 1;
            continue;
        }

        let summary = page
            .summary
            .as_deref()
            .filter(|summary| !summary.trim().is_empty())
            .unwrap_or(&config.event.review_summary);
        match store.save_page(&page.title, &patched.text, summary) {
            Ok(()) => run.saved += 1,
            Err(err) => {
                log!("error"; "{}: {err:#}", page.title);
                run.failed += 1;
            }
        }
    }

    run
}

// ============================================================================
// Tests
// ============================================================================

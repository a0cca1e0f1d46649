//! Ledgerbot - scoring-ledger bot for wiki editathons.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use ledger_markup::Grammar;
use ledgerbot::{
    cli::{Cli, Commands},
    config::BotConfig,
    log, report, review,
    store::{DryRun, FsPageStore, PageStore},
    tally,
    tenure::StaticRoster,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = BotConfig::load(&cli)?;
    let grammar = config.grammar()?;

    let fs_store = FsPageStore::new(&config.store.root, config.store.extension.as_str());
    let dry_run;
    let store: &dyn PageStore = if cli.is_dry_run() {
        dry_run = DryRun::new(fs_store);
        &dry_run
    } else {
        &fs_store
    };

    match &cli.command {
        Commands::Tally { .. } => run_tally(store, &config, &grammar),
        Commands::Pending { .. } => run_pending(store, &config, &grammar),
        Commands::Apply { edits, .. } => run_apply(store, &config, &grammar, &config.root.join(edits)),
    }
}

fn run_tally(store: &dyn PageStore, config: &BotConfig, grammar: &Grammar) -> Result<()> {
    let roster = StaticRoster::from_config(&config.tenure);
    let now = Utc::now();
    let run = tally::run_tally(store, &roster, config, grammar, now)?;

    log!(
        "tally";
        "{} participants, {} pages updated, {} failed",
        run.participants.len(),
        run.updated_pages(),
        run.failed
    );

    if let Some(path) = config.summary_path() {
        let markdown = report::run_summary(&run, &config.summary.title, now);
        if let Err(err) = report::append_summary(&path, &markdown) {
            log!("error"; "{err:#}");
        }
    }
    Ok(())
}

fn run_pending(store: &dyn PageStore, config: &BotConfig, grammar: &Grammar) -> Result<()> {
    let items = review::collect_pending(store, config, grammar)?;
    report::write_pending_outputs(
        &items,
        &config.summary.pending_json,
        &config.summary.pending_report,
        &config.summary.pending_title,
        Utc::now(),
    )?;
    log!(
        "pending";
        "{} pending items written to {}",
        items.len(),
        config.summary.pending_json.display()
    );
    Ok(())
}

fn run_apply(
    store: &dyn PageStore,
    config: &BotConfig,
    grammar: &Grammar,
    edits: &std::path::Path,
) -> Result<()> {
    let batch = review::load_edits(edits)?;
    let run = review::apply_page_edits(store, &batch, config, grammar);
    log!(
        "apply";
        "{} pages saved, {} unchanged, {} failed ({} edits applied, {} skipped)",
        run.saved,
        run.unchanged,
        run.failed,
        run.applied,
        run.skipped
    );
    Ok(())
}

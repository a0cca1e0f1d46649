//! Markup ledger engine for scored editathon pages.
//!
//! Every function here is a pure text transformation. Reading and writing
//! pages, tenure lookups and pacing belong to the caller.
//!
//! # Pipeline
//!
//! ```text
//! raw page ─► normalize ─► scan ─► extract ─┬─► score ─► banner       (ledger page)
//!                                           ├─► patch                 (review edits)
//!                                           └─► leaderboard ─► section (shared page)
//!                                                           └─► timestamp
//! ```
//!
//! # Failure model
//!
//! Missing anchors, malformed scores and stale edit anchors never produce
//! errors. The affected operation returns its input unchanged, leaves a
//! field empty, or skips one edit, so batch callers can always move on.
//! The only fallible call is [`Grammar::new`] for a custom [`Schema`].
//!
//! # Example
//!
//! ```
//! use ledger_markup::{Grammar, format_score, parse_ledger, update_banner};
//!
//! let page = "{{mbox|type=policy|text={{center|已提交条目数：'''0'''目前得分：'''0'''}}}}\n\
//!             {|\n|-\n| [[A]] || {{2026SFEditasonStatus|pass|2.5}}\n|}";
//! let grammar = Grammar::standard();
//! let parse = parse_ledger(page, grammar);
//! let score = format_score(parse.aggregate.total_score);
//! let updated = update_banner(page, parse.aggregate.entry_count, score, grammar);
//! assert!(updated.contains("'''1'''目前得分：'''2.5'''"));
//! ```

pub mod banner;
pub mod extract;
pub mod leaderboard;
pub mod normalize;
pub mod patch;
pub mod scan;
pub mod schema;
pub mod score;
pub mod section;
pub mod timestamp;

pub use banner::{read_banner, update_banner};
pub use extract::{Aggregate, LedgerParse, StatusEntry, parse_ledger};
pub use leaderboard::{Leaderboard, ParticipantRecord, RowStyle, render_leaderboard, render_rows};
pub use normalize::{SourceLine, logical_lines, normalized_text, source_lines, strip_comments};
pub use patch::{EntryEdit, Patched, apply_edits};
pub use schema::{Grammar, Schema, SchemaError};
pub use score::format_score;
pub use section::replace_table_section;
pub use timestamp::{StampOutcome, Stamped, format_timestamp, update_timestamp, update_timestamp_at};

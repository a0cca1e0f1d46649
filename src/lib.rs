//! Ledgerbot - scoring-ledger bot for wiki editathons.
//!
//! Orchestrates the [`ledger_markup`] engine over a [`store::PageStore`]:
//!
//! | Command   | Module       | Does                                           |
//! |-----------|--------------|------------------------------------------------|
//! | `tally`   | [`tally`]    | recount ledgers, patch banners, rebuild board  |
//! | `pending` | [`review`]   | list unreviewed entries for the review UI      |
//! | `apply`   | [`review`]   | splice review decisions back into ledgers      |

pub mod cli;
pub mod config;
pub mod logger;
pub mod report;
pub mod review;
pub mod store;
pub mod tally;
pub mod tenure;
pub mod transport;

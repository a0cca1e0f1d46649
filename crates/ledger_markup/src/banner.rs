//! Ledger page banner patching.
//!
//! ```text
//! {{mbox|type=policy|text={{center|已提交条目数：'''3'''目前得分：'''8.5'''}}}}
//!                                               ^                   ^^^
//!                                             count                score
//! ```
//!
//! Only the two numeric fields are rewritten. A page without the banner is
//! returned unchanged.

use crate::schema::Grammar;

/// Rewrite the count and score fields of the first banner in `text`.
pub fn update_banner(text: &str, count: usize, score: f64, grammar: &Grammar) -> String {
    grammar
        .banner()
        .replace(text, |caps: &regex::Captures<'_>| {
            format!("{}{count}{}{score}{}", &caps[1], &caps[3], &caps[5])
        })
        .into_owned()
}

/// Current `(count, score)` shown by the banner, if present and well formed.
pub fn read_banner(text: &str, grammar: &Grammar) -> Option<(usize, f64)> {
    let caps = grammar.banner().captures(text)?;
    Some((caps[2].parse().ok()?, caps[4].parse().ok()?))
}

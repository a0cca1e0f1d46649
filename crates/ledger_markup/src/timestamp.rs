//! Leaderboard freshness stamp.
//!
//! The stamp lives right below a fixed prompt line:
//!
//! ```text
//! {{center|（以下排行约每小时更新一次）}}
//! {{center|（最近更新：2026年02月17日 20:00:00 UTC+8）}}
//! ```

use crate::schema::Grammar;
use chrono::{DateTime, TimeDelta, Utc};

/// Offset of the displayed clock from UTC, in seconds.
pub const DISPLAY_OFFSET_SECS: i64 = 8 * 3600;

/// What [`update_timestamp_at`] did to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOutcome {
    /// An existing stamp near the prompt was rewritten.
    Replaced,
    /// No stamp was found near the prompt; a new line was inserted.
    Inserted,
    /// The prompt line is absent; the text is unchanged.
    PromptMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped {
    pub text: String,
    pub outcome: StampOutcome,
}

/// `now` rendered as `YYYY年MM月DD日 HH:MM:SS UTC+8`.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    (now + TimeDelta::seconds(DISPLAY_OFFSET_SECS))
        .naive_utc()
        .format("%Y年%m月%d日 %H:%M:%S UTC+8")
        .to_string()
}

/// The full stamp marker for `now`.
pub fn render_stamp(now: DateTime<Utc>, grammar: &Grammar) -> String {
    let schema = grammar.schema();
    format!(
        "{}{}{}",
        schema.timestamp_open,
        format_timestamp(now),
        schema.timestamp_close
    )
}

/// Refresh the stamp below the prompt line using the current time.
pub fn update_timestamp(text: &str, grammar: &Grammar) -> Stamped {
    update_timestamp_at(text, grammar, Utc::now())
}

/// Refresh the stamp below the prompt line as of `now`.
///
/// Only a stamp starting within `timestamp_window` characters after the
/// prompt is replaced, whether on the prompt's own line or below it. When
/// none is found a fresh stamp line is inserted after the prompt line.
pub fn update_timestamp_at(text: &str, grammar: &Grammar, now: DateTime<Utc>) -> Stamped {
    let schema = grammar.schema();
    let Some(prompt_at) = text.find(&schema.timestamp_prompt) else {
        return Stamped {
            text: text.to_owned(),
            outcome: StampOutcome::PromptMissing,
        };
    };

    let stamp = render_stamp(now, grammar);
    let prompt_end = prompt_at + schema.timestamp_prompt.len();

    let window = char_window(&text[prompt_end..], schema.timestamp_window);
    if let Some(found) = grammar.timestamp().find(&text[prompt_end..])
        && found.start() < window
    {
        let mut out = String::with_capacity(text.len());
        out.push_str(&text[..prompt_end + found.start()]);
        out.push_str(&stamp);
        out.push_str(&text[prompt_end + found.end()..]);
        return Stamped {
            text: out,
            outcome: StampOutcome::Replaced,
        };
    }

    let mut out = String::with_capacity(text.len() + stamp.len() + 1);
    match text[prompt_end..].find('\n').map(|i| prompt_end + i + 1) {
        Some(line_start) => {
            out.push_str(&text[..line_start]);
            out.push_str(&stamp);
            out.push('\n');
            out.push_str(&text[line_start..]);
        }
        None => {
            out.push_str(text);
            out.push('\n');
            out.push_str(&stamp);
        }
    }
    Stamped {
        text: out,
        outcome: StampOutcome::Inserted,
    }
}

/// Byte length of the first `chars` characters of `text`.
fn char_window(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

// ============================================================================
// Tests
// ============================================================================

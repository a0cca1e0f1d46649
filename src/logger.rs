//! Terminal logging with colored module prefixes.
//!
//! # Example
//!
//! ```ignore
//! log!("tally"; "{} ledger pages found", pages.len());
//! log!("warn"; "tenure lookup failed for {user}: {err:#}");
//! ```
//!
//! Single-line messages are truncated to the terminal width so per-page
//! progress stays one line each. Multi-line messages and `error`/`warn`
//! lines are printed in full.

use colored::{ColoredString, Colorize};
use crossterm::terminal::size;
use std::{
    io::{Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Total prefix length for a module name: `[`, `]` and the trailing space.
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Terminal width, cached after first call. Falls back to 120 columns when
/// stdout is not a terminal (CI logs, pipes).
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Write one log line. Use the [`log!`] macro instead of calling this.
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    let message = fit_message(module, &module_lower, message, get_terminal_width() as usize);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Message as printed after the prefix on a terminal `width` columns wide.
fn fit_message<'a>(module: &str, module_lower: &str, message: &'a str, width: usize) -> &'a str {
    if message.contains('\n') || matches!(module_lower, "error" | "warn") {
        return message;
    }
    truncate_str(message, width.saturating_sub(calc_prefix_len(module.chars().count())))
}

/// Color a module prefix by module name.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "save" => prefix.bright_green().bold(),
        "leaderboard" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes, on a char boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // calc_prefix_len tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_calc_prefix_len_short_module() {
        // "a" -> "[a] "
        assert_eq!(calc_prefix_len(1), 4);
    }

    #[test]
    fn test_calc_prefix_len_typical_module() {
        // "leaderboard" -> "[leaderboard] "
        assert_eq!(calc_prefix_len(11), 14);
    }

    // ------------------------------------------------------------------------
    // truncate_str tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_str_cjk_boundary() {
        // each CJK char is 3 bytes
        let s = "编辑松";
        assert_eq!(truncate_str(s, 4), "编");
        assert_eq!(truncate_str(s, 6), "编辑");
        assert_eq!(truncate_str(s, 2), "");
    }

    #[test]
    fn test_truncate_str_zero_limit() {
        assert_eq!(truncate_str("abc", 0), "");
    }

    // ------------------------------------------------------------------------
    // fit_message tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_fit_message_truncates_progress() {
        // "[tally] " takes 8 of 20 columns
        assert_eq!(fit_message("tally", "tally", &"a".repeat(40), 20), "a".repeat(12));
    }

    #[test]
    fn test_fit_message_keeps_errors_whole() {
        let message = format!("Qiuwen:{}: cannot read: permission denied", "页".repeat(60));
        assert_eq!(fit_message("error", "error", &message, 40), message);
        assert_eq!(fit_message("warn", "warn", &message, 40), message);
    }

    #[test]
    fn test_fit_message_keeps_multiline() {
        let message = "line one that is long\nline two";
        assert_eq!(fit_message("tally", "tally", message, 10), message);
    }

    // ------------------------------------------------------------------------
    // colorize_prefix tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_colorize_prefix_keeps_module_text() {
        colored::control::set_override(false);
        assert_eq!(colorize_prefix("warn", "warn").to_string(), "[warn]");
        assert_eq!(colorize_prefix("Tally", "tally").to_string(), "[Tally]");
    }
}

//! Escape-sequence compaction.
//!
//! Printers and translated markup often emit several SGR sequences in a row
//! (`ESC[1m ESC[44m ESC[31m`). Terminals accept the same thing as a single
//! sequence with `;`-separated parameters (`ESC[1;44;31m`).

use regex::Regex;
use std::sync::LazyLock;

// One single-parameter SGR sequence.
static SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[([0-9]+)m").expect("invalid regex"));

// Two or more of them, back to back.
static RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\x1b\[[0-9]+m){2,}").expect("invalid regex"));

/// Merge the first run of adjacent SGR sequences into one sequence.
///
/// Every occurrence of that exact run is replaced. Other runs are left
/// alone; because merged sequences carry more than one parameter they no
/// longer match, so calling `compact` again merges the next run.
///
/// # Examples
///
/// ```
/// use couleur::markup::compact;
///
/// assert_eq!(compact("\x1b[1m\x1b[31mhi\x1b[0m"), "\x1b[1;31mhi\x1b[0m");
/// assert_eq!(compact("plain"), "plain");
/// ```
#[must_use]
pub fn compact(text: &str) -> String {
    let Some(run) = RUN.find(text) else {
        return text.to_string();
    };
    let run = run.as_str();

    let parameters: Vec<&str> = SEQUENCE
        .captures_iter(run)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    let merged = format!("\x1b[{}m", parameters.join(";"));

    text.replace(run, &merged)
}

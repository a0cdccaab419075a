//! Inline markup for free-form strings.
//!
//! Three token shapes are recognised anywhere in a string:
//!
//! - `#{name}`: a foreground color (`#{red}`) or a modifier (`#{bold}`,
//!   `#{reset}`, `#{up}`).
//! - `#{on:name}`: a background color.
//! - `#{up}`: the cursor-rewind control, which also drives line suppression
//!   in [`strip`].
//!
//! [`translate`] turns tokens into escape sequences for terminals, [`strip`]
//! removes them for plain sinks. Neither fails: unknown names are left in
//! place by `translate` and deleted by `strip`.

mod compact;

pub use compact::compact;

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::attributes::{Color, Modifier};

static BACKGROUND_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\{on:(\w+)\}").expect("invalid regex"));

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\{(\w+)\}").expect("invalid regex"));

static UP_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\{up\}").expect("invalid regex"));

/// Replace markup tokens with escape sequences and compact the result.
///
/// Background tokens resolve first, then foreground colors, then modifiers.
/// A token whose name is in no table stays in the output verbatim.
///
/// # Examples
///
/// ```
/// use couleur::markup::translate;
///
/// assert_eq!(translate("#{red}hi#{reset}"), "\x1b[31mhi\x1b[0m");
/// assert_eq!(translate("#{bold}#{on:blue}x"), "\x1b[1;44mx");
/// assert_eq!(translate("#{mauve}x"), "#{mauve}x");
/// ```
#[must_use]
pub fn translate(text: &str) -> String {
    let text = BACKGROUND_TOKEN.replace_all(text, |caps: &Captures<'_>| {
        caps[1].parse::<Color>().map_or_else(
            |_| caps[0].to_string(),
            |color| color.background_code().to_string(),
        )
    });

    let text = TOKEN.replace_all(&text, |caps: &Captures<'_>| {
        let name = &caps[1];
        name.parse::<Color>()
            .map(Color::foreground_code)
            .or_else(|_| name.parse::<Modifier>().map(Modifier::code))
            .map_or_else(|_| caps[0].to_string(), str::to_string)
    });

    compact(&text)
}

/// Remove all markup tokens, dropping lines that a rewind would overwrite.
///
/// With `n` occurrences of `#{up}` in the text (at least 1), each line
/// holding an `#{up}` token is cut at the token, and the rest of that line
/// plus the following `n - 1` newline-terminated lines are dropped. On a
/// terminal those lines would have been drawn over the previous output; on a
/// plain sink they would only duplicate it. A rewind without a terminating
/// newline after it is simply removed.
///
/// Every other `#{...}` token is deleted, whether its name is known or not.
///
/// # Examples
///
/// ```
/// use couleur::markup::strip;
///
/// assert_eq!(strip("#{green}ok#{reset}"), "ok");
/// assert_eq!(strip("working\n#{up}#{green}done\n"), "working\n");
/// ```
#[must_use]
pub fn strip(text: &str) -> String {
    let rewinds = UP_TOKEN.find_iter(text).count().max(1);
    let text = suppress_rewound_lines(text, rewinds);

    let text = BACKGROUND_TOKEN.replace_all(&text, "");
    TOKEN.replace_all(&text, "").into_owned()
}

/// Line-by-line form of `(?m)^(?P<start>.*)(?:#\{up\})+(?:.*\n){lines}`
/// replaced by `start`: a line holding a rewind keeps the text before its
/// last `#{up}` and swallows itself plus `lines - 1` following lines, all of
/// which must end in a newline.
fn suppress_rewound_lines(text: &str, lines: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut exhausted = false;

    while let Some(end) = rest.find('\n') {
        let line = &rest[..end];
        let after = &rest[end + 1..];

        if !exhausted
            && let Some(token) = UP_TOKEN.find_iter(line).last()
        {
            match skip_lines(after, lines - 1) {
                Some(skipped) => {
                    out.push_str(&line[..token.start()]);
                    rest = &after[skipped..];
                    continue;
                }
                // Later lines have even fewer lines after them.
                None => exhausted = true,
            }
        }

        out.push_str(&rest[..=end]);
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Byte length of the first `count` newline-terminated lines of `text`.
fn skip_lines(text: &str, count: usize) -> Option<usize> {
    let mut offset = 0;
    for _ in 0..count {
        offset += text[offset..].find('\n')? + 1;
    }
    Some(offset)
}

/// Returns true if the text contains at least one token-shaped `#{...}`.
#[must_use]
pub fn has_markup(text: &str) -> bool {
    TOKEN.is_match(text) || BACKGROUND_TOKEN.is_match(text)
}

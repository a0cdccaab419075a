//! Printers: composed decorations bound to an output.
//!
//! A [`Printer`] is built once from a [`Combination`], a [`Palette`] and a
//! [`Layout`] snapshot, and can then be invoked any number of times. The
//! escape prefix and suffix are composed at build time; invoking a printer
//! only concatenates the caller's text and writes the line in one call.
//!
//! Split combinations (`red_and_blue`) produce one segment per part. The
//! caller's text is cut on unescaped `|` and each piece goes through the
//! segment with the same index. Indentation, bold, and the trailing newline
//! are written once for the whole line rather than per segment.

use std::io;

use bitflags::bitflags;

use crate::attributes::{Attribute, Modifier, Palette, UP};
use crate::combination::{Combination, Segment};
use crate::output::Output;

bitflags! {
    /// Line-level decorations applied by a shell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LineFlags: u8 {
        /// Prefix every line with the bold code.
        const BOLD      = 1 << 0;
        /// Terminate every line with a newline.
        const LINEBREAK = 1 << 1;
    }
}

/// Snapshot of the shell state a printer is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    /// Number of leading spaces.
    pub indent: usize,
    pub flags: LineFlags,
}

impl Layout {
    fn lead(&self, palette: Palette) -> String {
        let mut lead = " ".repeat(self.indent);
        if self.flags.contains(LineFlags::BOLD) {
            lead.push_str(palette.code(Attribute::Modifier(Modifier::Bold)));
        }
        lead
    }

    fn trailer(&self) -> &'static str {
        if self.flags.contains(LineFlags::LINEBREAK) {
            "\n"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Template {
    prefix: String,
    suffix: String,
}

impl Template {
    fn segment(segment: &Segment, palette: Palette) -> Self {
        Self {
            prefix: segment.codes(palette),
            suffix: palette.code(Attribute::Modifier(Modifier::Reset)).to_string(),
        }
    }

    fn render_into(&self, text: &str, line: &mut String) {
        line.push_str(&self.prefix);
        line.push_str(text);
        line.push_str(&self.suffix);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Line(Template),
    Split {
        lead: String,
        segments: Vec<Template>,
        trailer: &'static str,
    },
}

/// A composed decoration that writes one line per invocation.
#[derive(Debug, Clone)]
pub struct Printer {
    kind: Kind,
    output: Output,
}

impl Printer {
    /// Compose a printer.
    ///
    /// Single-segment combinations carry the layout in their own template.
    /// Split combinations build their segments without it and apply it once
    /// around the whole line.
    #[must_use]
    pub fn new(combination: &Combination, palette: Palette, layout: Layout, output: Output) -> Self {
        let kind = if combination.is_split() {
            Kind::Split {
                lead: layout.lead(palette),
                segments: combination
                    .segments()
                    .iter()
                    .map(|segment| Template::segment(segment, palette))
                    .collect(),
                trailer: layout.trailer(),
            }
        } else {
            let mut template = combination
                .segments()
                .first()
                .map(|segment| Template::segment(segment, palette))
                .unwrap_or_else(|| Template {
                    prefix: String::new(),
                    suffix: String::new(),
                });
            template.prefix.insert_str(0, &layout.lead(palette));
            template.suffix.push_str(layout.trailer());
            Kind::Line(template)
        };

        Self { kind, output }
    }

    /// Returns true for printers built from a split combination.
    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self.kind, Kind::Split { .. })
    }

    /// The output this printer writes to.
    #[must_use]
    pub const fn output(&self) -> &Output {
        &self.output
    }

    /// The exact text [`print`](Self::print) would write.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        let mut line = String::new();
        self.render_into(text, &mut line);
        line
    }

    /// The exact text [`reprint`](Self::reprint) would write.
    #[must_use]
    pub fn render_rewound(&self, text: &str) -> String {
        let mut line = String::from(UP);
        self.render_into(text, &mut line);
        line
    }

    fn render_into(&self, text: &str, line: &mut String) {
        match &self.kind {
            Kind::Line(template) => template.render_into(text, line),
            Kind::Split {
                lead,
                segments,
                trailer,
            } => {
                line.push_str(lead);
                for (part, template) in split_segments(text).iter().zip(segments) {
                    template.render_into(part, line);
                }
                line.push_str(trailer);
            }
        }
    }

    /// Write one decorated line.
    ///
    /// # Errors
    ///
    /// Returns the output's I/O error unchanged.
    pub fn print(&self, text: &str) -> io::Result<()> {
        self.output.write_str(&self.render(text))
    }

    /// Rewind to the previous line, then write over it.
    ///
    /// The rewind control is written even when decoration is disabled.
    ///
    /// # Errors
    ///
    /// Returns the output's I/O error unchanged.
    pub fn reprint(&self, text: &str) -> io::Result<()> {
        self.output.write_str(&self.render_rewound(text))
    }
}

/// Split text on unescaped `|`, turning `\|` into a literal `|`.
///
/// ```
/// use couleur::printer::split_segments;
///
/// assert_eq!(split_segments("a|b"), ["a", "b"]);
/// assert_eq!(split_segments(r"a\|b|c"), ["a|b", "c"]);
/// ```
#[must_use]
pub fn split_segments(text: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                push_char(&mut parts, '|');
            }
            '|' => parts.push(String::new()),
            c => push_char(&mut parts, c),
        }
    }

    parts
}

fn push_char(parts: &mut [String], c: char) {
    if let Some(last) = parts.last_mut() {
        last.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Capture;

    fn printer(name: &str, palette: Palette, layout: Layout) -> (Printer, Capture) {
        let capture = Capture::new();
        let combination = Combination::parse(name).unwrap();
        (
            Printer::new(&combination, palette, layout, capture.output()),
            capture,
        )
    }

    #[test]
    fn test_plain_layout() {
        let (printer, capture) = printer("red", Palette::Ansi, Layout::default());
        printer.print("hi").unwrap();
        assert_eq!(capture.contents(), "\x1b[31mhi\x1b[0m");
        assert!(!printer.is_split());
    }

    #[test]
    fn test_full_layout_order() {
        let layout = Layout {
            indent: 4,
            flags: LineFlags::BOLD | LineFlags::LINEBREAK,
        };
        let (printer, _) = printer("red_on_blue", Palette::Ansi, layout);
        assert_eq!(
            printer.render("hi"),
            "    \x1b[1m\x1b[44m\x1b[31mhi\x1b[0m\n"
        );
    }

    #[test]
    fn test_plain_palette_keeps_layout() {
        let layout = Layout {
            indent: 2,
            flags: LineFlags::BOLD | LineFlags::LINEBREAK,
        };
        let (printer, _) = printer("bold_red_on_blue", Palette::Plain, layout);
        assert_eq!(printer.render("hi"), "  hi\n");
    }

    #[test]
    fn test_reprint_prefixes_rewind() {
        let (printer, capture) = printer("green", Palette::Plain, Layout::default());
        printer.reprint("done").unwrap();
        assert_eq!(capture.contents(), "\r\x1b[Adone");
    }

    #[test]
    fn test_split_printer() {
        let layout = Layout {
            indent: 2,
            flags: LineFlags::BOLD | LineFlags::LINEBREAK,
        };
        let (printer, _) = printer("red_and_blue", Palette::Ansi, layout);
        assert!(printer.is_split());
        assert_eq!(
            printer.render("a|b"),
            "  \x1b[1m\x1b[31ma\x1b[0m\x1b[34mb\x1b[0m\n"
        );
    }

    #[test]
    fn test_split_printer_zips() {
        let (printer, _) = printer("red_and_blue", Palette::Ansi, Layout::default());
        assert_eq!(printer.render("a"), "\x1b[31ma\x1b[0m");
        assert_eq!(
            printer.render("a|b|c"),
            "\x1b[31ma\x1b[0m\x1b[34mb\x1b[0m"
        );
    }

    #[test]
    fn test_split_printer_escaped_pipe() {
        let (printer, _) = printer("white_and_yellow", Palette::Plain, Layout::default());
        assert_eq!(printer.render(r"a\|b|c"), "a|bc");
    }

    #[test]
    fn test_split_rewind_written_once() {
        let (printer, _) = printer("red_and_blue", Palette::Plain, Layout::default());
        assert_eq!(printer.render_rewound("a|b"), "\r\x1b[Aab");
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments(""), [""]);
        assert_eq!(split_segments("|"), ["", ""]);
        assert_eq!(split_segments("no pipes"), ["no pipes"]);
        assert_eq!(split_segments(r"trailing\"), [r"trailing\"]);
        assert_eq!(split_segments(r"a\\|b"), [r"a\|b"]);
        assert_eq!(split_segments(r"\|\||x"), ["||", "x"]);
    }
}

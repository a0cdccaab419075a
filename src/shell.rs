//! Shell - session state for decorated line output.
//!
//! A `Shell` owns an output, an indentation depth, and two line defaults
//! (bold, trailing newline). It decides once, when built, whether it
//! decorates: a disabled shell resolves every attribute to nothing except
//! the rewind control.
//!
//! # Examples
//!
//! ```
//! use couleur::output::Capture;
//! use couleur::Shell;
//!
//! let capture = Capture::new();
//! let mut shell = Shell::builder()
//!     .output(capture.output())
//!     .disabled(false)
//!     .linebreak(true)
//!     .build();
//!
//! shell.indent();
//! shell.print("green", "passed").unwrap();
//! assert_eq!(capture.contents(), "  \x1b[32mpassed\x1b[0m\n");
//! ```
//!
//! # Concurrency
//!
//! Indentation changes take `&mut self`. A printer snapshots the layout when
//! it is created, so changing the shell afterwards does not affect it. Each
//! printer invocation writes its line with a single locked write.

use std::io;

use crate::attributes::Palette;
use crate::combination::{Combination, LookupError};
use crate::error::Error;
use crate::markup;
use crate::output::Output;
use crate::printer::{Layout, LineFlags, Printer};
use crate::terminal;

/// Default number of spaces per indentation step.
pub const DEFAULT_INDENT: usize = 2;

/// Session state that builds printers.
#[derive(Debug)]
pub struct Shell {
    output: Output,
    indent_factor: usize,
    depth: isize,
    flags: LineFlags,
    palette: Palette,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Create a shell on stdout, decorating if the terminal supports it.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a shell builder for custom configuration.
    #[must_use]
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// Increase the indentation by one step.
    pub fn indent(&mut self) {
        self.depth = self.depth.saturating_add_unsigned(self.indent_factor);
    }

    /// Decrease the indentation by one step.
    ///
    /// The depth is not clamped; a negative depth writes no indentation.
    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub_unsigned(self.indent_factor);
    }

    /// Current indentation depth in spaces.
    #[must_use]
    pub const fn indentation(&self) -> isize {
        self.depth
    }

    /// Spaces added by one [`indent`](Self::indent).
    #[must_use]
    pub const fn indent_factor(&self) -> usize {
        self.indent_factor
    }

    /// Line defaults applied by single-segment printers.
    #[must_use]
    pub const fn flags(&self) -> LineFlags {
        self.flags
    }

    /// The palette chosen at construction.
    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// Returns true if this shell strips decoration.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.palette.is_plain()
    }

    /// The output printers write to.
    #[must_use]
    pub const fn output(&self) -> &Output {
        &self.output
    }

    /// Snapshot of the current indentation and line defaults.
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout {
            indent: usize::try_from(self.depth).unwrap_or(0),
            flags: self.flags,
        }
    }

    /// Build a printer for a combination name such as `bold_red_on_white`
    /// or `green_and_white`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the name references an unknown style or
    /// color. Nothing is written in that case.
    pub fn for_color(&self, name: &str) -> Result<Printer, LookupError> {
        let combination = Combination::parse(name)?;
        Ok(Printer::new(
            &combination,
            self.palette,
            self.layout(),
            self.output.clone(),
        ))
    }

    /// Build a printer for `name` and print one line with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`] before writing if the name is unknown, or
    /// [`Error::Io`] if the write fails.
    pub fn print(&self, name: &str, text: &str) -> Result<(), Error> {
        self.for_color(name)?.print(text)?;
        Ok(())
    }

    /// Like [`print`](Self::print), but overwrite the previous line.
    ///
    /// # Errors
    ///
    /// Same as [`print`](Self::print).
    pub fn reprint(&self, name: &str, text: &str) -> Result<(), Error> {
        self.for_color(name)?.reprint(text)?;
        Ok(())
    }

    /// Resolve free-form `#{...}` markup for this shell's palette.
    ///
    /// Translated when decorating, stripped otherwise.
    #[must_use]
    pub fn render_markup(&self, text: &str) -> String {
        if self.is_disabled() {
            markup::strip(text)
        } else {
            markup::translate(text)
        }
    }

    /// Write free-form markup to the output.
    ///
    /// # Errors
    ///
    /// Returns the output's I/O error unchanged.
    pub fn write_markup(&self, text: &str) -> io::Result<()> {
        self.output.write_str(&self.render_markup(text))
    }
}

/// Builder for creating a Shell with custom settings.
#[derive(Debug, Default)]
pub struct ShellBuilder {
    output: Option<Output>,
    indent: Option<usize>,
    linebreak: Option<bool>,
    bold: Option<bool>,
    disabled: Option<bool>,
}

impl ShellBuilder {
    /// Set the output. Defaults to stdout.
    #[must_use]
    pub fn output(mut self, output: Output) -> Self {
        self.output = Some(output);
        self
    }

    /// Set the number of spaces per indentation step.
    #[must_use]
    pub fn indent(mut self, spaces: usize) -> Self {
        self.indent = Some(spaces);
        self
    }

    /// Terminate every printed line with a newline.
    #[must_use]
    pub fn linebreak(mut self, enabled: bool) -> Self {
        self.linebreak = Some(enabled);
        self
    }

    /// Make every printed line bold.
    #[must_use]
    pub fn bold(mut self, enabled: bool) -> Self {
        self.bold = Some(enabled);
        self
    }

    /// Force decoration off (or on). Defaults to terminal detection.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Build the shell.
    #[must_use]
    pub fn build(self) -> Shell {
        let disabled = self
            .disabled
            .unwrap_or_else(|| !terminal::supports_ansi());

        let mut flags = LineFlags::empty();
        flags.set(LineFlags::BOLD, self.bold.unwrap_or(false));
        flags.set(LineFlags::LINEBREAK, self.linebreak.unwrap_or(false));

        let shell = Shell {
            output: self.output.unwrap_or_else(Output::stdout),
            indent_factor: self.indent.unwrap_or(DEFAULT_INDENT),
            depth: 0,
            flags,
            palette: Palette::for_disabled(disabled),
        };
        log::debug!(
            "shell ready: palette={:?} flags={:?} indent_factor={}",
            shell.palette,
            shell.flags,
            shell.indent_factor
        );
        shell
    }
}

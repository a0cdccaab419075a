//! Attribute tables for terminal decoration.
//!
//! The palette is deliberately small: eight colors plus `normal` (the
//! terminal default), usable as foreground or background, six text styles,
//! `reset`, and the `up` control that rewinds the cursor to the start of the
//! previous line.
//!
//! Every attribute has a fixed control string. A [`Palette`] decides whether
//! those strings are emitted ([`Palette::Ansi`]) or replaced by nothing
//! ([`Palette::Plain`]). The rewind control is the exception: it is emitted
//! by both palettes, so that overwritten lines still overwrite on plain sinks.
//!
//! # Examples
//!
//! ```
//! use couleur::attributes::{Color, Modifier, Palette};
//!
//! assert_eq!(Color::Red.foreground_code(), "\x1b[31m");
//! assert_eq!(Color::Red.background_code(), "\x1b[41m");
//! assert_eq!(Palette::Plain.foreground("red"), Some(""));
//! assert_eq!(Palette::Plain.modifier("up"), Some(Modifier::Up.code()));
//! ```

use std::fmt;
use std::str::FromStr;

/// Control string that moves the cursor to the start of the previous line.
pub const UP: &str = "\r\x1b[A";

/// SGR sequence that resets every color and style.
pub const RESET: &str = "\x1b[0m";

/// Wrap an SGR parameter into a complete escape sequence.
///
/// ```
/// assert_eq!(couleur::attributes::ansify(31), "\x1b[31m");
/// ```
#[must_use]
pub fn ansify(code: u8) -> String {
    format!("\x1b[{code}m")
}

/// Error returned when a name matches no entry of an attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeParseError {
    name: String,
}

impl AttributeParseError {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// The name that failed to resolve.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AttributeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown attribute name '{}'", self.name)
    }
}

impl std::error::Error for AttributeParseError {}

/// One of the nine palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// The terminal's default color.
    Normal,
}

impl Color {
    /// All colors in SGR order.
    pub const ALL: [Self; 9] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::Normal,
    ];

    /// The markup name of this color.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Normal => "normal",
        }
    }

    /// Escape sequence selecting this color as foreground.
    #[must_use]
    pub const fn foreground_code(self) -> &'static str {
        match self {
            Self::Black => "\x1b[30m",
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Blue => "\x1b[34m",
            Self::Magenta => "\x1b[35m",
            Self::Cyan => "\x1b[36m",
            Self::White => "\x1b[37m",
            Self::Normal => "\x1b[39m",
        }
    }

    /// Escape sequence selecting this color as background.
    #[must_use]
    pub const fn background_code(self) -> &'static str {
        match self {
            Self::Black => "\x1b[40m",
            Self::Red => "\x1b[41m",
            Self::Green => "\x1b[42m",
            Self::Yellow => "\x1b[43m",
            Self::Blue => "\x1b[44m",
            Self::Magenta => "\x1b[45m",
            Self::Cyan => "\x1b[46m",
            Self::White => "\x1b[47m",
            Self::Normal => "\x1b[49m",
        }
    }
}

impl FromStr for Color {
    type Err = AttributeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| AttributeParseError::new(s))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text styles, `reset`, and the `up` rewind control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Reset,
    Bold,
    Italic,
    Underline,
    Blink,
    Inverse,
    Strikethrough,
    /// Carriage return followed by cursor-up.
    Up,
}

impl Modifier {
    pub const ALL: [Self; 8] = [
        Self::Reset,
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Blink,
        Self::Inverse,
        Self::Strikethrough,
        Self::Up,
    ];

    /// The markup name of this modifier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Blink => "blink",
            Self::Inverse => "inverse",
            Self::Strikethrough => "strikethrough",
            Self::Up => "up",
        }
    }

    /// The control string emitted for this modifier.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Reset => RESET,
            Self::Bold => "\x1b[1m",
            Self::Italic => "\x1b[3m",
            Self::Underline => "\x1b[4m",
            Self::Blink => "\x1b[5m",
            Self::Inverse => "\x1b[7m",
            Self::Strikethrough => "\x1b[9m",
            Self::Up => UP,
        }
    }
}

impl FromStr for Modifier {
    type Err = AttributeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|modifier| modifier.name() == s)
            .ok_or_else(|| AttributeParseError::new(s))
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved attribute of one of the three tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Foreground(Color),
    Background(Color),
    Modifier(Modifier),
}

impl Attribute {
    /// The real control string for this attribute.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Foreground(color) => color.foreground_code(),
            Self::Background(color) => color.background_code(),
            Self::Modifier(modifier) => modifier.code(),
        }
    }

    /// Resolve a name the way a combination token is resolved: modifiers
    /// first, then foreground colors.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeParseError`] if the name is in neither table.
    pub fn parse_foreground(name: &str) -> Result<Self, AttributeParseError> {
        name.parse::<Modifier>()
            .map(Self::Modifier)
            .or_else(|_| name.parse::<Color>().map(Self::Foreground))
    }
}

/// Which set of control strings attribute lookups resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Palette {
    /// Real escape sequences.
    #[default]
    Ansi,
    /// Empty strings for everything except [`UP`].
    Plain,
}

impl Palette {
    /// The palette a shell uses when decoration is enabled or disabled.
    #[must_use]
    pub const fn for_disabled(disabled: bool) -> Self {
        if disabled { Self::Plain } else { Self::Ansi }
    }

    /// Returns true for the no-op palette.
    #[must_use]
    pub const fn is_plain(self) -> bool {
        matches!(self, Self::Plain)
    }

    /// Control string for a typed attribute under this palette.
    #[must_use]
    pub const fn code(self, attribute: Attribute) -> &'static str {
        match (self, attribute) {
            (Self::Ansi, attribute) => attribute.code(),
            (Self::Plain, Attribute::Modifier(Modifier::Up)) => UP,
            (Self::Plain, _) => "",
        }
    }

    /// Look up a foreground color by name.
    ///
    /// The plain palette answers every name, known or not.
    #[must_use]
    pub fn foreground(self, name: &str) -> Option<&'static str> {
        match self {
            Self::Ansi => name.parse::<Color>().ok().map(Color::foreground_code),
            Self::Plain => Some(plain_code(name)),
        }
    }

    /// Look up a background color by name.
    #[must_use]
    pub fn background(self, name: &str) -> Option<&'static str> {
        match self {
            Self::Ansi => name.parse::<Color>().ok().map(Color::background_code),
            Self::Plain => Some(plain_code(name)),
        }
    }

    /// Look up a modifier by name.
    #[must_use]
    pub fn modifier(self, name: &str) -> Option<&'static str> {
        match self {
            Self::Ansi => name.parse::<Modifier>().ok().map(Modifier::code),
            Self::Plain => Some(plain_code(name)),
        }
    }
}

fn plain_code(name: &str) -> &'static str {
    if name == Modifier::Up.name() { UP } else { "" }
}

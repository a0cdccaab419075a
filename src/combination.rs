//! Combination names.
//!
//! A combination name selects the attributes of a printer:
//!
//! - `_` joins styles and colors inside one segment: `bold_red`.
//! - `_on_` adds a background color to a segment: `red_on_blue`.
//! - `_and_` joins segments of a split line: `green_and_white_on_black`.
//!
//! Each token of a segment resolves against modifiers first and foreground
//! colors second, so `bold_red` yields both codes in order. Names are
//! validated eagerly: an unknown token is a [`LookupError`] before any
//! printer exists.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex};

use lru::LruCache;
use smallvec::SmallVec;

use crate::attributes::{Attribute, Color, Palette};
use crate::sync::lock_recover;

/// Introduces the background color of a segment.
pub const BACKGROUND_SEPARATOR: &str = "_on_";

/// Separates the segments of a split line.
pub const SEGMENT_SEPARATOR: &str = "_and_";

/// Joins styles and colors inside one segment.
pub const TOKEN_SEPARATOR: char = '_';

static CACHE: LazyLock<Mutex<LruCache<String, Combination>>> =
    LazyLock::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(256).expect("non-zero"))));

/// Error for combination names that reference unknown attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The name was empty.
    Empty,
    /// A style/color token matched neither table.
    UnknownAttribute { token: String, combination: String },
    /// The background part is not a color.
    UnknownBackground { token: String, combination: String },
}

impl LookupError {
    /// The offending token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::UnknownAttribute { token, .. } | Self::UnknownBackground { token, .. } => {
                Some(token)
            }
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty combination name"),
            Self::UnknownAttribute { token, combination } => {
                write!(f, "unknown style or color '{token}' in '{combination}'")
            }
            Self::UnknownBackground { token, combination } => {
                write!(f, "unknown background color '{token}' in '{combination}'")
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// One printable segment: an optional background plus styles and colors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    background: Option<Color>,
    attributes: SmallVec<[Attribute; 4]>,
}

impl Segment {
    /// Create a segment from its parts.
    #[must_use]
    pub fn new(attributes: impl IntoIterator<Item = Attribute>, background: Option<Color>) -> Self {
        Self {
            background,
            attributes: attributes.into_iter().collect(),
        }
    }

    /// The background color, if one was requested.
    #[must_use]
    pub const fn background(&self) -> Option<Color> {
        self.background
    }

    /// Styles and foreground colors in token order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Background code followed by each attribute code, under `palette`.
    #[must_use]
    pub fn codes(&self, palette: Palette) -> String {
        let background = self
            .background
            .map(|color| palette.code(Attribute::Background(color)));
        background
            .into_iter()
            .chain(self.attributes.iter().map(|attr| palette.code(*attr)))
            .collect()
    }

    fn parse(part: &str, combination: &str) -> Result<Self, LookupError> {
        let mut pieces = part.split(BACKGROUND_SEPARATOR);
        let foreground = pieces.next().unwrap_or_default();

        let attributes = foreground
            .split(TOKEN_SEPARATOR)
            .map(|token| {
                Attribute::parse_foreground(token).map_err(|_| LookupError::UnknownAttribute {
                    token: token.to_string(),
                    combination: combination.to_string(),
                })
            })
            .collect::<Result<SmallVec<[Attribute; 4]>, _>>()?;

        // Anything after a second `_on_` is ignored.
        let background = pieces
            .next()
            .map(|token| {
                token.parse::<Color>().map_err(|_| LookupError::UnknownBackground {
                    token: token.to_string(),
                    combination: combination.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            background,
            attributes,
        })
    }
}

/// A parsed combination name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    name: String,
    segments: SmallVec<[Segment; 2]>,
}

impl Combination {
    /// Parse a combination name, consulting the process-wide cache.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the name is empty or any token is unknown.
    pub fn parse(name: &str) -> Result<Self, LookupError> {
        if let Some(cached) = lock_recover(&CACHE).get(name) {
            return Ok(cached.clone());
        }

        log::trace!("parsing combination '{name}'");
        let combination = Self::parse_uncached(name).inspect_err(|err| {
            log::debug!("rejected combination: {err}");
        })?;
        lock_recover(&CACHE).put(name.to_string(), combination.clone());
        Ok(combination)
    }

    fn parse_uncached(name: &str) -> Result<Self, LookupError> {
        if name.is_empty() {
            return Err(LookupError::Empty);
        }

        let segments = name
            .split(SEGMENT_SEPARATOR)
            .map(|part| Segment::parse(part, name))
            .collect::<Result<SmallVec<[Segment; 2]>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    /// The name this combination was parsed from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The segments, in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the name contained [`SEGMENT_SEPARATOR`].
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.name.contains(SEGMENT_SEPARATOR)
    }
}

impl FromStr for Combination {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

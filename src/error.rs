//! Crate-level error type.

use std::fmt;
use std::io;

use crate::combination::LookupError;

/// Failure of a one-shot print: either the name or the write.
#[derive(Debug)]
pub enum Error {
    /// The combination name referenced an unknown attribute.
    Lookup(LookupError),
    /// The output rejected the write.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup(err) => write!(f, "lookup failed: {err}"),
            Self::Io(err) => write!(f, "write failed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lookup(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<LookupError> for Error {
    fn from(err: LookupError) -> Self {
        Self::Lookup(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

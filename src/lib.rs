//! # couleur
//!
//! Inline `#{color}` markup and composable ANSI printers for terminal output.
//!
//! Strings carry tokens such as `#{red}`, `#{on:blue}`, `#{bold}` or `#{up}`
//! that are either translated into SGR escape sequences or stripped when the
//! sink cannot display them. A [`Shell`] builds printers for named attribute
//! combinations like `bold_red_on_white` or `green_and_white`.
//!
//! ## Quick Start
//!
//! ```rust
//! use couleur::prelude::*;
//!
//! let capture = Capture::new();
//! let shell = Shell::builder()
//!     .output(capture.output())
//!     .disabled(false)
//!     .build();
//!
//! shell.print("red_on_blue", "hi").unwrap();
//! assert_eq!(capture.contents(), "\x1b[44m\x1b[31mhi\x1b[0m");
//!
//! assert_eq!(couleur::markup::translate("#{bold}#{red}x"), "\x1b[1;31mx");
//! assert_eq!(couleur::markup::strip("#{bold}#{red}x"), "x");
//! ```
//!
//! ## Core Concepts
//!
//! - **Markup**: `#{...}` tokens inside ordinary strings
//! - **Combination**: a name like `bold_red_on_white`, parsed into attributes
//! - **Printer**: a combination composed with a shell's layout, bound to an output
//! - **Shell**: indentation, line defaults, and the decoration decision
//! - **Proxy**: rewrites markup in everything written to one sink

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod attributes;
pub mod combination;
pub mod error;
pub mod logging;
pub mod markup;
pub mod output;
pub mod printer;
pub mod proxy;
pub mod shell;
pub mod sync;
pub mod terminal;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::attributes::{Attribute, Color, Modifier, Palette};
    pub use crate::combination::{Combination, LookupError};
    pub use crate::error::Error;
    pub use crate::output::{Capture, Output};
    pub use crate::printer::Printer;
    pub use crate::proxy::{Proxy, ProxyMode, ProxyRegistry};
    pub use crate::shell::{Shell, ShellBuilder};
}

// Re-export key types at crate root
pub use attributes::{Color, Modifier, Palette};
pub use combination::LookupError;
pub use error::Error;
pub use logging::CouleurLogger;
pub use output::{Capture, Output};
pub use printer::Printer;
pub use proxy::{Proxy, ProxyRegistry};
pub use shell::{Shell, ShellBuilder};

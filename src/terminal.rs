//! Terminal capability detection.
//!
//! Decides, once per process, whether output should carry escape sequences.
//! The decision considers the standard streams and a few environment
//! variables:
//!
//! - `COULEUR_DISABLE` or `NO_COLOR` (non-empty): never decorate. This wins
//!   over everything else.
//! - `FORCE_COULEUR` (non-empty): always decorate.
//! - `TERM=ANSI`: decorate even when no stream is a terminal.
//! - Otherwise decorate if stdout or stderr is a terminal. On Windows the
//!   console must also accept virtual-terminal sequences.

use std::io::IsTerminal;
use std::sync::LazyLock;

static SUPPORTS_ANSI: LazyLock<bool> = LazyLock::new(|| {
    let env = EnvSettings::from_env();
    let streams = Streams::detect();
    let supported = detect_with(&env, streams);
    log::debug!("ansi support: {supported} ({streams:?})");
    supported
});

/// Environment variables consulted by detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub couleur_disable: Option<String>,
    pub no_color: Option<String>,
    pub force_couleur: Option<String>,
    pub term: Option<String>,
}

impl EnvSettings {
    /// Read the settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            couleur_disable: std::env::var("COULEUR_DISABLE").ok(),
            no_color: std::env::var("NO_COLOR").ok(),
            force_couleur: std::env::var("FORCE_COULEUR").ok(),
            term: std::env::var("TERM").ok(),
        }
    }

    fn disabled(&self) -> bool {
        is_set(self.couleur_disable.as_deref()) || is_set(self.no_color.as_deref())
    }

    fn forced(&self) -> bool {
        is_set(self.force_couleur.as_deref())
    }

    fn term_is_ansi(&self) -> bool {
        self.term.as_deref() == Some("ANSI")
    }
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.is_empty())
}

/// What detection knows about the standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Streams {
    pub stdout_tty: bool,
    pub stderr_tty: bool,
    /// The console interprets escape sequences. Always true off Windows.
    pub virtual_terminal: bool,
}

impl Streams {
    /// Inspect the process standard streams.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            stdout_tty: is_terminal(),
            stderr_tty: is_stderr_terminal(),
            virtual_terminal: virtual_terminal(),
        }
    }
}

#[cfg(windows)]
fn virtual_terminal() -> bool {
    crossterm::ansi_support::supports_ansi()
}

#[cfg(not(windows))]
fn virtual_terminal() -> bool {
    true
}

/// Check if stdout is connected to a terminal.
#[must_use]
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Check if stderr is connected to a terminal.
#[must_use]
pub fn is_stderr_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Whether decoration is supported, computed on first use and then fixed.
#[must_use]
pub fn supports_ansi() -> bool {
    *SUPPORTS_ANSI
}

/// Run detection now against the current environment, bypassing the
/// process-wide cached answer.
#[must_use]
pub fn detect() -> bool {
    detect_with(&EnvSettings::from_env(), Streams::detect())
}

/// Detection itself, with all inputs explicit.
#[must_use]
pub fn detect_with(env: &EnvSettings, streams: Streams) -> bool {
    if env.disabled() {
        return false;
    }
    if env.forced() {
        return true;
    }

    let term_ansi = env.term_is_ansi();
    [streams.stdout_tty, streams.stderr_tty]
        .into_iter()
        .any(|tty| term_ansi || (tty && streams.virtual_terminal))
}

//! Stream proxies.
//!
//! A [`Proxy`] sits in front of an [`Output`] and rewrites markup in
//! everything written through it:
//!
//! | Mode | Effect of a write |
//! |------|-------------------|
//! | [`ProxyMode::Disabled`] | passed through unchanged (initial mode) |
//! | [`ProxyMode::Translate`] | `#{...}` tokens become escape sequences |
//! | [`ProxyMode::Ignore`] | `#{...}` tokens are stripped |
//!
//! Proxies are handed out by a [`ProxyRegistry`], which keeps exactly one
//! proxy per sink. Nothing here touches process-global streams: callers
//! write to the proxy they were given.
//!
//! Each `write` call is rewritten on its own, so a token split across two
//! writes is not recognised. [`Proxy::write_text`] writes a whole string in
//! one call.
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//! use couleur::output::Capture;
//! use couleur::proxy::ProxyRegistry;
//!
//! let capture = Capture::new();
//! let output = capture.output();
//! let registry = ProxyRegistry::new();
//!
//! let mut proxy = registry.proxy(&output);
//! proxy.ignore();
//! proxy.write_all(b"#{green}ok#{reset}\n").unwrap();
//! assert_eq!(capture.contents(), "ok\n");
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::markup;
use crate::output::Output;
use crate::sync::lock_recover;

/// How a proxy rewrites the text written through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProxyMode {
    /// Write through unchanged.
    #[default]
    Disabled,
    /// Translate markup into escape sequences.
    Translate,
    /// Strip markup.
    Ignore,
}

#[derive(Debug)]
struct ProxyInner {
    output: Output,
    mode: Mutex<ProxyMode>,
}

/// Handle to the single proxy of one sink. Clones share the mode.
#[derive(Debug, Clone)]
pub struct Proxy {
    inner: Arc<ProxyInner>,
}

impl Proxy {
    fn new(output: Output) -> Self {
        Self {
            inner: Arc::new(ProxyInner {
                output,
                mode: Mutex::new(ProxyMode::Disabled),
            }),
        }
    }

    /// Translate markup in subsequent writes.
    pub fn enable(&self) {
        self.set_mode(ProxyMode::Translate);
    }

    /// Restore the unmodified write path.
    pub fn disable(&self) {
        self.set_mode(ProxyMode::Disabled);
    }

    /// Strip markup from subsequent writes.
    pub fn ignore(&self) {
        self.set_mode(ProxyMode::Ignore);
    }

    fn set_mode(&self, mode: ProxyMode) {
        let mut current = lock_recover(&self.inner.mode);
        if *current != mode {
            log::debug!(
                "proxy for output {} switched from {:?} to {mode:?}",
                self.inner.output.id(),
                *current
            );
        }
        *current = mode;
    }

    /// The current mode.
    #[must_use]
    pub fn mode(&self) -> ProxyMode {
        *lock_recover(&self.inner.mode)
    }

    /// The sink behind this proxy.
    #[must_use]
    pub fn output(&self) -> &Output {
        &self.inner.output
    }

    /// Returns true if both handles are the same proxy.
    #[must_use]
    pub fn same_proxy(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Apply the current mode to `text` without writing it.
    #[must_use]
    pub fn transform<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.mode() {
            ProxyMode::Disabled => Cow::Borrowed(text),
            ProxyMode::Translate => Cow::Owned(markup::translate(text)),
            ProxyMode::Ignore => Cow::Owned(markup::strip(text)),
        }
    }

    /// Write a whole string through the proxy in one call.
    ///
    /// # Errors
    ///
    /// Returns the sink's I/O error unchanged.
    pub fn write_text(&self, text: &str) -> io::Result<()> {
        self.inner.output.write_str(&self.transform(text))
    }
}

impl Write for Proxy {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match std::str::from_utf8(buf) {
            Ok(text) => self.write_text(text)?,
            Err(_) => self.inner.output.write_bytes(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Every write above already flushed the sink.
        Ok(())
    }
}

/// Registry associating each sink with exactly one [`Proxy`].
#[derive(Debug, Default)]
pub struct ProxyRegistry {
    proxies: Mutex<HashMap<usize, Proxy>>,
}

impl ProxyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The proxy for `output`, created on first request.
    ///
    /// Any clone of the same [`Output`] yields the same proxy.
    pub fn proxy(&self, output: &Output) -> Proxy {
        lock_recover(&self.proxies)
            .entry(output.id())
            .or_insert_with(|| {
                log::debug!("registering proxy for {output:?}");
                Proxy::new(output.clone())
            })
            .clone()
    }

    /// The proxy for the process standard output.
    pub fn stdout(&self) -> Proxy {
        self.proxy(&Output::stdout())
    }

    /// The proxy for the process standard error.
    pub fn stderr(&self) -> Proxy {
        self.proxy(&Output::stderr())
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        lock_recover(&self.proxies).len()
    }

    /// Returns true if no sink has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock_recover(&self.proxies).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Capture;

    #[test]
    fn test_new_proxy_passes_through() {
        let capture = Capture::new();
        let registry = ProxyRegistry::new();
        let mut proxy = registry.proxy(&capture.output());
        assert_eq!(proxy.mode(), ProxyMode::Disabled);
        proxy.write_all(b"#{red}raw").unwrap();
        assert_eq!(capture.contents(), "#{red}raw");
    }

    #[test]
    fn test_enable_translates() {
        let capture = Capture::new();
        let registry = ProxyRegistry::new();
        let proxy = registry.proxy(&capture.output());
        proxy.enable();
        proxy.write_text("#{bold}#{red}x#{reset}").unwrap();
        assert_eq!(capture.contents(), "\x1b[1;31mx\x1b[0m");
    }

    #[test]
    fn test_ignore_strips() {
        let capture = Capture::new();
        let registry = ProxyRegistry::new();
        let proxy = registry.proxy(&capture.output());
        proxy.ignore();
        proxy.write_text("#{on:blue}x#{reset}").unwrap();
        assert_eq!(capture.contents(), "x");
    }

    #[test]
    fn test_disable_restores_passthrough() {
        let capture = Capture::new();
        let registry = ProxyRegistry::new();
        let proxy = registry.proxy(&capture.output());
        proxy.enable();
        proxy.disable();
        proxy.write_text("#{red}").unwrap();
        assert_eq!(capture.contents(), "#{red}");
    }

    #[test]
    fn test_registry_is_idempotent() {
        let output = Capture::new().output();
        let registry = ProxyRegistry::new();
        let first = registry.proxy(&output);
        let second = registry.proxy(&output.clone());
        assert!(first.same_proxy(&second));
        assert_eq!(registry.len(), 1);

        first.ignore();
        assert_eq!(second.mode(), ProxyMode::Ignore);
    }

    #[test]
    fn test_registry_distinguishes_sinks() {
        let registry = ProxyRegistry::new();
        assert!(registry.is_empty());
        let a = registry.proxy(&Capture::new().output());
        let b = registry.proxy(&Capture::new().output());
        assert!(!a.same_proxy(&b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_standard_stream_proxies() {
        let registry = ProxyRegistry::new();
        assert!(registry.stdout().same_proxy(&registry.stdout()));
        assert!(!registry.stdout().same_proxy(&registry.stderr()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_passes_through() {
        let capture = Capture::new();
        let registry = ProxyRegistry::new();
        let mut proxy = registry.proxy(&capture.output());
        proxy.ignore();
        let written = proxy.write(&[0xff, b'#']).unwrap();
        assert_eq!(written, 2);
        assert_eq!(capture.contents(), "\u{fffd}#");
    }

    #[test]
    fn test_transform_borrows_when_disabled() {
        let registry = ProxyRegistry::new();
        let proxy = registry.proxy(&Capture::new().output());
        assert!(matches!(proxy.transform("x"), Cow::Borrowed("x")));
    }
}

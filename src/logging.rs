//! Logging integration for the `log` crate.
//!
//! [`CouleurLogger`] writes one decorated line per record through a
//! [`Shell`]: an optional timestamp, the level name in its colour, and the
//! message. Messages may carry `#{...}` markup, which is translated when the
//! shell decorates and stripped when it does not.
//!
//! Optional tracing integration is available via `CouleurTracingLayer` when
//! the `tracing` feature is enabled.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::{OffsetDateTime, format_description::OwnedFormatItem};

use crate::attributes::{Attribute, Color, Modifier};
use crate::combination::Segment;
use crate::shell::Shell;

const DEFAULT_TIME_FORMAT: &str = "[hour]:[minute]:[second]";

/// Logger for the `log` crate that prints through a [`Shell`].
///
/// # Thread Safety
///
/// `CouleurLogger` implements `Log`, which requires `Sync`. Each record is
/// rendered into one string and written with a single locked write, so
/// lines from concurrent threads never interleave.
pub struct CouleurLogger {
    shell: Shell,
    level: LevelFilter,
    show_time: bool,
    show_level: bool,
    show_path: bool,
    time_format: OwnedFormatItem,
}

impl CouleurLogger {
    /// Create a logger with default settings: `Info` level, timestamps and
    /// level names shown, no source path.
    #[must_use]
    pub fn new(shell: Shell) -> Self {
        let time_format = time::format_description::parse_owned::<2>(DEFAULT_TIME_FORMAT)
            .unwrap_or_else(|_| OwnedFormatItem::Literal(Vec::<u8>::new().into_boxed_slice()));
        Self {
            shell,
            level: LevelFilter::Info,
            show_time: true,
            show_level: true,
            show_path: false,
            time_format,
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable timestamps.
    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    /// Enable or disable level names.
    #[must_use]
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Append `file:line` of the call site.
    #[must_use]
    pub fn show_path(mut self, show: bool) -> Self {
        self.show_path = show;
        self
    }

    /// Override the time format, given as a `time` format description.
    ///
    /// An invalid description keeps the current format.
    #[must_use]
    pub fn time_format(mut self, format: &str) -> Self {
        match time::format_description::parse_owned::<2>(format) {
            Ok(parsed) => self.time_format = parsed,
            Err(err) => log::debug!("ignoring time format {format:?}: {err}"),
        }
        self
    }

    /// The shell records are printed through.
    #[must_use]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Install as the global logger.
    ///
    /// # Errors
    ///
    /// Fails if a global logger is already installed.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }

    fn format_time(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        now.format(&self.time_format)
            .unwrap_or_else(|_| now.to_string())
    }

    fn level_segment(level: Level) -> Segment {
        let attributes = match level {
            Level::Error => vec![
                Attribute::Modifier(Modifier::Bold),
                Attribute::Foreground(Color::Red),
            ],
            Level::Warn => vec![Attribute::Foreground(Color::Yellow)],
            Level::Info => vec![Attribute::Foreground(Color::Green)],
            Level::Debug => vec![Attribute::Foreground(Color::Blue)],
            Level::Trace => vec![Attribute::Foreground(Color::White)],
        };
        Segment::new(attributes, None)
    }

    /// Render a record into the exact line the logger writes.
    #[must_use]
    pub fn format_record(&self, record: &Record<'_>) -> String {
        let palette = self.shell.palette();
        let mut line = " ".repeat(self.shell.layout().indent);

        if self.show_time {
            line.push('[');
            line.push_str(&self.format_time());
            line.push_str("] ");
        }

        if self.show_level {
            line.push_str(&Self::level_segment(record.level()).codes(palette));
            line.push_str(&format!("{:<5}", record.level()));
            line.push_str(palette.code(Attribute::Modifier(Modifier::Reset)));
            line.push(' ');
        }

        line.push_str(&self.shell.render_markup(&record.args().to_string()));

        if self.show_path
            && let Some(path) = record.file()
        {
            line.push(' ');
            line.push_str(path);
            if let Some(line_no) = record.line() {
                line.push(':');
                line.push_str(&line_no.to_string());
            }
        }

        line.push('\n');
        line
    }
}

impl Log for CouleurLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // A logger has nowhere to report its own write failures.
        let _ = self.shell.output().write_str(&self.format_record(record));
    }

    fn flush(&self) {}
}

#[cfg(feature = "tracing")]
mod tracing_integration {
    use super::{CouleurLogger, Shell};
    use log::{Level, Log};
    use std::fmt::Debug;

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level as TracingLevel, Subscriber};
    use tracing_subscriber::{Layer, layer::Context};

    /// Tracing layer that prints events through a [`CouleurLogger`].
    pub struct CouleurTracingLayer {
        logger: CouleurLogger,
    }

    impl CouleurTracingLayer {
        /// Create a tracing layer backed by a default `CouleurLogger`.
        #[must_use]
        pub fn new(shell: Shell) -> Self {
            Self {
                logger: CouleurLogger::new(shell),
            }
        }

        /// Use an existing logger configuration.
        #[must_use]
        pub fn with_logger(logger: CouleurLogger) -> Self {
            Self { logger }
        }

        /// Install as the global tracing subscriber.
        ///
        /// # Errors
        ///
        /// Fails if a global subscriber is already installed.
        pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
            use tracing_subscriber::prelude::*;

            let subscriber = tracing_subscriber::registry().with(self);
            tracing::subscriber::set_global_default(subscriber)
        }
    }

    #[derive(Default)]
    struct EventVisitor {
        message: Option<String>,
        fields: Vec<(String, String)>,
    }

    impl Visit for EventVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.push(field, value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
            self.push(field, format!("{value:?}"));
        }
    }

    impl EventVisitor {
        fn push(&mut self, field: &Field, rendered: String) {
            if field.name() == "message" {
                self.message = Some(rendered);
            } else {
                self.fields.push((field.name().to_string(), rendered));
            }
        }

        fn into_message(self) -> String {
            let mut message = self.message.unwrap_or_default();
            for (key, value) in self.fields {
                if !message.is_empty() {
                    message.push(' ');
                }
                message.push_str(&key);
                message.push('=');
                message.push_str(&value);
            }
            message
        }
    }

    impl<S> Layer<S> for CouleurTracingLayer
    where
        S: Subscriber,
    {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            let mut visitor = EventVisitor::default();
            event.record(&mut visitor);
            let message = visitor.into_message();

            self.logger.log(
                &log::Record::builder()
                    .args(format_args!("{message}"))
                    .level(map_tracing_level(*metadata.level()))
                    .target(metadata.target())
                    .file(metadata.file())
                    .line(metadata.line())
                    .module_path(metadata.module_path())
                    .build(),
            );
        }
    }

    fn map_tracing_level(level: TracingLevel) -> Level {
        match level {
            TracingLevel::TRACE => Level::Trace,
            TracingLevel::DEBUG => Level::Debug,
            TracingLevel::INFO => Level::Info,
            TracingLevel::WARN => Level::Warn,
            TracingLevel::ERROR => Level::Error,
        }
    }

}

#[cfg(feature = "tracing")]
pub use tracing_integration::CouleurTracingLayer;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Capture;

    fn logger(capture: &Capture, disabled: bool) -> CouleurLogger {
        let shell = Shell::builder()
            .output(capture.output())
            .disabled(disabled)
            .build();
        CouleurLogger::new(shell)
    }

    fn emit(logger: &CouleurLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .args(format_args!("{message}"))
                .level(level)
                .build(),
        );
    }

    #[test]
    fn test_logger_defaults() {
        let capture = Capture::new();
        let logger = logger(&capture, true);
        assert_eq!(logger.level, LevelFilter::Info);
        assert!(logger.show_time);
        assert!(logger.show_level);
        assert!(!logger.show_path);
    }

    #[test]
    fn test_builder_chain() {
        let capture = Capture::new();
        let logger = logger(&capture, true)
            .level(LevelFilter::Trace)
            .show_time(false)
            .show_level(false)
            .show_path(true);
        assert_eq!(logger.level, LevelFilter::Trace);
        assert!(!logger.show_time);
        assert!(!logger.show_level);
        assert!(logger.show_path);
    }

    #[test]
    fn test_plain_record() {
        let capture = Capture::new();
        let logger = logger(&capture, true).show_time(false);
        emit(&logger, Level::Warn, "disk #{bold}low#{reset}");
        assert_eq!(capture.contents(), "WARN  disk low\n");
    }

    #[test]
    fn test_decorated_record() {
        let capture = Capture::new();
        let logger = logger(&capture, false).show_time(false);
        emit(&logger, Level::Error, "#{red}boom");
        assert_eq!(capture.contents(), "\x1b[1m\x1b[31mERROR\x1b[0m \x1b[31mboom\n");
    }

    #[test]
    fn test_level_colors() {
        let capture = Capture::new();
        let logger = logger(&capture, false)
            .show_time(false)
            .level(LevelFilter::Trace);
        emit(&logger, Level::Info, "i");
        emit(&logger, Level::Debug, "d");
        emit(&logger, Level::Trace, "t");
        assert_eq!(
            capture.contents(),
            "\x1b[32mINFO \x1b[0m i\n\x1b[34mDEBUG\x1b[0m d\n\x1b[37mTRACE\x1b[0m t\n"
        );
    }

    #[test]
    fn test_level_filtering() {
        let capture = Capture::new();
        let logger = logger(&capture, true).level(LevelFilter::Warn);
        emit(&logger, Level::Info, "dropped");
        assert!(capture.is_empty());
        assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    }

    #[test]
    fn test_time_prefix() {
        let capture = Capture::new();
        let logger = logger(&capture, true)
            .show_level(false)
            .time_format("[year]");
        emit(&logger, Level::Info, "tick");
        let line = capture.contents();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] tick\n"));
        assert_eq!(line.len(), "[2026] tick\n".len());
    }

    #[test]
    fn test_invalid_time_format_kept() {
        let capture = Capture::new();
        let logger = logger(&capture, true).time_format("[not_a_component]");
        assert!(!logger.format_time().is_empty());
    }

    #[test]
    fn test_path_suffix() {
        let capture = Capture::new();
        let logger = logger(&capture, true)
            .show_time(false)
            .show_level(false)
            .show_path(true);
        let record = Record::builder()
            .args(format_args!("here"))
            .level(Level::Info)
            .file(Some("main.rs"))
            .line(Some(42))
            .build();
        assert_eq!(logger.format_record(&record), "here main.rs:42\n");
    }

    #[test]
    fn test_shell_indentation_applies() {
        let capture = Capture::new();
        let mut shell = Shell::builder()
            .output(capture.output())
            .disabled(true)
            .build();
        shell.indent();
        let logger = CouleurLogger::new(shell).show_time(false);
        emit(&logger, Level::Info, "nested");
        assert_eq!(capture.contents(), "  INFO  nested\n");
    }

    #[test]
    fn test_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CouleurLogger>();
    }
}

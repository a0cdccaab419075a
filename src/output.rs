//! Output sinks.
//!
//! An [`Output`] is a cheap, cloneable handle to one writer. Clones share
//! the writer, and the writer's identity: two handles compare as the same
//! sink exactly when one was cloned from the other. The process standard
//! streams each have a single handle, so [`Output::stdout`] always returns
//! the same sink.
//!
//! [`Capture`] is an in-memory writer for tests and for callers that want
//! the decorated text instead of printing it.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, LazyLock, Mutex};

use crate::sync::lock_recover;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

static STDOUT: LazyLock<Output> = LazyLock::new(|| Output::new(io::stdout()));
static STDERR: LazyLock<Output> = LazyLock::new(|| Output::new(io::stderr()));

/// Shared handle to a writable sink.
#[derive(Clone)]
pub struct Output {
    writer: SharedWriter,
}

impl Output {
    /// Wrap an arbitrary writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// The process standard output.
    #[must_use]
    pub fn stdout() -> Self {
        STDOUT.clone()
    }

    /// The process standard error.
    #[must_use]
    pub fn stderr() -> Self {
        STDERR.clone()
    }

    /// Identity of the underlying sink, shared by all clones.
    #[must_use]
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.writer).cast::<()>() as usize
    }

    /// Returns true if both handles write to the same sink.
    #[must_use]
    pub fn same_sink(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }

    /// Write all of `bytes` and flush, holding the sink for the duration.
    ///
    /// # Errors
    ///
    /// Returns the sink's I/O error unchanged.
    pub fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = lock_recover(&self.writer);
        writer.write_all(bytes)?;
        writer.flush()
    }

    /// Write a string and flush.
    ///
    /// # Errors
    ///
    /// Returns the sink's I/O error unchanged.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        self.write_bytes(text.as_bytes())
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("id", &self.id())
            .finish()
    }
}

/// In-memory sink whose clones share one buffer.
///
/// Every call to [`Capture::output`] returns a handle to the same sink, so
/// a capture has exactly one identity in a
/// [`ProxyRegistry`](crate::proxy::ProxyRegistry).
#[derive(Debug, Clone)]
pub struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
    output: Output,
}

#[derive(Debug)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock_recover(&self.0).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock_recover(&self.buffer).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Capture {
    fn default() -> Self {
        Self::new()
    }
}

impl Capture {
    /// Create an empty capture buffer.
    #[must_use]
    pub fn new() -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let output = Output::new(Buffer(Arc::clone(&buffer)));
        Self { buffer, output }
    }

    /// The [`Output`] that appends to this buffer.
    #[must_use]
    pub fn output(&self) -> Output {
        self.output.clone()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock_recover(&self.buffer)).into_owned()
    }

    /// Return the contents and clear the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *lock_recover(&self.buffer));
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock_recover(&self.buffer).is_empty()
    }
}

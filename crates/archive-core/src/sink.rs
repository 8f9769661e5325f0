use std::io::{self, Write};

/// A writer that keeps only the first error
///
/// Once a write fails every later write is skipped, so a document can be
/// emitted as a series of unchecked writes followed by one check in
/// [`LatchedWriter::finish`].
pub struct LatchedWriter<W: Write> {
    inner: W,
    err: Option<io::Error>,
}

impl<W: Write> LatchedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, err: None }
    }

    pub fn write_str(&mut self, s: &str) {
        if self.err.is_some() {
            return;
        }
        if let Err(e) = self.inner.write_all(s.as_bytes()) {
            self.err = Some(e);
        }
    }

    /// The latched error, if any
    pub fn error(&self) -> Option<&io::Error> {
        self.err.as_ref()
    }

    /// Flush and release the underlying writer, returning the first error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.err.take() {
            return Err(e);
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

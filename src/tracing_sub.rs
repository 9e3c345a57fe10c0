use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Writer handed out per event: a shared log file, stderr, or nothing.
///
/// The terminal playground owns the screen, so logging to stderr there
/// would tear the display; it passes a log file or logs nowhere.
pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Stderr(io::Stderr),
    Sink,
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
            DelegatingInner::Sink => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            DelegatingInner::Stderr(s) => s.flush(),
            DelegatingInner::Sink => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub enum LogTarget {
    File(Arc<Mutex<File>>),
    Stderr,
    Discard,
}

#[derive(Clone, Debug)]
pub struct SubscriberMakeWriter {
    target: LogTarget,
}

impl SubscriberMakeWriter {
    pub fn new(target: LogTarget) -> Self {
        Self { target }
    }

    /// Append to `path`, creating it if needed.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(LogTarget::File(Arc::new(Mutex::new(file)))))
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match &self.target {
            LogTarget::File(file) => DelegatingInner::File(Arc::clone(file)),
            LogTarget::Stderr => DelegatingInner::Stderr(io::stderr()),
            LogTarget::Discard => DelegatingInner::Sink,
        };
        DelegatingWriter { inner }
    }
}

/// Install the global subscriber. Safe to call multiple times; subsequent
/// calls are no-ops for the global subscriber.
pub fn init_default(log_file: Option<&Path>, stderr_fallback: bool) -> io::Result<()> {
    let writer = match log_file {
        Some(path) => SubscriberMakeWriter::file(path)?,
        None if stderr_fallback => SubscriberMakeWriter::new(LogTarget::Stderr),
        None => SubscriberMakeWriter::new(LogTarget::Discard),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(writer)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn file_writer_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cursor.log");
        let make = SubscriberMakeWriter::file(&path).expect("open");
        make.make_writer().write_all(b"first\n").expect("write");
        let mut second = make.make_writer();
        second.write_all(b"second\n").expect("write");
        second.flush().expect("flush");
        let contents = std::fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn discard_swallows_everything() {
        let make = SubscriberMakeWriter::new(LogTarget::Discard);
        let mut writer = make.make_writer();
        assert_eq!(writer.write(b"ignored").expect("write"), 7);
        assert!(writer.flush().is_ok());
    }

    #[test]
    fn scoped_subscriber_writes_structured_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fields.log");
        let make = SubscriberMakeWriter::file(&path).expect("open");
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make)
            .with_ansi(false)
            .with_max_level(Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(view = 3, "interactive begin");
        });
        let contents = std::fs::read_to_string(&path).expect("read");
        assert!(contents.contains("interactive begin"));
        assert!(contents.contains("view=3"));
    }
}

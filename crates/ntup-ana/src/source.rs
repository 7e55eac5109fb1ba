use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ntup_core::errors::{ErrorInfo, NtupError};
use ntup_core::event::EventRecord;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Sequential, single-pass supplier of events.
pub trait EventSource {
    /// Returns the next event, or `None` once the source is exhausted.
    fn next_event(&mut self) -> Result<Option<EventRecord>, NtupError>;

    /// Digest of the consumed input, when the source can provide one.
    fn content_hash(&self) -> Option<String> {
        None
    }
}

/// Reads one JSON encoded [`EventRecord`] per line. Blank lines are skipped.
///
/// The SHA-256 of every byte read is tracked so the input can be identified
/// without reopening it.
pub struct JsonLinesSource {
    path: PathBuf,
    reader: BufReader<File>,
    hasher: Sha256,
    line: usize,
    buf: String,
}

impl std::fmt::Debug for JsonLinesSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSource")
            .field("path", &self.path)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

impl JsonLinesSource {
    /// Opens the event file at `path`.
    pub fn open(path: &Path) -> Result<Self, NtupError> {
        let file = File::open(path).map_err(|err| NtupError::io("open_input", path.display(), err))?;
        debug!(path = %path.display(), "event file opened");
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            hasher: Sha256::new(),
            line: 0,
            buf: String::new(),
        })
    }

    /// Path of the event file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the underlying file.
    pub fn close(self) {
        debug!(path = %self.path.display(), lines = self.line, "event file closed");
    }
}

impl EventSource for JsonLinesSource {
    fn next_event(&mut self) -> Result<Option<EventRecord>, NtupError> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_line(&mut self.buf)
                .map_err(|err| NtupError::io("read_input", self.path.display(), err))?;
            if read == 0 {
                return Ok(None);
            }
            self.hasher.update(self.buf.as_bytes());
            self.line += 1;
            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            let event = serde_json::from_str(text).map_err(|err| {
                NtupError::Input(
                    ErrorInfo::new("malformed_event", err.to_string())
                        .at_path(self.path.display())
                        .at_line(self.line),
                )
            })?;
            return Ok(Some(event));
        }
    }

    fn content_hash(&self) -> Option<String> {
        Some(format!("{:x}", self.hasher.clone().finalize()))
    }
}

/// In-memory source, mostly useful for tests and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    events: VecDeque<EventRecord>,
}

impl From<Vec<EventRecord>> for MemorySource {
    fn from(events: Vec<EventRecord>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl EventSource for MemorySource {
    fn next_event(&mut self) -> Result<Option<EventRecord>, NtupError> {
        Ok(self.events.pop_front())
    }
}

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ntup_core::errors::{ErrorInfo, NtupError};
use tracing::debug;

use crate::output::RunOutput;
use crate::serde::from_json_slice;

/// Sink receiving the ragged run output once per run.
pub trait RecordStore {
    /// Persists the complete output in a single call.
    fn write(&mut self, output: &RunOutput) -> Result<(), NtupError>;
}

/// Record store writing the ragged output as one JSON object of nested arrays.
///
/// NaN and infinite values are written as the strings `"NaN"`, `"Infinity"`
/// and `"-Infinity"`, which [`JsonRecordFile::read`] turns back into floats.
#[derive(Debug, Clone)]
pub struct JsonRecordFile {
    path: PathBuf,
}

impl JsonRecordFile {
    /// Creates a store targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a record file written by this store.
    pub fn read(path: &Path) -> Result<RunOutput, NtupError> {
        let bytes =
            fs::read(path).map_err(|err| NtupError::io("read_records", path.display(), err))?;
        from_json_slice(&bytes)
    }
}

impl RecordStore for JsonRecordFile {
    fn write(&mut self, output: &RunOutput) -> Result<(), NtupError> {
        let file = File::create(&self.path)
            .map_err(|err| NtupError::io("create_records", self.path.display(), err))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, output).map_err(|err| {
            NtupError::Serde(
                ErrorInfo::new("json_write", err.to_string())
                    .at_path(self.path.display()),
            )
        })?;
        writer
            .flush()
            .map_err(|err| NtupError::io("write_records", self.path.display(), err))?;
        debug!(path = %self.path.display(), events = output.events(), "record file written");
        Ok(())
    }
}

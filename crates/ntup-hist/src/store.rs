use std::fs;
use std::path::{Path, PathBuf};

use ntup_core::errors::NtupError;
use ntup_core::provenance::RunProvenance;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hist::Hist1D;
use crate::serde::{from_json_slice, to_canonical_json_bytes};
use crate::set::HistogramSet;

/// Sink receiving the final histograms once per run.
pub trait HistogramStore {
    /// Persists the histograms together with the run provenance.
    fn write(
        &mut self,
        histograms: &HistogramSet,
        provenance: &RunProvenance,
    ) -> Result<(), NtupError>;
}

/// On-disk layout of the histogram file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramFile {
    /// Provenance of the run that produced the file.
    pub provenance: RunProvenance,
    /// Histograms in output order.
    pub histograms: Vec<Hist1D>,
}

impl HistogramFile {
    /// Converts the stored histograms back into a checked set.
    pub fn into_set(self) -> Result<HistogramSet, NtupError> {
        HistogramSet::from_histograms(self.histograms)
    }
}

/// Histogram store writing a single canonical JSON file, replaced on every run.
#[derive(Debug, Clone)]
pub struct JsonHistogramFile {
    path: PathBuf,
}

impl JsonHistogramFile {
    /// Creates a store targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a previously written histogram file.
    pub fn read(path: &Path) -> Result<HistogramFile, NtupError> {
        let bytes =
            fs::read(path).map_err(|err| NtupError::io("read_histograms", path.display(), err))?;
        from_json_slice(&bytes)
    }
}

impl HistogramStore for JsonHistogramFile {
    fn write(
        &mut self,
        histograms: &HistogramSet,
        provenance: &RunProvenance,
    ) -> Result<(), NtupError> {
        let file = HistogramFile {
            provenance: provenance.clone(),
            histograms: histograms.iter().cloned().collect(),
        };
        let bytes = to_canonical_json_bytes(&file)?;
        fs::write(&self.path, bytes)
            .map_err(|err| NtupError::io("write_histograms", self.path.display(), err))?;
        debug!(path = %self.path.display(), "histogram file written");
        Ok(())
    }
}

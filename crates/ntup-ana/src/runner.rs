use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ntup_core::errors::NtupError;
use ntup_core::provenance::RunProvenance;
use ntup_hist::{HistogramStore, JsonHistogramFile};
use tracing::info;

use crate::accumulator::EventAccumulator;
use crate::config::AnalysisConfig;
use crate::records::{JsonRecordFile, RecordStore};
use crate::source::{EventSource, JsonLinesSource};

/// Suffix of the histogram file appended to the output base name.
pub const HISTOGRAM_SUFFIX: &str = ".hist.json";
/// Suffix of the record file appended to the output base name.
pub const RECORD_SUFFIX: &str = ".json";

/// Output file locations derived from a base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Histogram store path.
    pub histograms: PathBuf,
    /// Record store path.
    pub records: PathBuf,
}

impl OutputPaths {
    /// Appends the store suffixes to `base`, keeping any dots already in it.
    pub fn from_base(base: &Path) -> Self {
        let with_suffix = |suffix: &str| {
            let mut name = OsString::from(base.as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        };
        Self {
            histograms: with_suffix(HISTOGRAM_SUFFIX),
            records: with_suffix(RECORD_SUFFIX),
        }
    }
}

/// Drains `source` through a fresh accumulator and writes both stores.
///
/// Nothing is written unless every event was processed.
pub fn run_source<S, H, R>(
    source: &mut S,
    config: &AnalysisConfig,
    histogram_store: &mut H,
    record_store: &mut R,
    mut provenance: RunProvenance,
) -> Result<RunProvenance, NtupError>
where
    S: EventSource + ?Sized,
    H: HistogramStore + ?Sized,
    R: RecordStore + ?Sized,
{
    let mut accumulator = EventAccumulator::new(config.clone())?;
    while let Some(event) = source.next_event()? {
        accumulator.process_event(&event)?;
    }
    if let Some(hash) = source.content_hash() {
        provenance.input_hash = hash;
    }
    accumulator.finalize(histogram_store, record_store, provenance)
}

/// Runs the full pass from the event file `input` to the outputs named after `out_base`.
///
/// The configuration is validated once, when the accumulator is built.
pub fn run_file(
    input: &Path,
    out_base: &Path,
    config: &AnalysisConfig,
) -> Result<RunProvenance, NtupError> {
    let paths = OutputPaths::from_base(out_base);
    let mut source = JsonLinesSource::open(input)?;
    let provenance = RunProvenance {
        input_path: input.display().to_string(),
        ..RunProvenance::default()
    };
    let result = run_source(
        &mut source,
        config,
        &mut JsonHistogramFile::new(&paths.histograms),
        &mut JsonRecordFile::new(&paths.records),
        provenance,
    );
    source.close();
    let provenance = result?;
    info!(
        histograms = %paths.histograms.display(),
        records = %paths.records.display(),
        events = provenance.events,
        "outputs written"
    );
    Ok(provenance)
}

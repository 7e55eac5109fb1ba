#![deny(missing_docs)]
#![doc = "Single-pass track and truth-muon ntuple production: selection, kinematics, histogramming and ragged per-event output."]

/// Per-event accumulation into histograms and ragged output.
pub mod accumulator;
/// YAML analysis configuration.
pub mod config;
/// Observable derivations from raw record fields.
pub mod kinematics;
/// Per-event buffers and the ragged run output.
pub mod output;
/// Record store persistence.
pub mod records;
/// End-to-end pass drivers.
pub mod runner;
/// Track quality selection.
pub mod selection;
/// Serde helpers for JSON and YAML payloads.
pub mod serde;
/// Event sources.
pub mod source;

pub use accumulator::{EventAccumulator, EventSummary};
pub use config::{AnalysisConfig, CollectionNames, SelectionCuts, TruthFilter};
pub use kinematics::{
    chi2_per_ndf, hit_rxy, pt_from_curvature, theta_from_tan_lambda, track_kinematics,
    truth_kinematics, TrackKinematics, TruthKinematics, DEFAULT_FIELD_TESLA,
};
pub use output::{EventBuffer, HitColumns, RunOutput, TrackBuffer, TrackRow, TruthBuffer};
pub use records::{JsonRecordFile, RecordStore};
pub use runner::{run_file, run_source, OutputPaths};
pub use selection::{RejectReason, Selection, TrackSelector};
pub use source::{EventSource, JsonLinesSource, MemorySource};

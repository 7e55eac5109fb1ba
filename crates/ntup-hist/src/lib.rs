#![deny(missing_docs)]
#![doc = "Fixed-range 1D histograms, the named analysis histogram set and its on-disk store."]

/// One dimensional fixed-binning histogram.
pub mod hist;
/// Canonical JSON serde helpers.
pub mod serde;
/// Named collection of analysis histograms.
pub mod set;
/// Histogram persistence.
pub mod store;

pub use hist::Hist1D;
pub use set::{HistName, HistogramSet};
pub use store::{HistogramFile, HistogramStore, JsonHistogramFile};

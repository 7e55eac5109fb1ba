use ntup_core::errors::{ErrorInfo, NtupError};
use serde::{Deserialize, Serialize};

use crate::hist::Hist1D;

/// Names of the analysis histograms, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistName {
    /// Truth muon production radius (mm).
    TruthRxy,
    /// Truth muon transverse momentum (GeV).
    TruthPt,
    /// Truth muon polar angle.
    TruthTheta,
    /// Truth muon azimuth.
    TruthPhi,
    /// Track transverse impact parameter (mm).
    TrackD0,
    /// Track longitudinal impact parameter (mm).
    TrackZ0,
    /// Track transverse momentum (GeV).
    TrackPt,
    /// Track azimuth.
    TrackPhi,
    /// Track polar angle.
    TrackTheta,
    /// Track hole count. Declared for layout compatibility, never filled.
    TrackNholes,
    /// Number of hits per selected track.
    TrackNhits,
    /// Fit chi-square per degree of freedom.
    TrackChi2ndf,
    /// Number of tracks per event before selection.
    NtrackAll,
    /// Number of tracks per event after selection.
    NtrackGood,
    /// Time of every hit on a selected track (ns).
    TrackHitTime,
}

impl HistName {
    /// Every histogram, in output order.
    pub const ALL: [HistName; 15] = [
        HistName::TruthRxy,
        HistName::TruthPt,
        HistName::TruthTheta,
        HistName::TruthPhi,
        HistName::TrackD0,
        HistName::TrackZ0,
        HistName::TrackPt,
        HistName::TrackPhi,
        HistName::TrackTheta,
        HistName::TrackNholes,
        HistName::TrackNhits,
        HistName::TrackChi2ndf,
        HistName::NtrackAll,
        HistName::NtrackGood,
        HistName::TrackHitTime,
    ];

    /// Stored histogram name.
    pub fn as_str(self) -> &'static str {
        match self {
            HistName::TruthRxy => "truth_rxy",
            HistName::TruthPt => "truth_pt",
            HistName::TruthTheta => "truth_theta",
            HistName::TruthPhi => "truth_phi",
            HistName::TrackD0 => "track_d0",
            HistName::TrackZ0 => "track_z0",
            HistName::TrackPt => "track_pt",
            HistName::TrackPhi => "track_phi",
            HistName::TrackTheta => "track_theta",
            HistName::TrackNholes => "track_nholes",
            HistName::TrackNhits => "track_nhits",
            HistName::TrackChi2ndf => "track_chi2ndf",
            HistName::NtrackAll => "ntrack_all",
            HistName::NtrackGood => "ntrack_good",
            HistName::TrackHitTime => "track_hit_time",
        }
    }

    /// Fixed `(bins, low, high)` binning.
    pub fn binning(self) -> (usize, f64, f64) {
        match self {
            HistName::TruthRxy => (100, -10.0, 10.0),
            HistName::TruthPt | HistName::TrackPt => (100, 0.0, 1000.0),
            HistName::TruthTheta | HistName::TrackTheta => (50, 0.4, 2.7),
            HistName::TruthPhi | HistName::TrackPhi => (50, -3.5, 3.5),
            HistName::TrackD0 => (100, -5.0, 5.0),
            HistName::TrackZ0 => (100, -20.0, 20.0),
            HistName::TrackNholes | HistName::TrackNhits => (20, 0.0, 20.0),
            HistName::TrackChi2ndf => (100, 0.0, 100.0),
            HistName::NtrackAll | HistName::NtrackGood => (100, 0.0, 5000.0),
            HistName::TrackHitTime => (100, -1.0, 1.0),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The fixed collection of analysis histograms.
///
/// Histograms are created once with their final binning and afterwards only
/// receive fills or bin-wise merges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSet {
    histograms: Vec<Hist1D>,
}

impl HistogramSet {
    /// Builds the empty standard set.
    pub fn standard() -> Result<Self, NtupError> {
        let histograms = HistName::ALL
            .iter()
            .map(|&name| {
                let (bins, low, high) = name.binning();
                Hist1D::new(name.as_str(), name.as_str(), bins, low, high)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { histograms })
    }

    /// Rebuilds a set from stored histograms, checking names and binning.
    pub fn from_histograms(histograms: Vec<Hist1D>) -> Result<Self, NtupError> {
        if histograms.len() != HistName::ALL.len() {
            return Err(NtupError::Serde(
                ErrorInfo::new("histogram_count", "unexpected number of histograms")
                    .expected_found(HistName::ALL.len(), histograms.len()),
            ));
        }
        for (name, hist) in HistName::ALL.iter().zip(&histograms) {
            let (bins, low, high) = name.binning();
            let layout_ok = hist.bins == bins
                && hist.low == low
                && hist.high == high
                && hist.counts.len() == bins + 2;
            if hist.name != name.as_str() || !layout_ok {
                return Err(NtupError::Serde(
                    ErrorInfo::new("histogram_layout", "stored histogram does not match layout")
                        .expected_found(name.as_str(), &hist.name),
                ));
            }
        }
        Ok(Self { histograms })
    }

    /// Records `value` in histogram `name`.
    pub fn fill(&mut self, name: HistName, value: f64) {
        self.histograms[name.index()].fill(value);
    }

    /// Returns histogram `name`.
    pub fn get(&self, name: HistName) -> &Hist1D {
        &self.histograms[name.index()]
    }

    /// Iterates over the histograms in output order.
    pub fn iter(&self) -> impl Iterator<Item = &Hist1D> {
        self.histograms.iter()
    }

    /// Adds every histogram of `other` into `self` bin by bin.
    pub fn merge(&mut self, other: &HistogramSet) -> Result<(), NtupError> {
        for (dst, src) in self.histograms.iter_mut().zip(&other.histograms) {
            dst.add(src)?;
        }
        Ok(())
    }

    /// Consumes the set, returning the histograms in output order.
    pub fn into_histograms(self) -> Vec<Hist1D> {
        self.histograms
    }
}

//! Per-event buffers and the run-wide ragged output.
//!
//! Every selected object is pushed as one row, so the parallel columns of a
//! buffer cannot drift apart. [`RunOutput`] takes one buffer per event, empty
//! or not, which keeps its outer length equal to the number of events.

use ntup_core::errors::{ErrorInfo, NtupError};
use serde::{Deserialize, Serialize};

/// Truth observables of the particles kept in one event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TruthBuffer {
    pt: Vec<f64>,
    phi: Vec<f64>,
    theta: Vec<f64>,
}

impl TruthBuffer {
    /// Appends one particle.
    pub fn push(&mut self, pt: f64, phi: f64, theta: f64) {
        self.pt.push(pt);
        self.phi.push(phi);
        self.theta.push(theta);
    }

    /// Number of particles buffered.
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    /// Returns true when no particle was kept.
    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }
}

/// Hit coordinates of one selected track, in hit order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitColumns {
    t: Vec<f64>,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl HitColumns {
    /// Creates columns with room for `capacity` hits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            t: Vec::with_capacity(capacity),
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
        }
    }

    /// Appends one hit.
    pub fn push(&mut self, time: f64, position: [f64; 3]) {
        self.t.push(time);
        self.x.push(position[0]);
        self.y.push(position[1]);
        self.z.push(position[2]);
    }

    /// Number of hits.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Returns true when no hit was recorded.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Scalars of one selected track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    /// Transverse momentum.
    pub pt: f64,
    /// Azimuth.
    pub phi: f64,
    /// Polar angle.
    pub theta: f64,
    /// Transverse impact parameter.
    pub d0: f64,
    /// Longitudinal impact parameter.
    pub z0: f64,
    /// d0 variance from the covariance matrix.
    pub d0_err: f64,
    /// z0 variance from the covariance matrix.
    pub z0_err: f64,
    /// Fit chi-square.
    pub chi2: f64,
    /// Fit degrees of freedom.
    pub ndof: i32,
    /// Hit count.
    pub nhits: usize,
}

/// Observables of the tracks selected in one event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackBuffer {
    pt: Vec<f64>,
    phi: Vec<f64>,
    theta: Vec<f64>,
    d0: Vec<f64>,
    z0: Vec<f64>,
    d0_err: Vec<f64>,
    z0_err: Vec<f64>,
    chi2: Vec<f64>,
    ndof: Vec<i32>,
    nhits: Vec<usize>,
    hit_t: Vec<Vec<f64>>,
    hit_x: Vec<Vec<f64>>,
    hit_y: Vec<Vec<f64>>,
    hit_z: Vec<Vec<f64>>,
}

impl TrackBuffer {
    /// Appends one track together with its hits.
    pub fn push(&mut self, row: TrackRow, hits: HitColumns) {
        self.pt.push(row.pt);
        self.phi.push(row.phi);
        self.theta.push(row.theta);
        self.d0.push(row.d0);
        self.z0.push(row.z0);
        self.d0_err.push(row.d0_err);
        self.z0_err.push(row.z0_err);
        self.chi2.push(row.chi2);
        self.ndof.push(row.ndof);
        self.nhits.push(row.nhits);
        self.hit_t.push(hits.t);
        self.hit_x.push(hits.x);
        self.hit_y.push(hits.y);
        self.hit_z.push(hits.z);
    }

    /// Number of tracks buffered.
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    /// Returns true when no track was selected.
    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }
}

/// Everything one event contributes to the run output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventBuffer {
    /// Kept truth particles.
    pub truth: TruthBuffer,
    /// Selected tracks.
    pub tracks: TrackBuffer,
}

/// Ragged per-event output of the whole run, indexed event, object, hit.
///
/// Float columns serialize through [`Real`](crate::serde::Real), so NaN and
/// infinite values survive a JSON round trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunOutput {
    /// Truth muon transverse momenta.
    #[serde(with = "crate::serde::real_columns")]
    pub truth_pt: Vec<Vec<f64>>,
    /// Truth muon azimuths.
    #[serde(with = "crate::serde::real_columns")]
    pub truth_phi: Vec<Vec<f64>>,
    /// Truth muon polar angles.
    #[serde(with = "crate::serde::real_columns")]
    pub truth_theta: Vec<Vec<f64>>,
    /// Track transverse momenta.
    #[serde(with = "crate::serde::real_columns")]
    pub track_pt: Vec<Vec<f64>>,
    /// Track azimuths.
    #[serde(with = "crate::serde::real_columns")]
    pub track_phi: Vec<Vec<f64>>,
    /// Track polar angles.
    #[serde(with = "crate::serde::real_columns")]
    pub track_theta: Vec<Vec<f64>>,
    /// Track transverse impact parameters.
    #[serde(with = "crate::serde::real_columns")]
    pub track_d0: Vec<Vec<f64>>,
    /// Track longitudinal impact parameters.
    #[serde(with = "crate::serde::real_columns")]
    pub track_z0: Vec<Vec<f64>>,
    /// Track d0 variances.
    #[serde(with = "crate::serde::real_columns")]
    pub track_d0err: Vec<Vec<f64>>,
    /// Track z0 variances.
    #[serde(with = "crate::serde::real_columns")]
    pub track_z0err: Vec<Vec<f64>>,
    /// Track fit chi-squares.
    #[serde(with = "crate::serde::real_columns")]
    pub track_chi2: Vec<Vec<f64>>,
    /// Track fit degrees of freedom.
    pub track_ndof: Vec<Vec<i32>>,
    /// Track hit counts.
    pub track_nhits: Vec<Vec<usize>>,
    /// Hit times per track.
    #[serde(with = "crate::serde::real_hit_columns")]
    pub track_hit_t: Vec<Vec<Vec<f64>>>,
    /// Hit x positions per track.
    #[serde(with = "crate::serde::real_hit_columns")]
    pub track_hit_x: Vec<Vec<Vec<f64>>>,
    /// Hit y positions per track.
    #[serde(with = "crate::serde::real_hit_columns")]
    pub track_hit_y: Vec<Vec<Vec<f64>>>,
    /// Hit z positions per track.
    #[serde(with = "crate::serde::real_hit_columns")]
    pub track_hit_z: Vec<Vec<Vec<f64>>>,
}

/// Field names of [`RunOutput`] as they appear in the record file.
pub const RUN_OUTPUT_FIELDS: [&str; 17] = [
    "truth_pt",
    "truth_phi",
    "truth_theta",
    "track_pt",
    "track_phi",
    "track_theta",
    "track_d0",
    "track_z0",
    "track_d0err",
    "track_z0err",
    "track_chi2",
    "track_ndof",
    "track_nhits",
    "track_hit_t",
    "track_hit_x",
    "track_hit_y",
    "track_hit_z",
];

fn mismatch(field: &str, event: usize, expected: usize, found: usize) -> ErrorInfo {
    ErrorInfo::new("ragged_mismatch", "run output columns disagree in length")
        .with_context("field", field)
        .at_event(event)
        .expected_found(expected, found)
}

impl RunOutput {
    /// Appends one event worth of buffers.
    pub fn push_event(&mut self, event: EventBuffer) {
        let EventBuffer { truth, tracks } = event;
        self.truth_pt.push(truth.pt);
        self.truth_phi.push(truth.phi);
        self.truth_theta.push(truth.theta);

        self.track_pt.push(tracks.pt);
        self.track_phi.push(tracks.phi);
        self.track_theta.push(tracks.theta);
        self.track_d0.push(tracks.d0);
        self.track_z0.push(tracks.z0);
        self.track_d0err.push(tracks.d0_err);
        self.track_z0err.push(tracks.z0_err);
        self.track_chi2.push(tracks.chi2);
        self.track_ndof.push(tracks.ndof);
        self.track_nhits.push(tracks.nhits);
        self.track_hit_t.push(tracks.hit_t);
        self.track_hit_x.push(tracks.hit_x);
        self.track_hit_y.push(tracks.hit_y);
        self.track_hit_z.push(tracks.hit_z);
    }

    /// Appends the events of `other` after those already held.
    pub fn append(&mut self, other: RunOutput) {
        self.truth_pt.extend(other.truth_pt);
        self.truth_phi.extend(other.truth_phi);
        self.truth_theta.extend(other.truth_theta);
        self.track_pt.extend(other.track_pt);
        self.track_phi.extend(other.track_phi);
        self.track_theta.extend(other.track_theta);
        self.track_d0.extend(other.track_d0);
        self.track_z0.extend(other.track_z0);
        self.track_d0err.extend(other.track_d0err);
        self.track_z0err.extend(other.track_z0err);
        self.track_chi2.extend(other.track_chi2);
        self.track_ndof.extend(other.track_ndof);
        self.track_nhits.extend(other.track_nhits);
        self.track_hit_t.extend(other.track_hit_t);
        self.track_hit_x.extend(other.track_hit_x);
        self.track_hit_y.extend(other.track_hit_y);
        self.track_hit_z.extend(other.track_hit_z);
    }

    /// Number of events held.
    pub fn events(&self) -> usize {
        self.truth_pt.len()
    }

    /// Total number of selected tracks across all events.
    pub fn total_tracks(&self) -> usize {
        self.track_pt.iter().map(Vec::len).sum()
    }

    /// Verifies that every column has one entry per event, that per-event
    /// object columns agree, and that hit columns match the hit counts.
    pub fn check_consistency(&self) -> Result<(), NtupError> {
        let events = self.events();
        let outer = [
            ("truth_phi", self.truth_phi.len()),
            ("truth_theta", self.truth_theta.len()),
            ("track_pt", self.track_pt.len()),
            ("track_phi", self.track_phi.len()),
            ("track_theta", self.track_theta.len()),
            ("track_d0", self.track_d0.len()),
            ("track_z0", self.track_z0.len()),
            ("track_d0err", self.track_d0err.len()),
            ("track_z0err", self.track_z0err.len()),
            ("track_chi2", self.track_chi2.len()),
            ("track_ndof", self.track_ndof.len()),
            ("track_nhits", self.track_nhits.len()),
            ("track_hit_t", self.track_hit_t.len()),
            ("track_hit_x", self.track_hit_x.len()),
            ("track_hit_y", self.track_hit_y.len()),
            ("track_hit_z", self.track_hit_z.len()),
        ];
        for (field, len) in outer {
            if len != events {
                return Err(NtupError::State(
                    ErrorInfo::new("event_count_mismatch", "column does not cover every event")
                        .with_context("field", field)
                        .expected_found(events, len),
                ));
            }
        }

        for event in 0..events {
            let truth = self.truth_pt[event].len();
            for (field, len) in [
                ("truth_phi", self.truth_phi[event].len()),
                ("truth_theta", self.truth_theta[event].len()),
            ] {
                if len != truth {
                    return Err(NtupError::State(mismatch(field, event, truth, len)));
                }
            }

            let tracks = self.track_pt[event].len();
            for (field, len) in [
                ("track_phi", self.track_phi[event].len()),
                ("track_theta", self.track_theta[event].len()),
                ("track_d0", self.track_d0[event].len()),
                ("track_z0", self.track_z0[event].len()),
                ("track_d0err", self.track_d0err[event].len()),
                ("track_z0err", self.track_z0err[event].len()),
                ("track_chi2", self.track_chi2[event].len()),
                ("track_ndof", self.track_ndof[event].len()),
                ("track_nhits", self.track_nhits[event].len()),
                ("track_hit_t", self.track_hit_t[event].len()),
                ("track_hit_x", self.track_hit_x[event].len()),
                ("track_hit_y", self.track_hit_y[event].len()),
                ("track_hit_z", self.track_hit_z[event].len()),
            ] {
                if len != tracks {
                    return Err(NtupError::State(mismatch(field, event, tracks, len)));
                }
            }

            for (track, &nhits) in self.track_nhits[event].iter().enumerate() {
                for (field, column) in [
                    ("track_hit_t", &self.track_hit_t),
                    ("track_hit_x", &self.track_hit_x),
                    ("track_hit_y", &self.track_hit_y),
                    ("track_hit_z", &self.track_hit_z),
                ] {
                    let len = column[event][track].len();
                    if len != nhits {
                        return Err(NtupError::State(
                            mismatch(field, event, nhits, len)
                                .with_context("track", track),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

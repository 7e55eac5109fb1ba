//! Event records as delivered by the event source.
//!
//! An [`EventRecord`] is a bag of named collections. Tracks carry their hits
//! inline, so no hit-to-track relation lookup is needed downstream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, NtupError};

/// Generator-level particle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthParticle {
    /// PDG identity code.
    pub pdg: i32,
    /// Generator status flag (1 = stable final state).
    pub generator_status: i32,
    /// Three-momentum (px, py, pz) in GeV.
    pub momentum: [f64; 3],
    /// Energy in GeV.
    pub energy: f64,
    /// Production vertex (x, y, z) in mm.
    pub vertex: [f64; 3],
    /// Electric charge in units of e.
    #[serde(default)]
    pub charge: f32,
}

/// Single tracker measurement attached to a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerHit {
    /// Hit position (x, y, z) in mm.
    pub position: [f64; 3],
    /// Energy deposit estimate.
    #[serde(default)]
    pub edep: f64,
    /// Hit time in ns.
    pub time: f64,
    /// Raw cell identifier, decoded with the collection's encoding string.
    pub cell_id: u64,
}

/// Reconstructed track in the perigee parameterisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Signed curvature in 1/mm.
    pub omega: f64,
    /// Tangent of the dip angle.
    pub tan_lambda: f64,
    /// Azimuth at the point of closest approach.
    pub phi: f64,
    /// Transverse impact parameter in mm.
    pub d0: f64,
    /// Longitudinal impact parameter in mm.
    pub z0: f64,
    /// Lower-triangle covariance of (d0, phi, omega, z0, tan_lambda), 15 entries.
    pub cov_matrix: Vec<f64>,
    /// Fit chi-square.
    pub chi2: f64,
    /// Fit degrees of freedom.
    pub ndf: i32,
    /// Hits used in the fit, in fit order.
    #[serde(default)]
    pub hits: Vec<TrackerHit>,
}

/// Covariance slot of the d0 variance.
pub const COV_D0_D0: usize = 0;
/// Covariance slot of the z0 variance.
pub const COV_Z0_Z0: usize = 9;

impl Track {
    /// Variance of d0 taken from the covariance matrix.
    pub fn d0_variance(&self) -> Result<f64, NtupError> {
        self.covariance_entry(COV_D0_D0)
    }

    /// Variance of z0 taken from the covariance matrix.
    pub fn z0_variance(&self) -> Result<f64, NtupError> {
        self.covariance_entry(COV_Z0_Z0)
    }

    fn covariance_entry(&self, index: usize) -> Result<f64, NtupError> {
        self.cov_matrix.get(index).copied().ok_or_else(|| {
            NtupError::Input(
                ErrorInfo::new("short_covariance", "track covariance matrix is truncated")
                    .with_context("index", index)
                    .with_context("len", self.cov_matrix.len()),
            )
        })
    }
}

/// Link between two objects of different collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Index into the source collection.
    pub from: usize,
    /// Index into the target collection.
    pub to: usize,
    /// Relation weight.
    #[serde(default)]
    pub weight: f32,
}

/// Named collection stored inside an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Collection {
    /// Generator particles.
    McParticle {
        /// Particles in generator order.
        particles: Vec<TruthParticle>,
    },
    /// Reconstructed tracks.
    Track {
        /// Tracks in reconstruction order.
        tracks: Vec<Track>,
    },
    /// Raw tracker hits of one subdetector.
    TrackerHit {
        /// Cell-id encoding string for the hits of this collection.
        encoding: String,
        /// Hits in readout order.
        hits: Vec<TrackerHit>,
    },
    /// Hit-to-simulation relations.
    Relation {
        /// Relation entries.
        relations: Vec<Relation>,
    },
}

impl Collection {
    /// Short type label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Collection::McParticle { .. } => "mc_particle",
            Collection::Track { .. } => "track",
            Collection::TrackerHit { .. } => "tracker_hit",
            Collection::Relation { .. } => "relation",
        }
    }

    /// Number of elements held by the collection.
    pub fn len(&self) -> usize {
        match self {
            Collection::McParticle { particles } => particles.len(),
            Collection::Track { tracks } => tracks.len(),
            Collection::TrackerHit { hits, .. } => hits.len(),
            Collection::Relation { relations } => relations.len(),
        }
    }

    /// Returns true when the collection holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One event worth of named collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventRecord {
    /// Run number.
    #[serde(default)]
    pub run_number: i32,
    /// Event number within the run.
    #[serde(default)]
    pub event_number: i32,
    /// Collections keyed by name.
    #[serde(default)]
    pub collections: BTreeMap<String, Collection>,
}

fn wrong_kind(name: &str, expected: &str, found: &Collection) -> NtupError {
    NtupError::Input(
        ErrorInfo::new("wrong_collection_type", "collection has an unexpected type")
            .in_collection(name)
            .expected_found(expected, found.kind()),
    )
}

impl EventRecord {
    /// Looks up a collection by name.
    pub fn collection(&self, name: &str) -> Result<&Collection, NtupError> {
        self.collections.get(name).ok_or_else(|| {
            NtupError::Input(
                ErrorInfo::new("missing_collection", "collection not present in event")
                    .in_collection(name)
                    .at_event(self.event_number),
            )
        })
    }

    /// Returns the generator particles stored under `name`.
    pub fn mc_particles(&self, name: &str) -> Result<&[TruthParticle], NtupError> {
        match self.collection(name)? {
            Collection::McParticle { particles } => Ok(particles),
            other => Err(wrong_kind(name, "mc_particle", other)),
        }
    }

    /// Returns the tracks stored under `name`.
    pub fn tracks(&self, name: &str) -> Result<&[Track], NtupError> {
        match self.collection(name)? {
            Collection::Track { tracks } => Ok(tracks),
            other => Err(wrong_kind(name, "track", other)),
        }
    }

    /// Returns the encoding string and hits of the tracker hit collection `name`.
    pub fn tracker_hits(&self, name: &str) -> Result<(&str, &[TrackerHit]), NtupError> {
        match self.collection(name)? {
            Collection::TrackerHit { encoding, hits } => Ok((encoding.as_str(), hits)),
            other => Err(wrong_kind(name, "tracker_hit", other)),
        }
    }

    /// Inserts or replaces a collection, returning the record for chaining.
    pub fn with_collection(mut self, name: impl Into<String>, collection: Collection) -> Self {
        self.collections.insert(name.into(), collection);
        self
    }
}

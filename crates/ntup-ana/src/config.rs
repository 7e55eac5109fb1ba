use std::fs;
use std::path::Path;

use ntup_core::errors::{ErrorInfo, NtupError};
use serde::{Deserialize, Serialize};

use crate::kinematics::DEFAULT_FIELD_TESLA;
use crate::serde::from_yaml_slice;

fn config_error(code: &str, message: impl Into<String>) -> NtupError {
    NtupError::Config(ErrorInfo::new(code, message))
}

/// YAML-configurable parameters of a single analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Solenoid field in tesla, fixed for the whole run.
    #[serde(default = "default_field")]
    pub field_tesla: f64,
    /// Track quality cuts.
    #[serde(default)]
    pub selection: SelectionCuts,
    /// Generator particle filter.
    #[serde(default)]
    pub truth: TruthFilter,
    /// Names of the collections read from every event.
    #[serde(default)]
    pub collections: CollectionNames,
    /// Emit a progress line every this many events.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_field() -> f64 {
    DEFAULT_FIELD_TESLA
}

fn default_progress_interval() -> u64 {
    100
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            field_tesla: default_field(),
            selection: SelectionCuts::default(),
            truth: TruthFilter::default(),
            collections: CollectionNames::default(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl AnalysisConfig {
    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, NtupError> {
        let bytes =
            fs::read(path).map_err(|err| NtupError::io("read_config", path.display(), err))?;
        let config: AnalysisConfig = from_yaml_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the pass cannot work with.
    pub fn validate(&self) -> Result<(), NtupError> {
        if !self.field_tesla.is_finite() || self.field_tesla == 0.0 {
            return Err(config_error(
                "bad_field",
                format!("field must be finite and non-zero, got {}", self.field_tesla),
            ));
        }
        if self.progress_interval == 0 {
            return Err(config_error("zero_progress_interval", "progress interval must be positive"));
        }
        let names = [&self.collections.mc_particles, &self.collections.tracks]
            .into_iter()
            .chain(self.collections.tracker_hits.iter());
        for name in names {
            if name.trim().is_empty() {
                return Err(config_error("empty_collection_name", "collection names must not be empty"));
            }
        }
        if self.collections.tracker_hits.is_empty() {
            return Err(NtupError::Config(
                ErrorInfo::new(
                    "no_hit_collections",
                    "at least one tracker hit collection is required",
                )
                .with_hint("the first tracker hit collection supplies the cell-id encoding"),
            ));
        }
        Ok(())
    }
}

/// Quality cuts applied to every reconstructed track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCuts {
    /// Minimum transverse momentum in GeV.
    #[serde(default = "default_min_pt")]
    pub min_pt: f64,
    /// Decimal places the momentum is rounded to before the cut; `None` disables rounding.
    #[serde(default = "default_pt_decimals")]
    pub pt_decimals: Option<u32>,
    /// Maximum chi-square per degree of freedom.
    #[serde(default = "default_max_chi2_per_ndf")]
    pub max_chi2_per_ndf: f64,
    /// Minimum number of hits on the track.
    #[serde(default = "default_min_hits")]
    pub min_hits: usize,
}

fn default_min_pt() -> f64 {
    1.0
}

fn default_pt_decimals() -> Option<u32> {
    Some(2)
}

fn default_max_chi2_per_ndf() -> f64 {
    10.0
}

fn default_min_hits() -> usize {
    6
}

impl Default for SelectionCuts {
    fn default() -> Self {
        Self {
            min_pt: default_min_pt(),
            pt_decimals: default_pt_decimals(),
            max_chi2_per_ndf: default_max_chi2_per_ndf(),
            min_hits: default_min_hits(),
        }
    }
}

/// Identity and status filter for generator particles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthFilter {
    /// Absolute PDG code to keep.
    #[serde(default = "default_abs_pdg")]
    pub abs_pdg: i32,
    /// Generator status to keep.
    #[serde(default = "default_generator_status")]
    pub generator_status: i32,
}

fn default_abs_pdg() -> i32 {
    13
}

fn default_generator_status() -> i32 {
    1
}

impl Default for TruthFilter {
    fn default() -> Self {
        Self {
            abs_pdg: default_abs_pdg(),
            generator_status: default_generator_status(),
        }
    }
}

impl TruthFilter {
    /// Returns true when a particle with this identity and status is kept.
    pub fn matches(&self, pdg: i32, generator_status: i32) -> bool {
        pdg.unsigned_abs() == self.abs_pdg.unsigned_abs() && generator_status == self.generator_status
    }
}

/// Collection names looked up in every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionNames {
    /// Generator particle collection.
    #[serde(default = "default_mc_particles")]
    pub mc_particles: String,
    /// Reconstructed track collection.
    #[serde(default = "default_tracks")]
    pub tracks: String,
    /// Tracker hit collections; the first one provides the cell-id encoding.
    #[serde(default = "default_tracker_hits")]
    pub tracker_hits: Vec<String>,
}

fn default_mc_particles() -> String {
    "MCParticle".to_string()
}

fn default_tracks() -> String {
    "SiTracks".to_string()
}

fn default_tracker_hits() -> Vec<String> {
    [
        "IBTrackerHits",
        "IETrackerHits",
        "OBTrackerHits",
        "OETrackerHits",
        "VBTrackerHits",
        "VETrackerHits",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            mc_particles: default_mc_particles(),
            tracks: default_tracks(),
            tracker_hits: default_tracker_hits(),
        }
    }
}

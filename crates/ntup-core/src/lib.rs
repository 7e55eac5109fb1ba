#![deny(missing_docs)]
#![doc = "Core event model, cell-id decoding and error surface for the track ntuple pass."]

pub mod cellid;
pub mod errors;
pub mod event;
pub mod provenance;

pub use cellid::{BitFieldSpec, CellIdDecoder, DetectorLayer};
pub use errors::{ErrorInfo, NtupError};
pub use event::{Collection, EventRecord, Relation, Track, TrackerHit, TruthParticle};
pub use provenance::{RunProvenance, SchemaVersion};

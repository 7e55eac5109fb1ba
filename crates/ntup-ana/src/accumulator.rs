use ntup_core::cellid::CellIdDecoder;
use ntup_core::errors::{ErrorInfo, NtupError};
use ntup_core::event::EventRecord;
use ntup_core::provenance::RunProvenance;
use ntup_hist::{HistName, HistogramSet, HistogramStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::AnalysisConfig;
use crate::kinematics::{hit_rxy, track_kinematics, truth_kinematics};
use crate::output::{EventBuffer, HitColumns, RunOutput, TrackRow};
use crate::records::RecordStore;
use crate::selection::{Selection, TrackSelector};

/// Per-event counts returned by [`EventAccumulator::process_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Zero-based position of the event in the pass.
    pub index: u64,
    /// Tracks present before selection.
    pub raw_tracks: usize,
    /// Tracks that passed selection.
    pub accepted_tracks: usize,
    /// Generator particles that passed the truth filter.
    pub truth_selected: usize,
}

/// Owns the histograms and ragged output of one pass.
///
/// Construction puts the accumulator in its running state; [`finalize`]
/// consumes it, so nothing can be processed after the outputs are flushed.
/// A failing [`process_event`] leaves the accumulated state untouched.
///
/// [`finalize`]: EventAccumulator::finalize
/// [`process_event`]: EventAccumulator::process_event
#[derive(Debug)]
pub struct EventAccumulator {
    config: AnalysisConfig,
    selector: TrackSelector,
    histograms: HistogramSet,
    output: RunOutput,
    events: u64,
    accepted_tracks: u64,
    decoder: Option<CellIdDecoder>,
}

fn cached_decoder<'a>(
    cache: &'a mut Option<CellIdDecoder>,
    encoding: &str,
) -> Result<&'a CellIdDecoder, NtupError> {
    let decoder = match cache.take() {
        Some(decoder) if decoder.encoding() == encoding => decoder,
        _ => CellIdDecoder::parse(encoding)?,
    };
    Ok(cache.insert(decoder))
}

impl EventAccumulator {
    /// Validates `config` and sets up empty histograms and output.
    pub fn new(config: AnalysisConfig) -> Result<Self, NtupError> {
        config.validate()?;
        let selector = TrackSelector::new(config.field_tesla, config.selection.clone());
        Ok(Self {
            config,
            selector,
            histograms: HistogramSet::standard()?,
            output: RunOutput::default(),
            events: 0,
            accepted_tracks: 0,
            decoder: None,
        })
    }

    /// Configuration the pass runs with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Number of events processed so far.
    pub fn events_processed(&self) -> u64 {
        self.events
    }

    /// Number of tracks accepted so far.
    pub fn accepted_tracks(&self) -> u64 {
        self.accepted_tracks
    }

    /// Histograms accumulated so far.
    pub fn histograms(&self) -> &HistogramSet {
        &self.histograms
    }

    /// Ragged output accumulated so far.
    pub fn output(&self) -> &RunOutput {
        &self.output
    }

    /// Runs selection and kinematics on one event and records the results.
    pub fn process_event(&mut self, event: &EventRecord) -> Result<EventSummary, NtupError> {
        let index = self.events;
        if index % self.config.progress_interval == 0 {
            info!(event = index, "processing event");
        }
        let verbose = index == 0;
        let names = &self.config.collections;

        let particles = event.mc_particles(&names.mc_particles)?;
        let mut encoding = None;
        for name in &names.tracker_hits {
            let (hit_encoding, _) = event.tracker_hits(name)?;
            if encoding.is_none() {
                encoding = Some(hit_encoding);
            }
        }
        let encoding = encoding.ok_or_else(|| {
            NtupError::Config(ErrorInfo::new(
                "no_hit_collections",
                "no tracker hit collection configured",
            ))
        })?;
        let tracks = event.tracks(&names.tracks)?;
        let decoder = cached_decoder(&mut self.decoder, encoding)?;

        let mut fills: Vec<(HistName, f64)> = Vec::new();
        let mut buffer = EventBuffer::default();

        for (itruth, particle) in particles.iter().enumerate() {
            if !self
                .config
                .truth
                .matches(particle.pdg, particle.generator_status)
            {
                continue;
            }
            let kin = truth_kinematics(particle);
            if verbose {
                debug!(particle = itruth, pt = kin.pt, theta = kin.theta, phi = kin.phi, "truth muon");
            }
            fills.extend([
                (HistName::TruthRxy, kin.prod_rxy),
                (HistName::TruthPt, kin.pt),
                (HistName::TruthPhi, kin.phi),
                (HistName::TruthTheta, kin.theta),
            ]);
            buffer.truth.push(kin.pt, kin.phi, kin.theta);
        }

        for (itrack, track) in tracks.iter().enumerate() {
            if let Selection::Rejected(reason) = self.selector.evaluate(track) {
                trace!(event = index, track = itrack, ?reason, "track rejected");
                continue;
            }
            let kin = track_kinematics(track, self.config.field_tesla);
            let row = TrackRow {
                pt: kin.pt,
                phi: kin.phi,
                theta: kin.theta,
                d0: track.d0,
                z0: track.z0,
                d0_err: track.d0_variance()?,
                z0_err: track.z0_variance()?,
                chi2: track.chi2,
                ndof: track.ndf,
                nhits: track.hits.len(),
            };
            if verbose {
                debug!(track = itrack, pt = kin.pt, theta = kin.theta, phi = kin.phi, "track");
            }

            let mut hits = HitColumns::with_capacity(track.hits.len());
            for (ihit, hit) in track.hits.iter().enumerate() {
                let cell = decoder.detector_layer(hit.cell_id)?;
                if verbose {
                    debug!(
                        hit = ihit,
                        rxy = hit_rxy(hit),
                        z = hit.position[2],
                        time = hit.time,
                        system = cell.system,
                        layer = cell.layer,
                        "track hit"
                    );
                }
                fills.push((HistName::TrackHitTime, hit.time));
                hits.push(hit.time, hit.position);
            }

            fills.extend([
                (HistName::TrackPt, row.pt),
                (HistName::TrackPhi, row.phi),
                (HistName::TrackTheta, row.theta),
                (HistName::TrackD0, row.d0),
                (HistName::TrackZ0, row.z0),
                (HistName::TrackNhits, row.nhits as f64),
                (HistName::TrackChi2ndf, row.chi2 / f64::from(row.ndof)),
            ]);
            buffer.tracks.push(row, hits);
        }

        let summary = EventSummary {
            index,
            raw_tracks: tracks.len(),
            accepted_tracks: buffer.tracks.len(),
            truth_selected: buffer.truth.len(),
        };
        fills.push((HistName::NtrackAll, summary.raw_tracks as f64));
        fills.push((HistName::NtrackGood, summary.accepted_tracks as f64));

        for (name, value) in fills {
            self.histograms.fill(name, value);
        }
        self.output.push_event(buffer);
        self.events += 1;
        self.accepted_tracks += summary.accepted_tracks as u64;
        Ok(summary)
    }

    /// Folds an accumulator that processed the events following this one's.
    ///
    /// Histograms are summed bin by bin and the ragged output is appended, so
    /// event indices stay in input order when `later` covers the next shard.
    /// Both shards must share field, cuts, truth filter and collection names;
    /// the progress interval may differ.
    pub fn absorb(&mut self, later: EventAccumulator) -> Result<(), NtupError> {
        let (ours, theirs) = (&self.config, &later.config);
        if ours.field_tesla != theirs.field_tesla
            || ours.selection != theirs.selection
            || ours.truth != theirs.truth
            || ours.collections != theirs.collections
        {
            return Err(NtupError::State(
                ErrorInfo::new("config_mismatch", "shards ran with different analysis settings")
                    .with_hint("merge only accumulators built from the same configuration"),
            ));
        }
        self.histograms.merge(&later.histograms)?;
        self.output.append(later.output);
        self.events += later.events;
        self.accepted_tracks += later.accepted_tracks;
        Ok(())
    }

    /// Checks the output invariants and writes both stores, ending the pass.
    ///
    /// Returns the provenance recorded in the histogram store.
    pub fn finalize<H, R>(
        self,
        histogram_store: &mut H,
        record_store: &mut R,
        mut provenance: RunProvenance,
    ) -> Result<RunProvenance, NtupError>
    where
        H: HistogramStore + ?Sized,
        R: RecordStore + ?Sized,
    {
        self.output.check_consistency()?;
        provenance.events = self.events;
        provenance.accepted_tracks = self.accepted_tracks;
        histogram_store.write(&self.histograms, &provenance)?;
        record_store.write(&self.output)?;
        info!(
            events = self.events,
            accepted_tracks = self.accepted_tracks,
            "run finalized"
        );
        Ok(provenance)
    }

    /// Consumes the accumulator without writing anything.
    pub fn into_parts(self) -> (HistogramSet, RunOutput) {
        (self.histograms, self.output)
    }
}

#![allow(dead_code)]

use ntup_ana::CollectionNames;
use ntup_core::{Collection, EventRecord, Track, TrackerHit, TruthParticle};

pub const ENCODING: &str = "system:5,side:-2,layer:6,module:11,sensor:8";

pub fn cell_id(system: u64, layer: u64) -> u64 {
    system | (layer << 7)
}

pub fn hit(index: usize) -> TrackerHit {
    let r = 30.0 + 10.0 * index as f64;
    TrackerHit {
        position: [r, 0.5 * index as f64, 2.0 * index as f64],
        edep: 1e-4,
        time: 0.01 * index as f64,
        cell_id: cell_id(1 + (index as u64 % 3), index as u64),
    }
}

pub fn track(omega: f64, chi2: f64, ndf: i32, nhits: usize) -> Track {
    let mut cov_matrix = vec![0.0; 15];
    cov_matrix[0] = 1e-4;
    cov_matrix[9] = 4e-4;
    Track {
        omega,
        tan_lambda: 0.3,
        phi: 1.2,
        d0: 0.02,
        z0: -0.5,
        cov_matrix,
        chi2,
        ndf,
        hits: (0..nhits).map(hit).collect(),
    }
}

pub fn good_track() -> Track {
    track(1e-3, 5.0, 2, 8)
}

pub fn muon(pdg: i32, status: i32) -> TruthParticle {
    TruthParticle {
        pdg,
        generator_status: status,
        momentum: [3.0, 4.0, 12.0],
        energy: 13.0,
        vertex: [0.3, 0.4, 1.0],
        charge: if pdg > 0 { -1.0 } else { 1.0 },
    }
}

pub fn event(particles: Vec<TruthParticle>, tracks: Vec<Track>) -> EventRecord {
    let names = CollectionNames::default();
    let mut record = EventRecord::default()
        .with_collection(names.mc_particles.clone(), Collection::McParticle { particles })
        .with_collection(names.tracks.clone(), Collection::Track { tracks });
    for name in names.tracker_hits {
        record = record.with_collection(
            name,
            Collection::TrackerHit {
                encoding: ENCODING.to_string(),
                hits: Vec::new(),
            },
        );
    }
    record
}

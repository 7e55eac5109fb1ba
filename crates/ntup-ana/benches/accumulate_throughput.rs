use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ntup_ana::{AnalysisConfig, CollectionNames, EventAccumulator};
use ntup_core::{Collection, EventRecord, Track, TrackerHit, TruthParticle};

fn synthetic_event(seed: usize) -> EventRecord {
    let tracks = (0..40)
        .map(|i| {
            let k = (seed * 31 + i * 7) % 97;
            Track {
                omega: 1e-4 * (1.0 + k as f64 / 10.0),
                tan_lambda: (k as f64 - 48.0) / 40.0,
                phi: (k as f64 / 97.0 - 0.5) * 6.0,
                d0: 0.01 * k as f64,
                z0: -0.1 * k as f64,
                cov_matrix: vec![1e-4; 15],
                chi2: (k % 25) as f64,
                ndf: (k % 9) as i32,
                hits: (0..(k % 14))
                    .map(|h| TrackerHit {
                        position: [30.0 * h as f64, 5.0, 12.0 * h as f64],
                        edep: 1e-4,
                        time: 0.01 * h as f64,
                        cell_id: (h as u64 % 5) | ((h as u64) << 7),
                    })
                    .collect(),
            }
        })
        .collect();
    let particles = (0..20)
        .map(|i| TruthParticle {
            pdg: if i % 3 == 0 { 13 } else { 211 },
            generator_status: 1,
            momentum: [i as f64, 2.0, 10.0],
            energy: 11.0,
            vertex: [0.0, 0.0, 0.0],
            charge: -1.0,
        })
        .collect();

    let names = CollectionNames::default();
    let mut record = EventRecord::default()
        .with_collection(names.mc_particles.clone(), Collection::McParticle { particles })
        .with_collection(names.tracks.clone(), Collection::Track { tracks });
    for name in names.tracker_hits {
        record = record.with_collection(
            name,
            Collection::TrackerHit {
                encoding: "system:5,side:-2,layer:6,module:11,sensor:8".into(),
                hits: Vec::new(),
            },
        );
    }
    record
}

fn bench_accumulate(c: &mut Criterion) {
    let events: Vec<_> = (0..100).map(synthetic_event).collect();
    c.bench_function("accumulate_100_events", |b| {
        b.iter(|| {
            let mut acc = EventAccumulator::new(AnalysisConfig::default()).expect("config");
            for event in &events {
                acc.process_event(black_box(event)).expect("process");
            }
            black_box(acc.into_parts())
        })
    });
}

criterion_group!(benches, bench_accumulate);
criterion_main!(benches);

use std::fs;
use std::process::Command;

use ntup_core::{Collection, EventRecord};
use serde_json::Value;

const HIT_COLLECTIONS: [&str; 6] = [
    "IBTrackerHits",
    "IETrackerHits",
    "OBTrackerHits",
    "OETrackerHits",
    "VBTrackerHits",
    "VETrackerHits",
];

fn empty_event() -> EventRecord {
    let mut event = EventRecord::default()
        .with_collection(
            "MCParticle",
            Collection::McParticle {
                particles: Vec::new(),
            },
        )
        .with_collection("SiTracks", Collection::Track { tracks: Vec::new() });
    for name in HIT_COLLECTIONS {
        event = event.with_collection(
            name,
            Collection::TrackerHit {
                encoding: "system:5,side:-2,layer:6,module:11,sensor:8".into(),
                hits: Vec::new(),
            },
        );
    }
    event
}

#[test]
fn cli_writes_both_outputs() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let input = temp.path().join("events.jsonl");
    let line = serde_json::to_string(&empty_event()).unwrap();
    fs::write(&input, format!("{line}\n{line}\n")).unwrap();
    let base = temp.path().join("ntup");

    let output = Command::new(env!("CARGO_BIN_EXE_ntup-tracks"))
        .arg("-i")
        .arg(&input)
        .arg("--outFile")
        .arg(&base)
        .output()
        .expect("run ntup-tracks");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let records: Value =
        serde_json::from_slice(&fs::read(temp.path().join("ntup.json")).unwrap()).unwrap();
    assert_eq!(records["track_pt"], serde_json::json!([[], []]));
    assert!(temp.path().join("ntup.hist.json").exists());
}

#[test]
fn cli_fails_on_missing_input() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let status = Command::new(env!("CARGO_BIN_EXE_ntup-tracks"))
        .arg("--inFile")
        .arg(temp.path().join("nope.jsonl"))
        .arg("-o")
        .arg(temp.path().join("out"))
        .status()
        .expect("run ntup-tracks");
    assert!(!status.success());
    assert!(!temp.path().join("out.json").exists());
}

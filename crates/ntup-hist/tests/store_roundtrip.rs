use ntup_core::provenance::RunProvenance;
use ntup_hist::{HistName, HistogramSet, HistogramStore, JsonHistogramFile};

#[test]
fn written_file_reloads_into_identical_set() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let path = temp.path().join("ntup_tracks.hist.json");

    let mut set = HistogramSet::standard().unwrap();
    set.fill(HistName::TruthPt, 42.0);
    set.fill(HistName::TrackHitTime, 0.05);
    set.fill(HistName::TrackHitTime, f64::NAN);
    let provenance = RunProvenance {
        input_path: "Output_REC.jsonl".into(),
        events: 1,
        ..RunProvenance::default()
    };

    let mut store = JsonHistogramFile::new(&path);
    store.write(&set, &provenance).expect("write");
    // second write replaces the first rather than appending
    store.write(&set, &provenance).expect("rewrite");

    let file = JsonHistogramFile::read(&path).expect("read back");
    assert_eq!(file.provenance, provenance);
    let reloaded = file.into_set().expect("layout");
    assert_eq!(reloaded, set);
    assert_eq!(reloaded.get(HistName::TrackHitTime).overflow(), 1.0);
}

#[test]
fn unwritable_target_is_io_error() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let mut store = JsonHistogramFile::new(temp.path().join("missing").join("out.hist.json"));
    let set = HistogramSet::standard().unwrap();
    let err = store.write(&set, &RunProvenance::default()).unwrap_err();
    assert_eq!(err.info().code, "write_histograms");
}

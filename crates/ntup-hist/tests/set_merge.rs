use ntup_core::errors::NtupError;
use ntup_hist::{Hist1D, HistName, HistogramSet};

#[test]
fn standard_set_matches_declared_layout() {
    let set = HistogramSet::standard().expect("standard set");
    let names: Vec<_> = set.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "truth_rxy",
            "truth_pt",
            "truth_theta",
            "truth_phi",
            "track_d0",
            "track_z0",
            "track_pt",
            "track_phi",
            "track_theta",
            "track_nholes",
            "track_nhits",
            "track_chi2ndf",
            "ntrack_all",
            "ntrack_good",
            "track_hit_time",
        ]
    );
    let ntrack = set.get(HistName::NtrackAll);
    assert_eq!((ntrack.bins, ntrack.low, ntrack.high), (100, 0.0, 5000.0));
    assert!(set.iter().all(|h| h.entries == 0));
}

#[test]
fn merge_sums_bins_and_entries() {
    let mut left = HistogramSet::standard().unwrap();
    let mut right = HistogramSet::standard().unwrap();
    left.fill(HistName::TrackPt, 12.0);
    right.fill(HistName::TrackPt, 12.5);
    right.fill(HistName::TrackPt, 2000.0);
    right.fill(HistName::NtrackGood, 1.0);

    let mut merged = left.clone();
    merged.merge(&right).expect("merge");
    let pt = merged.get(HistName::TrackPt);
    assert_eq!(pt.entries, 3);
    assert_eq!(pt.bin_content(2), 2.0);
    assert_eq!(pt.overflow(), 1.0);
    assert_eq!(merged.get(HistName::NtrackGood).entries, 1);

    let mut reversed = right.clone();
    reversed.merge(&left).unwrap();
    assert_eq!(reversed.get(HistName::TrackPt).counts, pt.counts);
}

#[test]
fn adding_mismatched_binning_fails() {
    let mut a = Hist1D::new("a", "a", 10, 0.0, 1.0).unwrap();
    let b = Hist1D::new("b", "b", 5, 0.0, 1.0).unwrap();
    match a.add(&b) {
        Err(NtupError::State(info)) => assert_eq!(info.code, "binning_mismatch"),
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn invalid_axis_is_rejected() {
    assert!(Hist1D::new("h", "h", 0, 0.0, 1.0).is_err());
    assert!(Hist1D::new("h", "h", 4, 1.0, 1.0).is_err());
    assert!(Hist1D::new("h", "h", 4, 0.0, f64::NAN).is_err());
}

#[test]
fn layout_check_rejects_foreign_histograms() {
    let mut hists = HistogramSet::standard().unwrap().into_histograms();
    hists.swap(0, 1);
    assert!(HistogramSet::from_histograms(hists).is_err());
    assert!(HistogramSet::from_histograms(Vec::new()).is_err());
}

use ntup_hist::Hist1D;
use proptest::prelude::*;

proptest! {
    #[test]
    fn every_fill_lands_in_exactly_one_bin(values in proptest::collection::vec(-20.0f64..20.0, 0..200)) {
        let mut hist = Hist1D::new("h", "h", 13, -5.0, 7.5).unwrap();
        for &value in &values {
            let bin = hist.fill(value);
            prop_assert!(bin <= hist.bins + 1);
            if bin >= 1 && bin <= hist.bins {
                prop_assert!(value >= hist.bin_low_edge(bin) - 1e-9);
                prop_assert!(value < hist.bin_low_edge(bin) + hist.bin_width() + 1e-9);
            }
        }
        let total: f64 = hist.counts.iter().sum();
        prop_assert_eq!(total, values.len() as f64);
        prop_assert_eq!(hist.entries, values.len() as u64);
        prop_assert_eq!(hist.integral(), hist.sum_w);
    }
}

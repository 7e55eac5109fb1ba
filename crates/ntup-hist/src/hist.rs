use ntup_core::errors::{ErrorInfo, NtupError};
use serde::{Deserialize, Serialize};

fn hist_error(code: &str, name: &str, message: impl Into<String>) -> NtupError {
    NtupError::State(ErrorInfo::new(code, message).with_context("histogram", name))
}

/// Fixed-range histogram with underflow and overflow bins.
///
/// `counts[0]` is the underflow bin and `counts[bins + 1]` the overflow bin.
/// Values that compare as not-below the upper edge (including NaN and +inf)
/// land in overflow. Only in-range fills contribute to the moment sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist1D {
    /// Histogram name, unique within a set.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Number of in-range bins.
    pub bins: usize,
    /// Lower edge of the first bin.
    pub low: f64,
    /// Upper edge of the last bin.
    pub high: f64,
    /// Bin contents including underflow and overflow.
    pub counts: Vec<f64>,
    /// Number of fill calls.
    pub entries: u64,
    /// Sum of in-range weights.
    pub sum_w: f64,
    /// Sum of in-range weighted values.
    pub sum_wx: f64,
    /// Sum of in-range weighted squared values.
    pub sum_wx2: f64,
}

impl Hist1D {
    /// Creates an empty histogram. Fails on zero bins or a degenerate range.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        bins: usize,
        low: f64,
        high: f64,
    ) -> Result<Self, NtupError> {
        let name = name.into();
        if bins == 0 {
            return Err(hist_error("zero_bins", &name, "bin count must be positive"));
        }
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(hist_error(
                "bad_range",
                &name,
                format!("invalid axis range [{low}, {high})"),
            ));
        }
        Ok(Self {
            name,
            title: title.into(),
            bins,
            low,
            high,
            counts: vec![0.0; bins + 2],
            entries: 0,
            sum_w: 0.0,
            sum_wx: 0.0,
            sum_wx2: 0.0,
        })
    }

    /// Returns the bin index for `x`, with 0 as underflow and `bins + 1` as overflow.
    pub fn find_bin(&self, x: f64) -> usize {
        if x < self.low {
            0
        } else if !(x < self.high) {
            self.bins + 1
        } else {
            let scaled = (x - self.low) / (self.high - self.low) * self.bins as f64;
            (1 + scaled as usize).min(self.bins)
        }
    }

    /// Records one entry at `x` and returns the bin that was incremented.
    pub fn fill(&mut self, x: f64) -> usize {
        self.entries += 1;
        let bin = self.find_bin(x);
        self.counts[bin] += 1.0;
        if bin != 0 && bin != self.bins + 1 {
            self.sum_w += 1.0;
            self.sum_wx += x;
            self.sum_wx2 += x * x;
        }
        bin
    }

    /// Contents of `bin`, or zero when the index is out of range.
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.counts.get(bin).copied().unwrap_or(0.0)
    }

    /// Underflow contents.
    pub fn underflow(&self) -> f64 {
        self.bin_content(0)
    }

    /// Overflow contents.
    pub fn overflow(&self) -> f64 {
        self.bin_content(self.bins + 1)
    }

    /// Sum of the in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.counts.iter().skip(1).take(self.bins).sum()
    }

    /// Bin width.
    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    /// Lower edge of in-range `bin` (1-based).
    pub fn bin_low_edge(&self, bin: usize) -> f64 {
        self.low + (bin as f64 - 1.0) * self.bin_width()
    }

    /// Mean of the in-range fills, NaN when nothing landed in range.
    pub fn mean(&self) -> f64 {
        if self.sum_w == 0.0 {
            return f64::NAN;
        }
        self.sum_wx / self.sum_w
    }

    /// Standard deviation of the in-range fills.
    pub fn std_dev(&self) -> f64 {
        if self.sum_w == 0.0 {
            return f64::NAN;
        }
        let mean = self.mean();
        (self.sum_wx2 / self.sum_w - mean * mean).max(0.0).sqrt()
    }

    /// Returns true when both histograms share bin count and range.
    pub fn same_binning(&self, other: &Hist1D) -> bool {
        self.bins == other.bins && self.low == other.low && self.high == other.high
    }

    /// Adds the contents of `other` bin by bin.
    pub fn add(&mut self, other: &Hist1D) -> Result<(), NtupError> {
        if !self.same_binning(other) {
            return Err(hist_error(
                "binning_mismatch",
                &self.name,
                format!(
                    "cannot add {}:[{}, {}) to {}:[{}, {})",
                    other.bins, other.low, other.high, self.bins, self.low, self.high
                ),
            ));
        }
        for (dst, src) in self.counts.iter_mut().zip(&other.counts) {
            *dst += src;
        }
        self.entries += other.entries;
        self.sum_w += other.sum_w;
        self.sum_wx += other.sum_wx;
        self.sum_wx2 += other.sum_wx2;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_half_open_convention() {
        let mut hist = Hist1D::new("h", "h", 10, 0.0, 10.0).unwrap();
        assert_eq!(hist.fill(0.0), 1);
        assert_eq!(hist.fill(9.999), 10);
        assert_eq!(hist.fill(10.0), 11);
        assert_eq!(hist.fill(-0.001), 0);
        assert_eq!(hist.entries, 4);
        assert_eq!(hist.integral(), 2.0);
    }

    #[test]
    fn non_finite_values_go_to_overflow() {
        let mut hist = Hist1D::new("h", "h", 4, -1.0, 1.0).unwrap();
        hist.fill(f64::NAN);
        hist.fill(f64::INFINITY);
        hist.fill(f64::NEG_INFINITY);
        assert_eq!(hist.overflow(), 2.0);
        assert_eq!(hist.underflow(), 1.0);
        assert_eq!(hist.sum_w, 0.0);
        assert!(hist.mean().is_nan());
    }
}

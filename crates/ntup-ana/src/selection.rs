use ntup_core::event::Track;
use serde::{Deserialize, Serialize};

use crate::config::SelectionCuts;
use crate::kinematics::{chi2_per_ndf, pt_from_curvature};

/// Reason a track failed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Rounded transverse momentum below the cut.
    LowPt,
    /// Fit has zero degrees of freedom.
    DegenerateFit,
    /// Chi-square per degree of freedom above the cut.
    PoorFit,
    /// Fewer hits than required.
    TooFewHits,
}

/// Outcome of evaluating one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Track kept.
    Accepted,
    /// Track dropped for the given reason.
    Rejected(RejectReason),
}

impl Selection {
    /// Returns true for [`Selection::Accepted`].
    pub fn is_accepted(self) -> bool {
        matches!(self, Selection::Accepted)
    }
}

/// Stateless track quality predicate.
///
/// Rules run in a fixed order and the first failure decides: momentum, fit
/// quality, hit count.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSelector {
    field_tesla: f64,
    cuts: SelectionCuts,
}

impl TrackSelector {
    /// Creates a selector for the given field and cuts.
    pub fn new(field_tesla: f64, cuts: SelectionCuts) -> Self {
        Self { field_tesla, cuts }
    }

    /// Applies the selection rules to `track`.
    pub fn evaluate(&self, track: &Track) -> Selection {
        let pt = round_to(pt_from_curvature(track.omega, self.field_tesla), self.cuts.pt_decimals);
        if pt < self.cuts.min_pt {
            return Selection::Rejected(RejectReason::LowPt);
        }
        let Some(ratio) = chi2_per_ndf(track.chi2, track.ndf) else {
            return Selection::Rejected(RejectReason::DegenerateFit);
        };
        if ratio > self.cuts.max_chi2_per_ndf {
            return Selection::Rejected(RejectReason::PoorFit);
        }
        if track.hits.len() < self.cuts.min_hits {
            return Selection::Rejected(RejectReason::TooFewHits);
        }
        Selection::Accepted
    }

    /// Returns true when `track` passes every rule.
    pub fn is_acceptable(&self, track: &Track) -> bool {
        self.evaluate(track).is_accepted()
    }
}

fn round_to(value: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        Some(places) => {
            let scale = 10f64.powi(places as i32);
            (value * scale).round() / scale
        }
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn rounding_keeps_non_finite_values() {
        assert_eq!(round_to(0.996, Some(2)), 1.0);
        assert_eq!(round_to(f64::INFINITY, Some(2)), f64::INFINITY);
        assert!(round_to(f64::NAN, Some(2)).is_nan());
        assert_eq!(round_to(0.996, None), 0.996);
    }
}

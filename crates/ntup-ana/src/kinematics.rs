//! Conversions from raw record fields to physical observables.
//!
//! Units follow the reconstruction conventions: lengths in mm, momenta in
//! GeV, field in tesla, angles in radians. Track curvature is stored in 1/mm,
//! hence the factor 1000 to reach 1/m before applying `pt = 0.3 B R`.
//! Nothing here clamps or sanitises its inputs; a zero curvature yields an
//! infinite momentum and NaN inputs give NaN outputs.

use std::f64::consts::FRAC_PI_2;

use ntup_core::event::{Track, TrackerHit, TruthParticle};
use serde::{Deserialize, Serialize};

/// Solenoid field of the detector, in tesla.
pub const DEFAULT_FIELD_TESLA: f64 = 3.56;

/// GeV per (tesla metre) for a unit-charge particle.
pub const PT_PER_TESLA_METRE: f64 = 0.3;

/// Millimetres per metre, converting curvature from 1/mm to 1/m.
pub const MM_PER_M: f64 = 1000.0;

/// Observables of a generator particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruthKinematics {
    /// Transverse momentum.
    pub pt: f64,
    /// Polar angle of the momentum.
    pub theta: f64,
    /// Azimuth of the momentum.
    pub phi: f64,
    /// Transverse distance of the production vertex from the beam line.
    pub prod_rxy: f64,
}

/// Observables of a reconstructed track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackKinematics {
    /// Transverse momentum from curvature.
    pub pt: f64,
    /// Azimuth at closest approach.
    pub phi: f64,
    /// Polar angle from the dip slope.
    pub theta: f64,
}

/// Transverse momentum of a track with curvature `omega` (1/mm) in field `field_tesla`.
pub fn pt_from_curvature(omega: f64, field_tesla: f64) -> f64 {
    PT_PER_TESLA_METRE * field_tesla / (omega * MM_PER_M).abs()
}

/// Polar angle from the tangent of the dip angle.
pub fn theta_from_tan_lambda(tan_lambda: f64) -> f64 {
    FRAC_PI_2 - tan_lambda.atan()
}

/// Fit quality ratio, `None` when the fit has no degrees of freedom.
pub fn chi2_per_ndf(chi2: f64, ndf: i32) -> Option<f64> {
    if ndf == 0 {
        None
    } else {
        Some(chi2 / f64::from(ndf))
    }
}

/// Transverse distance of a point from the beam line.
pub fn rxy(x: f64, y: f64) -> f64 {
    x.hypot(y)
}

/// Transverse distance of a hit from the beam line.
pub fn hit_rxy(hit: &TrackerHit) -> f64 {
    rxy(hit.position[0], hit.position[1])
}

/// Generator particle kinematics from its four-momentum and vertex.
pub fn truth_kinematics(particle: &TruthParticle) -> TruthKinematics {
    let [px, py, pz] = particle.momentum;
    let pt = rxy(px, py);
    let theta = if pt == 0.0 && pz == 0.0 {
        0.0
    } else {
        pt.atan2(pz)
    };
    TruthKinematics {
        pt,
        theta,
        phi: py.atan2(px),
        prod_rxy: rxy(particle.vertex[0], particle.vertex[1]),
    }
}

/// Track kinematics in field `field_tesla`.
pub fn track_kinematics(track: &Track, field_tesla: f64) -> TrackKinematics {
    TrackKinematics {
        pt: pt_from_curvature(track.omega, field_tesla),
        phi: track.phi,
        theta: theta_from_tan_lambda(track.tan_lambda),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_slope_gives_small_theta() {
        assert!((theta_from_tan_lambda(0.0) - FRAC_PI_2).abs() < 1e-15);
        assert!(theta_from_tan_lambda(10.0) < 0.1);
        assert!(theta_from_tan_lambda(-10.0) > 3.0);
    }

    #[test]
    fn zero_ndf_has_no_ratio() {
        assert_eq!(chi2_per_ndf(5.0, 0), None);
        assert_eq!(chi2_per_ndf(5.0, 2), Some(2.5));
    }
}

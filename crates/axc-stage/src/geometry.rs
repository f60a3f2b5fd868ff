//! Annulus and stage geometry at the rotor inlet and outlet.

use crate::common::{check_finite, check_positive};
use crate::error::{StageError, StageResult};
use axc_core::units::{Area, Length, m};
use std::f64::consts::PI;

/// Flow annulus between hub and tip radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Annulus {
    tip_radius: Length,
    hub_radius: Length,
}

impl Annulus {
    /// Create an annulus.
    ///
    /// # Errors
    /// Returns error unless 0 ≤ hub < tip.
    pub fn new(tip_radius: Length, hub_radius: Length) -> StageResult<Self> {
        check_positive(tip_radius.value, "tip radius")?;
        check_finite(hub_radius.value, "hub radius")?;
        if hub_radius.value < 0.0 || hub_radius.value >= tip_radius.value {
            return Err(StageError::InvalidGeometry {
                what: format!(
                    "hub radius {:.4} m must lie in [0, tip radius {:.4} m)",
                    hub_radius.value, tip_radius.value
                ),
            });
        }
        Ok(Self {
            tip_radius,
            hub_radius,
        })
    }

    /// Annulus with flow area `area_m2` [m²] centred on mean radius `mean_radius_m` [m].
    pub fn from_area_and_mean_radius(area_m2: f64, mean_radius_m: f64) -> StageResult<Self> {
        check_positive(area_m2, "annulus area")?;
        check_positive(mean_radius_m, "mean radius")?;
        // r_t² + r_h² = 2 r_m², r_t² − r_h² = A/π
        let half_span = area_m2 / (2.0 * PI);
        let hub_sq = mean_radius_m * mean_radius_m - half_span;
        if hub_sq < 0.0 {
            return Err(StageError::InvalidGeometry {
                what: format!(
                    "area {area_m2:.4} m² does not fit around mean radius {mean_radius_m:.4} m"
                ),
            });
        }
        let tip = (mean_radius_m * mean_radius_m + half_span).sqrt();
        Self::new(m(tip), m(hub_sq.sqrt()))
    }

    /// Annulus with flow area `area_m2` [m²] and hub-to-tip radius ratio `ratio`.
    pub fn from_area_and_hub_tip_ratio(area_m2: f64, ratio: f64) -> StageResult<Self> {
        check_positive(area_m2, "annulus area")?;
        if !(0.0..1.0).contains(&ratio) {
            return Err(StageError::InvalidGeometry {
                what: format!("hub-tip ratio {ratio} must lie in [0, 1)"),
            });
        }
        let tip = (area_m2 / (PI * (1.0 - ratio * ratio))).sqrt();
        Self::new(m(tip), m(tip * ratio))
    }

    pub fn tip_radius(&self) -> Length {
        self.tip_radius
    }

    pub fn hub_radius(&self) -> Length {
        self.hub_radius
    }

    /// Flow area π(r_t² − r_h²).
    pub fn area(&self) -> Area {
        (self.tip_radius * self.tip_radius - self.hub_radius * self.hub_radius) * PI
    }

    /// Radius that splits the annulus into equal areas.
    pub fn mean_radius(&self) -> Length {
        let rt = self.tip_radius.value;
        let rh = self.hub_radius.value;
        m((0.5 * (rt * rt + rh * rh)).sqrt())
    }
}

/// Rotor inlet and outlet annuli plus mean-line rotor solidity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageGeometry {
    pub inlet: Annulus,
    pub outlet: Annulus,
    /// Chord over pitch at the mean radius
    pub solidity: f64,
}

impl StageGeometry {
    pub fn new(inlet: Annulus, outlet: Annulus, solidity: f64) -> StageResult<Self> {
        check_positive(solidity, "solidity")?;
        Ok(Self {
            inlet,
            outlet,
            solidity,
        })
    }

    /// Mean blade speeds (U1, U2) [m/s] at shaft speed `omega` [rad/s].
    pub fn blade_speeds(&self, omega: f64) -> (f64, f64) {
        (
            omega * self.inlet.mean_radius().value,
            omega * self.outlet.mean_radius().value,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_and_mean_radius() {
        let a = Annulus::new(m(0.5), m(0.3)).unwrap();
        assert!((a.area().value - PI * 0.16).abs() < 1e-12);
        assert!((a.mean_radius().value - 0.17_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn reject_hub_above_tip() {
        assert!(Annulus::new(m(0.3), m(0.5)).is_err());
        assert!(Annulus::new(m(0.3), m(0.3)).is_err());
        assert!(Annulus::new(m(0.0), m(0.0)).is_err());
    }

    #[test]
    fn sizing_from_mean_radius_round_trips() {
        let a = Annulus::from_area_and_mean_radius(0.4, 0.45).unwrap();
        assert!((a.area().value - 0.4).abs() < 1e-12);
        assert!((a.mean_radius().value - 0.45).abs() < 1e-12);
    }

    #[test]
    fn sizing_rejects_area_too_large_for_radius() {
        assert!(Annulus::from_area_and_mean_radius(2.0, 0.3).is_err());
    }

    #[test]
    fn sizing_from_hub_tip_ratio() {
        let a = Annulus::from_area_and_hub_tip_ratio(0.5, 0.6).unwrap();
        assert!((a.area().value - 0.5).abs() < 1e-12);
        let ratio = a.hub_radius().value / a.tip_radius().value;
        assert!((ratio - 0.6).abs() < 1e-12);
        assert!(Annulus::from_area_and_hub_tip_ratio(0.5, 1.0).is_err());
    }

    #[test]
    fn blade_speeds_scale_with_omega() {
        let ring = Annulus::new(m(0.5), m(0.3)).unwrap();
        let geom = StageGeometry::new(ring, ring, 1.0).unwrap();
        let (u1, u2) = geom.blade_speeds(1000.0);
        assert!((u1 - 1000.0 * 0.17_f64.sqrt()).abs() < 1e-9);
        assert_eq!(u1, u2);
    }
}

//! Efficiency characteristic built from two parabolas joined at the design point.
//!
//! Each branch η = aφ² + bφ + c passes through the design point (φ_d, η_peak) with zero
//! slope there and through its own bound point, so the combined curve is continuous and
//! smooth at φ_d.

use crate::common::{check_finite, check_positive};
use crate::curve::{CurveKind, StageCurve};
use crate::error::{StageError, StageResult};
use axc_core::numeric::linspace;
use nalgebra::{Matrix3, Vector3};

/// η(φ) = aφ² + bφ + c.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parabola {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Parabola {
    /// Parabola through (phi_bound, value_bound) with its vertex at (phi_design, peak).
    pub fn through_vertex(
        phi_bound: f64,
        value_bound: f64,
        phi_design: f64,
        peak: f64,
    ) -> StageResult<Self> {
        let m = Matrix3::new(
            phi_bound * phi_bound,
            phi_bound,
            1.0,
            phi_design * phi_design,
            phi_design,
            1.0,
            2.0 * phi_design,
            1.0,
            0.0,
        );
        let rhs = Vector3::new(value_bound, peak, 0.0);
        let coef = m.lu().solve(&rhs).ok_or(StageError::Singular {
            what: "efficiency parabola",
        })?;
        let parabola = Self {
            a: coef[0],
            b: coef[1],
            c: coef[2],
        };
        check_finite(parabola.a, "parabola coefficient")?;
        check_finite(parabola.b, "parabola coefficient")?;
        check_finite(parabola.c, "parabola coefficient")?;
        Ok(parabola)
    }

    pub fn value(&self, phi: f64) -> f64 {
        (self.a * phi + self.b) * phi + self.c
    }

    pub fn slope(&self, phi: f64) -> f64 {
        2.0 * self.a * phi + self.b
    }
}

/// Two-branch parabolic efficiency curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParabolicEfficiency {
    pub phi_stall: f64,
    pub phi_design: f64,
    pub phi_choke: f64,
    pub peak: f64,
    /// Branch used for φ ≤ φ_design
    pub stall_branch: Parabola,
    /// Branch used for φ > φ_design
    pub choke_branch: Parabola,
}

impl ParabolicEfficiency {
    /// Fit both branches.
    ///
    /// `stall_ratio` and `choke_ratio` scale the peak efficiency at the respective bound.
    ///
    /// # Errors
    /// Bounds not ordered around φ_design, peak outside (0, 1], ratios outside (0, 1], or
    /// a singular fit.
    pub fn fit(
        phi_stall: f64,
        phi_design: f64,
        phi_choke: f64,
        peak: f64,
        stall_ratio: f64,
        choke_ratio: f64,
    ) -> StageResult<Self> {
        check_positive(phi_design, "design flow coefficient")?;
        if !(phi_stall < phi_design && phi_design < phi_choke) {
            return Err(StageError::InvalidCurve {
                what: format!(
                    "efficiency bounds must satisfy {phi_stall} < {phi_design} < {phi_choke}"
                ),
            });
        }
        for (value, what) in [
            (peak, "peak efficiency"),
            (stall_ratio, "stall efficiency ratio"),
            (choke_ratio, "choke efficiency ratio"),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(StageError::InvalidCurve {
                    what: format!("{what} {value} must lie in (0, 1]"),
                });
            }
        }

        Ok(Self {
            phi_stall,
            phi_design,
            phi_choke,
            peak,
            stall_branch: Parabola::through_vertex(
                phi_stall,
                stall_ratio * peak,
                phi_design,
                peak,
            )?,
            choke_branch: Parabola::through_vertex(
                phi_choke,
                choke_ratio * peak,
                phi_design,
                peak,
            )?,
        })
    }

    pub fn value(&self, phi: f64) -> f64 {
        if phi <= self.phi_design {
            self.stall_branch.value(phi)
        } else {
            self.choke_branch.value(phi)
        }
    }

    /// Sample `n` evenly spaced points between the bounds.
    pub fn sample(&self, n: usize) -> StageResult<StageCurve> {
        let grid = linspace(self.phi_stall, self.phi_choke, n);
        StageCurve::sample(CurveKind::Efficiency, &grid, |phi| Ok(self.value(phi)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> ParabolicEfficiency {
        ParabolicEfficiency::fit(0.4, 0.5, 0.6, 0.88, 0.90, 0.85).unwrap()
    }

    #[test]
    fn passes_through_design_and_bounds() {
        let c = curve();
        assert!((c.value(0.5) - 0.88).abs() < 1e-12);
        assert!((c.value(0.4) - 0.9 * 0.88).abs() < 1e-12);
        assert!((c.value(0.6) - 0.85 * 0.88).abs() < 1e-12);
    }

    #[test]
    fn zero_slope_at_design() {
        let c = curve();
        assert!(c.stall_branch.slope(0.5).abs() < 1e-9);
        assert!(c.choke_branch.slope(0.5).abs() < 1e-9);
    }

    #[test]
    fn continuous_across_design() {
        let c = curve();
        let eps = 1e-7;
        assert!((c.value(0.5 - eps) - c.value(0.5 + eps)).abs() < 1e-9);
    }

    #[test]
    fn rejects_unordered_bounds() {
        assert!(ParabolicEfficiency::fit(0.6, 0.5, 0.4, 0.88, 0.9, 0.85).is_err());
        assert!(ParabolicEfficiency::fit(0.4, 0.5, 0.6, 1.2, 0.9, 0.85).is_err());
        assert!(ParabolicEfficiency::fit(0.4, 0.5, 0.6, 0.88, 0.0, 0.85).is_err());
    }

    #[test]
    fn sampled_curve_has_bounds() {
        let s = curve().sample(41).unwrap();
        assert_eq!(s.points().len(), 41);
        assert_eq!(s.phi_stall(), 0.4);
        assert_eq!(s.phi_choke(), 0.6);
        let (phi, peak) = s.peak();
        assert!((phi - 0.5).abs() < 1e-9);
        assert!((peak - 0.88).abs() < 1e-9);
    }
}

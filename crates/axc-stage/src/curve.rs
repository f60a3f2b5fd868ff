//! Stage characteristic curves: efficiency or pressure coefficient against flow coefficient.
//!
//! A curve carries explicit stall (low φ) and choke (high φ) bounds. Lookups inside the
//! bounds interpolate linearly between samples; lookups outside are clamped to the bound
//! value and flagged, never extrapolated.

use crate::error::{StageError, StageResult};
use axc_core::numeric::interpolate_clamped;

/// Minimum number of samples a curve must carry.
pub const MIN_CURVE_POINTS: usize = 3;

/// Which quantity a curve describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Efficiency,
    PressureCoefficient,
}

impl CurveKind {
    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::Efficiency => "efficiency",
            CurveKind::PressureCoefficient => "pressure coefficient",
        }
    }
}

/// Position of a flow coefficient relative to the curve bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FlowCondition {
    #[default]
    Normal,
    /// Below the stall bound
    Stall,
    /// Above the choke bound
    Choke,
}

/// Result of evaluating a curve at one flow coefficient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveLookup {
    pub value: f64,
    /// Flow coefficient the value was taken at (clamped into the bounds)
    pub phi: f64,
    pub condition: FlowCondition,
}

/// Ordered (φ, value) samples with stall and choke bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct StageCurve {
    kind: CurveKind,
    points: Vec<(f64, f64)>,
    phi_stall: f64,
    phi_choke: f64,
}

impl StageCurve {
    /// Create a curve with explicit bounds.
    ///
    /// # Errors
    /// Fewer than three samples, non-increasing or non-finite φ, non-finite values, or
    /// bounds that are not ordered inside the sampled range.
    pub fn new(
        kind: CurveKind,
        points: Vec<(f64, f64)>,
        phi_stall: f64,
        phi_choke: f64,
    ) -> StageResult<Self> {
        let invalid = |what: String| StageError::InvalidCurve {
            what: format!("{} curve: {what}", kind.name()),
        };

        if points.len() < MIN_CURVE_POINTS {
            return Err(invalid(format!(
                "needs at least {MIN_CURVE_POINTS} points, got {}",
                points.len()
            )));
        }
        if let Some((phi, value)) = points
            .iter()
            .find(|(phi, value)| !phi.is_finite() || !value.is_finite())
        {
            return Err(invalid(format!("non-finite sample ({phi}, {value})")));
        }
        if let Some(w) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(invalid(format!(
                "flow coefficients must increase ({} then {})",
                w[0].0, w[1].0
            )));
        }
        let (lo, hi) = (points[0].0, points[points.len() - 1].0);
        if !(phi_stall.is_finite() && phi_choke.is_finite())
            || phi_stall >= phi_choke
            || phi_stall < lo
            || phi_choke > hi
        {
            return Err(invalid(format!(
                "bounds [{phi_stall}, {phi_choke}] must be ordered inside [{lo}, {hi}]"
            )));
        }

        Ok(Self {
            kind,
            points,
            phi_stall,
            phi_choke,
        })
    }

    /// Create a curve whose bounds are its first and last samples.
    pub fn from_points(kind: CurveKind, points: Vec<(f64, f64)>) -> StageResult<Self> {
        let (lo, hi) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => {
                return Err(StageError::InvalidCurve {
                    what: format!("{} curve has no points", kind.name()),
                });
            }
        };
        Self::new(kind, points, lo, hi)
    }

    /// Sample `f` at every φ in `grid` and build a curve bounded by the grid ends.
    pub fn sample<F>(kind: CurveKind, grid: &[f64], mut f: F) -> StageResult<Self>
    where
        F: FnMut(f64) -> StageResult<f64>,
    {
        let points = grid
            .iter()
            .map(|&phi| f(phi).map(|v| (phi, v)))
            .collect::<StageResult<Vec<_>>>()?;
        Self::from_points(kind, points)
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn phi_stall(&self) -> f64 {
        self.phi_stall
    }

    pub fn phi_choke(&self) -> f64 {
        self.phi_choke
    }

    /// Classify a flow coefficient against the bounds.
    pub fn condition(&self, phi: f64) -> FlowCondition {
        if phi < self.phi_stall {
            FlowCondition::Stall
        } else if phi > self.phi_choke {
            FlowCondition::Choke
        } else {
            FlowCondition::Normal
        }
    }

    /// Evaluate the curve, clamping φ into the bounds.
    pub fn lookup(&self, phi: f64) -> CurveLookup {
        let condition = self.condition(phi);
        let clamped = match condition {
            FlowCondition::Stall => self.phi_stall,
            FlowCondition::Choke => self.phi_choke,
            FlowCondition::Normal => phi,
        };
        // points is never empty after construction
        let value = interpolate_clamped(&self.points, clamped).unwrap_or(f64::NAN);
        CurveLookup {
            value,
            phi: clamped,
            condition,
        }
    }

    /// Clamped value at φ, ignoring the condition flag.
    pub fn value_at(&self, phi: f64) -> f64 {
        self.lookup(phi).value
    }

    /// New curve with every value replaced by `f(φ, value)`; bounds unchanged.
    pub fn map_values<F>(&self, mut f: F) -> StageResult<Self>
    where
        F: FnMut(f64, f64) -> f64,
    {
        let points = self
            .points
            .iter()
            .map(|&(phi, value)| (phi, f(phi, value)))
            .collect();
        Self::new(self.kind, points, self.phi_stall, self.phi_choke)
    }

    /// New curve with `delta(φ)` added to every value.
    pub fn shifted<F>(&self, mut delta: F) -> StageResult<Self>
    where
        F: FnMut(f64) -> f64,
    {
        self.map_values(|phi, value| value + delta(phi))
    }

    /// φ of the largest sampled value.
    #[cfg(test)]
    pub(crate) fn peak(&self) -> (f64, f64) {
        self.points
            .iter()
            .copied()
            .fold((f64::NAN, f64::NEG_INFINITY), |best, p| {
                if p.1 > best.1 { p } else { best }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn psi() -> StageCurve {
        StageCurve::new(
            CurveKind::PressureCoefficient,
            vec![(0.30, 0.55), (0.40, 0.50), (0.50, 0.40), (0.60, 0.25)],
            0.32,
            0.55,
        )
        .unwrap()
    }

    #[test]
    fn interpolates_inside_bounds() {
        let c = psi();
        let l = c.lookup(0.45);
        assert_eq!(l.condition, FlowCondition::Normal);
        assert!((l.value - 0.45).abs() < 1e-12);
        assert_eq!(l.phi, 0.45);
    }

    #[test]
    fn clamps_and_flags_outside_bounds() {
        let c = psi();
        let stall = c.lookup(0.1);
        assert_eq!(stall.condition, FlowCondition::Stall);
        assert_eq!(stall.phi, 0.32);
        assert!((stall.value - c.value_at(0.32)).abs() < 1e-12);

        let choke = c.lookup(0.9);
        assert_eq!(choke.condition, FlowCondition::Choke);
        assert_eq!(choke.phi, 0.55);
        assert!((choke.value - 0.325).abs() < 1e-12);
    }

    #[test]
    fn bounds_are_inclusive() {
        let c = psi();
        assert_eq!(c.condition(0.32), FlowCondition::Normal);
        assert_eq!(c.condition(0.55), FlowCondition::Normal);
    }

    #[test]
    fn rejects_bad_tables() {
        let k = CurveKind::Efficiency;
        assert!(StageCurve::from_points(k, vec![(0.3, 0.8), (0.4, 0.9)]).is_err());
        assert!(StageCurve::from_points(k, vec![(0.3, 0.8), (0.3, 0.9), (0.5, 0.8)]).is_err());
        assert!(StageCurve::from_points(k, vec![(0.4, 0.8), (0.3, 0.9), (0.5, 0.8)]).is_err());
        assert!(StageCurve::from_points(k, vec![(0.3, f64::NAN), (0.4, 0.9), (0.5, 0.8)]).is_err());
        assert!(StageCurve::from_points(k, vec![]).is_err());
        let pts = vec![(0.3, 0.8), (0.4, 0.9), (0.5, 0.8)];
        assert!(StageCurve::new(k, pts.clone(), 0.45, 0.35).is_err());
        assert!(StageCurve::new(k, pts, 0.2, 0.5).is_err());
    }

    #[test]
    fn shifted_returns_new_curve() {
        let c = psi();
        let s = c.shifted(|phi| phi).unwrap();
        assert!((s.value_at(0.40) - 0.90).abs() < 1e-12);
        // original untouched
        assert!((c.value_at(0.40) - 0.50).abs() < 1e-12);
        assert_eq!(s.phi_stall(), c.phi_stall());
    }

    #[test]
    fn sample_on_grid() {
        let grid = [0.3, 0.4, 0.5, 0.6];
        let c = StageCurve::sample(CurveKind::Efficiency, &grid, |phi| Ok(1.0 - phi)).unwrap();
        assert_eq!(c.points().len(), 4);
        assert_eq!(c.phi_stall(), 0.3);
        assert_eq!(c.phi_choke(), 0.6);
        let (phi, value) = c.peak();
        assert_eq!(phi, 0.3);
        assert!((value - 0.7).abs() < 1e-12);
    }
}

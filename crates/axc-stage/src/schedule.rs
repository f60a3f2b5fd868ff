//! Stage quantities scheduled against shaft speed.

use crate::error::{StageError, StageResult};
use axc_core::numeric::interpolate_clamped;

/// Values given at percent of design speed; linear in between, clamped outside.
///
/// An empty schedule has no value at any speed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpeedSchedule {
    points: Vec<(f64, f64)>,
}

impl SpeedSchedule {
    /// # Errors
    /// Non-finite entries, negative speeds, or speeds that do not increase.
    pub fn new(points: Vec<(f64, f64)>) -> StageResult<Self> {
        let invalid = |what: String| StageError::InvalidCurve {
            what: format!("speed schedule: {what}"),
        };
        if let Some((pct, value)) = points
            .iter()
            .find(|(pct, value)| !pct.is_finite() || !value.is_finite() || *pct < 0.0)
        {
            return Err(invalid(format!("bad entry {pct}:{value}")));
        }
        if let Some(w) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(invalid(format!("speeds must increase ({} then {})", w[0].0, w[1].0)));
        }
        Ok(Self { points })
    }

    /// The same value at every speed.
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![(100.0, value)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn at(&self, percent_speed: f64) -> Option<f64> {
        interpolate_clamped(&self.points, percent_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_speed_lines() {
        let s = SpeedSchedule::new(vec![(50.0, 0.04), (100.0, 0.0)]).unwrap();
        assert!((s.at(75.0).unwrap() - 0.02).abs() < 1e-12);
        assert_eq!(s.at(30.0), Some(0.04));
        assert_eq!(s.at(110.0), Some(0.0));
    }

    #[test]
    fn constant_and_empty() {
        assert_eq!(SpeedSchedule::constant(0.02).at(63.0), Some(0.02));
        assert_eq!(SpeedSchedule::default().at(100.0), None);
        assert!(SpeedSchedule::default().is_empty());
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(SpeedSchedule::new(vec![(90.0, 0.0), (80.0, 0.0)]).is_err());
        assert!(SpeedSchedule::new(vec![(-10.0, 0.0)]).is_err());
        assert!(SpeedSchedule::new(vec![(100.0, f64::NAN)]).is_err());
        assert!(SpeedSchedule::new(vec![(0.0, 0.1), (100.0, 0.0)]).is_ok());
    }
}

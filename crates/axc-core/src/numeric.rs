use crate::AxcError;

/// Floating point type of every solver quantity
pub type Real = f64;

/// Absolute + relative tolerance pair
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// |a − b| within the absolute tolerance, or within the relative one of the larger magnitude.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, AxcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AxcError::NonFinite { what, value: v })
    }
}

/// Linear interpolation in a table sorted by `x`, clamped at both ends.
///
/// Returns `None` for an empty table.
pub fn interpolate_clamped(table: &[(Real, Real)], x: Real) -> Option<Real> {
    let (first, last) = (table.first()?, table.last()?);
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }
    table.windows(2).find_map(|w| {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if x >= x0 && x <= x1 {
            let span = x1 - x0;
            if span <= 0.0 {
                Some(y1)
            } else {
                Some(y0 + (y1 - y0) * (x - x0) / span)
            }
        } else {
            None
        }
    })
}

/// `n` evenly spaced points from `start` to `end`, endpoints exact.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    if n <= 1 {
        return vec![start];
    }
    let delta = (end - start) / (n - 1) as Real;
    let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * delta).collect();
    points[n - 1] = end;
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn interpolation_clamps_and_blends() {
        let table = [(50.0, 0.9), (100.0, 1.0)];
        assert_eq!(interpolate_clamped(&table, 10.0), Some(0.9));
        assert_eq!(interpolate_clamped(&table, 120.0), Some(1.0));
        let mid = interpolate_clamped(&table, 75.0).unwrap();
        assert!((mid - 0.95).abs() < 1e-12);
        assert_eq!(interpolate_clamped(&[], 1.0), None);
    }

    #[test]
    fn linspace_hits_endpoints() {
        let pts = linspace(0.3, 0.5, 5);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], 0.3);
        assert_eq!(pts[4], 0.5);
        assert!((pts[2] - 0.4).abs() < 1e-12);
    }
}

//! Safeguarded secant iteration for one-dimensional residuals.

use crate::error::MeanlineResult;
use axc_config::SolverSettings;

/// Maximum number of damped step reductions per iteration.
const MAX_BACKTRACKS: usize = 8;

/// Root iteration configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootConfig {
    /// Maximum iterations
    pub max_iters: usize,
    /// Convergence threshold on the absolute (already normalized) residual
    pub tolerance: f64,
    /// Step backtracking factor
    pub damping: f64,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            tolerance: 1e-5,
            damping: 0.5,
        }
    }
}

impl From<&SolverSettings> for RootConfig {
    fn from(s: &SolverSettings) -> Self {
        Self {
            max_iters: s.max_iters,
            tolerance: s.convergence_tolerance,
            damping: s.numerical_damping,
        }
    }
}

/// Outcome of a root iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootOutcome {
    /// Last iterate
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Find a root of `f` inside a sign-changing bracket `[lo, hi]`.
///
/// Each iteration takes a secant step from the two latest iterates. A step that leaves the
/// bracket is replaced by bisection; a step that does not reduce |f| is shortened by
/// `damping` up to a few times before falling back to bisection. The bracket is kept
/// around the root throughout, so the iteration can not wander onto another branch.
///
/// Returns the last iterate with `converged = false` when `max_iters` is exhausted.
pub fn solve_bracketed<F>(
    mut f: F,
    lo: (f64, f64),
    hi: (f64, f64),
    config: &RootConfig,
) -> MeanlineResult<RootOutcome>
where
    F: FnMut(f64) -> MeanlineResult<f64>,
{
    let (mut a, mut fa) = lo;
    let (mut b, fb) = hi;

    // Start from the end with the smaller residual
    let (mut x0, mut f0, mut x1, mut f1) = if fa.abs() < fb.abs() {
        (b, fb, a, fa)
    } else {
        (a, fa, b, fb)
    };

    let mut iterations = 0;
    for iter in 0..config.max_iters {
        iterations = iter + 1;
        if f1.abs() < config.tolerance {
            return Ok(RootOutcome {
                x: x1,
                residual: f1,
                iterations: iter,
                converged: true,
            });
        }

        let midpoint = 0.5 * (a + b);
        let secant = if f1 != f0 {
            x1 - f1 * (x1 - x0) / (f1 - f0)
        } else {
            midpoint
        };
        let inside = |x: f64| x.is_finite() && x > a.min(b) && x < a.max(b);

        let mut candidate = if inside(secant) { secant } else { midpoint };
        let mut f_candidate = f(candidate)?;

        if candidate != midpoint {
            let step = candidate - x1;
            let mut scale = 1.0;
            let mut backtracks = 0;
            while f_candidate.abs() >= f1.abs() && backtracks < MAX_BACKTRACKS {
                scale *= config.damping;
                candidate = x1 + scale * step;
                f_candidate = f(candidate)?;
                backtracks += 1;
            }
            if f_candidate.abs() >= f1.abs() {
                candidate = midpoint;
                f_candidate = f(candidate)?;
            }
        }

        // Keep the bracket around the sign change
        if (f_candidate < 0.0) == (fa < 0.0) {
            a = candidate;
            fa = f_candidate;
        } else {
            b = candidate;
        }

        x0 = x1;
        f0 = f1;
        x1 = candidate;
        f1 = f_candidate;

        if (b - a).abs() <= f64::EPSILON * a.abs().max(b.abs()) {
            break;
        }
    }

    Ok(RootOutcome {
        x: x1,
        residual: f1,
        iterations,
        converged: f1.abs() < config.tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket<F: FnMut(f64) -> MeanlineResult<f64>>(
        mut f: F,
        lo: f64,
        hi: f64,
        config: &RootConfig,
    ) -> RootOutcome {
        let flo = f(lo).unwrap();
        let fhi = f(hi).unwrap();
        solve_bracketed(f, (lo, flo), (hi, fhi), config).unwrap()
    }

    #[test]
    fn simple_quadratic() {
        // x^2 - 4 = 0, x > 0
        let out = bracket(|x| Ok(x * x - 4.0), 0.0, 5.0, &RootConfig::default());
        assert!(out.converged);
        assert!((out.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn stays_in_bracket_on_flat_residual() {
        // Secant steps from the flat tail shoot far outside the bracket
        let f = |x: f64| Ok((x - 1.0).tanh());
        let out = bracket(f, -20.0, 3.0, &RootConfig::default());
        assert!(out.converged);
        assert!((out.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn reports_exhaustion() {
        let config = RootConfig {
            max_iters: 2,
            tolerance: 1e-14,
            damping: 0.5,
        };
        let out = bracket(|x| Ok(x.powi(3) - 2.0), 0.0, 10.0, &config);
        assert!(!out.converged);
        assert_eq!(out.iterations, 2);
        assert!(out.x > 0.0 && out.x < 10.0);
    }

    #[test]
    fn residual_errors_propagate() {
        use crate::error::MeanlineError;
        let f = |x: f64| {
            if x > 0.25 {
                Err(MeanlineError::ConvergenceFailure {
                    what: "probe".into(),
                })
            } else {
                Ok(x - 0.5)
            }
        };
        let r = solve_bracketed(f, (0.0, -0.5), (2.0, 1.5), &RootConfig::default());
        assert!(r.is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn finds_cube_roots(r in 0.1f64..10.0) {
            let f = |x: f64| Ok(x * x * x - r * r * r);
            let out = solve_bracketed(f, (0.0, -r * r * r), (20.0, 8000.0 - r * r * r), &RootConfig {
                max_iters: 200,
                tolerance: 1e-9,
                damping: 0.5,
            })
            .unwrap();
            prop_assert!(out.converged);
            prop_assert!((out.x - r).abs() < 1e-6);
        }
    }
}

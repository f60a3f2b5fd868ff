//! Dimensionless stage coefficients.
//!
//! `exponent` arguments are the isentropic exponent (γ − 1)/γ evaluated at the stage
//! inlet total temperature.

use crate::common::check_positive;
use crate::error::{StageError, StageResult};

/// Pressure coefficient ψ = cp·T01·(PR^x − 1)/U1².
pub fn pressure_coefficient(cp: f64, t01: f64, pressure_ratio: f64, exponent: f64, u1: f64) -> f64 {
    cp * t01 * (pressure_ratio.powf(exponent) - 1.0) / (u1 * u1)
}

/// Inverse of [`pressure_coefficient`].
///
/// # Errors
/// `NonPhysical` when ψ is so negative that the pressure ratio would not be positive.
pub fn pressure_ratio_from_coefficient(
    psi: f64,
    cp: f64,
    t01: f64,
    exponent: f64,
    u1: f64,
) -> StageResult<f64> {
    check_positive(cp * t01, "cp·T01")?;
    check_positive(exponent, "isentropic exponent")?;
    let base = 1.0 + psi * u1 * u1 / (cp * t01);
    check_positive(base, "isentropic temperature ratio")?;
    Ok(base.powf(1.0 / exponent))
}

/// Total temperature rise ΔT0 = T01·(PR^x − 1)/η.
pub fn temperature_rise_from_efficiency(
    t01: f64,
    pressure_ratio: f64,
    exponent: f64,
    efficiency: f64,
) -> StageResult<f64> {
    if !(efficiency > 0.0 && efficiency.is_finite()) {
        return Err(StageError::NonPhysical {
            what: "adiabatic efficiency",
        });
    }
    check_positive(pressure_ratio, "pressure ratio")?;
    Ok(t01 * (pressure_ratio.powf(exponent) - 1.0) / efficiency)
}

/// Adiabatic efficiency (PR^x − 1)/(TR − 1).
///
/// `None` without a temperature rise: a stage that did no work has no efficiency.
pub fn efficiency_from_ratios(
    pressure_ratio: f64,
    temperature_ratio: f64,
    exponent: f64,
) -> Option<f64> {
    let actual = temperature_ratio - 1.0;
    if actual.abs() < f64::EPSILON {
        return None;
    }
    Some((pressure_ratio.powf(exponent) - 1.0) / actual)
}

/// Lieblein diffusion factor D = 1 − W2/W1 + |W_θ1 − W_θ2|/(2σW1).
pub fn diffusion_factor(w1: f64, w2: f64, w_theta1: f64, w_theta2: f64, solidity: f64) -> f64 {
    1.0 - w2 / w1 + (w_theta1 - w_theta2).abs() / (2.0 * solidity * w1)
}

/// Flow coefficient at which the relative inlet flow meets a blade with metal angle
/// `kappa1` head-on, given an absolute inlet angle `alpha1` (both radians).
pub fn zero_incidence_flow_coefficient(kappa1: f64, alpha1: f64) -> StageResult<f64> {
    let denom = kappa1.tan() + alpha1.tan();
    check_positive(denom, "tan κ1 + tan α1")?;
    Ok(1.0 / denom)
}

//! One-dimensional compressible-flow relations with temperature-dependent properties.
//!
//! Properties inside a total-to-static or work relation are evaluated at the mean of the
//! two end temperatures and refined by fixed-point passes.

use crate::error::{GasError, GasResult};
use crate::model::GasModel;
use crate::state::GasState;
use axc_core::units::{Pressure, Temperature, k, pa};

const MEAN_TEMPERATURE_PASSES: usize = 3;
const RISE_MAX_PASSES: usize = 50;
const RISE_TOL_K: f64 = 1e-10;

/// Static state for a stream with total conditions (t0, p0) moving at `speed` [m/s].
///
/// # Errors
/// `InvalidPhysicalState` when the kinetic energy exceeds the total enthalpy.
pub fn static_state(
    gas: &dyn GasModel,
    t0: Temperature,
    p0: Pressure,
    speed: f64,
) -> GasResult<GasState> {
    let t0_val = t0.value;
    let dyn_h = 0.5 * speed * speed;
    let mut t = t0_val - dyn_h / gas.cp(t0)?;
    for _ in 0..MEAN_TEMPERATURE_PASSES {
        if !t.is_finite() || t <= 0.0 {
            break;
        }
        t = t0_val - dyn_h / gas.cp(k(0.5 * (t0_val + t)))?;
    }
    if !t.is_finite() || t <= 0.0 {
        return Err(GasError::InvalidPhysicalState {
            what: "static temperature",
            value: t,
        });
    }

    let mean = gas.properties(k(0.5 * (t0_val + t)))?;
    let p = p0.value * (t / t0_val).powf(1.0 / mean.exponent());
    GasState::from_model(gas, k(t), pa(p))
}

/// Total temperature rise [K] produced by specific work `work` [J/kg] from `t01`.
pub fn total_temperature_rise(gas: &dyn GasModel, t01: Temperature, work: f64) -> GasResult<f64> {
    let t01_val = t01.value;
    let mut dt = work / gas.cp(t01)?;
    for _ in 0..RISE_MAX_PASSES {
        let t_mean = t01_val + 0.5 * dt;
        if !t_mean.is_finite() || t_mean <= 0.0 {
            return Err(GasError::InvalidPhysicalState {
                what: "mean total temperature",
                value: t_mean,
            });
        }
        let next = work / gas.cp(k(t_mean))?;
        let done = (next - dt).abs() < RISE_TOL_K;
        dt = next;
        if done {
            break;
        }
    }
    Ok(dt)
}

/// Specific work [J/kg] needed for a total temperature rise `dt0` from `t01`.
///
/// Inverse of [`total_temperature_rise`].
pub fn work_for_rise(gas: &dyn GasModel, t01: Temperature, dt0: f64) -> GasResult<f64> {
    Ok(gas.cp(k(t01.value + 0.5 * dt0))? * dt0)
}

/// Isentropic exponent (γ − 1)/γ at temperature `t`.
pub fn isentropic_exponent(gas: &dyn GasModel, t: Temperature) -> GasResult<f64> {
    Ok(gas.properties(t)?.exponent())
}

/// Speed at which a stream with total temperature `t0` becomes sonic [m/s].
pub fn critical_speed(gas: &dyn GasModel, t0: Temperature) -> GasResult<f64> {
    let props = gas.properties(t0)?;
    Ok((2.0 * props.gamma * props.r * t0.value / (props.gamma + 1.0)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PolynomialGas;

    fn perfect() -> PolynomialGas {
        PolynomialGas::calorically_perfect(1.4, 287.0).unwrap()
    }

    #[test]
    fn static_state_matches_isentropic_relations() {
        let gas = perfect();
        // M = 0.5 at T0 = 288.15 K
        let t: f64 = 288.15 / 1.05;
        let c = 0.5 * (1.4 * 287.0 * t).sqrt();
        let state = static_state(&gas, k(288.15), pa(101_325.0), c).unwrap();
        assert!((state.static_temperature().value - t).abs() < 1e-9);
        let p_expected = 101_325.0 / 1.05_f64.powf(3.5);
        assert!((state.static_pressure().value - p_expected).abs() < 1e-6);
    }

    #[test]
    fn static_state_rejects_excess_speed() {
        let gas = perfect();
        let result = static_state(&gas, k(300.0), pa(101_325.0), 2_000.0);
        assert!(matches!(
            result,
            Err(GasError::InvalidPhysicalState { .. })
        ));
    }

    #[test]
    fn rise_and_work_are_inverse() {
        let air = PolynomialGas::air();
        let t01 = k(320.0);
        let dt = total_temperature_rise(&air, t01, 45_000.0).unwrap();
        let work = work_for_rise(&air, t01, dt).unwrap();
        assert!((work - 45_000.0).abs() < 1e-4);
    }

    #[test]
    fn critical_speed_perfect_gas() {
        let gas = perfect();
        let a_star = critical_speed(&gas, k(288.15)).unwrap();
        let expected = (2.0 * 1.4 * 287.0 * 288.15 / 2.4_f64).sqrt();
        assert!((a_star - expected).abs() < 1e-9);
    }
}

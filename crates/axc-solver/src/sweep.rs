//! Velocity-triangle model of a rotor at fixed blade setting.
//!
//! For a flow coefficient and shaft speed the inlet triangle follows from the fixed inlet
//! angle, the exit relative angle from the blade exit angle (plus the deviation
//! correction), and the exit axial velocity from continuity. The resulting work gives the
//! pressure coefficient the blade row would produce.

use crate::continuity::{Continuity, solve_with};
use crate::error::{MeanlineError, MeanlineResult};
use crate::root::RootConfig;
use axc_core::units::{k, pa};
use tracing::warn;
use axc_gas::{GasModel, critical_speed, isentropic_exponent, total_temperature_rise};
use axc_stage::{
    BladeAngles, DeviationModel, FlowStation, Stage, StageCurve, StageGeometry, TotalConditions,
    pressure_coefficient,
};

/// Upper scan limit for exit continuity, relative to the inlet critical speed.
const EXIT_SCAN_FACTOR: f64 = 1.5;

/// Everything about a rotor that the triangle model holds fixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotorSetting {
    pub geometry: StageGeometry,
    pub blades: BladeAngles,
    /// Absolute inlet flow angle [rad]
    pub inlet_flow_angle: f64,
    pub deviation: DeviationModel,
    pub reference_inlet: TotalConditions,
}

impl From<&Stage> for RotorSetting {
    fn from(stage: &Stage) -> Self {
        Self {
            geometry: stage.geometry,
            blades: stage.blades,
            inlet_flow_angle: stage.inlet_flow_angle,
            deviation: stage.deviation,
            reference_inlet: stage.reference_inlet,
        }
    }
}

/// Pressure coefficient of `rotor` at flow coefficient `phi` and shaft speed `omega`
/// [rad/s], with the stage efficiency taken from `efficiency`.
///
/// # Errors
/// Non-physical triangles, or an exit annulus that chokes or does not converge.
pub fn psi_model(
    gas: &dyn GasModel,
    rotor: &RotorSetting,
    phi: f64,
    omega: f64,
    efficiency: &StageCurve,
    root: &RootConfig,
) -> MeanlineResult<f64> {
    let (u1, u2) = rotor.geometry.blade_speeds(omega);
    let totals = rotor.reference_inlet;
    let t01 = totals.t0.value;

    let inlet = FlowStation::from_flow_angle(gas, totals, phi * u1, rotor.inlet_flow_angle, u1)?;
    let incidence = DeviationModel::incidence(inlet.relative_flow_angle, rotor.blades.kappa1);
    let beta2 = rotor.deviation.exit_angle(rotor.blades.kappa2, incidence);

    let mass_flow = inlet.mass_flux() * rotor.geometry.inlet.area().value;
    let eta = efficiency.value_at(phi);
    let x = isentropic_exponent(gas, totals.t0)?;
    let c_theta1 = inlet.tangential_velocity;

    let exit_at = |c_x2: f64| -> MeanlineResult<FlowStation> {
        let c_theta2 = u2 - c_x2 * beta2.tan();
        let work = u2 * c_theta2 - u1 * c_theta1;
        let dt0 = total_temperature_rise(gas, totals.t0, work)?;
        let base = 1.0 + eta * dt0 / t01;
        if base <= 0.0 {
            return Err(MeanlineError::ConvergenceFailure {
                what: format!("non-physical work {work:.1} J/kg at φ = {phi:.4}"),
            });
        }
        let exit_totals =
            TotalConditions::new(k(t01 + dt0), pa(totals.p0.value * base.powf(1.0 / x)))?;
        Ok(FlowStation::from_components(gas, exit_totals, c_x2, c_theta2, u2)?)
    };

    let c_max = EXIT_SCAN_FACTOR * critical_speed(gas, totals.t0)?;
    let outlet = match solve_with(mass_flow, rotor.geometry.outlet.area().value, c_max, exit_at, root)? {
        Continuity::Solved { station, .. } => station,
        Continuity::NotConverged { iterations, .. } => {
            return Err(MeanlineError::ConvergenceFailure {
                what: format!("exit continuity at φ = {phi:.4} after {iterations} iterations"),
            });
        }
        Continuity::Choked { .. } => {
            return Err(MeanlineError::ConvergenceFailure {
                what: format!("exit annulus chokes at φ = {phi:.4}"),
            });
        }
    };

    let pr = outlet.total_pressure.value / totals.p0.value;
    Ok(pressure_coefficient(gas.cp(totals.t0)?, t01, pr, x, u1))
}

/// Change in modelled ψ between two rotor operating states, at every φ of `curve`.
///
/// Samples where the model fails in either state are dropped; the result is ready for
/// `interpolate_clamped`.
///
/// # Errors
/// When every sample fails.
pub fn psi_shift(
    gas: &dyn GasModel,
    curve: &StageCurve,
    from: (&RotorSetting, f64),
    to: (&RotorSetting, f64),
    efficiency: &StageCurve,
    root: &RootConfig,
) -> MeanlineResult<Vec<(f64, f64)>> {
    let deltas: Vec<(f64, f64)> = curve
        .points()
        .iter()
        .filter_map(|&(phi, _)| {
            let base = psi_model(gas, from.0, phi, from.1, efficiency, root);
            let moved = psi_model(gas, to.0, phi, to.1, efficiency, root);
            match (moved, base) {
                (Ok(a), Ok(b)) => Some((phi, a - b)),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(phi, error = %e, "pressure coefficient shift sample dropped");
                    None
                }
            }
        })
        .collect();
    if deltas.is_empty() {
        return Err(MeanlineError::ConvergenceFailure {
            what: "no pressure coefficient shift sample solved".to_string(),
        });
    }
    Ok(deltas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axc_core::numeric::linspace;
    use axc_core::units::m;
    use axc_gas::PolynomialGas;
    use axc_stage::{Annulus, CurveKind};

    fn rotor() -> RotorSetting {
        let ring = Annulus::new(m(0.5), m(0.3)).unwrap();
        RotorSetting {
            geometry: StageGeometry::new(ring, ring, 1.0).unwrap(),
            blades: BladeAngles {
                kappa1: 68f64.to_radians(),
                kappa2: 60f64.to_radians(),
            },
            inlet_flow_angle: 0.0,
            deviation: DeviationModel::default(),
            reference_inlet: TotalConditions::new(k(288.15), pa(101_325.0)).unwrap(),
        }
    }

    fn flat_efficiency() -> StageCurve {
        let grid = linspace(0.2, 0.8, 7);
        StageCurve::sample(CurveKind::Efficiency, &grid, |_| Ok(0.88)).unwrap()
    }

    #[test]
    fn pressure_coefficient_falls_with_flow() {
        let gas = PolynomialGas::calorically_perfect(1.4, 287.0).unwrap();
        let eta = flat_efficiency();
        let root = RootConfig::default();
        let omega = 1000.0;
        let low = psi_model(&gas, &rotor(), 0.35, omega, &eta, &root).unwrap();
        let high = psi_model(&gas, &rotor(), 0.45, omega, &eta, &root).unwrap();
        assert!(low > high, "ψ(0.35) = {low}, ψ(0.45) = {high}");
        assert!(low > 0.0);
    }

    #[test]
    fn deviation_correction_changes_off_design_work() {
        let gas = PolynomialGas::calorically_perfect(1.4, 287.0).unwrap();
        let eta = flat_efficiency();
        let root = RootConfig::default();
        let mut corrected = rotor();
        corrected.deviation = DeviationModel::new(0.3);
        let a = psi_model(&gas, &rotor(), 0.35, 1000.0, &eta, &root).unwrap();
        let b = psi_model(&gas, &corrected, 0.35, 1000.0, &eta, &root).unwrap();
        assert!((a - b).abs() > 1e-6);
    }
}

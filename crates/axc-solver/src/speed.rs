//! Characteristics at shaft speeds other than design.

use crate::error::{MeanlineError, MeanlineResult};
use crate::root::RootConfig;
use crate::sweep::{RotorSetting, psi_shift};
use axc_core::numeric::{Tolerances, interpolate_clamped, nearly_equal};
use axc_gas::GasModel;
use axc_stage::{Stage, StageCharacteristics};
use tracing::debug;

/// Efficiency multiplier at `percent_speed` from a `pct_speed:ratio` table; 1 when empty.
pub fn efficiency_ratio(table: &[(f64, f64)], percent_speed: f64) -> f64 {
    interpolate_clamped(table, percent_speed).unwrap_or(1.0)
}

/// Characteristics of `stage` at shaft speed `omega` [rad/s].
///
/// The pressure-coefficient curve is shifted by the stage's ψ-shift schedule when it has
/// one. Otherwise the shift is the change the velocity-triangle model predicts between
/// design speed and `omega`; samples where the model fails at either speed take the shift
/// interpolated from their neighbours. The efficiency curve is scaled by `ratio`. Curve
/// bounds are unchanged.
pub fn at_speed(
    gas: &dyn GasModel,
    stage: &Stage,
    omega: f64,
    omega_design: f64,
    ratio: f64,
    root: &RootConfig,
) -> MeanlineResult<StageCharacteristics> {
    let design = &stage.characteristics;
    let tol = Tolerances::default();
    if nearly_equal(omega, omega_design, tol) && nearly_equal(ratio, 1.0, tol) {
        return Ok(design.clone());
    }

    let percent_speed = 100.0 * omega / omega_design;
    let pressure_coefficient = match stage.psi_shift.at(percent_speed) {
        Some(shift) => {
            debug!(stage = stage.index, percent_speed, shift, ratio, "speed curves from schedule");
            design.pressure_coefficient.shifted(|_| shift)?
        }
        None => {
            let rotor = RotorSetting::from(stage);
            let deltas = psi_shift(
                gas,
                &design.pressure_coefficient,
                (&rotor, omega_design),
                (&rotor, omega),
                &design.efficiency,
                root,
            )
            .map_err(|e| MeanlineError::ConvergenceFailure {
                what: format!("stage {} at {omega:.1} rad/s: {e}", stage.index),
            })?;
            debug!(stage = stage.index, omega, samples = deltas.len(), ratio, "speed curves built");
            design
                .pressure_coefficient
                .shifted(|phi| interpolate_clamped(&deltas, phi).unwrap_or(0.0))?
        }
    };
    let efficiency = design.efficiency.map_values(|_, eta| eta * ratio)?;
    Ok(StageCharacteristics {
        efficiency,
        pressure_coefficient,
        source: design.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_defaults_to_one() {
        assert_eq!(efficiency_ratio(&[], 80.0), 1.0);
    }

    #[test]
    fn ratio_interpolates_and_clamps() {
        let table = [(80.0, 0.95), (100.0, 1.0)];
        assert!((efficiency_ratio(&table, 90.0) - 0.975).abs() < 1e-12);
        assert_eq!(efficiency_ratio(&table, 60.0), 0.95);
        assert_eq!(efficiency_ratio(&table, 110.0), 1.0);
    }
}

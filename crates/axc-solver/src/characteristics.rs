//! Characteristic curves of each stage at design speed.
//!
//! Design-point stages get a two-parabola efficiency curve around (φ_design, η_peak) and a
//! pressure-coefficient curve from the velocity-triangle model of the rotor. Tabulated
//! stages use their tables as given.

use crate::design::StageDesign;
use crate::error::{MeanlineError, MeanlineResult};
use crate::root::RootConfig;
use crate::sweep::{RotorSetting, psi_model};
use axc_config::{CompressorConfig, StageDesignInput};
use axc_core::numeric::linspace;
use axc_gas::GasModel;
use axc_stage::curve::MIN_CURVE_POINTS;
use axc_stage::{
    CurveKind, CurveSource, ParabolicEfficiency, Stage, StageCharacteristics, StageCurve,
};
use tracing::warn;

/// Curve synthesis inputs shared by every stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSettings {
    pub points: usize,
    /// Half-width of the φ window relative to φ_design
    pub range: f64,
    pub stall_efficiency_ratio: f64,
    pub choke_efficiency_ratio: f64,
}

impl From<&CompressorConfig> for CurveSettings {
    fn from(config: &CompressorConfig) -> Self {
        Self {
            points: config.solver.curve_points,
            range: config.characteristics.flow_coefficient_range,
            stall_efficiency_ratio: config.characteristics.stall_efficiency_ratio,
            choke_efficiency_ratio: config.characteristics.choke_efficiency_ratio,
        }
    }
}

/// ψ from the triangle model at each φ of `grid`; failed samples are dropped.
pub fn sample_psi(
    gas: &dyn GasModel,
    rotor: &RotorSetting,
    grid: &[f64],
    omega: f64,
    efficiency: &StageCurve,
    root: &RootConfig,
) -> Vec<(f64, f64)> {
    grid.iter()
        .filter_map(|&phi| match psi_model(gas, rotor, phi, omega, efficiency, root) {
            Ok(psi) => Some((phi, psi)),
            Err(e) => {
                warn!(phi, error = %e, "pressure coefficient sample dropped");
                None
            }
        })
        .collect()
}

/// Synthesize both curves for a rotor designed at (`phi_design`, `peak_efficiency`).
pub fn synthesize(
    gas: &dyn GasModel,
    rotor: &RotorSetting,
    phi_design: f64,
    peak_efficiency: f64,
    omega: f64,
    settings: &CurveSettings,
    root: &RootConfig,
) -> MeanlineResult<StageCharacteristics> {
    let parabola = ParabolicEfficiency::fit(
        phi_design * (1.0 - settings.range),
        phi_design,
        phi_design * (1.0 + settings.range),
        peak_efficiency,
        settings.stall_efficiency_ratio,
        settings.choke_efficiency_ratio,
    )?;
    let efficiency = parabola.sample(settings.points)?;
    let grid = linspace(parabola.phi_stall, parabola.phi_choke, settings.points);
    let samples = sample_psi(gas, rotor, &grid, omega, &efficiency, root);
    if samples.len() < MIN_CURVE_POINTS {
        return Err(MeanlineError::ConvergenceFailure {
            what: format!(
                "only {} of {} pressure coefficient samples converged",
                samples.len(),
                grid.len()
            ),
        });
    }
    Ok(StageCharacteristics {
        efficiency,
        pressure_coefficient: StageCurve::from_points(CurveKind::PressureCoefficient, samples)?,
        source: CurveSource::DesignPoint {
            efficiency: parabola,
        },
    })
}

/// Curves straight from (φ, ψ) and (φ, η) tables.
pub fn tabulated(
    pressure_coefficient: &[(f64, f64)],
    efficiency: &[(f64, f64)],
) -> MeanlineResult<StageCharacteristics> {
    Ok(StageCharacteristics {
        efficiency: StageCurve::from_points(CurveKind::Efficiency, efficiency.to_vec())?,
        pressure_coefficient: StageCurve::from_points(
            CurveKind::PressureCoefficient,
            pressure_coefficient.to_vec(),
        )?,
        source: CurveSource::Tabulated,
    })
}

/// Attach characteristics to a design solution.
pub fn build_stage(
    gas: &dyn GasModel,
    design: StageDesign,
    input: &StageDesignInput,
    omega: f64,
    settings: &CurveSettings,
    root: &RootConfig,
) -> MeanlineResult<Stage> {
    let rotor = RotorSetting {
        geometry: design.geometry,
        blades: design.blades,
        inlet_flow_angle: design.inlet_flow_angle,
        deviation: design.deviation,
        reference_inlet: design.reference_inlet,
    };
    let characteristics = match input {
        StageDesignInput::DesignPoint { .. } => synthesize(
            gas,
            &rotor,
            design.performance.flow_coefficient,
            design.performance.efficiency,
            omega,
            settings,
            root,
        )
        .map_err(|e| MeanlineError::DesignPointFailed {
            stage: design.index,
            what: format!("curve synthesis: {e}"),
        })?,
        StageDesignInput::Characteristics {
            pressure_coefficient,
            efficiency,
        } => tabulated(pressure_coefficient, efficiency)?,
    };

    Ok(Stage {
        index: design.index,
        geometry: design.geometry,
        blades: design.blades,
        inlet_flow_angle: design.inlet_flow_angle,
        bleed: design.bleed,
        psi_shift: design.psi_shift,
        deviation: design.deviation,
        reference_inlet: design.reference_inlet,
        design: design.performance,
        design_inlet: design.inlet,
        design_outlet: design.outlet,
        characteristics,
    })
}

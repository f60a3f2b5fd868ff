//! Design-point reference solve: velocity triangles and blade angles per stage.

use crate::continuity::{Continuity, Swirl, solve_axial_velocity};
use crate::error::{MeanlineError, MeanlineResult};
use crate::root::RootConfig;
use axc_config::{CompressorConfig, StageConfig, StageDesignInput, WorkTarget};
use axc_core::units::{AngularVelocity, k, pa, to_rad, to_rad_per_s};
use axc_gas::{GasModel, isentropic_exponent, static_state, work_for_rise};
use axc_stage::{
    Annulus, BladeAngles, CurveKind, DesignPerformance, DeviationModel, FlowStation, SpeedSchedule,
    StageCurve, StageGeometry, TotalConditions, diffusion_factor, pressure_coefficient,
    pressure_ratio_from_coefficient, temperature_rise_from_efficiency,
};
use tracing::{debug, warn};

/// Fixed-point passes for the velocity at a given Mach number.
const MACH_PASSES: usize = 6;

/// Design solution of one stage, before its characteristics are built.
#[derive(Clone, Debug, PartialEq)]
pub struct StageDesign {
    pub index: usize,
    pub geometry: StageGeometry,
    pub blades: BladeAngles,
    pub inlet_flow_angle: f64,
    pub bleed: SpeedSchedule,
    pub psi_shift: SpeedSchedule,
    pub deviation: DeviationModel,
    pub reference_inlet: TotalConditions,
    /// Mass flow entering the stage [kg/s]
    pub mass_flow: f64,
    pub performance: DesignPerformance,
    pub inlet: FlowStation,
    pub outlet: FlowStation,
}

/// Design solution of the whole chain.
#[derive(Clone, Debug, PartialEq)]
pub struct DesignPoint {
    pub speed: AngularVelocity,
    pub stages: Vec<StageDesign>,
}

/// Absolute velocity at which a stream with totals `totals` reaches Mach `mach`.
fn velocity_at_mach(gas: &dyn GasModel, totals: TotalConditions, mach: f64) -> MeanlineResult<f64> {
    let mut c = mach * gas.properties(totals.t0)?.speed_of_sound();
    for _ in 0..MACH_PASSES {
        c = mach * static_state(gas, totals.t0, totals.p0, c)?.speed_of_sound();
    }
    Ok(c)
}

/// Size the first inlet annulus for the configured inlet Mach number.
fn size_first_inlet(
    config: &CompressorConfig,
    gas: &dyn GasModel,
    totals: TotalConditions,
    alpha1: f64,
) -> MeanlineResult<Annulus> {
    let c = velocity_at_mach(gas, totals, config.inlet.mach_number)?;
    let state = static_state(gas, totals.t0, totals.p0, c)?;
    let c_x = c * alpha1.cos();
    let area = config.inlet.mass_flow.value / (state.density() * c_x);
    Ok(Annulus::from_area_and_hub_tip_ratio(
        area,
        config.characteristics.hub_tip_ratio,
    )?)
}

fn failed(stage: usize, what: impl Into<String>) -> MeanlineError {
    MeanlineError::DesignPointFailed {
        stage,
        what: what.into(),
    }
}

/// Pressure ratio and efficiency the stage must deliver at design.
fn design_work(
    gas: &dyn GasModel,
    stage: &StageConfig,
    totals: TotalConditions,
    phi: f64,
    u1: f64,
    x: f64,
) -> MeanlineResult<(f64, f64)> {
    let t01 = totals.t0.value;
    let cp = gas.cp(totals.t0)?;
    match &stage.design {
        StageDesignInput::DesignPoint { work, efficiency } => {
            let pr = match *work {
                WorkTarget::PressureRatio(pr) => pr,
                WorkTarget::PressureCoefficient(psi) => {
                    pressure_ratio_from_coefficient(psi, cp, t01, x, u1)?
                }
            };
            Ok((pr, *efficiency))
        }
        StageDesignInput::Characteristics {
            pressure_coefficient,
            efficiency,
        } => {
            let psi_curve = StageCurve::from_points(
                CurveKind::PressureCoefficient,
                pressure_coefficient.clone(),
            )?;
            let eta_curve = StageCurve::from_points(CurveKind::Efficiency, efficiency.clone())?;
            let psi = psi_curve.lookup(phi);
            let eta = eta_curve.lookup(phi);
            if psi.phi != phi || eta.phi != phi {
                return Err(failed(
                    stage.index,
                    format!("design flow coefficient {phi:.4} lies outside the characteristic tables"),
                ));
            }
            let pr = pressure_ratio_from_coefficient(psi.value, cp, t01, x, u1)?;
            Ok((pr, eta.value))
        }
    }
}

/// Walk the chain at design speed and flow.
///
/// A stage whose continuity iteration runs out of iterations is continued with its last
/// iterate; the walk still fails with `DesignPointFailed` at the end. A stage that can not
/// pass the design flow at all stops the walk immediately.
pub fn solve_design(
    config: &CompressorConfig,
    gas: &dyn GasModel,
    root: &RootConfig,
) -> MeanlineResult<DesignPoint> {
    let omega = to_rad_per_s(config.rotation.speed);
    let deviation = DeviationModel::new(config.characteristics.blade_deviation_adjustment);

    let mut totals = TotalConditions::new(config.inlet.total_temperature, config.inlet.total_pressure)?;
    let mut mass_flow = config.inlet.mass_flow.value;
    let mut previous_outlet: Option<Annulus> = None;
    let mut first_failure: Option<MeanlineError> = None;
    let mut stages = Vec::with_capacity(config.stages.len());

    for stage in &config.stages {
        let index = stage.index;
        let alpha1 = if index == 1 {
            to_rad(config.inlet.swirl_angle) + to_rad(config.characteristics.inlet_guide_vane_angle)
        } else {
            stage.inlet_flow_angle
        };

        let inlet_annulus = match (&stage.geometry, previous_outlet) {
            (Some(g), _) => g.inlet,
            (None, Some(prev)) => prev,
            (None, None) => size_first_inlet(config, gas, totals, alpha1)?,
        };
        let r_m1 = inlet_annulus.mean_radius().value;
        let r_m2 = stage
            .geometry
            .map(|g| g.outlet.mean_radius().value)
            .unwrap_or(r_m1);
        let (u1, u2) = (omega * r_m1, omega * r_m2);

        // Inlet continuity
        let inlet = match solve_axial_velocity(
            gas,
            totals,
            inlet_annulus.area().value,
            mass_flow,
            Swirl::Angle(alpha1),
            u1,
            root,
        )? {
            Continuity::Solved { station, .. } => station,
            Continuity::NotConverged { station, iterations } => {
                warn!(stage = index, iterations, "design inlet continuity did not converge");
                first_failure.get_or_insert(failed(index, "inlet continuity did not converge"));
                station
            }
            Continuity::Choked { max_mass_flow } => {
                return Err(failed(
                    index,
                    format!("inlet annulus passes at most {max_mass_flow:.3} kg/s"),
                ));
            }
        };

        let phi = inlet.axial_velocity / u1;
        let x = isentropic_exponent(gas, totals.t0)?;
        let (pr, eta) = design_work(gas, stage, totals, phi, u1, x)?;
        let dt0 = temperature_rise_from_efficiency(totals.t0.value, pr, x, eta)?;
        let work = work_for_rise(gas, totals.t0, dt0)?;
        let exit_totals = TotalConditions::new(k(totals.t0.value + dt0), pa(totals.p0.value * pr))?;
        let c_theta2 = (work + u1 * inlet.tangential_velocity) / u2;

        // Exit: sized for constant axial velocity, or continuity in the given annulus
        let (outlet, geometry) = match stage.geometry {
            Some(g) => {
                let outlet = match solve_axial_velocity(
                    gas,
                    exit_totals,
                    g.outlet.area().value,
                    mass_flow,
                    Swirl::Tangential(c_theta2),
                    u2,
                    root,
                )? {
                    Continuity::Solved { station, .. } => station,
                    Continuity::NotConverged { station, iterations } => {
                        warn!(stage = index, iterations, "design exit continuity did not converge");
                        first_failure.get_or_insert(failed(index, "exit continuity did not converge"));
                        station
                    }
                    Continuity::Choked { max_mass_flow } => {
                        return Err(failed(
                            index,
                            format!("exit annulus passes at most {max_mass_flow:.3} kg/s"),
                        ));
                    }
                };
                (outlet, g)
            }
            None => {
                let outlet = FlowStation::from_components(
                    gas,
                    exit_totals,
                    inlet.axial_velocity,
                    c_theta2,
                    u2,
                )
                .map_err(|e| failed(index, format!("exit station: {e}")))?;
                let area = mass_flow / outlet.mass_flux();
                let outlet_annulus = Annulus::from_area_and_mean_radius(area, r_m1)
                    .map_err(|e| failed(index, format!("exit sizing: {e}")))?;
                (
                    outlet,
                    StageGeometry::new(inlet_annulus, outlet_annulus, stage.solidity)?,
                )
            }
        };

        let blades = BladeAngles {
            kappa1: inlet.relative_flow_angle,
            kappa2: outlet.relative_flow_angle,
        };
        let performance = DesignPerformance {
            flow_coefficient: phi,
            pressure_coefficient: pressure_coefficient(gas.cp(totals.t0)?, totals.t0.value, pr, x, u1),
            pressure_ratio: pr,
            temperature_ratio: exit_totals.t0.value / totals.t0.value,
            efficiency: eta,
            diffusion_factor: diffusion_factor(
                inlet.relative_velocity,
                outlet.relative_velocity,
                inlet.relative_tangential_velocity,
                outlet.relative_tangential_velocity,
                geometry.solidity,
            ),
            converged: first_failure.is_none(),
        };
        debug!(
            stage = index,
            phi = performance.flow_coefficient,
            psi = performance.pressure_coefficient,
            pr,
            eta = performance.efficiency,
            kappa1_deg = blades.kappa1.to_degrees(),
            kappa2_deg = blades.kappa2.to_degrees(),
            "design stage solved"
        );

        stages.push(StageDesign {
            index,
            geometry,
            blades,
            inlet_flow_angle: alpha1,
            bleed: stage.bleed.clone(),
            psi_shift: stage.psi_shift.clone(),
            deviation,
            reference_inlet: totals,
            mass_flow,
            performance,
            inlet,
            outlet,
        });

        totals = exit_totals;
        mass_flow *= 1.0 - stage.bleed_fraction(100.0);
        previous_outlet = Some(geometry.outlet);
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(DesignPoint {
            speed: config.rotation.speed,
            stages,
        }),
    }
}

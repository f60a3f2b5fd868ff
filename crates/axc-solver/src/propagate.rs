//! Stage-by-stage meanline walk for one operating point.
//!
//! The engine moves through `Init → Converge(i) … → Aggregate`. A stage that
//! stalls or chokes is flagged and still hands its exit state downstream; a stage whose
//! continuity does not converge passes its inlet totals through unchanged. A point with
//! no mass flow is clamped to the stall bound of every stage.

use crate::continuity::{Continuity, Swirl, solve_axial_velocity};
use crate::error::MeanlineResult;
use crate::point::OperatingPoint;
use crate::root::RootConfig;
use axc_core::units::{k, pa, to_rad, to_rad_per_s};
use axc_gas::{GasModel, isentropic_exponent, work_for_rise};
use axc_stage::{
    BladeAngles, FlowCondition, FlowStation, Stage, StageCharacteristics, TotalConditions,
    diffusion_factor, efficiency_from_ratios, pressure_ratio_from_coefficient,
    temperature_rise_from_efficiency,
};
use std::fmt;
use tracing::{debug, warn};

/// Outcome of one stage, ordered from best to worst.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageStatus {
    #[default]
    Ok,
    Stall,
    Choke,
    DidNotConverge,
}

impl StageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StageStatus::Ok => "OK",
            StageStatus::Stall => "Stall",
            StageStatus::Choke => "Choke",
            StageStatus::DidNotConverge => "DidNotConverge",
        }
    }

    fn from_condition(condition: FlowCondition) -> Self {
        match condition {
            FlowCondition::Normal => StageStatus::Ok,
            FlowCondition::Stall => StageStatus::Stall,
            FlowCondition::Choke => StageStatus::Choke,
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stage performance read off the characteristics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StagePerformance {
    /// Flow coefficient used for the lookup (clamped to the curve window)
    pub flow_coefficient: f64,
    pub pressure_coefficient: f64,
    pub pressure_ratio: f64,
    pub temperature_ratio: f64,
    pub efficiency: f64,
}

/// Result of one stage at one operating point.
#[derive(Clone, Debug, PartialEq)]
pub struct StageSolution {
    pub index: usize,
    pub status: StageStatus,
    /// Mass flow through the stage [kg/s]
    pub mass_flow: f64,
    /// Unset when the stage did not converge
    pub performance: Option<StagePerformance>,
    pub inlet: Option<FlowStation>,
    pub outlet: Option<FlowStation>,
    pub blades: BladeAngles,
    /// β1 − κ1 [rad]
    pub incidence: Option<f64>,
    pub diffusion_factor: Option<f64>,
    pub inlet_totals: TotalConditions,
    pub exit_totals: TotalConditions,
    pub cumulative_pressure_ratio: f64,
    pub cumulative_temperature_ratio: f64,
    /// Unset while the machine has done no work up to this stage
    pub cumulative_efficiency: Option<f64>,
}

/// Result of one operating point.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverResult {
    pub point: OperatingPoint,
    pub stages: Vec<StageSolution>,
    pub pressure_ratio: f64,
    pub temperature_ratio: f64,
    /// Unset when no stage did any work
    pub efficiency: Option<f64>,
    pub exit_totals: TotalConditions,
    /// Worst stage status
    pub status: StageStatus,
}

/// Flow entering a stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageInlet {
    pub totals: TotalConditions,
    pub mass_flow: f64,
    /// Absolute flow angle [rad]
    pub flow_angle: f64,
}

/// What the engine needs from a built model.
#[derive(Clone, Copy)]
pub struct Chain<'a> {
    pub gas: &'a dyn GasModel,
    pub stages: &'a [Stage],
    /// Inlet swirl the stage-1 inlet angle was designed with [rad]
    pub design_swirl: f64,
    /// Design shaft speed [rad/s]
    pub design_speed: f64,
    pub root: &'a RootConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EngineState {
    Init,
    Converge(usize),
    Aggregate,
}

/// Solve one stage. Never fails; trouble is reported through the status.
pub fn solve_stage(
    gas: &dyn GasModel,
    stage: &Stage,
    characteristics: Option<&StageCharacteristics>,
    inlet: StageInlet,
    omega: f64,
    root: &RootConfig,
) -> StageSolution {
    let pass_through = |inlet_station: Option<FlowStation>| StageSolution {
        index: stage.index,
        status: StageStatus::DidNotConverge,
        mass_flow: inlet.mass_flow,
        performance: None,
        incidence: inlet_station
            .as_ref()
            .map(|s| s.relative_flow_angle - stage.blades.kappa1),
        inlet: inlet_station,
        outlet: None,
        blades: stage.blades,
        diffusion_factor: None,
        inlet_totals: inlet.totals,
        exit_totals: inlet.totals,
        cumulative_pressure_ratio: 1.0,
        cumulative_temperature_ratio: 1.0,
        cumulative_efficiency: None,
    };

    let Some(characteristics) = characteristics else {
        warn!(stage = stage.index, "no characteristics at this speed");
        return pass_through(None);
    };

    match try_stage(gas, stage, characteristics, inlet, omega, root) {
        Ok(Attempt::Solved(solution)) => solution,
        Ok(Attempt::NotConverged(station)) => {
            warn!(stage = stage.index, "continuity did not converge");
            pass_through(station)
        }
        Err(e) => {
            warn!(stage = stage.index, error = %e, "stage failed");
            pass_through(None)
        }
    }
}

enum Attempt {
    Solved(StageSolution),
    /// Carries the inlet station when the inlet solved but the exit did not
    NotConverged(Option<FlowStation>),
}

fn try_stage(
    gas: &dyn GasModel,
    stage: &Stage,
    characteristics: &StageCharacteristics,
    inlet: StageInlet,
    omega: f64,
    root: &RootConfig,
) -> MeanlineResult<Attempt> {
    let (u1, u2) = stage.geometry.blade_speeds(omega);
    let totals = inlet.totals;
    let t01 = totals.t0.value;

    let no_flow = inlet.mass_flow <= 0.0;
    let (inlet_station, forced) = if no_flow {
        warn!(stage = stage.index, mass_flow = inlet.mass_flow, "no flow through the stage");
        (None, Some(StageStatus::Stall))
    } else {
        match solve_axial_velocity(
            gas,
            totals,
            stage.geometry.inlet.area().value,
            inlet.mass_flow,
            Swirl::Angle(inlet.flow_angle),
            u1,
            root,
        )? {
            Continuity::Solved { station, .. } => (Some(station), None),
            Continuity::NotConverged { .. } => return Ok(Attempt::NotConverged(None)),
            Continuity::Choked { max_mass_flow } => {
                warn!(stage = stage.index, max_mass_flow, "inlet annulus choked");
                (None, Some(StageStatus::Choke))
            }
        }
    };

    let phi = match (&inlet_station, forced) {
        (Some(s), _) => s.axial_velocity / u1,
        (None, Some(StageStatus::Stall)) => characteristics.phi_stall(),
        (None, _) => characteristics.phi_choke(),
    };
    let (psi, eta) = characteristics.lookup(phi);
    let mut status = forced.unwrap_or_else(|| {
        StageStatus::from_condition(psi.condition).max(StageStatus::from_condition(eta.condition))
    });

    let x = isentropic_exponent(gas, totals.t0)?;
    let cp = gas.cp(totals.t0)?;
    let pr = pressure_ratio_from_coefficient(psi.value, cp, t01, x, u1)?;
    let dt0 = temperature_rise_from_efficiency(t01, pr, x, eta.value)?;
    let work = work_for_rise(gas, totals.t0, dt0)?;
    let exit_totals = TotalConditions::new(k(t01 + dt0), pa(totals.p0.value * pr))?;
    let c_theta1 = match &inlet_station {
        Some(s) => s.tangential_velocity,
        None => phi * u1 * inlet.flow_angle.tan(),
    };
    let c_theta2 = (work + u1 * c_theta1) / u2;

    let outlet_station = if no_flow {
        None
    } else {
        match solve_axial_velocity(
            gas,
            exit_totals,
            stage.geometry.outlet.area().value,
            inlet.mass_flow,
            Swirl::Tangential(c_theta2),
            u2,
            root,
        )? {
            Continuity::Solved { station, .. } => Some(station),
            Continuity::NotConverged { .. } => return Ok(Attempt::NotConverged(inlet_station)),
            Continuity::Choked { max_mass_flow } => {
                warn!(stage = stage.index, max_mass_flow, "exit annulus choked");
                status = status.max(StageStatus::Choke);
                None
            }
        }
    };

    if matches!(status, StageStatus::Stall | StageStatus::Choke) {
        warn!(stage = stage.index, phi, %status, "stage off its characteristic");
    }

    let diffusion = match (&inlet_station, &outlet_station) {
        (Some(a), Some(b)) => Some(diffusion_factor(
            a.relative_velocity,
            b.relative_velocity,
            a.relative_tangential_velocity,
            b.relative_tangential_velocity,
            stage.geometry.solidity,
        )),
        _ => None,
    };
    let temperature_ratio = exit_totals.t0.value / t01;

    debug!(
        stage = stage.index,
        phi = psi.phi,
        psi = psi.value,
        pr,
        eta = eta.value,
        %status,
        "stage converged"
    );

    Ok(Attempt::Solved(StageSolution {
        index: stage.index,
        status,
        mass_flow: inlet.mass_flow,
        performance: Some(StagePerformance {
            flow_coefficient: psi.phi,
            pressure_coefficient: psi.value,
            pressure_ratio: pr,
            temperature_ratio,
            efficiency: eta.value,
        }),
        incidence: inlet_station
            .as_ref()
            .map(|s| s.relative_flow_angle - stage.blades.kappa1),
        inlet: inlet_station,
        outlet: outlet_station,
        blades: stage.blades,
        diffusion_factor: diffusion,
        inlet_totals: totals,
        exit_totals,
        cumulative_pressure_ratio: 1.0,
        cumulative_temperature_ratio: 1.0,
        cumulative_efficiency: None,
    }))
}

/// Walk `point` through the chain with the given (speed-adjusted) characteristics.
///
/// `characteristics[i]` belongs to `chain.stages[i]`; `None` marks a stage without usable
/// curves at this speed.
///
/// # Errors
/// Only when the operating point itself is not a physical inlet state.
pub fn propagate(
    chain: &Chain<'_>,
    characteristics: &[Option<StageCharacteristics>],
    point: &OperatingPoint,
) -> MeanlineResult<SolverResult> {
    let omega = to_rad_per_s(point.speed);
    let percent_speed = 100.0 * omega / chain.design_speed;
    let machine_inlet = TotalConditions::new(point.total_temperature, point.total_pressure)?;
    let x_in = isentropic_exponent(chain.gas, machine_inlet.t0)?;

    let mut state = EngineState::Init;
    let mut totals = machine_inlet;
    let mut mass_flow = point.mass_flow.value;
    let mut solutions: Vec<StageSolution> = Vec::with_capacity(chain.stages.len());

    loop {
        state = match state {
            EngineState::Init if chain.stages.is_empty() => EngineState::Aggregate,
            EngineState::Init => EngineState::Converge(0),
            EngineState::Converge(i) => {
                let stage = &chain.stages[i];
                let flow_angle = if i == 0 {
                    stage.inlet_flow_angle + to_rad(point.swirl_angle) - chain.design_swirl
                } else {
                    stage.inlet_flow_angle
                };
                let mut solution = solve_stage(
                    chain.gas,
                    stage,
                    characteristics.get(i).and_then(Option::as_ref),
                    StageInlet {
                        totals,
                        mass_flow,
                        flow_angle,
                    },
                    omega,
                    chain.root,
                );

                totals = solution.exit_totals;
                let pr = totals.p0.value / machine_inlet.p0.value;
                let tr = totals.t0.value / machine_inlet.t0.value;
                solution.cumulative_pressure_ratio = pr;
                solution.cumulative_temperature_ratio = tr;
                solution.cumulative_efficiency = efficiency_from_ratios(pr, tr, x_in);
                mass_flow *= 1.0 - stage.bleed_fraction(percent_speed);
                solutions.push(solution);

                if i + 1 < chain.stages.len() {
                    EngineState::Converge(i + 1)
                } else {
                    EngineState::Aggregate
                }
            }
            EngineState::Aggregate => {
                let pressure_ratio = totals.p0.value / machine_inlet.p0.value;
                let temperature_ratio = totals.t0.value / machine_inlet.t0.value;
                let status = solutions
                    .iter()
                    .map(|s| s.status)
                    .max()
                    .unwrap_or_default();
                debug!(rpm = point.rpm(), mass_flow = point.mass_flow.value, %status, "operating point solved");
                return Ok(SolverResult {
                    point: *point,
                    pressure_ratio,
                    temperature_ratio,
                    efficiency: efficiency_from_ratios(pressure_ratio, temperature_ratio, x_in),
                    exit_totals: totals,
                    status,
                    stages: solutions,
                });
            }
        };
    }
}

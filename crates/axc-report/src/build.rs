//! Solver results → report, converted back to the deck's unit system.

use crate::types::*;
use axc_config::{CompressorConfig, Quantity, UnitSystem};
use axc_core::units::{to_deg, to_rpm};
use axc_solver::{
    MeanlineResult, OperatingPoint, SolverResult, StageSolution, StageStatus,
};
use axc_stage::FlowStation;

pub fn status(s: StageStatus) -> ReportStatus {
    match s {
        StageStatus::Ok => ReportStatus::Ok,
        StageStatus::Stall => ReportStatus::Stall,
        StageStatus::Choke => ReportStatus::Choke,
        StageStatus::DidNotConverge => ReportStatus::DidNotConverge,
    }
}

pub fn unit_labels(units: UnitSystem) -> UnitLabels {
    UnitLabels {
        pressure: units.label(Quantity::Pressure).to_string(),
        temperature: units.label(Quantity::Temperature).to_string(),
        mass_flow: units.label(Quantity::MassFlow).to_string(),
        velocity: units.speed_label().to_string(),
    }
}

pub fn point_input(units: UnitSystem, point: &OperatingPoint) -> PointInput {
    PointInput {
        rpm: to_rpm(point.speed),
        mass_flow: units.from_si(Quantity::MassFlow, point.mass_flow.value),
        total_pressure: units.from_si(Quantity::Pressure, point.total_pressure.value),
        total_temperature: units.from_si(Quantity::Temperature, point.total_temperature.value),
        swirl_deg: to_deg(point.swirl_angle),
    }
}

fn station(units: UnitSystem, s: &FlowStation) -> StationReport {
    StationReport {
        axial_velocity: units.speed_from_si(s.axial_velocity),
        tangential_velocity: units.speed_from_si(s.tangential_velocity),
        blade_speed: units.speed_from_si(s.blade_speed),
        flow_angle_deg: s.flow_angle.to_degrees(),
        relative_flow_angle_deg: s.relative_flow_angle.to_degrees(),
        mach_number: s.mach_number,
        relative_mach_number: s.relative_mach_number,
        total_temperature: units.from_si(Quantity::Temperature, s.total_temperature.value),
        total_pressure: units.from_si(Quantity::Pressure, s.total_pressure.value),
    }
}

fn stage(units: UnitSystem, threshold: f64, s: &StageSolution) -> StageReport {
    let perf = s.performance;
    let efficiency = perf.map(|p| p.efficiency);
    StageReport {
        index: s.index,
        status: status(s.status),
        low_efficiency: efficiency.is_some_and(|eta| eta < threshold),
        mass_flow: units.from_si(Quantity::MassFlow, s.mass_flow),
        flow_coefficient: perf.map(|p| p.flow_coefficient),
        pressure_coefficient: perf.map(|p| p.pressure_coefficient),
        pressure_ratio: perf.map(|p| p.pressure_ratio),
        temperature_ratio: perf.map(|p| p.temperature_ratio),
        efficiency,
        incidence_deg: s.incidence.map(f64::to_degrees),
        diffusion_factor: s.diffusion_factor,
        kappa1_deg: s.blades.kappa1.to_degrees(),
        kappa2_deg: s.blades.kappa2.to_degrees(),
        cumulative_pressure_ratio: s.cumulative_pressure_ratio,
        cumulative_temperature_ratio: s.cumulative_temperature_ratio,
        cumulative_efficiency: s.cumulative_efficiency,
        inlet: s.inlet.as_ref().map(|st| station(units, st)),
        outlet: s.outlet.as_ref().map(|st| station(units, st)),
    }
}

fn point(
    units: UnitSystem,
    threshold: f64,
    input: &OperatingPoint,
    result: &MeanlineResult<SolverResult>,
) -> PointReport {
    let input = point_input(units, input);
    match result {
        Ok(r) => PointReport {
            input,
            status: status(r.status),
            pressure_ratio: Some(r.pressure_ratio),
            temperature_ratio: Some(r.temperature_ratio),
            efficiency: r.efficiency,
            exit_total_pressure: Some(units.from_si(Quantity::Pressure, r.exit_totals.p0.value)),
            exit_total_temperature: Some(
                units.from_si(Quantity::Temperature, r.exit_totals.t0.value),
            ),
            stages: r.stages.iter().map(|s| stage(units, threshold, s)).collect(),
            error: None,
        },
        Err(e) => PointReport {
            input,
            status: ReportStatus::DidNotConverge,
            pressure_ratio: None,
            temperature_ratio: None,
            efficiency: None,
            exit_total_pressure: None,
            exit_total_temperature: None,
            stages: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}

/// Assemble a report; `results[i]` belongs to `points[i]`.
pub fn build_report(
    config: &CompressorConfig,
    run_id: RunId,
    points: &[OperatingPoint],
    results: &[MeanlineResult<SolverResult>],
) -> Report {
    let units = config.units;
    let threshold = config.output.efficiency_threshold;
    Report {
        manifest: RunManifest {
            run_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
            unit_system: units.to_string(),
            n_stages: config.n_stages(),
        },
        units: unit_labels(units),
        efficiency_threshold: threshold,
        points: points
            .iter()
            .zip(results)
            .map(|(p, r)| point(units, threshold, p, r))
            .collect(),
    }
}

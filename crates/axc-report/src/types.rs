//! Report data types. Dimensional values are in the deck's unit system.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "OK")]
    Ok,
    Stall,
    Choke,
    DidNotConverge,
}

impl ReportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Ok => "OK",
            ReportStatus::Stall => "Stall",
            ReportStatus::Choke => "Choke",
            ReportStatus::DidNotConverge => "DidNotConverge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub timestamp: String,
    pub solver_version: String,
    pub unit_system: String,
    pub n_stages: usize,
}

/// Unit labels of the report columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitLabels {
    pub pressure: String,
    pub temperature: String,
    pub mass_flow: String,
    pub velocity: String,
}

/// Operating point as requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointInput {
    pub rpm: f64,
    pub mass_flow: f64,
    pub total_pressure: f64,
    pub total_temperature: f64,
    pub swirl_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub axial_velocity: f64,
    pub tangential_velocity: f64,
    pub blade_speed: f64,
    pub flow_angle_deg: f64,
    pub relative_flow_angle_deg: f64,
    pub mach_number: f64,
    pub relative_mach_number: f64,
    pub total_temperature: f64,
    pub total_pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    pub index: usize,
    pub status: ReportStatus,
    /// Efficiency below the configured report threshold
    pub low_efficiency: bool,
    pub mass_flow: f64,
    pub flow_coefficient: Option<f64>,
    pub pressure_coefficient: Option<f64>,
    pub pressure_ratio: Option<f64>,
    pub temperature_ratio: Option<f64>,
    pub efficiency: Option<f64>,
    pub incidence_deg: Option<f64>,
    pub diffusion_factor: Option<f64>,
    pub kappa1_deg: f64,
    pub kappa2_deg: f64,
    pub cumulative_pressure_ratio: f64,
    pub cumulative_temperature_ratio: f64,
    pub cumulative_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet: Option<StationReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet: Option<StationReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointReport {
    pub input: PointInput,
    pub status: ReportStatus,
    pub pressure_ratio: Option<f64>,
    pub temperature_ratio: Option<f64>,
    pub efficiency: Option<f64>,
    pub exit_total_pressure: Option<f64>,
    pub exit_total_temperature: Option<f64>,
    pub stages: Vec<StageReport>,
    /// Set when the point produced no solution at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub manifest: RunManifest,
    pub units: UnitLabels,
    pub efficiency_threshold: f64,
    pub points: Vec<PointReport>,
}

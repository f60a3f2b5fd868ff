//! Normalized compressor configuration in canonical SI units.

use crate::units::UnitSystem;
use axc_core::units::{Angle, AngularVelocity, MassRate, Pressure, Temperature};
use axc_gas::PolynomialGas;
use axc_stage::{SpeedSchedule, StageGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Compressor,
}

/// Direction of shaft rotation seen from the inlet.
///
/// Tangential velocities are always stored positive in the direction of rotation, so the
/// direction only affects how swirl is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InletConditions {
    pub total_pressure: Pressure,
    pub total_temperature: Temperature,
    pub mass_flow: MassRate,
    /// Absolute swirl angle entering the machine
    pub swirl_angle: Angle,
    /// Axial Mach number used to size the first stage annulus
    pub mach_number: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotationConfig {
    pub speed: AngularVelocity,
    pub direction: Direction,
    /// (percent design speed, efficiency ratio), sorted by speed
    pub efficiency_ratio_table: Vec<(f64, f64)>,
}

/// Machine-wide characteristic inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicsConfig {
    /// Half-width of the valid φ window as a fraction of φ_design
    pub flow_coefficient_range: f64,
    /// Deviation slope k_dev; zero disables the correction
    pub blade_deviation_adjustment: f64,
    pub inlet_guide_vane_angle: Angle,
    pub inlet_guide_vane_reset: Angle,
    pub stall_efficiency_ratio: f64,
    pub choke_efficiency_ratio: f64,
    pub hub_tip_ratio: f64,
}

/// How the work of a stage is specified at the design point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkTarget {
    PressureRatio(f64),
    PressureCoefficient(f64),
}

/// Design data for one stage; all stages of a deck use the same variant.
#[derive(Debug, Clone, PartialEq)]
pub enum StageDesignInput {
    /// Mode A
    DesignPoint { work: WorkTarget, efficiency: f64 },
    /// Mode B: (φ, ψ) and (φ, η) tables
    Characteristics {
        pressure_coefficient: Vec<(f64, f64)>,
        efficiency: Vec<(f64, f64)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignMode {
    DesignPoint,
    Characteristics,
}

/// Blade angle changes relative to the design setting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BladeResets {
    /// Added to κ1 [rad]
    pub rotor_inlet: f64,
    /// Added to κ2 [rad]
    pub rotor_exit: f64,
    /// Added to the absolute inlet angle of the next stage [rad]
    pub stator: f64,
}

impl BladeResets {
    pub fn is_zero(&self) -> bool {
        self.rotor_inlet == 0.0 && self.rotor_exit == 0.0 && self.stator == 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    /// 1-based
    pub index: usize,
    /// Explicit annuli, or `None` to size at design
    pub geometry: Option<StageGeometry>,
    pub solidity: f64,
    /// Absolute flow angle entering the rotor [rad]; stage 1 uses swirl + IGV instead
    pub inlet_flow_angle: f64,
    pub design: StageDesignInput,
    pub resets: BladeResets,
    /// Bled fraction of the stage mass flow by percent speed; empty for no bleed
    pub bleed: SpeedSchedule,
    /// Given ψ shift at off-design speed by percent speed; empty to use the rotor model
    pub psi_shift: SpeedSchedule,
}

impl StageConfig {
    /// Bled fraction at `percent_speed` of design.
    pub fn bleed_fraction(&self, percent_speed: f64) -> f64 {
        self.bleed.at(percent_speed).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    pub max_iters: usize,
    pub convergence_tolerance: f64,
    /// Step backtracking factor in (0, 1]
    pub numerical_damping: f64,
    pub curve_points: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iters: 100,
            convergence_tolerance: 1e-5,
            numerical_damping: 0.5,
            curve_points: 41,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputSettings {
    /// Stages below this efficiency are marked in reports
    pub efficiency_threshold: f64,
    pub format: OutputFormat,
}

/// Fully validated compressor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressorConfig {
    pub analysis: AnalysisType,
    pub units: UnitSystem,
    pub verbosity: u8,
    pub inlet: InletConditions,
    pub gas: PolynomialGas,
    pub rotation: RotationConfig,
    pub characteristics: CharacteristicsConfig,
    pub mode: DesignMode,
    pub stages: Vec<StageConfig>,
    pub solver: SolverSettings,
    pub output: OutputSettings,
}

impl CompressorConfig {
    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }

    /// True when any blade or vane is reset away from its design setting.
    pub fn has_resets(&self) -> bool {
        self.characteristics.inlet_guide_vane_reset.value != 0.0
            || self.stages.iter().any(|s| !s.resets.is_zero())
    }
}

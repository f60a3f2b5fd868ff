//! The per-stage record carried through the compressor chain.

use crate::curve::{CurveLookup, StageCurve};
use crate::deviation::DeviationModel;
use crate::geometry::StageGeometry;
use crate::parabola::ParabolicEfficiency;
use crate::schedule::SpeedSchedule;
use crate::station::{FlowStation, TotalConditions};

/// Rotor blade metal angles [rad], measured from axial.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BladeAngles {
    /// Rotor inlet metal angle κ1
    pub kappa1: f64,
    /// Rotor exit metal angle κ2
    pub kappa2: f64,
}

impl BladeAngles {
    /// Camber (turning) of the rotor blade, κ1 − κ2.
    pub fn camber(&self) -> f64 {
        self.kappa1 - self.kappa2
    }
}

/// Stage performance at the design operating point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DesignPerformance {
    pub flow_coefficient: f64,
    pub pressure_coefficient: f64,
    pub pressure_ratio: f64,
    pub temperature_ratio: f64,
    pub efficiency: f64,
    pub diffusion_factor: f64,
    /// Whether the design-point continuity solves converged
    pub converged: bool,
}

/// How the characteristic curves of a stage were obtained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CurveSource {
    /// Synthesized from the design pressure ratio and efficiency
    DesignPoint {
        efficiency: ParabolicEfficiency,
    },
    /// Given as tables
    Tabulated,
}

/// Efficiency and pressure-coefficient curves of one stage at design speed.
#[derive(Clone, Debug, PartialEq)]
pub struct StageCharacteristics {
    pub efficiency: StageCurve,
    pub pressure_coefficient: StageCurve,
    pub source: CurveSource,
}

impl StageCharacteristics {
    /// Stall bound shared by both curves (the narrower window wins).
    pub fn phi_stall(&self) -> f64 {
        self.efficiency
            .phi_stall()
            .max(self.pressure_coefficient.phi_stall())
    }

    /// Choke bound shared by both curves (the narrower window wins).
    pub fn phi_choke(&self) -> f64 {
        self.efficiency
            .phi_choke()
            .min(self.pressure_coefficient.phi_choke())
    }

    /// Look up (ψ, η) at φ.
    pub fn lookup(&self, phi: f64) -> (CurveLookup, CurveLookup) {
        (
            self.pressure_coefficient.lookup(phi),
            self.efficiency.lookup(phi),
        )
    }
}

/// One compressor stage: geometry, blade setting, design reference and curves.
///
/// Stages are immutable once built; a blade reset or a new design produces new stages.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    /// 1-based position in the chain
    pub index: usize,
    pub geometry: StageGeometry,
    pub blades: BladeAngles,
    /// Absolute flow angle entering the rotor [rad]
    pub inlet_flow_angle: f64,
    /// Fraction of the mass flow bled off after this stage, by percent speed
    pub bleed: SpeedSchedule,
    /// Given ψ shift from the design curve by percent speed; empty to use the rotor model
    pub psi_shift: SpeedSchedule,
    pub deviation: DeviationModel,
    /// Inlet totals at the design operating point
    pub reference_inlet: TotalConditions,
    pub design: DesignPerformance,
    pub design_inlet: FlowStation,
    pub design_outlet: FlowStation,
    pub characteristics: StageCharacteristics,
}

impl Stage {
    pub fn design_flow_coefficient(&self) -> f64 {
        self.design.flow_coefficient
    }

    pub fn design_pressure_coefficient(&self) -> f64 {
        self.design.pressure_coefficient
    }

    /// Bled mass-flow fraction at `percent_speed` of design.
    pub fn bleed_fraction(&self, percent_speed: f64) -> f64 {
        self.bleed.at(percent_speed).unwrap_or(0.0)
    }

    /// Copy of this stage with different characteristics.
    pub fn with_characteristics(&self, characteristics: StageCharacteristics) -> Self {
        Self {
            characteristics,
            ..self.clone()
        }
    }
}

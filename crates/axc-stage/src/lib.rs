//! axc-stage: building blocks of one compressor stage at the mean radius.
//!
//! Provides:
//! - Annulus and stage geometry (areas, mean radii, solidity)
//! - Flow stations (velocity triangles + static gas state)
//! - Stage characteristic curves with explicit stall/choke bounds
//! - Parabolic efficiency curves (two parabolas joined at the design point)
//! - Bleed and pressure-coefficient shift schedules against shaft speed
//! - Dimensionless stage coefficients (flow, pressure, diffusion factor)
//! - The `Stage` record carried through the solver chain
//!
//! Everything here is a deterministic function of its inputs; the iterative solvers live
//! in `axc-solver`.
//!
//! # Example
//!
//! ```
//! use axc_stage::{CurveKind, FlowCondition, StageCurve};
//!
//! let psi = StageCurve::from_points(
//!     CurveKind::PressureCoefficient,
//!     vec![(0.30, 0.55), (0.40, 0.50), (0.50, 0.40)],
//! )
//! .unwrap();
//!
//! let lookup = psi.lookup(0.25);
//! assert_eq!(lookup.condition, FlowCondition::Stall);
//! assert_eq!(lookup.value, 0.55);
//! ```

pub mod coefficients;
pub mod common;
pub mod curve;
pub mod deviation;
pub mod error;
pub mod geometry;
pub mod parabola;
pub mod schedule;
pub mod stage;
pub mod station;

// Re-exports
pub use coefficients::{
    diffusion_factor, efficiency_from_ratios, pressure_coefficient,
    pressure_ratio_from_coefficient, temperature_rise_from_efficiency,
    zero_incidence_flow_coefficient,
};
pub use curve::{CurveKind, CurveLookup, FlowCondition, StageCurve};
pub use deviation::DeviationModel;
pub use error::{StageError, StageResult};
pub use geometry::{Annulus, StageGeometry};
pub use parabola::{Parabola, ParabolicEfficiency};
pub use schedule::SpeedSchedule;
pub use stage::{BladeAngles, CurveSource, DesignPerformance, Stage, StageCharacteristics};
pub use station::{FlowStation, TotalConditions};

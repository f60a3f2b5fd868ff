//! Meanline solver for multistage axial compressors.
//!
//! A [`CompressorModel`] is built once from a normalized configuration: the design point
//! fixes the blade angles and annuli, then every stage gets efficiency and pressure
//! coefficient curves. Operating points are walked through the stage chain one at a time;
//! maps of independent points run in parallel.

pub mod characteristics;
pub mod continuity;
pub mod design;
pub mod error;
pub mod map;
pub mod model;
pub mod point;
pub mod propagate;
pub mod reset;
pub mod root;
pub mod speed;
pub mod sweep;

pub use design::{DesignPoint, StageDesign, solve_design};
pub use error::{MeanlineError, MeanlineResult};
pub use map::{MapOptions, MapProgress, solve_map};
pub use model::CompressorModel;
pub use point::{OperatingPoint, map_grid};
pub use propagate::{SolverResult, StagePerformance, StageSolution, StageStatus};
pub use reset::BladeChange;
pub use root::RootConfig;

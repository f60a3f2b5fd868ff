//! axc-gas: gas property calculations for axc1d.
//!
//! Provides:
//! - `GasModel` trait (cp and gamma as functions of static temperature)
//! - `PolynomialGas`: fifth-degree cp(T) fit, gamma = cp/(cp − R)
//! - `GasState`: validated static thermodynamic state
//! - Compressible-flow relations used by the velocity-triangle solvers
//!
//! # Example
//!
//! ```
//! use axc_gas::{GasModel, PolynomialGas};
//! use axc_core::units::k;
//!
//! let air = PolynomialGas::air();
//! let props = air.properties(k(300.0)).unwrap();
//! assert!(props.gamma > 1.39 && props.gamma < 1.41);
//! ```

pub mod error;
pub mod model;
pub mod relations;
pub mod state;

// Re-exports for ergonomics
pub use error::{GasError, GasResult};
pub use model::{GasModel, GasProperties, PolynomialGas};
pub use relations::{
    critical_speed, isentropic_exponent, static_state, total_temperature_rise, work_for_rise,
};
pub use state::GasState;

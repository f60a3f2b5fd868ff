//! axc-core: shared foundation for the axc1d compressor solver.
//!
//! Contains:
//! - units (uom SI types + constructors + customary conversion factors)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{AxcError, AxcResult};
pub use numeric::*;
pub use units::*;

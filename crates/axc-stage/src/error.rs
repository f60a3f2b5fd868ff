//! Error types for stage-level calculations.

use axc_core::error::AxcError;
use axc_gas::GasError;
use thiserror::Error;

/// Errors that can occur while building stage data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    #[error("Invalid curve: {what}")]
    InvalidCurve { what: String },

    #[error("Invalid geometry: {what}")]
    InvalidGeometry { what: String },

    #[error("Singular system while fitting {what}")]
    Singular { what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Gas property error: {0}")]
    Gas(#[from] GasError),
}

pub type StageResult<T> = Result<T, StageError>;

impl From<StageError> for AxcError {
    fn from(e: StageError) -> Self {
        match e {
            StageError::InvalidCurve { what } => AxcError::InvalidArg { what },
            StageError::InvalidGeometry { what } => AxcError::InvalidArg { what },
            StageError::Singular { what } => AxcError::Invariant { what },
            StageError::NonPhysical { what } => AxcError::NonPhysical {
                what: what.to_string(),
            },
            StageError::Gas(g) => g.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StageError::InvalidCurve {
            what: "flow coefficients must increase".into(),
        };
        assert!(err.to_string().contains("increase"));
    }

    #[test]
    fn error_conversion() {
        let err = StageError::InvalidGeometry {
            what: "hub above tip".into(),
        };
        let core: AxcError = err.into();
        assert!(matches!(core, AxcError::InvalidArg { .. }));
    }
}

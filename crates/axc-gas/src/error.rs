//! Gas property errors.

use axc_core::AxcError;
use thiserror::Error;

/// Result type for gas property operations.
pub type GasResult<T> = Result<T, GasError>;

/// Errors that can occur during gas property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GasError {
    /// A temperature, pressure, cp or gamma outside the physical domain.
    ///
    /// Signals an upstream convergence or input error, not a property-model defect.
    #[error("Invalid physical state: {what} = {value}")]
    InvalidPhysicalState { what: &'static str, value: f64 },

    /// Invalid model parameters.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<GasError> for AxcError {
    fn from(err: GasError) -> Self {
        match err {
            GasError::InvalidPhysicalState { what, value } => AxcError::NonPhysical {
                what: format!("{what} = {value}"),
            },
            GasError::InvalidArg { what } => AxcError::InvalidArg {
                what: what.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GasError::InvalidPhysicalState {
            what: "gamma",
            value: 0.9,
        };
        assert!(err.to_string().contains("gamma"));
        assert!(err.to_string().contains("0.9"));
    }

    #[test]
    fn error_to_core_error() {
        let gas_err = GasError::InvalidArg { what: "coefficients" };
        let core_err: AxcError = gas_err.into();
        assert!(matches!(core_err, AxcError::InvalidArg { .. }));
    }
}

//! Error types for meanline solves.

use axc_config::ConfigError;
use axc_core::error::AxcError;
use axc_gas::GasError;
use axc_stage::StageError;
use thiserror::Error;

/// Errors that can end a model build or an operating-point solve.
///
/// Stage-level stall, choke and convergence trouble during a solve is not an error; it is
/// reported through the stage status of the result.
#[derive(Error, Debug)]
pub enum MeanlineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Invalid physical state: {0}")]
    InvalidPhysicalState(#[from] GasError),

    #[error("Stage error: {0}")]
    Stage(#[from] StageError),

    #[error("Convergence failed: {what}")]
    ConvergenceFailure { what: String },

    #[error("Design point failed at stage {stage}: {what}")]
    DesignPointFailed { stage: usize, what: String },

    #[error("Operating point cancelled")]
    Cancelled,
}

pub type MeanlineResult<T> = Result<T, MeanlineError>;

impl From<MeanlineError> for AxcError {
    fn from(e: MeanlineError) -> Self {
        match e {
            MeanlineError::InvalidConfiguration(c) => c.into(),
            MeanlineError::InvalidPhysicalState(g) => g.into(),
            MeanlineError::Stage(s) => s.into(),
            MeanlineError::ConvergenceFailure { what } => AxcError::NotConverged { what },
            MeanlineError::DesignPointFailed { stage, what } => AxcError::NotConverged {
                what: format!("design point, stage {stage}: {what}"),
            },
            MeanlineError::Cancelled => AxcError::InvalidArg {
                what: "cancelled".to_string(),
            },
        }
    }
}

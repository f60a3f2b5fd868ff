use thiserror::Error;

pub type AxcResult<T> = Result<T, AxcError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AxcError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Non-physical state: {what}")]
    NonPhysical { what: String },

    #[error("Did not converge: {what}")]
    NotConverged { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

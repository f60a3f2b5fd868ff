//! axc-report: per-stage and overall results in the deck's unit system.

pub mod build;
pub mod hash;
pub mod render;
pub mod types;

pub use build::build_report;
pub use hash::compute_run_id;
pub use render::{render, to_json, to_text};
pub use types::*;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ReportError> for axc_core::AxcError {
    fn from(e: ReportError) -> Self {
        axc_core::AxcError::InvalidArg {
            what: e.to_string(),
        }
    }
}

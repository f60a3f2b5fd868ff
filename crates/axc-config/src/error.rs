//! Configuration errors.

use axc_core::AxcError;

/// Any reason a deck can not be turned into a [`crate::CompressorConfig`].
///
/// Every variant is fatal to the request: no partial configuration is produced.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Missing field: [{section}] {key}")]
    Missing { section: String, key: String },

    #[error("Cannot parse [{section}] {key} = '{value}': {reason}")]
    Parse {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed deck at line {line}: {what}")]
    Syntax { line: usize, what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn invalid(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for AxcError {
    fn from(e: ConfigError) -> Self {
        AxcError::InvalidArg {
            what: format!("invalid configuration: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let e = ConfigError::Missing {
            section: "INLET".into(),
            key: "mass_flow".into(),
        };
        assert_eq!(e.to_string(), "Missing field: [INLET] mass_flow");

        let e = ConfigError::invalid("rotation.rpm", -5.0, "must be positive");
        assert!(e.to_string().contains("rotation.rpm = -5"));
    }
}

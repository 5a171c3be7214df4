use thiserror::Error;

use crate::location::LocationKind;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {what}: {reason}")]
    InvalidArgument { what: &'static str, reason: String },

    #[error("location is {actual}, not {expected}")]
    TypeMismatch {
        expected: LocationKind,
        actual: LocationKind,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read rates file {path}: {source}")]
    RatesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rates file: {0}")]
    RatesFileParse(#[from] serde_yaml::Error),

    #[error("invalid rates configuration: {0}")]
    Validation(String),
}

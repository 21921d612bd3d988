//! CLI error type and exit code mapping.

use dashboard_engine::{ConfigError, EvaluateError};
use thiserror::Error;

use crate::render::RenderError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Evaluate(#[from] EvaluateError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Maps errors to exit codes: evaluation failures are 1, API
    /// failures 2, I/O failures 3, configuration failures 5.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => 5,
            CliError::Evaluate(EvaluateError::Api(_)) => 2,
            CliError::Evaluate(_) => 1,
            CliError::Render(_) => 1,
            CliError::Io(_) => 3,
        }
    }
}

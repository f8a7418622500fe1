//! CLI error types

use thiserror::Error;
use wdl_ingest_core::{ConfigError, IngestError};

/// Errors surfaced by the `wdl-ingest` binaries
#[derive(Error, Debug)]
pub enum CliError {
    /// Environment or mapping file problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A stage aborted
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Bad command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(err) => err.user_message(),
            CliError::Ingest(err) => err.user_message(),
            CliError::InvalidArgument(msg) => format!(
                "Invalid argument: {msg}\n\n\
                Hint: Run 'wdl-ingest stages' to list the available stages."
            ),
        }
    }
}

//! Error types for ingestion
//!
//! Errors split along the recoverability line the loaders care about:
//! configuration, authentication and source-read errors abort a stage, while
//! [`MappingError`] and [`DestinationError`] are attached to a single record
//! and end up in the run summary.

use thiserror::Error;

/// Invalid or missing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    /// An environment variable is set but unusable
    #[error("Environment variable {name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    /// The mapping table could not be read
    #[error("Failed to read mapping file {path}: {reason}")]
    MappingFile { path: String, reason: String },

    /// Any other invalid value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::MissingVar(name) => format!(
                "{name} environment variable is not set.\n\n\
                Hint: Export the COGNITE_* credentials before running a stage."
            ),
            ConfigError::MappingFile { path, reason } => format!(
                "Failed to read mapping file {path}: {reason}\n\n\
                Hint: Check WDL_INGEST_MAPPING points to a valid TOML or YAML file."
            ),
            _ => self.to_string(),
        }
    }
}

/// Failure to obtain a bearer token
#[derive(Error, Debug)]
pub enum AuthError {
    /// Token endpoint unreachable
    #[error("Token request failed: {0}")]
    Request(String),

    /// Token endpoint answered with an error status
    #[error("Token endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Token response could not be parsed
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

/// Failure while reading from the source system. Always fatal for the stage.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport-level failure (DNS, TLS, timeout)
    #[error("Source request to {endpoint} failed: {reason}")]
    Network { endpoint: String, reason: String },

    /// Non-success HTTP status
    #[error("Source endpoint {endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to parse response from {endpoint}: {reason}")]
    Parse { endpoint: String, reason: String },

    /// Authentication failed
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Failure of a destination call
#[derive(Error, Debug, Clone)]
pub enum DestinationError {
    /// Transport-level failure
    #[error("Request to {endpoint} failed: {reason}")]
    Network { endpoint: String, reason: String },

    /// Non-success HTTP status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to parse response from {endpoint}: {reason}")]
    Parse { endpoint: String, reason: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The destination refused an individual item
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl From<AuthError> for DestinationError {
    fn from(err: AuthError) -> Self {
        DestinationError::Auth(err.to_string())
    }
}

/// A source record that cannot be mapped to the destination schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// Record has no usable identifier
    #[error("Record has an empty identifier")]
    MissingIdentifier,

    /// A required field is absent
    #[error("Record {record} is missing required field '{field}'")]
    MissingField { record: String, field: String },

    /// A field is present but cannot be parsed
    #[error("Record {record} has invalid '{field}' value '{value}'")]
    InvalidField {
        record: String,
        field: String,
        value: String,
    },

    /// A configured column does not exist in the sequence
    #[error("Couldn't find column with externalId '{column}' in sequence {sequence}")]
    MissingColumn { sequence: String, column: String },

    /// Depth index is not strictly increasing
    #[error(
        "Depth series {series} is not strictly increasing: row {row} has depth {depth} after {previous}"
    )]
    NonMonotonicDepth {
        series: String,
        row: i64,
        previous: f64,
        depth: f64,
    },

    /// Unit string not understood
    #[error("Failed to parse unit '{unit}' for column '{column}'")]
    UnknownUnit { column: String, unit: String },

    /// Parent well is unknown or was itself skipped
    #[error("Record {record} references parent well {parent}, which is not ingested")]
    UnknownParent { record: String, parent: String },

    /// Wellbore does not exist in the destination
    #[error("Wellbore {0} does not exist in the Well Data Layer")]
    UnknownWellbore(String),

    /// Record was already produced earlier in the same run
    #[error("Duplicate matching id {0}")]
    Duplicate(String),
}

/// Errors that abort a stage
#[derive(Error, Debug)]
pub enum IngestError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Source read failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A destination call the stage cannot proceed without failed
    #[error("Destination setup failed: {0}")]
    Destination(#[from] DestinationError),
}

impl IngestError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            IngestError::Config(err) => err.user_message(),
            IngestError::Source(SourceError::Auth(err)) => format!(
                "Authentication failed: {err}\n\n\
                Hint: Check COGNITE_CLIENT_ID, COGNITE_CLIENT_SECRET and COGNITE_TENANT_ID."
            ),
            IngestError::Source(err) => format!(
                "Failed to read from the source system: {err}\n\n\
                Hint: Check network connectivity and COGNITE_BASE_URL / COGNITE_PROJECT."
            ),
            IngestError::Destination(err) => format!(
                "Failed to reach the Well Data Layer: {err}\n\n\
                Hint: Run the wells stage first and check the WDL endpoint."
            ),
        }
    }
}

/// Result type for stage execution
pub type IngestResult<T> = Result<T, IngestError>;

//! Process-wide configuration
//!
//! Everything a stage needs is collected into an [`IngestConfig`] once at
//! startup and passed down explicitly; nothing below this module reads the
//! environment.

mod mapping;

pub use mapping::{
    DepthMeasurementMapping, EdmWellMapping, MappingConfig, OsduWellMapping, SourceDefinition,
    SourceRegistration, TrajectoryMapping, WellTopMapping,
};

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default API path of the Well Data Layer below the base URL
pub const DEFAULT_WDL_PATH: &str = "/api/playground/projects/{project}/wdl";

/// Default number of retries for throttled or failed requests
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// How the clients obtain a bearer token
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Pre-issued token (`COGNITE_TOKEN`)
    Token(String),
    /// OAuth2 client-credentials flow
    ClientCredentials {
        client_id: String,
        client_secret: String,
        token_url: String,
        scopes: Vec<String>,
    },
}

// Secrets never reach logs
impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Token(_) => f.write_str("Token(***)"),
            AuthMethod::ClientCredentials {
                client_id,
                token_url,
                scopes,
                ..
            } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"***")
                .field("token_url", token_url)
                .field("scopes", scopes)
                .finish(),
        }
    }
}

/// Credentials and endpoint of the Cognite project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Cluster base URL, e.g. `https://westeurope-1.cognitedata.com`
    pub base_url: String,
    /// Project name
    pub project: String,
    /// Token acquisition method
    pub auth: AuthMethod,
}

impl Credentials {
    /// Credentials using a static bearer token
    pub fn with_token(
        base_url: impl Into<String>,
        project: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project: project.into(),
            auth: AuthMethod::Token(token.into()),
        }
    }

    /// Read credentials from the process environment
    ///
    /// Reads `COGNITE_BASE_URL`, `COGNITE_PROJECT`, `COGNITE_TOKEN` or the
    /// client-credentials set `COGNITE_CLIENT_ID`, `COGNITE_CLIENT_SECRET`,
    /// `COGNITE_TENANT_ID`, `COGNITE_TOKEN_URL`, `COGNITE_TOKEN_SCOPES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));

        let project = require("COGNITE_PROJECT")?;
        let base_url = require("COGNITE_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(ConfigError::InvalidVar {
                name: "COGNITE_BASE_URL",
                reason: format!("'{base_url}' is not an http(s) URL"),
            });
        }

        if let Some(token) = get("COGNITE_TOKEN") {
            return Ok(Self {
                base_url,
                project,
                auth: AuthMethod::Token(token),
            });
        }

        let client_id = require("COGNITE_CLIENT_ID")?;
        let client_secret = require("COGNITE_CLIENT_SECRET")?;
        let token_url = match get("COGNITE_TOKEN_URL") {
            Some(url) => url,
            None => {
                let tenant = require("COGNITE_TENANT_ID")?;
                format!("https://login.microsoftonline.com/{tenant}/oauth2/v2.0/token")
            }
        };
        let scopes = match get("COGNITE_TOKEN_SCOPES") {
            Some(raw) => raw
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => vec![format!("{base_url}/.default")],
        };

        Ok(Self {
            base_url,
            project,
            auth: AuthMethod::ClientCredentials {
                client_id,
                client_secret,
                token_url,
                scopes,
            },
        })
    }
}

/// Chunk sizes for destination writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSizes {
    /// Wells per ingest call
    pub wells: usize,
    /// Wellbores per ingest call
    pub wellbores: usize,
    /// Trajectories per ingest call
    pub trajectories: usize,
    /// Wellbores' well tops per ingest call
    pub well_tops: usize,
}

impl Default for BatchSizes {
    fn default() -> Self {
        Self {
            wells: 1000,
            wellbores: 1000,
            trajectories: 10,
            well_tops: 100,
        }
    }
}

/// Configuration shared by all stages
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Project credentials
    pub credentials: Credentials,
    /// Field mapping tables
    pub mapping: MappingConfig,
    /// Write chunk sizes
    pub batch_sizes: BatchSizes,
    /// WDL API path template, `{project}` is substituted
    pub wdl_path: String,
    /// Retries for throttled or failed requests
    pub max_retries: u32,
    /// Record writes in memory instead of sending them
    pub dry_run: bool,
}

impl IngestConfig {
    /// Create a new builder for IngestConfig
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }

    /// Build the configuration from the process environment
    ///
    /// Besides the credentials this reads `WDL_INGEST_MAPPING` (optional path
    /// to a TOML or YAML mapping table) and `WDL_INGEST_DRY_RUN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = Credentials::from_env()?;
        let mut builder = Self::builder().credentials(credentials);

        if let Ok(path) = std::env::var("WDL_INGEST_MAPPING") {
            if !path.trim().is_empty() {
                builder = builder.mapping(MappingConfig::from_file(PathBuf::from(path))?);
            }
        }
        if let Ok(flag) = std::env::var("WDL_INGEST_DRY_RUN") {
            builder = builder.dry_run(parse_flag(&flag));
        }

        builder.build()
    }

    /// Resolved WDL path for the configured project
    pub fn wdl_path(&self) -> String {
        self.wdl_path.replace(
            "{project}",
            &urlencoding::encode(&self.credentials.project),
        )
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Builder for IngestConfig
#[derive(Debug, Default)]
pub struct IngestConfigBuilder {
    credentials: Option<Credentials>,
    mapping: Option<MappingConfig>,
    batch_sizes: Option<BatchSizes>,
    wdl_path: Option<String>,
    max_retries: Option<u32>,
    dry_run: bool,
}

impl IngestConfigBuilder {
    /// Set the credentials
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the mapping tables
    pub fn mapping(mut self, mapping: MappingConfig) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Set the write chunk sizes
    pub fn batch_sizes(mut self, batch_sizes: BatchSizes) -> Self {
        self.batch_sizes = Some(batch_sizes);
        self
    }

    /// Override the WDL path template
    pub fn wdl_path(mut self, path: impl Into<String>) -> Self {
        self.wdl_path = Some(path.into());
        self
    }

    /// Set the retry count
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Enable dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Build the IngestConfig
    pub fn build(self) -> Result<IngestConfig, ConfigError> {
        let credentials = self
            .credentials
            .ok_or_else(|| ConfigError::Invalid("Credentials are required".to_string()))?;
        let batch_sizes = self.batch_sizes.unwrap_or_default();
        if [
            batch_sizes.wells,
            batch_sizes.wellbores,
            batch_sizes.trajectories,
            batch_sizes.well_tops,
        ]
        .contains(&0)
        {
            return Err(ConfigError::Invalid(
                "Batch sizes must be greater than zero".to_string(),
            ));
        }

        Ok(IngestConfig {
            credentials,
            mapping: self.mapping.unwrap_or_default(),
            batch_sizes,
            wdl_path: self
                .wdl_path
                .unwrap_or_else(|| DEFAULT_WDL_PATH.to_string()),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            dry_run: self.dry_run,
        })
    }
}

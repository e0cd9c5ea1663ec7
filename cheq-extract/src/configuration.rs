// This module mostly contains the settings an extraction run needs: credentials,
// the endpoints to talk to and where to put the resulting files.
use std::{path::PathBuf, time::Duration};

use common_utils::file_utils::PageFilesConfig;

use crate::error::{ExtractError, Result};

/// The fixed endpoints of the CHEQ platform.
pub struct EndpointsConfig;

impl EndpointsConfig {
    /// Exchanges client credentials for a bearer token.
    pub const AUTH_URL: &'static str = "https://iam.cheq-platform.com/authorize";
    /// Serves paginated traffic records.
    pub const DATA_URL: &'static str = "https://skewed-analytics-api.cheq-platform.com/data";
}

/// Names of the environment variables holding the credentials.
pub struct CredentialVars;

impl CredentialVars {
    pub const CLIENT_ID: &'static str = "CLIENT_ID";
    pub const CLIENT_SECRET: &'static str = "CLIENT_SECRET";
}

/// Upper bound on every HTTP call of a run.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client credentials used to obtain a token.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Reads the credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the credentials through `lookup`. Absent or blank values are rejected.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ExtractError::Config(format!("{} is not set", key)))
        };
        Ok(Self {
            client_id: required(CredentialVars::CLIENT_ID)?,
            client_secret: required(CredentialVars::CLIENT_SECRET)?,
        })
    }
}

// The secret must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// The URLs the client talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub auth_url: String,
    pub data_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_url: EndpointsConfig::AUTH_URL.to_string(),
            data_url: EndpointsConfig::DATA_URL.to_string(),
        }
    }
}

/// Everything a run needs, built once at startup.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    /// The directory where `page_<n>.csv` files are written.
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
}

impl ExtractConfig {
    /// A configuration talking to the production endpoints and writing to the working directory.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: Endpoints::default(),
            output_dir: PathBuf::from(PageFilesConfig::DEFAULT_DIRECTORY),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

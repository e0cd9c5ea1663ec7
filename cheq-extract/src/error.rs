//! Error types for an extraction run.
//!
//! Every variant is fatal: it propagates to `run` and aborts the remaining pages.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// A required setting is missing or empty.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be set up.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Exchanging the credentials for a bearer token failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A page could not be fetched, even after retrying.
    #[error("error getting data for page {page}: {payload}")]
    Fetch {
        page: u32,
        /// Response body when the API answered, otherwise the transport error message.
        payload: String,
    },

    /// A page could not be persisted.
    #[error("failed to write page {page} to {path:?}: {source}")]
    Write {
        page: u32,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ExtractError {
    /// The page the failure belongs to, if any.
    pub fn page(&self) -> Option<u32> {
        match self {
            ExtractError::Fetch { page, .. } | ExtractError::Write { page, .. } => Some(*page),
            ExtractError::Config(_) | ExtractError::Client(_) | ExtractError::Auth(_) => None,
        }
    }
}

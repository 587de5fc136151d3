//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the upstream catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Client ID or secret missing from configuration
    #[error("Catalog credentials not configured")]
    MissingCredentials,

    /// Token endpoint rejected the client credentials
    #[error("Catalog authentication failed: {0}")]
    AuthRejected(String),

    /// Search called with an empty query
    #[error("Search query must not be empty")]
    EmptyQuery,

    /// Upstream reported no such track
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Upstream returned a non-success response
    #[error("Catalog error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse an upstream response
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

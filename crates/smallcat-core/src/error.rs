//! Error types for the small.cat client
//!
//! Provides the error enum shared by every workflow step, with
//! human-readable messages and string serialization for JSON output.

use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all small.cat client operations
///
/// Workflow steps only ever produce `InvalidResponse` or `TokenNotFound`.
/// The remaining variants come from input validation, the bounded bridge
/// wait and client/runtime construction.
#[derive(Error, Debug)]
pub enum SmallcatError {
    /// Transport failure, undecodable body, or missing redirect/confirmation markup
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Landing page was readable but carried no authenticity token
    #[error("Unable to find authenticity token")]
    TokenNotFound,

    /// Target URL rejected before any request was made
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Bounded wait in the sync bridge elapsed
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Blocking bridge called from inside an async runtime
    #[error("Blocking call made from inside an async runtime")]
    AsyncContext,

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Async runtime could not be started
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SmallcatError {
    pub(crate) fn invalid_response(context: impl Into<String>) -> Self {
        Self::InvalidResponse(context.into())
    }
}

impl Serialize for SmallcatError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for small.cat operations
pub type Result<T> = std::result::Result<T, SmallcatError>;

//! Error types for the Barcode Check Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a request.
///
/// The display text of each variant is the message returned to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or incomplete request body
    #[error("{0}")]
    Validation(String),

    /// A configuration record or report content is missing
    #[error("{0}")]
    NotFound(String),

    /// HTTP method other than the one the route accepts
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Transport failure or non-2xx status from the analytics API
    #[error("API call failed: {0}")]
    RemoteCall(String),

    /// Error element reported inside an otherwise successful analytics response
    #[error("Error: {0}")]
    RemoteReported(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            Error::MethodNotAllowed => 405,
            _ => 500,
        }
    }
}

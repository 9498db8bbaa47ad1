//! Error types exposed by the ERP approval layer.

use thiserror::Error;

/// Errors surfaced while parsing input or communicating with the ERP backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApprovalError {
    /// The CLI did not include a request URL.
    #[error("request URL is required")]
    MissingRequestUrl,

    /// The provided URL could not be parsed.
    #[error("request URL is invalid: {0}")]
    InvalidUrl(String),

    /// The request path is incomplete.
    #[error("request URL must match /forms/<mif|mrf>/<number>")]
    MissingPathSegments,

    /// The form-kind segment named neither a MIF nor an MRF.
    #[error("unknown form kind `{segment}` (expected `mif` or `mrf`)")]
    UnknownFormKind {
        /// The path segment that failed to parse.
        segment: String,
    },

    /// The form number is not a valid integer.
    #[error("form number must be a positive integer")]
    InvalidFormNumber,

    /// The authentication token was missing.
    #[error("ERP API token is required")]
    MissingToken,

    /// The authentication token was rejected by the backend.
    #[error("the ERP backend rejected the token: {message}")]
    Authentication {
        /// Backend error message returned with the 401/403 response.
        message: String,
    },

    /// The backend returned a non-authentication API error.
    #[error("ERP API error: {message}")]
    Api {
        /// Response body from the backend describing the failure.
        message: String,
    },

    /// Networking failed while calling the backend.
    #[error("network error talking to the ERP backend: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Invalid listing parameters.
    #[error("invalid listing parameters: {message}")]
    InvalidListing {
        /// Description of the invalid parameter.
        message: String,
    },
}

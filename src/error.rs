//! Error types surfaced by the client.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by client operations.
///
/// No failure is retried automatically; every error is surfaced to the
/// caller as soon as it occurs.
#[derive(Error, Debug)]
pub enum Error {
    /// A required string argument was empty or whitespace.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// The release's OS is neither Android nor iOS; only those two
    /// platforms have a default file name.
    #[error(
        "unsupported platform {os:?}: only android and ios releases can be \
         downloaded without an explicit file name"
    )]
    UnsupportedPlatform {
        /// The `app_os` value reported by the API.
        os: String,
    },

    /// Authentication failed (HTTP 401). Check the API token.
    #[error("authentication failed, check the API token: {body}")]
    Auth {
        /// Response body returned by the API.
        body: String,
    },

    /// The owner, app, release or device does not exist (HTTP 404), or a
    /// version query matched no release.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API rejected the request input (HTTP 400).
    #[error("bad request: {body}")]
    BadRequest {
        /// Response body returned by the API.
        body: String,
    },

    /// Any other non-success HTTP status; the body is passed through
    /// verbatim.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code of the response.
        status: StatusCode,
        /// Response body returned by the API.
        body: String,
    },

    /// The download target could not be created, typically because the
    /// directory is missing or inaccessible.
    #[error("download location {path:?} is not writable: {source}")]
    FileSystem {
        /// The path that failed.
        path: PathBuf,
        /// The underlying io error.
        source: std::io::Error,
    },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the expected schema.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

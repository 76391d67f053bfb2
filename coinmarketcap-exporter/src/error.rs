//! Error types for the exporter.

use std::path::PathBuf;

use thiserror::Error;

/// A numeric field that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value: {text:?}")]
pub struct NumericError {
    /// Expected numeric kind ("integer" or "float").
    pub kind: &'static str,
    /// The offending text.
    pub text: String,
}

/// Errors raised while fetching the raw ticker payload.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, timeout or body read failure.
    #[error("Request to ticker API failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The ticker API answered with a non-200 status.
    #[error("HTTP returned code {0}")]
    Status(u16),

    /// The fixture file could not be read.
    #[error("Failed to read fixture {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors that mark a scrape as unavailable.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to decode ticker payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed field {field} for coin {coin}: {source}")]
    Field {
        coin: String,
        field: &'static str,
        #[source]
        source: NumericError,
    },
}

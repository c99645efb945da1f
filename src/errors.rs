/*!
 * Error types for the tablecheck application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document could not be read from disk
    #[error("Failed to read document {path:?}: {source}")]
    Read {
        /// Path of the document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document could not be written to disk
    #[error("Failed to write document {path:?}: {source}")]
    Write {
        /// Path of the document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while locating the table inside a document
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    /// No `<tbody>...</tbody>` pair exists in the text
    #[error("No table body found")]
    TableBodyNotFound,
}

/// Errors raised by a single link probe.
///
/// These never leave the validation layer: every variant degrades to "link invalid".
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a status outside the 2xx range
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// The shared timeout budget ran out
    #[error("Probe timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors caused by invalid configuration values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric setting must be strictly positive
    #[error("Setting '{0}' must be greater than zero")]
    NotPositive(&'static str),

    /// A language code is missing
    #[error("Language code for the {0} document is empty")]
    EmptyLanguageCode(&'static str),

    /// Both documents would resolve to the same file
    #[error("Primary and secondary language codes must differ (both are '{0}')")]
    SameLanguageCodes(String),

    /// The base URL for relative links does not parse
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

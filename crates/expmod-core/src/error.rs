//! Error types for dependency description lookups.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while resolving or describing a dependency.
#[derive(Debug, thiserror::Error)]
pub enum ExpmodError {
    /// The module path does not name an `owner/name` pair.
    #[error("can't determine repository for '{path}'")]
    InvalidReference { path: String },

    /// A server answered with something other than `200 OK`.
    #[error("GET {url:?} - {status}")]
    HttpStatus { url: String, status: String },

    /// The request did not complete within the configured timeout.
    #[error("GET {url:?} - timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    /// Connection, TLS or protocol failure.
    #[error("GET {url:?} - {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A URL could not be built from the configured base and path.
    #[error("invalid URL '{url}': {detail}")]
    InvalidUrl { url: String, detail: String },

    /// None of the discovery metadata tags were present.
    #[error("none of {tags} found in metadata of {url:?}")]
    MetadataNotFound { url: String, tags: String },

    /// Metadata tags were present but named no hosting repository.
    #[error("can't find repository in {tags} metadata of {url:?}")]
    NoRepositoryInMetadata { url: String, tags: String },

    /// An expected HTML element or attribute is missing.
    #[error("{detail} in {url:?}")]
    ElementNotFound { url: String, detail: String },

    /// The repository API returned a body that is not the expected JSON.
    #[error("{url:?}: can't decode JSON - {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid manifest text.
    #[error("manifest line {line}: {detail}")]
    Manifest { line: usize, detail: String },

    /// Cache I/O or format error.
    #[error("cache error at {path}: {detail}")]
    Cache { path: PathBuf, detail: String },

    /// No location could be determined for the cache file.
    #[error("can't determine cache location: {detail}")]
    CacheLocation { detail: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExpmodError {
    /// Map a reqwest failure for `url` into a timeout or transport error.
    pub(crate) fn from_request(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExpmodError::Timeout {
                url: url.to_string(),
                after: timeout,
            }
        } else {
            ExpmodError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// Result type alias for expmod operations.
pub type Result<T> = std::result::Result<T, ExpmodError>;

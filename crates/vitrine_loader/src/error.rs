//! # Loader Error Types
//!
//! All errors that can occur while fetching and decoding the scene payload.

use std::path::PathBuf;

use thiserror::Error;

/// The payload was fetched but cannot be turned into a scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Nothing was received.
    #[error("empty payload")]
    EmptyPayload,

    /// The container or its JSON is not valid glTF.
    #[error("malformed glTF payload: {0}")]
    Malformed(String),

    /// The payload is compressed but the decoder module was never loaded.
    #[error("payload requires {extension} but no decoder module is loaded")]
    DecoderUnavailable {
        /// The compression extension the payload declares.
        extension: String,
    },
}

/// Errors surfaced by the loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request was rejected, failed in transit or timed out.
    #[error("network failure fetching {url}: {reason}")]
    Network {
        /// Location that failed.
        url: String,
        /// Transport-reported cause.
        reason: String,
    },

    /// The payload arrived but could not be decoded.
    #[error("decode failure for {url}: {source}")]
    Decode {
        /// Location the payload came from.
        url: String,
        /// What went wrong while decoding.
        source: DecodeError,
    },
}

impl LoadError {
    /// Location the failing attempt targeted.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. } | Self::Decode { url, .. } => url,
        }
    }

    /// True for transport failures, false for decode failures.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// The decoder module could not be loaded at startup.
#[derive(Error, Debug)]
pub enum DecoderModuleError {
    /// No module file exists at the configured location.
    #[error("no decoder module found at {0}")]
    NotFound(PathBuf),

    /// The module exists but could not be read.
    #[error("failed to read decoder module {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

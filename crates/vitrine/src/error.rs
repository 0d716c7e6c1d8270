//! # Controller Error Types
//!
//! Load failures live in `vitrine_loader`; everything else the controller
//! can report is here.

use std::path::PathBuf;

use thiserror::Error;
use vitrine_loader::DecoderModuleError;

/// Errors raised while loading or validating the runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::VitrineConfig`].
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Media playback failures. Recovered locally, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The platform refused to start playback with sound without a gesture.
    #[error("autoplay with sound was blocked")]
    AutoplayBlocked,

    /// A clip could not be played.
    #[error("cannot play {resource}: {reason}")]
    Playback {
        /// Resource identifier.
        resource: String,
        /// Backend-reported cause.
        reason: String,
    },
}

/// Errors surfaced by [`crate::PortfolioSession`].
#[derive(Error, Debug)]
pub enum VitrineError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The decoder module could not be loaded at startup.
    #[error(transparent)]
    DecoderModule(#[from] DecoderModuleError),

    /// No showcase entry has this identifier.
    #[error("unknown character: {0}")]
    UnknownCharacter(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for session operations.
pub type VitrineResult<T> = Result<T, VitrineError>;

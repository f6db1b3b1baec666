use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Missing required environment variable {name}")]
    MissingVar {
        /// Variable name
        name: &'static str,
    },

    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::AppConfig`]
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors reported by the auth bridge.
///
/// Only lifecycle misuse is reported. Notification handling itself has no
/// error path: whatever the provider delivers is mapped and published, and
/// faults in the provider's channel belong to whoever owns the provider.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// `start` was called while a subscription is still active
    #[error("Auth bridge for provider '{provider}' is already started")]
    AlreadyStarted {
        /// Name of the provider the bridge listens to
        provider: String,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BridgeError {
    /// Returns true if this is a lifecycle error
    pub fn is_already_started(&self) -> bool {
        matches!(self, BridgeError::AlreadyStarted { .. })
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

//! Configuration for the provider connection and the auth store.
//!
//! Provider values are opaque: they are carried to the provider's
//! initialization unchanged and never parsed or validated here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

/// Default name of the store holding the auth state
pub const DEFAULT_STORE_NAME: &str = "auth";

const ENV_PROJECT_ID: &str = "AUTHBRIDGE_PROJECT_ID";
const ENV_API_KEY: &str = "AUTHBRIDGE_API_KEY";
const ENV_APP_ID: &str = "AUTHBRIDGE_APP_ID";
const ENV_AUTH_DOMAIN: &str = "AUTHBRIDGE_AUTH_DOMAIN";
const ENV_DATABASE_URL: &str = "AUTHBRIDGE_DATABASE_URL";
const ENV_STORAGE_BUCKET: &str = "AUTHBRIDGE_STORAGE_BUCKET";
const ENV_MESSAGING_SENDER_ID: &str = "AUTHBRIDGE_MESSAGING_SENDER_ID";
const ENV_STORE_NAME: &str = "AUTHBRIDGE_STORE_NAME";

/// Identity provider connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub project_id: String,
    pub api_key: String,
    pub app_id: String,
    pub auth_domain: String,
    /// Realtime-data endpoint
    #[serde(rename = "databaseURL")]
    pub database_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
}

/// Configuration for the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Provider connection settings
    pub provider: ProviderConfig,
    /// Name given to the auth store in logs
    #[serde(default = "default_store_name")]
    pub store_name: String,
}

fn default_store_name() -> String {
    DEFAULT_STORE_NAME.to_string()
}

impl AppConfig {
    /// Load configuration from `AUTHBRIDGE_*` environment variables.
    ///
    /// Variables in a `.env` file are picked up as well.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingVar { name });

        let provider = ProviderConfig {
            project_id: required(ENV_PROJECT_ID)?,
            api_key: required(ENV_API_KEY)?,
            app_id: required(ENV_APP_ID)?,
            auth_domain: required(ENV_AUTH_DOMAIN)?,
            database_url: required(ENV_DATABASE_URL)?,
            storage_bucket: lookup(ENV_STORAGE_BUCKET),
            messaging_sender_id: lookup(ENV_MESSAGING_SENDER_ID),
        };

        let config = Self {
            provider,
            store_name: lookup(ENV_STORE_NAME).unwrap_or_else(default_store_name),
        };

        info!(project_id = %config.provider.project_id, "Loaded configuration from environment");
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading config file");

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            project_id = %config.provider.project_id,
            "Loaded configuration from file"
        );
        Ok(config)
    }
}

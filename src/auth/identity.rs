use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity record as supplied by the provider.
///
/// The bridge forwards it verbatim and only cares whether one is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider-assigned user identifier
    #[serde(rename = "id")]
    pub uid: String,

    /// Primary email address, if the provider exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Any further claims downstream consumers need
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub claims: HashMap<String, Value>,
}

impl Identity {
    /// Create an identity with only a user identifier
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            claims: HashMap::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Get a claim, deserialized into `T`
    pub fn claim<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        match self.claims.get(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| anyhow!("Failed to deserialize claim '{}': {}", key, e)),
            None => Err(anyhow!("Claim '{}' not found", key)),
        }
    }

    /// Set a claim
    pub fn set_claim<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| anyhow!("Failed to serialize claim '{}': {}", key, e))?;
        self.claims.insert(key.to_string(), json_value);
        Ok(())
    }
}

/// Marks who produced an auth state transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateOrigin {
    /// Produced from the provider's own notification stream
    #[default]
    ProviderControlled,
}

/// Snapshot of the authentication status published to the store.
///
/// Fields are private so `is_logged_in` can only ever be derived from the
/// presence of `user`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    is_logged_in: bool,
    user: Option<Identity>,
    origin: StateOrigin,
}

impl AuthState {
    /// Build the state for one provider notification
    pub fn from_identity(identity: Option<Identity>) -> Self {
        Self {
            is_logged_in: identity.is_some(),
            user: identity,
            origin: StateOrigin::ProviderControlled,
        }
    }

    /// The state before any notification has arrived
    pub fn logged_out() -> Self {
        Self::from_identity(None)
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn origin(&self) -> StateOrigin {
        self.origin
    }

    /// Shortcut for the signed-in user's identifier
    pub fn uid(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.uid.as_str())
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::logged_out()
    }
}

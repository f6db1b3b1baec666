//! Mirrors an identity provider's authentication-state notifications into a
//! process-wide reactive store.
//!
//! Flow is one-directional: provider -> [`AuthBridge`] -> store.

pub mod auth;
pub mod callback_system;
pub mod common;
pub mod config;
pub mod error;
pub mod telemetry;

pub use auth::{
    new_auth_store, AuthBridge, AuthListener, AuthState, AuthStore, Identity, IdentityProvider,
    LocalIdentityProvider, StateOrigin,
};
pub use callback_system::{ChannelStats, ListenerId, NotificationChannel, Subscription};
pub use common::{SharedStore, StateStore, StoreObserver};
pub use config::{AppConfig, ProviderConfig};
pub use error::{BridgeError, BridgeResult, ConfigError};

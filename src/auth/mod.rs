pub mod bridge;
pub mod identity;
pub mod local;
pub mod provider;

pub use bridge::AuthBridge;
pub use identity::{AuthState, Identity, StateOrigin};
pub use local::LocalIdentityProvider;
pub use provider::{AuthListener, IdentityProvider};

use crate::common::SharedStore;

/// The process-wide store holding the latest [`AuthState`]
pub type AuthStore = SharedStore<AuthState>;

/// Create an auth store, starting logged out
pub fn new_auth_store(name: &str) -> AuthStore {
    SharedStore::with_name(AuthState::logged_out(), name)
}

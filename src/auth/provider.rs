use async_trait::async_trait;

use crate::auth::identity::Identity;
use crate::callback_system::Subscription;

/// Callback invoked with each authentication notification.
///
/// `None` means logged out.
pub type AuthListener = Box<dyn Fn(Option<Identity>) + Send + Sync>;

/// Interface to an external identity provider.
///
/// The provider owns credential validation, session persistence and token
/// refresh. All we consume is its change-notification stream.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Register a listener for authentication state changes.
    ///
    /// Implementations must invoke the listener once with the state already
    /// known at registration, then once per change, in order and never
    /// concurrently. Dropping or cancelling the returned subscription stops
    /// delivery.
    async fn on_auth_state_changed(&self, listener: AuthListener) -> Subscription;
}

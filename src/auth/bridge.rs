use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::identity::{AuthState, Identity};
use crate::auth::provider::{AuthListener, IdentityProvider};
use crate::callback_system::Subscription;
use crate::common::StateStore;
use crate::error::{BridgeError, BridgeResult};

/// Mirrors an identity provider's authentication state into a store.
///
/// Every provider notification becomes exactly one write of a fresh
/// [`AuthState`], in the order the provider delivered them. Nothing is
/// filtered or deduplicated: two identical notifications produce two
/// identical writes. The bridge never reads the store.
///
/// The bridge is error-transparent. Mapping a notification cannot fail, and
/// if the provider's channel goes away the listener just stops receiving;
/// reconnecting is up to whoever owns the provider.
pub struct AuthBridge<P, S>
where
    P: IdentityProvider + ?Sized,
    S: StateStore<AuthState> + ?Sized + 'static,
{
    provider: Arc<P>,
    store: Arc<S>,
    subscription: RwLock<Option<Subscription>>,
}

impl<P, S> AuthBridge<P, S>
where
    P: IdentityProvider + ?Sized,
    S: StateStore<AuthState> + ?Sized + 'static,
{
    /// Wire a provider to a store. Nothing is subscribed until [`start`](Self::start).
    pub fn new(provider: Arc<P>, store: Arc<S>) -> Self {
        Self {
            provider,
            store,
            subscription: RwLock::new(None),
        }
    }

    /// Register the bridge's listener with the provider.
    ///
    /// Returns as soon as the listener is registered; the provider's current
    /// state arrives asynchronously through the listener like any change.
    pub async fn start(&self) -> BridgeResult<()> {
        let mut slot = self.subscription.write().await;

        if slot.as_ref().is_some_and(Subscription::is_active) {
            return Err(BridgeError::AlreadyStarted {
                provider: self.provider.name().to_string(),
            });
        }

        let store = Arc::clone(&self.store);
        let provider_name = self.provider.name().to_string();
        let listener: AuthListener = Box::new(move |identity| {
            publish(store.as_ref(), &provider_name, identity);
        });

        let subscription = self.provider.on_auth_state_changed(listener).await;
        info!(
            provider = %self.provider.name(),
            listener_id = %subscription.id(),
            "Auth bridge started"
        );

        *slot = Some(subscription);
        Ok(())
    }

    /// Cancel the provider subscription. Returns false if the bridge was not started.
    ///
    /// Notifications emitted after this returns are not written to the store.
    /// A stopped bridge can be started again.
    pub async fn stop(&self) -> bool {
        let Some(mut subscription) = self.subscription.write().await.take() else {
            debug!(provider = %self.provider.name(), "Auth bridge was not running");
            return false;
        };

        subscription.cancel();
        info!(provider = %self.provider.name(), "Auth bridge stopped");
        true
    }

    /// Whether the provider subscription is live
    pub async fn is_running(&self) -> bool {
        self.subscription
            .read()
            .await
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

/// Map one notification and overwrite the store with it
fn publish<S>(store: &S, provider: &str, identity: Option<Identity>)
where
    S: StateStore<AuthState> + ?Sized,
{
    let state = AuthState::from_identity(identity);
    debug!(
        provider,
        is_logged_in = state.is_logged_in(),
        uid = state.uid().unwrap_or("-"),
        "Publishing auth state"
    );
    store.set(state);
}

use async_trait::async_trait;
use tracing::info;

use crate::auth::identity::Identity;
use crate::auth::provider::{AuthListener, IdentityProvider};
use crate::callback_system::{ChannelStats, NotificationChannel, Subscription};
use crate::config::ProviderConfig;

const PROVIDER_NAME: &str = "local";

/// In-process identity provider.
///
/// Holds the current user in memory and announces every sign-in and
/// sign-out to its listeners. No credentials are checked.
pub struct LocalIdentityProvider {
    config: ProviderConfig,
    notifications: NotificationChannel<Option<Identity>>,
}

impl LocalIdentityProvider {
    /// Initialize the provider from its connection settings, starting signed out
    pub fn initialize(config: ProviderConfig) -> Self {
        info!(
            provider = PROVIDER_NAME,
            project_id = %config.project_id,
            auth_domain = %config.auth_domain,
            "Initializing identity provider"
        );

        Self {
            config,
            notifications: NotificationChannel::with_group(None, PROVIDER_NAME),
        }
    }

    /// Sign a user in. Returns how many listeners were notified.
    pub async fn sign_in(&self, identity: Identity) -> usize {
        info!(provider = PROVIDER_NAME, uid = %identity.uid, "User signed in");
        self.notifications.emit(Some(identity)).await
    }

    /// Sign the current user out. Returns how many listeners were notified.
    ///
    /// Signing out while already signed out still notifies.
    pub async fn sign_out(&self) -> usize {
        info!(provider = PROVIDER_NAME, "User signed out");
        self.notifications.emit(None).await
    }

    /// The currently signed-in user
    pub async fn current_user(&self) -> Option<Identity> {
        self.notifications.current().await
    }

    /// The settings the provider was initialized with
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn listener_count(&self) -> usize {
        self.notifications.count()
    }

    pub async fn stats(&self) -> ChannelStats {
        self.notifications.stats().await
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn on_auth_state_changed(&self, listener: AuthListener) -> Subscription {
        self.notifications.register(listener).await
    }
}

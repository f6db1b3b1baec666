//! Integration tests for notification flow from provider to store
use anyhow::Result;

use crate::test_harness::TestEnvironment;
use authbridge::{AuthState, Identity, StateOrigin};

fn user_one() -> Identity {
    Identity::new("u1").with_email("a@example.com")
}

/// Signed-out provider publishes a logged-out state on registration
#[tokio::test]
async fn test_logged_out_at_registration() -> Result<()> {
    let env = TestEnvironment::new();

    env.bridge.start().await?;
    assert!(env.wait_for_writes(1, 2000).await, "Initial state should be published");

    let state = env.store.last().unwrap();
    assert!(!state.is_logged_in());
    assert!(state.user().is_none());
    assert_eq!(state.origin(), StateOrigin::ProviderControlled);
    Ok(())
}

/// A signed-in provider publishes the identity verbatim
#[tokio::test]
async fn test_signed_in_identity_published() -> Result<()> {
    let env = TestEnvironment::new();
    env.provider.sign_in(user_one()).await;

    env.bridge.start().await?;
    assert!(env.wait_for_writes(1, 2000).await);

    let state = env.store.last().unwrap();
    assert!(state.is_logged_in());
    assert_eq!(state.user(), Some(&user_one()));
    assert_eq!(state.origin(), StateOrigin::ProviderControlled);
    assert_eq!(env.settled_write_count().await, 1, "Only the current state is replayed");
    Ok(())
}

/// Sign-in followed by an immediate sign-out lands as two ordered writes
#[tokio::test]
async fn test_login_then_logout() -> Result<()> {
    let env = TestEnvironment::new();
    env.bridge.start().await?;

    env.provider.sign_in(user_one()).await;
    env.provider.sign_out().await;

    assert!(env.wait_for_writes(3, 2000).await);
    let history = env.store.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1], AuthState::from_identity(Some(user_one())));
    assert_eq!(history[2], AuthState::logged_out());
    Ok(())
}

/// N notifications produce exactly N writes in emit order
#[tokio::test]
async fn test_order_preserved_across_many_notifications() -> Result<()> {
    let env = TestEnvironment::new();
    env.bridge.start().await?;

    let mut expected = vec![AuthState::logged_out()];
    for i in 0..200 {
        if i % 4 == 3 {
            env.provider.sign_out().await;
            expected.push(AuthState::logged_out());
        } else {
            let identity = Identity::new(format!("user-{i}"));
            env.provider.sign_in(identity.clone()).await;
            expected.push(AuthState::from_identity(Some(identity)));
        }
    }

    assert!(env.wait_for_writes(expected.len(), 5000).await);
    assert_eq!(env.settled_write_count().await, expected.len());

    let history = env.store.history();
    for state in &history {
        assert_eq!(state.is_logged_in(), state.user().is_some());
        assert_eq!(state.origin(), StateOrigin::ProviderControlled);
    }
    assert_eq!(history, expected);
    Ok(())
}

/// Identical notifications are written every time
#[tokio::test]
async fn test_repeated_identity_written_twice() -> Result<()> {
    let env = TestEnvironment::new();
    env.bridge.start().await?;

    env.provider.sign_in(user_one()).await;
    env.provider.sign_in(user_one()).await;
    env.provider.sign_out().await;
    env.provider.sign_out().await;

    assert!(env.wait_for_writes(5, 2000).await);
    let history = env.store.history();
    assert_eq!(history.len(), 5);
    assert_eq!(history[1], history[2]);
    assert_eq!(history[3], history[4]);
    Ok(())
}

/// The provider itself tracks the state the bridge mirrors
#[tokio::test]
async fn test_store_mirrors_provider_current_user() -> Result<()> {
    let env = TestEnvironment::new();
    env.bridge.start().await?;

    env.provider.sign_in(user_one()).await;
    assert!(env.wait_for_writes(2, 2000).await);

    let current = env.provider.current_user().await;
    assert_eq!(env.store.last(), Some(AuthState::from_identity(current)));

    let stats = env.provider.stats().await;
    assert_eq!(stats.notifications_emitted, 1);
    assert_eq!(stats.deliveries_queued, 2);
    Ok(())
}

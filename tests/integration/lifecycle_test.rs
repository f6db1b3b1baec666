//! Integration tests for starting and stopping the bridge
use anyhow::Result;

use crate::test_harness::TestEnvironment;
use authbridge::{BridgeError, Identity};

#[tokio::test]
async fn test_start_registers_one_listener() -> Result<()> {
    let env = TestEnvironment::new();
    assert_eq!(env.provider.listener_count(), 0);
    assert!(!env.bridge.is_running().await);

    env.bridge.start().await?;

    assert_eq!(env.provider.listener_count(), 1);
    assert!(env.bridge.is_running().await);
    Ok(())
}

#[tokio::test]
async fn test_second_start_fails_without_extra_listener() -> Result<()> {
    let env = TestEnvironment::new();
    env.bridge.start().await?;

    let err = env.bridge.start().await.unwrap_err();
    assert!(matches!(err, BridgeError::AlreadyStarted { ref provider } if provider == "local"));
    assert_eq!(env.provider.listener_count(), 1);

    env.provider.sign_in(Identity::new("u1")).await;
    assert!(env.wait_for_writes(2, 2000).await);
    assert_eq!(env.settled_write_count().await, 2, "One write per notification");
    Ok(())
}

#[tokio::test]
async fn test_stop_halts_writes() -> Result<()> {
    let env = TestEnvironment::new();
    env.bridge.start().await?;
    assert!(env.wait_for_writes(1, 2000).await);

    assert!(env.bridge.stop().await);
    assert!(!env.bridge.stop().await);
    assert_eq!(env.provider.listener_count(), 0);

    assert_eq!(env.provider.sign_in(Identity::new("u1")).await, 0);
    assert_eq!(env.settled_write_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_restart_replays_current_state() -> Result<()> {
    let env = TestEnvironment::new();
    env.bridge.start().await?;
    assert!(env.wait_for_writes(1, 2000).await);
    env.bridge.stop().await;

    env.provider.sign_in(Identity::new("u7")).await;
    env.bridge.start().await?;

    assert!(env.wait_for_writes(2, 2000).await);
    let state = env.store.last().unwrap();
    assert!(state.is_logged_in());
    assert_eq!(state.uid(), Some("u7"));
    Ok(())
}

#[tokio::test]
async fn test_drop_unsubscribes() -> Result<()> {
    let env = TestEnvironment::new();
    env.bridge.start().await?;
    let TestEnvironment { provider, store, bridge } = env;

    drop(bridge);

    assert_eq!(provider.listener_count(), 0);
    provider.sign_out().await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(store.write_count() <= 1);
    Ok(())
}

//! Integration test harness for authbridge
//! Provides a recording store double and a wired-up provider/bridge pair

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{sleep, Instant};

use authbridge::{AuthBridge, AuthState, LocalIdentityProvider, ProviderConfig, StateStore};

/// Store double that keeps every write in order
#[derive(Default)]
pub struct RecordingStore {
    writes: Mutex<Vec<AuthState>>,
}

impl RecordingStore {
    /// Every write so far, oldest first
    pub fn history(&self) -> Vec<AuthState> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<AuthState> {
        self.writes.lock().unwrap().last().cloned()
    }
}

impl StateStore<AuthState> for RecordingStore {
    fn set(&self, value: AuthState) {
        self.writes.lock().unwrap().push(value);
    }
}

/// Provider settings with throwaway values
pub fn test_provider_config() -> ProviderConfig {
    ProviderConfig {
        project_id: "authbridge-test".to_string(),
        api_key: "test-api-key".to_string(),
        app_id: "1:0:web:test".to_string(),
        auth_domain: "authbridge-test.example.com".to_string(),
        database_url: "https://authbridge-test.example-rtdb.net".to_string(),
        storage_bucket: None,
        messaging_sender_id: None,
    }
}

/// Test environment for integration tests
pub struct TestEnvironment {
    pub provider: Arc<LocalIdentityProvider>,
    pub store: Arc<RecordingStore>,
    pub bridge: AuthBridge<LocalIdentityProvider, RecordingStore>,
}

impl TestEnvironment {
    /// Create a new test environment; the bridge is not started
    pub fn new() -> Self {
        let provider = Arc::new(LocalIdentityProvider::initialize(test_provider_config()));
        let store = Arc::new(RecordingStore::default());
        let bridge = AuthBridge::new(Arc::clone(&provider), Arc::clone(&store));

        Self {
            provider,
            store,
            bridge,
        }
    }

    /// Wait until the store has seen at least `count` writes
    pub async fn wait_for_writes(&self, count: usize, timeout_ms: u64) -> bool {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        while Instant::now() < deadline {
            if self.store.write_count() >= count {
                return true;
            }
            sleep(Duration::from_millis(5)).await;
        }

        self.store.write_count() >= count
    }

    /// Give in-flight deliveries a chance to land, then report the write count
    pub async fn settled_write_count(&self) -> usize {
        sleep(Duration::from_millis(50)).await;
        self.store.write_count()
    }
}

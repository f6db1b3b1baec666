//! Common utilities for authbridge.
//!
//! Holds the reactive store primitive the bridge writes into.

pub mod shared_state;

pub use shared_state::{SharedStore, StateStore, StoreObserver};

//! Key-value persistence port.
//!
//! Defines the interface every persisted store in turnmark talks to.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// An abstract, asynchronous key-value store holding JSON values.
///
/// This trait decouples the pinned, favorite and archive stores from the
/// concrete backend (in-memory map, JSON files, a host-provided store).
///
/// # Implementation Notes
///
/// - No transactions: a `get` followed by a `set` may interleave with other
///   writers, and the last write wins.
/// - Implementations may fail on any call. Callers decide whether a failure
///   degrades to a default or propagates.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: A value is stored
    /// - `Ok(None)`: Nothing stored under this key
    /// - `Err(_)`: The backend failed
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

//! Test doubles shared by the store tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use turnmark_core::error::{Result, TurnmarkError};
use turnmark_core::storage::KeyValueStore;
use turnmark_infrastructure::MemoryKeyValueStore;

/// In-memory store whose reads and/or writes can be made to fail.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryKeyValueStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn reads() -> Self {
        let store = Self::default();
        store.set_fail_reads(true);
        store
    }

    pub fn writes() -> Self {
        let store = Self::default();
        store.set_fail_writes(true);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TurnmarkError::data_access("backend unavailable"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TurnmarkError::data_access("backend is read-only"));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TurnmarkError::data_access("backend is read-only"));
        }
        self.inner.remove(key).await
    }
}

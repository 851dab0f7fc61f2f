//! Test progress stores — fake `ProgressStore` implementations for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use branchline_core::error::StorageError;
use branchline_core::progress::{ProgressStore, decode_index, encode_index};

#[derive(Debug, Default)]
struct Slot {
    raw: Option<String>,
    writes: Vec<usize>,
}

/// An in-memory progress store that records every write.
///
/// Clones share the same slot, so handing a clone to a second session
/// simulates relaunching the app on the same device.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStore {
    slot: Arc<Mutex<Slot>>,
}

impl InMemoryProgressStore {
    /// Create an empty store (a fresh install).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `index`.
    #[must_use]
    pub fn with_index(index: usize) -> Self {
        Self::with_raw(&encode_index(index))
    }

    /// Create a store whose record holds an arbitrary raw string.
    #[must_use]
    pub fn with_raw(raw: &str) -> Self {
        let store = Self::default();
        store.slot.lock().unwrap().raw = Some(raw.to_owned());
        store
    }

    /// Returns every index written, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<usize> {
        self.slot.lock().unwrap().writes.clone()
    }

    /// Returns the raw persisted value.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().unwrap().raw.clone()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn read(&self) -> Result<Option<usize>, StorageError> {
        let raw = self.slot.lock().unwrap().raw.clone();
        raw.as_deref().map(decode_index).transpose()
    }

    async fn write(&self, index: usize) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().unwrap();
        slot.raw = Some(encode_index(index));
        slot.writes.push(index);
        Ok(())
    }
}

/// A progress store whose reads and writes always fail.
#[derive(Debug)]
pub struct FailingProgressStore;

#[async_trait]
impl ProgressStore for FailingProgressStore {
    async fn read(&self) -> Result<Option<usize>, StorageError> {
        Err(StorageError::Io("disk unavailable".into()))
    }

    async fn write(&self, _index: usize) -> Result<(), StorageError> {
        Err(StorageError::Io("disk unavailable".into()))
    }
}

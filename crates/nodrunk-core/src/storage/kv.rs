//! Key-value store abstraction.
//!
//! The host app and the messages extension share one keyed store. Values
//! are opaque bytes here; [`super::SharedStore`] owns the JSON encoding.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::StoreError;

/// A string-keyed byte store with last-write-wins semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Stand-in for a store that could not be opened. Every read and write
/// fails with [`StoreError::Unavailable`], so evaluation fails open and
/// edits are rejected.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing any encoding.
    pub fn with_raw(self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.entries.borrow_mut().insert(key.to_string(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// A memory store whose reads can be made to fail on demand.
#[cfg(test)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failing_reads: std::cell::Cell<usize>,
}

#[cfg(test)]
impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing_reads: std::cell::Cell::new(0),
        }
    }

    /// The next `n` calls to `get` return `StoreError::Locked`.
    pub fn fail_next_reads(&self, n: usize) {
        self.failing_reads.set(n);
    }
}

#[cfg(test)]
impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let remaining = self.failing_reads.get();
        if remaining > 0 {
            self.failing_reads.set(remaining - 1);
            return Err(StoreError::Locked);
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.inner.set(key, value)
    }
}

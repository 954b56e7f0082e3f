//! Bounded key-value store behind the `set` and `get` built-ins.

use heapless::{String, Vec};

use super::MAX_PARAM_LEN;
use crate::Error;

/// Maximum number of distinct keys the store holds.
pub const MAX_KEYS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String<MAX_PARAM_LEN>,
    value: String<MAX_PARAM_LEN>,
}

/// Fixed-capacity map from short keys to short values.
///
/// Lookup is linear. Setting an existing key overwrites its value in place;
/// new keys fail with [`Error::StoreFull`] once [`MAX_KEYS`] entries exist.
#[derive(Debug, Default, Clone)]
pub struct Store {
    entries: Vec<Entry, MAX_KEYS>,
}

impl Store {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key.as_str() == key)
            .map(|entry| entry.value.as_str())
    }

    /// Insert or overwrite `key`.
    ///
    /// Keys and values longer than [`MAX_PARAM_LEN`] are rejected with
    /// [`Error::MissingParameter`]; an empty key with
    /// [`Error::InvalidArgument`]. The store is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let value = String::try_from(value).map_err(|_| Error::MissingParameter)?;

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.key.as_str() == key)
        {
            entry.value = value;
            return Ok(());
        }

        let key = String::try_from(key).map_err(|_| Error::MissingParameter)?;
        self.entries
            .push(Entry { key, value })
            .map_err(|_| Error::StoreFull)
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.value.as_str()))
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

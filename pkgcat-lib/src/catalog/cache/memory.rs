use super::CacheBackend;
use crate::Result;
use core::time::Duration;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

const LOG_TARGET: &str = "     cache";

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Process-local cache backend guarded by a mutex.
///
/// Expiry uses tokio's clock, so paused-time tests can advance past a TTL
/// without sleeping.
#[derive(Debug)]
pub struct MemoryBackend<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V> MemoryBackend<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    // A panic while holding the lock cannot leave a half-written entry behind,
    // so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> Default for MemoryBackend<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheBackend<V> for MemoryBackend<V>
where
    V: Clone + core::fmt::Debug + Send,
{
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                log::debug!(target: LOG_TARGET, "Cache hit for {key}");
                Some(entry.value.clone())
            }
            Some(_) => {
                log::debug!(target: LOG_TARGET, "Cache expired for {key}");
                let _ = entries.remove(key);
                None
            }
            None => {
                log::debug!(target: LOG_TARGET, "Cache miss for {key}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        let expires_at = Instant::now() + ttl;
        let _ = self.lock().insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock().clear();
        Ok(())
    }
}

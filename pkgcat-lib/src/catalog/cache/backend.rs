use crate::Result;
use core::fmt::Debug;
use core::time::Duration;

/// Key/value storage with per-entry expiry.
///
/// Implementations must tolerate concurrent calls from many lookup tasks.
/// An expired entry behaves exactly like a missing one.
pub trait CacheBackend<V>: Debug + Send + Sync {
    /// Returns the value stored under `key` if it has not expired.
    fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous entry, valid for `ttl`.
    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;
}

//! Cache backend storing one JSON envelope per key on disk.
//!
//! Entries survive process restarts, which keeps repeated CLI invocations from
//! re-querying hosting APIs within the TTL window.

use super::CacheBackend;
use crate::Result;
use chrono::{DateTime, Utc};
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData;
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use ohno::IntoAppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "     cache";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// On-disk representation of a cache entry.
#[derive(Debug, Deserialize, Serialize)]
struct Envelope<T> {
    timestamp: DateTime<Utc>,
    #[serde(with = "humantime_serde")]
    ttl: Duration,
    payload: T,
}

/// A TTL-aware, directory-backed JSON cache.
pub struct FileBackend<V> {
    dir: PathBuf,
    _value: PhantomData<fn() -> V>,
}

impl<V> Debug for FileBackend<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileBackend").field("dir", &self.dir).finish()
    }
}

impl<V> FileBackend<V> {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _value: PhantomData,
        }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a `/`-separated key to a file below the cache directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let mut components: Vec<String> = key.split('/').filter(|c| !c.is_empty()).map(sanitize_path_component).collect();
        let file_name = format!("{}.json", components.pop().unwrap_or_default());

        let mut path = self.dir.clone();
        path.extend(components);
        path.push(file_name);
        path
    }

    fn load_envelope(path: &Path, key: &str) -> Option<Envelope<V>>
    where
        V: DeserializeOwned,
    {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for {key}: {e:#}");
                return None;
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Discarding unreadable cache entry for {key}: {e:#}");
                None
            }
        }
    }
}

impl<V> CacheBackend<V> for FileBackend<V>
where
    V: Serialize + DeserializeOwned,
{
    fn get(&self, key: &str) -> Option<V> {
        let envelope = Self::load_envelope(&self.path_for(key), key)?;

        // Future timestamps (clock skew) are treated as fresh
        let age = Utc::now().signed_duration_since(envelope.timestamp);
        if age.num_milliseconds() < 0 {
            log::debug!(target: LOG_TARGET, "Cache timestamp is in the future for {key}, treating as fresh");
            return Some(envelope.payload);
        }

        let age = age.to_std().unwrap_or(Duration::MAX);
        if age >= envelope.ttl {
            log::debug!(target: LOG_TARGET, "Cache expired for {key} (age: {}s, TTL: {}s)", age.as_secs(), envelope.ttl.as_secs());
            return None;
        }

        log::debug!(target: LOG_TARGET, "Cache hit for {key} (age: {}s)", age.as_secs());
        Some(envelope.payload)
    }

    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{}'", parent.display()))?;
        }

        let envelope = Envelope {
            timestamp: Utc::now(),
            ttl,
            payload: value,
        };

        // Write to a sibling temp file and rename so concurrent readers never see a partial entry
        let unique = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_path = path.with_extension(format!("json.{}-{unique}.tmp", std::process::id()));
        let file = File::create(&tmp_path).into_app_err_with(|| format!("creating cache file '{}'", tmp_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &envelope).into_app_err_with(|| format!("writing cache file '{}'", tmp_path.display()))?;
        writer
            .flush()
            .into_app_err_with(|| format!("flushing cache file '{}'", tmp_path.display()))?;
        drop(writer);

        fs::rename(&tmp_path, &path).into_app_err_with(|| format!("replacing cache file '{}'", path.display()))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).into_app_err_with(|| format!("removing cache directory '{}'", self.dir.display())),
        }
        fs::create_dir_all(&self.dir).into_app_err_with(|| format!("creating cache directory '{}'", self.dir.display()))
    }
}

/// Replaces path traversal sequences and characters that are unsafe in file names.
fn sanitize_path_component(s: &str) -> String {
    s.replace("..", "__").replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_")
}

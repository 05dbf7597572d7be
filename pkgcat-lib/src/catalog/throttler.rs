use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Bounds the number of concurrent metrics lookups and lets any lookup
/// suspend new dispatches while a host's rate limit is in effect.
///
/// When overlapping pauses are requested, the one ending last wins.
#[derive(Debug)]
pub struct Throttler {
    slots: Arc<Semaphore>,
    paused: AtomicBool,
    resume_at: Mutex<Option<Instant>>,
}

impl Throttler {
    /// Minimum extension required for a new pause to replace an active one.
    const MIN_PAUSE_EXTENSION: Duration = Duration::from_secs(1);

    /// Create a throttler admitting at most `max_concurrent` lookups at once.
    pub fn new(max_concurrent: usize) -> Arc<Self> {
        Arc::new(Self {
            slots: Arc::new(Semaphore::new(max_concurrent)),
            paused: AtomicBool::new(false),
            resume_at: Mutex::new(None),
        })
    }

    /// Take a slot, waiting for one to free up if all are busy.
    ///
    /// Returns `None` without waiting when dispatch is paused, or becomes paused
    /// while waiting for a slot, so callers can fall back immediately instead of
    /// queueing behind a rate limit. The slot is released when the permit drops.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        if self.is_paused() {
            return None;
        }

        let permit = Arc::clone(&self.slots).acquire_owned().await.ok()?;
        if self.is_paused() {
            return None;
        }

        Some(permit)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Hold back new lookups for `duration`. Lookups already running continue.
    ///
    /// Returns `false` when an equal or longer pause is already active.
    pub fn pause_for(self: &Arc<Self>, duration: Duration) -> bool {
        let new_resume_at = Instant::now() + duration;

        {
            let mut resume_at = self.resume_at.lock().unwrap_or_else(PoisonError::into_inner);
            if resume_at.is_some_and(|existing| existing + Self::MIN_PAUSE_EXTENSION >= new_resume_at) {
                return false;
            }
            *resume_at = Some(new_resume_at);
        }

        self.paused.store(true, Ordering::Release);

        let this = Arc::clone(self);
        drop(tokio::spawn(async move {
            tokio::time::sleep_until(new_resume_at).await;

            let should_resume = {
                let mut resume_at = this.resume_at.lock().unwrap_or_else(PoisonError::into_inner);
                if resume_at.is_some_and(|t| Instant::now() >= t) {
                    *resume_at = None;
                    true
                } else {
                    false
                }
            };

            if should_resume {
                this.paused.store(false, Ordering::Release);
            }
        }));

        true
    }
}

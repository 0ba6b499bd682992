//! Resolution cache: last-resolved base URL plus the timestamp of the last
//! resolution attempt, updated as a pair under one lock.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

struct ResolutionState {
    current: String,
    last_resolved_at: Option<Instant>,
}

pub struct ResolutionCache {
    state: Mutex<ResolutionState>,
}

impl ResolutionCache {
    /// Starts on the fallback URL with no resolution attempt recorded, so
    /// the first access is always considered stale.
    pub fn new(fallback: String) -> Self {
        ResolutionCache {
            state: Mutex::new(ResolutionState { current: fallback, last_resolved_at: None }),
        }
    }

    pub fn get(&self) -> String {
        self.lock().current.clone()
    }

    pub fn is_stale(&self, interval: Duration) -> bool {
        match self.lock().last_resolved_at {
            Some(at) => at.elapsed() >= interval,
            None => true,
        }
    }

    /// Records a resolution attempt without touching the URL. Stamped before
    /// probing starts so concurrent non-forced callers see "not stale" and
    /// keep using the old value while the probe chain is in flight.
    pub fn touch(&self, now: Instant) {
        self.lock().last_resolved_at = Some(now);
    }

    /// Overwrites URL and timestamp together; readers never see one half.
    pub fn set(&self, url: String, now: Instant) {
        let mut s = self.lock();
        s.current = url;
        s.last_resolved_at = Some(now);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ResolutionState> {
        // A poisoned lock means a panic mid-update of two plain fields;
        // the state itself is still consistent enough to keep serving.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

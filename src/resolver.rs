//! Resolver: walks the candidate list through the probe, caches the winner,
//! re-validates on staleness and on network-change events.

use crate::cache::ResolutionCache;
use crate::config::{ConfigError, ResolverConfig};
use crate::probe::{HttpProber, ProbeOutcome, Prober};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Decides which base URL the rest of the client should talk to.
///
/// Construct one per process at startup and hand it (in an `Arc`) to every
/// collaborator that issues API requests. `base_url` is the everyday read;
/// it only re-probes when the cached value has gone stale. `refresh(true)`
/// is for startup, OS network-change events, and an explicit
/// "test connection" action.
///
/// Neither call ever fails: when every candidate is unreachable the last
/// known good URL (initially the least-preferred candidate) is returned
/// unchanged.
pub struct Resolver {
    config: ResolverConfig,
    prober: Arc<dyn Prober>,
    cache: ResolutionCache,
    /// Serializes probe chains and cache writes: one refresh resolves at a
    /// time, so a slow stale probe can never overwrite a newer result.
    gate: Mutex<()>,
    current: watch::Sender<String>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self, ConfigError> {
        let prober = Arc::new(HttpProber::new(
            config.probe_path.clone(),
            config.success_range,
        ));
        Resolver::with_prober(config, prober)
    }

    /// Same as [`Resolver::new`] but with an injected probe, for tests.
    pub fn with_prober(
        config: ResolverConfig,
        prober: Arc<dyn Prober>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let fallback = config.fallback_url().to_string();
        let (current, _) = watch::channel(fallback.clone());
        Ok(Resolver {
            config,
            prober,
            cache: ResolutionCache::new(fallback),
            gate: Mutex::new(()),
            current,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The base URL all ordinary API calls should use. Cheap when the cached
    /// value is fresh; otherwise runs one probe chain first.
    pub async fn base_url(&self) -> String {
        self.refresh(false).await
    }

    /// Re-resolves the base URL and returns it.
    ///
    /// Non-forced calls return the cached value while it is fresh, and
    /// coalesce with an in-flight refresh instead of starting a second probe
    /// chain. Forced calls always probe.
    pub async fn refresh(&self, force: bool) -> String {
        if !force && !self.cache.is_stale(self.config.recheck_interval) {
            return self.cache.get();
        }
        let _gate = self.gate.lock().await;
        if !force && !self.cache.is_stale(self.config.recheck_interval) {
            // another refresh landed while we waited for the gate
            return self.cache.get();
        }
        // Stamp the attempt before probing: concurrent non-forced callers
        // see "not stale" and keep the old URL until this chain finishes.
        self.cache.touch(Instant::now());
        for candidate in &self.config.candidates {
            if self.prober.probe(candidate).await == ProbeOutcome::Reachable {
                let url = candidate.url.clone();
                self.cache.set(url.clone(), Instant::now());
                // only wake subscribers when the URL actually changed
                let changed = self.current.send_if_modified(|cur| {
                    if *cur == url {
                        return false;
                    }
                    *cur = url.clone();
                    true
                });
                if changed {
                    log::info!("base URL resolved to {}", url);
                }
                return url;
            }
        }
        // Sticky last good: total exhaustion keeps the cached URL.
        let kept = self.cache.get();
        log::warn!("no candidate reachable, keeping {}", kept);
        kept
    }

    /// Forced refresh for OS network-interface change notifications.
    pub async fn network_changed(&self) -> String {
        log::info!("network change reported, re-resolving base URL");
        self.refresh(true).await
    }

    /// Last resolved URL without any probing, for UI display.
    pub fn current(&self) -> String {
        self.cache.get()
    }

    /// Watch the resolved URL; the receiver yields every change.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }
}

/// Periodic non-forced revalidation on the configured re-check interval.
pub fn spawn_revalidation_loop(resolver: Arc<Resolver>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(resolver.config.recheck_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; startup already did a forced refresh
        ticker.tick().await;
        loop {
            ticker.tick().await;
            resolver.refresh(false).await;
        }
    })
}

/// Forces a refresh for every network-change event on `events`. Ends when
/// the sender side is dropped.
pub fn spawn_network_watcher(
    resolver: Arc<Resolver>,
    mut events: mpsc::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while events.recv().await.is_some() {
            resolver.network_changed().await;
        }
    })
}

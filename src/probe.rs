//! Reachability probe: bounded GET against a candidate endpoint, classified
//! to reachable/unreachable. Transport errors never escape this module.

use crate::config::{Candidate, StatusRange};
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
}

/// Seam for reachability checks so the resolver can be driven by fake
/// probes in tests.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, candidate: &Candidate) -> ProbeOutcome;
}

/// Probes `candidate.url + probe_path` with a throwaway HTTP client.
pub struct HttpProber {
    probe_path: String,
    success_range: StatusRange,
}

impl HttpProber {
    pub fn new(probe_path: impl Into<String>, success_range: StatusRange) -> Self {
        HttpProber { probe_path: probe_path.into(), success_range }
    }

    fn classify(&self, status: u16) -> ProbeOutcome {
        if self.success_range.contains(status) {
            ProbeOutcome::Reachable
        } else {
            ProbeOutcome::Unreachable
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, candidate: &Candidate) -> ProbeOutcome {
        let url = format!("{}{}", candidate.url, self.probe_path);
        // Fresh client per probe: no cookie or cached-response reuse, and
        // both timeouts set so the call returns within the candidate budget
        // instead of waiting on the network stack.
        let client = match reqwest::Client::builder()
            .timeout(candidate.timeout)
            .connect_timeout(candidate.timeout)
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                log::debug!("probe client build failed for {}: {}", url, e);
                return ProbeOutcome::Unreachable;
            }
        };
        match client.get(&url).send().await {
            Ok(r) => {
                let status = r.status().as_u16();
                let outcome = self.classify(status);
                log::debug!("probe {} -> {} ({:?})", url, status, outcome);
                outcome
            }
            Err(e) => {
                // Timeout, DNS, TLS, refused connection: all the same answer.
                log::debug!("probe {} failed: {}", url, e);
                ProbeOutcome::Unreachable
            }
        }
    }
}

//! Server liveness surface for the UI: a strict-2xx check against the
//! resolved base URL plus the status payload the frontend renders.
//!
//! This is deliberately separate from base-URL resolution: the resolver
//! accepts any non-error answer, while "can I start an authenticated call
//! right now" wants an actual 2xx.

use crate::config::{Candidate, StatusRange};
use crate::probe::{HttpProber, ProbeOutcome, Prober};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerStatus {
    /// A check is in flight; the UI shows a spinner.
    Pinging,
    Reachable,
    Unreachable,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Pinging => "pinging",
            ServerStatus::Reachable => "reachable",
            ServerStatus::Unreachable => "unreachable",
        }
    }
}

/// Payload for the server-status UI event.
pub fn status_payload(status: &ServerStatus, base_url: &str) -> serde_json::Value {
    serde_json::json!({ "status": status.as_str(), "base_url": base_url })
}

/// Best-effort liveness check. Never fails; every transport problem and
/// non-2xx answer collapses to `Unreachable`.
pub async fn check_server(base_url: &str, timeout: Duration) -> ServerStatus {
    let prober = HttpProber::new("/", StatusRange::SUCCESS);
    let candidate = Candidate::new(base_url, timeout);
    match prober.probe(&candidate).await {
        ProbeOutcome::Reachable => ServerStatus::Reachable,
        ProbeOutcome::Unreachable => ServerStatus::Unreachable,
    }
}

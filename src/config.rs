//! Resolver configuration: ordered candidate endpoints, probe budgets,
//! staleness interval, success-status rule. Loadable from JSON.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_RECHECK_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_PROBE_PATH: &str = "/";

// Per-candidate timeout profiles. "fast" suits a snappy LAN deployment,
// "patient" suits flaky Wi-Fi or a slow reverse proxy in front of the
// public endpoint.
const FAST_LOCAL_TIMEOUT: Duration = Duration::from_millis(750);
const FAST_PUBLIC_TIMEOUT: Duration = Duration::from_millis(2000);
const PATIENT_LOCAL_TIMEOUT: Duration = Duration::from_millis(1000);
const PATIENT_PUBLIC_TIMEOUT: Duration = Duration::from_millis(4000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("candidate list is empty")]
    NoCandidates,
    #[error("candidate URL must start with http:// or https://: {0}")]
    InvalidUrl(String),
    #[error("per-candidate timeout must be greater than zero: {0}")]
    ZeroTimeout(String),
    #[error("re-check interval must be greater than zero")]
    ZeroRecheckInterval,
    #[error("probe path must start with '/': {0}")]
    InvalidProbePath(String),
    #[error("invalid success status range {min}..{max}")]
    InvalidStatusRange { min: u16, max: u16 },
    #[error("invalid resolver config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One endpoint eligible to serve as the base URL, with its probe budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    pub timeout: Duration,
}

impl Candidate {
    /// Trailing slashes are trimmed so request paths can be appended directly.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let url = url.into().trim().trim_end_matches('/').to_string();
        Candidate { url, timeout }
    }
}

/// Half-open HTTP status range `[min, max)` that counts as reachable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRange {
    pub min: u16,
    pub max: u16,
}

impl StatusRange {
    /// Anything that is not a 4xx/5xx answer: the server spoke HTTP to us.
    /// Canonical rule for base-URL resolution.
    pub const NON_ERROR: StatusRange = StatusRange { min: 200, max: 400 };
    /// Strict 2xx, used by the liveness check before authenticated calls.
    pub const SUCCESS: StatusRange = StatusRange { min: 200, max: 300 };

    pub fn contains(&self, status: u16) -> bool {
        status >= self.min && status < self.max
    }
}

fn default_recheck_interval() -> Duration {
    DEFAULT_RECHECK_INTERVAL
}

fn default_probe_path() -> String {
    DEFAULT_PROBE_PATH.to_string()
}

fn default_success_range() -> StatusRange {
    StatusRange::NON_ERROR
}

/// Full configuration surface of the resolver. Candidate order is the
/// preference order: first reachable wins, the last entry is the fallback
/// reported before the first resolution and after total exhaustion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub candidates: Vec<Candidate>,
    #[serde(default = "default_recheck_interval")]
    pub recheck_interval: Duration,
    #[serde(default = "default_probe_path")]
    pub probe_path: String,
    #[serde(default = "default_success_range")]
    pub success_range: StatusRange,
}

impl ResolverConfig {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        ResolverConfig {
            candidates,
            recheck_interval: default_recheck_interval(),
            probe_path: default_probe_path(),
            success_range: default_success_range(),
        }
    }

    /// LAN-first profile with tight budgets (0.75 s local, 2 s public).
    pub fn fast(local_url: impl Into<String>, public_url: impl Into<String>) -> Self {
        ResolverConfig::new(vec![
            Candidate::new(local_url, FAST_LOCAL_TIMEOUT),
            Candidate::new(public_url, FAST_PUBLIC_TIMEOUT),
        ])
    }

    /// LAN-first profile with generous budgets (1 s local, 4 s public).
    pub fn patient(local_url: impl Into<String>, public_url: impl Into<String>) -> Self {
        ResolverConfig::new(vec![
            Candidate::new(local_url, PATIENT_LOCAL_TIMEOUT),
            Candidate::new(public_url, PATIENT_PUBLIC_TIMEOUT),
        ])
    }

    /// Parses and validates a JSON config, e.g. shipped next to the app's
    /// own settings file.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let mut cfg: ResolverConfig = serde_json::from_str(s)?;
        for c in &mut cfg.candidates {
            c.url = c.url.trim().trim_end_matches('/').to_string();
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }
        for c in &self.candidates {
            if !c.url.starts_with("http://") && !c.url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl(c.url.clone()));
            }
            if c.timeout.is_zero() {
                return Err(ConfigError::ZeroTimeout(c.url.clone()));
            }
        }
        // Zero would panic tokio's interval in the revalidation loop.
        if self.recheck_interval.is_zero() {
            return Err(ConfigError::ZeroRecheckInterval);
        }
        // The probe URL is plain concatenation onto the candidate base.
        if !self.probe_path.starts_with('/') {
            return Err(ConfigError::InvalidProbePath(self.probe_path.clone()));
        }
        let r = self.success_range;
        if r.min >= r.max || r.min < 100 || r.max > 600 {
            return Err(ConfigError::InvalidStatusRange { min: r.min, max: r.max });
        }
        Ok(())
    }

    /// Least-preferred candidate: the default before the first resolution.
    pub fn fallback_url(&self) -> &str {
        self.candidates
            .last()
            .map(|c| c.url.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_trims_trailing_slash() {
        let c = Candidate::new("http://192.168.0.150:8080/", Duration::from_secs(1));
        assert_eq!(c.url, "http://192.168.0.150:8080");
    }

    #[test]
    fn fast_profile_budgets() {
        let cfg = ResolverConfig::fast("http://192.168.0.150:8080", "https://photos.example.com");
        assert_eq!(cfg.candidates[0].timeout, Duration::from_millis(750));
        assert_eq!(cfg.candidates[1].timeout, Duration::from_millis(2000));
        assert_eq!(cfg.recheck_interval, Duration::from_secs(60));
        assert_eq!(cfg.success_range, StatusRange::NON_ERROR);
    }

    #[test]
    fn patient_profile_budgets() {
        let cfg = ResolverConfig::patient("http://192.168.0.150:8080", "https://photos.example.com");
        assert_eq!(cfg.candidates[0].timeout, Duration::from_millis(1000));
        assert_eq!(cfg.candidates[1].timeout, Duration::from_millis(4000));
    }

    #[test]
    fn fallback_is_last_candidate() {
        let cfg = ResolverConfig::fast("http://10.0.0.2:8080", "https://photos.example.com");
        assert_eq!(cfg.fallback_url(), "https://photos.example.com");
    }

    #[test]
    fn validate_rejects_empty_candidates() {
        let cfg = ResolverConfig::new(Vec::new());
        assert!(matches!(cfg.validate(), Err(ConfigError::NoCandidates)));
    }

    #[test]
    fn validate_rejects_bad_scheme() {
        let cfg = ResolverConfig::new(vec![Candidate::new(
            "ftp://photos.example.com",
            Duration::from_secs(1),
        )]);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = ResolverConfig::new(vec![Candidate::new(
            "https://photos.example.com",
            Duration::ZERO,
        )]);
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroTimeout(_))));
    }

    #[test]
    fn validate_rejects_inverted_status_range() {
        let mut cfg = ResolverConfig::fast("http://10.0.0.2:8080", "https://photos.example.com");
        cfg.success_range = StatusRange { min: 400, max: 200 };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidStatusRange { .. })
        ));
    }

    #[test]
    fn from_json_fills_defaults() {
        let cfg = ResolverConfig::from_json(
            r#"{
                "candidates": [
                    {"url": "http://192.168.0.150:8080/", "timeout": {"secs": 1, "nanos": 0}},
                    {"url": "https://photos.example.com", "timeout": {"secs": 4, "nanos": 0}}
                ]
            }"#,
        )
        .expect("valid config");
        assert_eq!(cfg.candidates[0].url, "http://192.168.0.150:8080");
        assert_eq!(cfg.recheck_interval, Duration::from_secs(60));
        assert_eq!(cfg.probe_path, "/");
        assert_eq!(cfg.success_range, StatusRange::NON_ERROR);
    }

    #[test]
    fn from_json_rejects_zero_recheck_interval() {
        let res = ResolverConfig::from_json(
            r#"{
                "candidates": [
                    {"url": "https://photos.example.com", "timeout": {"secs": 1, "nanos": 0}}
                ],
                "recheck_interval": {"secs": 0, "nanos": 0}
            }"#,
        );
        assert!(matches!(res, Err(ConfigError::ZeroRecheckInterval)));
    }

    #[test]
    fn from_json_rejects_probe_path_without_leading_slash() {
        let res = ResolverConfig::from_json(
            r#"{
                "candidates": [
                    {"url": "https://photos.example.com", "timeout": {"secs": 1, "nanos": 0}}
                ],
                "probe_path": "status"
            }"#,
        );
        assert!(matches!(res, Err(ConfigError::InvalidProbePath(_))));
    }

    #[test]
    fn validate_rejects_probe_path_without_leading_slash() {
        let mut cfg = ResolverConfig::fast("http://10.0.0.2:8080", "https://photos.example.com");
        cfg.probe_path = "status".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidProbePath(_))));
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(ResolverConfig::from_json("not json").is_err());
        assert!(ResolverConfig::from_json(r#"{"candidates": []}"#).is_err());
    }

    #[test]
    fn status_range_bounds() {
        assert!(StatusRange::NON_ERROR.contains(200));
        assert!(StatusRange::NON_ERROR.contains(302));
        assert!(StatusRange::NON_ERROR.contains(399));
        assert!(!StatusRange::NON_ERROR.contains(400));
        assert!(!StatusRange::NON_ERROR.contains(401));
        assert!(StatusRange::SUCCESS.contains(204));
        assert!(!StatusRange::SUCCESS.contains(302));
    }
}

//! Photopod client core: decides whether to talk to the photo server over
//! the LAN or over its public address, without callers knowing the topology.
//!
//! Construct a [`Resolver`] once at startup, force an initial refresh, then
//! let every API call ask for [`Resolver::base_url`]:
//!
//! ```no_run
//! use photopod_client::{Resolver, ResolverConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), photopod_client::ConfigError> {
//! let config = ResolverConfig::fast("http://192.168.0.150:8080", "https://photos.example.com");
//! let resolver = Arc::new(Resolver::new(config)?);
//! resolver.refresh(true).await;
//! photopod_client::spawn_revalidation_loop(resolver.clone());
//!
//! let base = resolver.base_url().await;
//! // issue requests against `base`
//! # Ok(())
//! # }
//! ```

mod cache;
pub mod config;
pub mod health;
pub mod probe;
pub mod resolver;

pub use config::{Candidate, ConfigError, ResolverConfig, StatusRange};
pub use health::{check_server, status_payload, ServerStatus};
pub use probe::{HttpProber, ProbeOutcome, Prober};
pub use resolver::{spawn_network_watcher, spawn_revalidation_loop, Resolver};

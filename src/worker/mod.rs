//! Offline Cache Controller
//!
//! A request-interception layer for the static front-end. Each controller
//! version owns one named cache generation; activating a version deletes
//! every other generation, so at most one survives.
//!
//! Install, activate and fetch handling all hand back an
//! [`ExtendedLifetime`] that must be kept until it settles, otherwise the
//! cache work it owns is abandoned.

mod clients;
mod controller;
mod fetcher;
mod http;
mod lifecycle;
mod lifetime;
mod registration;
mod storage;

use url::Url;

pub use clients::{ClientId, Clients};
pub use controller::{CacheController, FetchOutcome, RequestClass};
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use http::{BodyError, Request, Response, ResponseKind};
pub use lifecycle::{LifecycleError, WorkerState};
pub use lifetime::ExtendedLifetime;
pub use registration::Registration;
pub use storage::{Cache, CacheError, CacheStorage};

// == Defaults ==
/// Bump on every front-end deploy.
pub const CACHE_VERSION: &str = "2026-02-01-001";

/// Cache generation names are this prefix plus the version tag.
pub const CACHE_PREFIX: &str = "livepay-v";

/// Assets pre-populated on install.
pub const MANIFEST_ASSETS: [&str; 3] = ["/", "/index.html", "/manifest.json"];

/// Served for API requests when offline with nothing cached.
pub const OFFLINE_DOCUMENT: &str = "/index.html";

/// Requests whose path contains this go network first with offline fallback.
pub const API_MARKER: &str = "/api/";

/// Settings for one controller version.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Version tag, part of the cache generation name
    pub version: String,
    /// The only origin whose requests are intercepted
    pub origin: Url,
    /// Paths pre-populated on install
    pub manifest: Vec<String>,
    /// Path served to offline API requests
    pub offline_document: String,
    /// Path fragment marking API requests
    pub api_marker: String,
    /// Activate right after install instead of waiting for old clients to close
    pub skip_waiting: bool,
}

impl WorkerConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            version: CACHE_VERSION.to_string(),
            origin,
            manifest: MANIFEST_ASSETS.iter().map(|p| p.to_string()).collect(),
            offline_document: OFFLINE_DOCUMENT.to_string(),
            api_marker: API_MARKER.to_string(),
            skip_waiting: true,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_skip_waiting(mut self, skip_waiting: bool) -> Self {
        self.skip_waiting = skip_waiting;
        self
    }

    pub fn cache_name(&self) -> String {
        format!("{}{}", CACHE_PREFIX, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_worker_config() {
        let config = WorkerConfig::new(Url::parse("https://livepay.org").unwrap());
        assert_eq!(config.cache_name(), "livepay-v2026-02-01-001");
        assert_eq!(config.manifest, vec!["/", "/index.html", "/manifest.json"]);
        assert!(config.skip_waiting);
    }

    #[test]
    fn test_version_changes_cache_name() {
        let config =
            WorkerConfig::new(Url::parse("https://livepay.org").unwrap()).with_version("2026-03-01");
        assert_eq!(config.cache_name(), "livepay-v2026-03-01");
    }
}

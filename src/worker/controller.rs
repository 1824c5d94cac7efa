//! Cache Controller
//!
//! Intercepts same-origin requests and applies one caching policy per
//! request class:
//!
//! | Class | Policy |
//! |---|---|
//! | cross-origin | not intercepted |
//! | API | network first, then cached copy, then offline document |
//! | document | network first, then cached copy |
//! | static asset | cache first with background revalidation |
//!
//! Only GET requests touch the cache. Other same-origin methods are
//! forwarded to the network as they are, body and headers included.
//!
//! Cache writes land only while the controller is active and its own
//! generation still exists, so a superseded version can never bring a
//! purged generation back.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use url::Url;

use super::clients::Clients;
use super::fetcher::{FetchError, Fetcher};
use super::http::{Request, Response};
use super::lifecycle::{LifecycleError, WorkerState};
use super::lifetime::ExtendedLifetime;
use super::storage::{Cache, CacheStorage};
use super::WorkerConfig;

/// How an intercepted request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    CrossOrigin,
    Api,
    Document,
    Static,
}

/// Result of offering a request to the controller.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Not handled, the request goes to the network untouched
    Passthrough,
    /// Handled. `lifetime` owns cache writes still in flight.
    Respond {
        response: Result<Response, FetchError>,
        lifetime: ExtendedLifetime,
    },
}

impl FetchOutcome {
    /// The response, letting background cache work finish on its own.
    pub fn into_response(self) -> Option<Result<Response, FetchError>> {
        match self {
            FetchOutcome::Passthrough => None,
            FetchOutcome::Respond { response, lifetime } => {
                lifetime.detach();
                Some(response)
            }
        }
    }
}

// == Cache Controller ==
/// One controller version. Cloning yields another handle to the same worker.
#[derive(Clone)]
pub struct CacheController {
    config: Arc<WorkerConfig>,
    cache_name: Arc<str>,
    storage: CacheStorage,
    clients: Clients,
    fetcher: Arc<dyn Fetcher>,
    state: Arc<Mutex<WorkerState>>,
}

impl CacheController {
    pub fn new(config: WorkerConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            cache_name: config.cache_name().into(),
            config: Arc::new(config),
            storage: CacheStorage::new(),
            clients: Clients::new(),
            fetcher,
            state: Arc::new(Mutex::new(WorkerState::Parsed)),
        }
    }

    /// Shares cache storage with other versions on the same origin.
    pub fn with_storage(mut self, storage: CacheStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_clients(mut self, clients: Clients) -> Self {
        self.clients = clients;
        self
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn transition(&self, to: WorkerState) -> Result<(), LifecycleError> {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        *state = state.transition(to)?;
        debug!("Controller {} is now {}", self.config.version, to);
        Ok(())
    }

    /// Marks this version as replaced. It stops intercepting requests.
    pub fn supersede(&self) -> Result<(), LifecycleError> {
        self.transition(WorkerState::Superseded)
    }

    /// This version's generation, if it has not been purged.
    async fn own_cache(&self) -> Option<Cache> {
        self.storage.get(&self.cache_name).await
    }

    async fn writable_cache(&self) -> Option<Cache> {
        if self.state() != WorkerState::Active {
            return None;
        }
        self.own_cache().await
    }

    async fn store(&self, request: &Request, response: Response) {
        let Some(cache) = self.writable_cache().await else {
            debug!(
                "Not caching {}: {} is no longer live",
                request.url(),
                self.cache_name
            );
            return;
        };
        if let Err(err) = cache.put(request, response).await {
            warn!("Could not cache {}: {}", request.url(), err);
        }
    }

    fn manifest_request(&self, path: &str) -> Option<Request> {
        match self.config.origin.join(path) {
            Ok(url) => Some(Request::get(url)),
            Err(err) => {
                warn!("Skipping unparsable asset path {}: {}", path, err);
                None
            }
        }
    }

    // == Install ==
    /// Opens this version's cache generation and pre-populates it with the
    /// manifest assets. An asset that cannot be fetched is logged and skipped.
    ///
    /// The controller reaches [`WorkerState::Waiting`] once the returned
    /// lifetime settles.
    pub fn install(&self) -> Result<ExtendedLifetime, LifecycleError> {
        self.transition(WorkerState::Installing)?;

        let mut lifetime = ExtendedLifetime::new();
        let worker = self.clone();
        lifetime.wait_until(async move {
            let cached = worker.populate_manifest().await;
            info!(
                "Installed {} with {}/{} manifest assets",
                worker.cache_name,
                cached,
                worker.config.manifest.len()
            );
            if let Err(err) = worker.transition(WorkerState::Waiting) {
                warn!("Install of {} finished out of order: {}", worker.cache_name, err);
            }
        });
        Ok(lifetime)
    }

    async fn populate_manifest(&self) -> usize {
        let cache = self.storage.open(&self.cache_name).await;
        let mut cached = 0;

        for path in &self.config.manifest {
            let Some(request) = self.manifest_request(path) else {
                continue;
            };
            match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_ok() => match cache.put(&request, response).await {
                    Ok(()) => cached += 1,
                    Err(err) => warn!("Could not cache {}: {}", path, err),
                },
                Ok(response) => warn!(
                    "Could not cache {}: status {}",
                    path,
                    response.status().map_or(0, |s| s.as_u16())
                ),
                Err(err) => warn!("Could not cache {}: {}", path, err),
            }
        }
        cached
    }

    // == Activate ==
    /// Deletes every cache generation not named for this version, then
    /// takes control of all open clients.
    ///
    /// The controller reaches [`WorkerState::Active`] once the returned
    /// lifetime settles.
    pub fn activate(&self) -> Result<ExtendedLifetime, LifecycleError> {
        self.transition(WorkerState::Activating)?;

        let mut lifetime = ExtendedLifetime::new();
        let worker = self.clone();
        lifetime.wait_until(async move {
            let purged = worker.purge_stale_generations().await;
            if let Err(err) = worker.transition(WorkerState::Active) {
                warn!("Activation of {} finished out of order: {}", worker.cache_name, err);
                return;
            }
            let claimed = worker.clients.claim(&worker.config.version);
            info!(
                "Activated {} (purged {} stale generations, claimed {} clients)",
                worker.cache_name, purged, claimed
            );
        });
        Ok(lifetime)
    }

    async fn purge_stale_generations(&self) -> usize {
        let mut purged = 0;
        for name in self.storage.keys().await {
            if name != *self.cache_name && self.storage.delete(&name).await {
                debug!("Deleted stale cache generation {}", name);
                purged += 1;
            }
        }
        purged
    }

    // == Intercept ==
    /// Classifies a request. First match wins.
    pub fn classify(&self, request: &Request) -> RequestClass {
        let url = request.url();
        if url.origin() != self.config.origin.origin() {
            return RequestClass::CrossOrigin;
        }
        if url.path().contains(&self.config.api_marker) {
            return RequestClass::Api;
        }
        if url.as_str().ends_with(".html") || is_origin_root(url) {
            return RequestClass::Document;
        }
        RequestClass::Static
    }

    /// Offers a request to the controller. Only an active controller
    /// intercepts.
    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        if self.state() != WorkerState::Active {
            return FetchOutcome::Passthrough;
        }

        let class = self.classify(request);
        if class == RequestClass::CrossOrigin {
            return FetchOutcome::Passthrough;
        }

        let mut lifetime = ExtendedLifetime::new();
        if !request.is_cacheable() {
            debug!("Forwarding {} {} uncached", request.method(), request.url());
            let response = self.fetcher.fetch(request).await;
            return FetchOutcome::Respond { response, lifetime };
        }

        let response = match class {
            RequestClass::CrossOrigin => return FetchOutcome::Passthrough,
            RequestClass::Api => self.network_first(request, true, &mut lifetime).await,
            RequestClass::Document => self.network_first(request, false, &mut lifetime).await,
            RequestClass::Static => self.cache_first(request, &mut lifetime).await,
        };

        FetchOutcome::Respond { response, lifetime }
    }

    /// Live fetch; a 2xx copy is stored in the background. On network
    /// failure, the cached copy, then (for API requests) the offline document.
    async fn network_first(
        &self,
        request: &Request,
        offline_fallback: bool,
        lifetime: &mut ExtendedLifetime,
    ) -> Result<Response, FetchError> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    self.store_in_background(request, &response, lifetime);
                }
                Ok(response)
            }
            Err(err) => {
                debug!("Network failed for {}: {}", request.url(), err);
                let Some(cache) = self.own_cache().await else {
                    return Err(err);
                };
                if let Some(cached) = cache.match_request(request).await {
                    return Ok(cached);
                }
                if offline_fallback {
                    if let Some(offline) = self.offline_document(&cache).await {
                        return Ok(offline);
                    }
                }
                Err(err)
            }
        }
    }

    async fn offline_document(&self, cache: &Cache) -> Option<Response> {
        let request = self.manifest_request(&self.config.offline_document)?;
        cache.match_request(&request).await
    }

    /// Cached copy immediately with a background refresh; on a miss, a live
    /// fetch that is stored before returning when cacheable.
    async fn cache_first(
        &self,
        request: &Request,
        lifetime: &mut ExtendedLifetime,
    ) -> Result<Response, FetchError> {
        let cached = match self.own_cache().await {
            Some(cache) => cache.match_request(request).await,
            None => None,
        };

        if let Some(cached) = cached {
            let worker = self.clone();
            let request = request.clone();
            lifetime.wait_until(async move {
                match worker.fetcher.fetch(&request).await {
                    Ok(fresh) if fresh.is_cacheable() => worker.store(&request, fresh).await,
                    Ok(_) => {}
                    Err(err) => debug!("Revalidation of {} failed: {}", request.url(), err),
                }
            });
            return Ok(cached);
        }

        let response = self.fetcher.fetch(request).await?;
        if response.is_cacheable() {
            match response.try_clone() {
                Ok(copy) => self.store(request, copy).await,
                Err(err) => warn!("Could not cache {}: {}", request.url(), err),
            }
        }
        Ok(response)
    }

    fn store_in_background(
        &self,
        request: &Request,
        response: &Response,
        lifetime: &mut ExtendedLifetime,
    ) {
        let copy = match response.try_clone() {
            Ok(copy) => copy,
            Err(err) => {
                warn!("Could not cache {}: {}", request.url(), err);
                return;
            }
        };
        let worker = self.clone();
        let request = request.clone();
        lifetime.wait_until(async move {
            worker.store(&request, copy).await;
        });
    }
}

fn is_origin_root(url: &Url) -> bool {
    url.path() == "/" && url.query().is_none()
}

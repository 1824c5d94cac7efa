//! Version handover for one origin.
//!
//! Holds the active controller and, when a new version must wait, the
//! waiting one. All versions share the same cache storage and client
//! registry.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use super::clients::{ClientId, Clients};
use super::controller::{CacheController, FetchOutcome};
use super::fetcher::Fetcher;
use super::http::Request;
use super::lifecycle::LifecycleError;
use super::storage::CacheStorage;
use super::WorkerConfig;

#[derive(Clone, Default)]
pub struct Registration {
    storage: CacheStorage,
    clients: Clients,
    active: Arc<RwLock<Option<CacheController>>>,
    waiting: Arc<RwLock<Option<CacheController>>>,
}

impl Registration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    pub fn clients(&self) -> &Clients {
        &self.clients
    }

    pub async fn active(&self) -> Option<CacheController> {
        self.active.read().await.clone()
    }

    pub async fn waiting(&self) -> Option<CacheController> {
        self.waiting.read().await.clone()
    }

    /// Installs a controller for `config`. It activates immediately when
    /// nothing is active or the config skips waiting; otherwise it waits
    /// until the clients of the current version have closed.
    ///
    /// Registering the version that is already active is a no-op.
    pub async fn register(
        &self,
        config: WorkerConfig,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<CacheController, LifecycleError> {
        if let Some(current) = self.active().await {
            if current.version() == config.version {
                return Ok(current);
            }
        }

        let skip_waiting = config.skip_waiting;
        let controller = CacheController::new(config, fetcher)
            .with_storage(self.storage.clone())
            .with_clients(self.clients.clone());

        controller.install()?.settled().await;

        let previous_waiting = self.waiting.write().await.replace(controller.clone());
        if let Some(stale) = previous_waiting {
            if let Err(err) = stale.supersede() {
                warn!("Waiting controller {} already retired: {}", stale.version(), err);
            }
        }

        let has_active = self.active.read().await.is_some();
        if skip_waiting || !has_active {
            self.promote_waiting().await?;
        } else {
            info!("Controller {} installed and waiting", controller.version());
        }

        Ok(controller)
    }

    /// Activates the waiting controller, if any, and retires the old one.
    async fn promote_waiting(&self) -> Result<(), LifecycleError> {
        let Some(next) = self.waiting.write().await.take() else {
            return Ok(());
        };

        next.activate()?.settled().await;

        let previous = self.active.write().await.replace(next.clone());
        if let Some(previous) = previous {
            previous.supersede()?;
            info!(
                "Controller {} superseded by {}",
                previous.version(),
                next.version()
            );
        }
        Ok(())
    }

    /// Registers a page load.
    pub fn open_client(&self) -> ClientId {
        self.clients.open()
    }

    /// Closes a page. When no page remains under the active version, a
    /// waiting controller takes over.
    pub async fn close_client(&self, id: ClientId) -> Result<(), LifecycleError> {
        self.clients.close(id);

        let Some(active) = self.active().await else {
            return Ok(());
        };
        if self.waiting.read().await.is_some() && self.clients.controlled_by(active.version()) == 0
        {
            self.promote_waiting().await?;
        }
        Ok(())
    }

    /// Routes a request to the active controller.
    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        match self.active().await {
            Some(controller) => controller.handle_fetch(request).await,
            None => FetchOutcome::Passthrough,
        }
    }
}

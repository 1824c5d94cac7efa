//! Lifecycle extension for controller events.
//!
//! Work registered with [`ExtendedLifetime::wait_until`] runs on the tokio
//! runtime and is owned by the lifetime value. Dropping the lifetime before
//! it settles aborts that work, the same way a host runtime would terminate
//! an idle controller mid-operation.

use std::future::Future;

use tokio::task::JoinSet;
use tracing::warn;

#[derive(Debug, Default)]
pub struct ExtendedLifetime {
    tasks: JoinSet<()>,
}

impl ExtendedLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the event alive until `work` completes.
    pub fn wait_until<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(work);
    }

    /// Number of registered tasks that have not been joined yet.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Resolves once every registered task has finished.
    pub async fn settled(mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(err) = joined {
                warn!("Extended task did not complete: {}", err);
            }
        }
    }

    /// Lets the registered work finish without anyone awaiting it.
    pub fn detach(self) {
        if self.tasks.is_empty() {
            return;
        }
        tokio::spawn(self.settled());
    }
}

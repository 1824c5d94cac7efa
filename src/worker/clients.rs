//! Page clients and which controller version handles their requests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub type ClientId = u64;

#[derive(Debug, Default)]
struct ClientTable {
    next_id: ClientId,
    /// Version that new clients are controlled by
    active_version: Option<String>,
    controllers: BTreeMap<ClientId, Option<String>>,
}

/// Shared registry of open page clients.
#[derive(Debug, Clone, Default)]
pub struct Clients {
    table: Arc<Mutex<ClientTable>>,
}

impl Clients {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, ClientTable> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a page load. It is controlled by the active version, if any.
    pub fn open(&self) -> ClientId {
        let mut table = self.table();
        table.next_id += 1;
        let id = table.next_id;
        let controller = table.active_version.clone();
        table.controllers.insert(id, controller);
        id
    }

    pub fn close(&self, id: ClientId) -> bool {
        self.table().controllers.remove(&id).is_some()
    }

    /// Puts every open client under `version` without waiting for reloads.
    /// Returns how many clients changed controller.
    pub fn claim(&self, version: &str) -> usize {
        let mut table = self.table();
        table.active_version = Some(version.to_string());

        let mut changed = 0;
        for controller in table.controllers.values_mut() {
            if controller.as_deref() != Some(version) {
                *controller = Some(version.to_string());
                changed += 1;
            }
        }
        changed
    }

    pub fn controller_of(&self, id: ClientId) -> Option<String> {
        self.table().controllers.get(&id).cloned().flatten()
    }

    /// Open clients controlled by `version`.
    pub fn controlled_by(&self, version: &str) -> usize {
        self.table()
            .controllers
            .values()
            .filter(|c| c.as_deref() == Some(version))
            .count()
    }

    pub fn len(&self) -> usize {
        self.table().controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clients_start_uncontrolled() {
        let clients = Clients::new();
        let id = clients.open();
        assert_eq!(clients.controller_of(id), None);
    }

    #[test]
    fn test_claim_takes_every_open_client() {
        let clients = Clients::new();
        let a = clients.open();
        let b = clients.open();

        assert_eq!(clients.claim("v1"), 2);
        assert_eq!(clients.controller_of(a).as_deref(), Some("v1"));
        assert_eq!(clients.controller_of(b).as_deref(), Some("v1"));

        let c = clients.open();
        assert_eq!(clients.controller_of(c).as_deref(), Some("v1"));
        assert_eq!(clients.claim("v1"), 0);
    }

    #[test]
    fn test_close_client() {
        let clients = Clients::new();
        let id = clients.open();
        clients.claim("v1");

        assert!(clients.close(id));
        assert!(!clients.close(id));
        assert!(clients.is_empty());
        assert_eq!(clients.controlled_by("v1"), 0);
    }
}

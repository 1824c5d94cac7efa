//! In-memory record store, used for tests and ephemeral runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::error::Result;
use crate::models::{Donation, Signature};

#[derive(Debug, Default)]
pub struct MemoryStore {
    signatures: RwLock<Vec<Signature>>,
    donations: RwLock<Vec<Donation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records.
    pub fn with_records(signatures: Vec<Signature>, donations: Vec<Donation>) -> Self {
        Self {
            signatures: RwLock::new(signatures),
            donations: RwLock::new(donations),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load_signatures(&self) -> Vec<Signature> {
        self.signatures.read().await.clone()
    }

    async fn save_signatures(&self, records: &[Signature]) -> Result<()> {
        *self.signatures.write().await = records.to_vec();
        Ok(())
    }

    async fn load_donations(&self) -> Vec<Donation> {
        self.donations.read().await.clone()
    }

    async fn save_donations(&self, records: &[Donation]) -> Result<()> {
        *self.donations.write().await = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert!(store.load_signatures().await.is_empty());
        assert!(store.load_donations().await.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_save_replaces() {
        let store = MemoryStore::new();
        let donation = Donation {
            id: "1".into(),
            email: "a@b.com".into(),
            amount: 5.0,
            transaction_id: None,
            paypal_email: None,
            timestamp: Utc::now(),
            receipt_sent: false,
        };

        store.save_donations(&[donation.clone(), donation.clone()]).await.unwrap();
        assert_eq!(store.load_donations().await.len(), 2);

        store.save_donations(&[donation]).await.unwrap();
        assert_eq!(store.load_donations().await.len(), 1);
    }
}

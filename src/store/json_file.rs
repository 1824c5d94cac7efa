//! JSON File Store
//!
//! Each collection lives in its own pretty-printed JSON array file inside
//! the data directory. Every save rewrites the whole file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use super::RecordStore;
use crate::error::Result;
use crate::models::{Donation, Signature};

const SIGNATURES_FILE: &str = "signatures.json";
const DONATIONS_FILE: &str = "donations.json";

// == JSON File Store ==
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    signatures_path: PathBuf,
    donations_path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `data_dir` without touching the disk.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            signatures_path: dir.join(SIGNATURES_FILE),
            donations_path: dir.join(DONATIONS_FILE),
        }
    }

    /// Creates the data directory and seeds missing collection files with `[]`.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(data_dir.as_ref());
        fs::create_dir_all(data_dir.as_ref()).await?;

        for path in [&store.signatures_path, &store.donations_path] {
            if fs::metadata(path).await.is_err() {
                debug!("Seeding empty collection at {}", path.display());
                fs::write(path, b"[]").await?;
            }
        }

        Ok(store)
    }

    pub fn signatures_path(&self) -> &Path {
        &self.signatures_path
    }

    pub fn donations_path(&self) -> &Path {
        &self.donations_path
    }
}

async fn read_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(err) => {
            debug!("Collection {} unreadable ({}), treating as empty", path.display(), err);
            return Vec::new();
        }
    };

    serde_json::from_slice(&raw).unwrap_or_else(|err| {
        warn!("Collection {} is corrupt ({}), treating as empty", path.display(), err);
        Vec::new()
    })
}

/// Writes to a sibling temp file and renames it over the target, so readers
/// never observe a half-written collection.
async fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let body = serde_json::to_vec_pretty(records)?;
    let tmp = path.with_extension("json.tmp");

    fs::write(&tmp, &body).await?;
    fs::rename(&tmp, path).await?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load_signatures(&self) -> Vec<Signature> {
        read_collection(&self.signatures_path).await
    }

    async fn save_signatures(&self, records: &[Signature]) -> Result<()> {
        write_collection(&self.signatures_path, records).await
    }

    async fn load_donations(&self) -> Vec<Donation> {
        read_collection(&self.donations_path).await
    }

    async fn save_donations(&self, records: &[Donation]) -> Result<()> {
        write_collection(&self.donations_path, records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn signature(email: &str) -> Signature {
        Signature {
            id: "1".into(),
            full_name: "Grace Hopper".into(),
            email: email.into(),
            city: "Arlington".into(),
            state: "VA".into(),
            zip: "22201".into(),
            country: "United States".into(),
            timestamp: Utc::now(),
            notifications_sent: false,
        }
    }

    #[tokio::test]
    async fn test_open_seeds_empty_files() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).await.unwrap();

        let raw = std::fs::read_to_string(store.signatures_path()).unwrap();
        assert_eq!(raw, "[]");
        assert!(store.donations_path().exists());
        assert!(store.load_signatures().await.is_empty());
    }

    #[tokio::test]
    async fn test_open_keeps_existing_records() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        store.save_signatures(&[signature("a@b.com")]).await.unwrap();

        let reopened = JsonFileStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.load_signatures().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();

        store.save_signatures(&[signature("a@b.com")]).await.unwrap();

        let raw = std::fs::read_to_string(store.signatures_path()).unwrap();
        assert!(raw.contains("\n  {"));
        assert!(raw.contains("\"fullName\": \"Grace Hopper\""));
        assert!(!dir.path().join("signatures.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nowhere"));
        assert!(store.load_donations().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        std::fs::write(store.signatures_path(), "{ not json").unwrap();

        assert!(store.load_signatures().await.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_records() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let records = vec![signature("a@b.com"), signature("c@d.com")];

        store.save_signatures(&records).await.unwrap();
        assert_eq!(store.load_signatures().await, records);
    }
}

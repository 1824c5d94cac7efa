//! Record Store Module
//!
//! Persistence for the two record collections. Loads never fail: a missing
//! or unreadable collection is treated as empty. Saves replace the whole
//! collection.

mod json_file;
mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Donation, Signature};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

// == Record Store ==
/// Load/save access to the signature and donation collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every stored signature, or an empty list if none can be read.
    async fn load_signatures(&self) -> Vec<Signature>;

    /// Replaces the stored signatures with `records`.
    async fn save_signatures(&self, records: &[Signature]) -> Result<()>;

    /// Returns every stored donation, or an empty list if none can be read.
    async fn load_donations(&self) -> Vec<Donation>;

    /// Replaces the stored donations with `records`.
    async fn save_donations(&self, records: &[Donation]) -> Result<()>;
}

//! Write-only asset store collaborator.
//!
//! Persists a binary plus provenance metadata. The idempotency key is
//! (product, source, content checksum): re-processing the same observation
//! must never create duplicate records.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::errors::AssetStoreError;

/// Where an asset came from and how to recognize it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetProvenance {
    pub source: String,
    pub original_name: String,
    /// Hex blake3 digest of the binary content.
    pub checksum: String,
    pub imported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: Uuid,
    pub product_id: i64,
    pub provenance: AssetProvenance,
}

impl AssetRecord {
    pub fn new(product_id: i64, source: &str, original_name: &str, checksum: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            provenance: AssetProvenance {
                source: source.to_string(),
                original_name: original_name.to_string(),
                checksum: checksum.to_string(),
                imported_at: Utc::now(),
            },
        }
    }
}

/// Hex content checksum used as the dedup key component.
pub fn content_checksum(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_string()
}

pub trait AssetStore: Send + Sync {
    fn exists(&self, product_id: i64, source: &str, checksum: &str)
        -> Result<bool, AssetStoreError>;
    fn persist(&self, record: &AssetRecord, bytes: &[u8]) -> Result<(), AssetStoreError>;
}

/// Filesystem-backed store used by the batch CLI.
///
/// Layout: `<root>/<product_id>/<source>/<checksum>.bin` with a JSON
/// metadata sidecar next to the binary.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn asset_dir(&self, product_id: i64, source: &str) -> PathBuf {
        self.root
            .join(product_id.to_string())
            .join(sanitize_filename::sanitize(source))
    }

    fn binary_path(&self, product_id: i64, source: &str, checksum: &str) -> PathBuf {
        self.asset_dir(product_id, source)
            .join(format!("{checksum}.bin"))
    }
}

impl AssetStore for FsAssetStore {
    fn exists(
        &self,
        product_id: i64,
        source: &str,
        checksum: &str,
    ) -> Result<bool, AssetStoreError> {
        Ok(self.binary_path(product_id, source, checksum).exists())
    }

    fn persist(&self, record: &AssetRecord, bytes: &[u8]) -> Result<(), AssetStoreError> {
        let dir = self.asset_dir(record.product_id, &record.provenance.source);
        fs::create_dir_all(&dir)?;

        let binary_path = dir.join(format!("{}.bin", record.provenance.checksum));
        fs::write(&binary_path, bytes)?;

        let metadata = serde_json::to_string_pretty(record)
            .map_err(|e| AssetStoreError::Metadata(e.to_string()))?;
        let metadata_path = dir.join(format!("{}.json", record.provenance.checksum));
        fs::write(&metadata_path, metadata)?;

        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    records: Mutex<Vec<AssetRecord>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AssetRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl AssetStore for MemoryAssetStore {
    fn exists(
        &self,
        product_id: i64,
        source: &str,
        checksum: &str,
    ) -> Result<bool, AssetStoreError> {
        Ok(self.records.lock().unwrap().iter().any(|record| {
            record.product_id == product_id
                && record.provenance.source == source
                && record.provenance.checksum == checksum
        }))
    }

    fn persist(&self, record: &AssetRecord, _bytes: &[u8]) -> Result<(), AssetStoreError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/assets_tests.rs"]
mod tests;

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Disk-based export cache using cacache.

use crate::error::ApiError;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Content-addressable disk cache for scan exports.
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Create a new cache in the specified directory.
    pub async fn new(cache_dir: &str) -> Self {
        let path = PathBuf::from(cache_dir);

        if let Err(e) = tokio::fs::create_dir_all(&path).await {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to create cache directory"
            );
        }

        Self { cache_dir: path }
    }

    /// Cache key for a document (hex SHA-256 of its bytes).
    pub fn generate_key(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    /// Store a document under its content hash and return the key.
    pub async fn put(&self, data: &[u8]) -> Result<String, ApiError> {
        let key = Self::generate_key(data);
        if self.has(&key).await {
            tracing::debug!(key = %key, "Export already cached");
            return Ok(key);
        }
        cacache::write(&self.cache_dir, &key, data).await?;
        tracing::debug!(key = %key, size = data.len(), "Cached export");
        Ok(key)
    }

    /// Check if a key exists in the cache.
    pub async fn has(&self, key: &str) -> bool {
        cacache::metadata(&self.cache_dir, key)
            .await
            .map(|entry| entry.is_some())
            .unwrap_or(false)
    }

    /// Get raw bytes from cache.
    pub async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApiError> {
        match cacache::read(&self.cache_dir, key).await {
            Ok(data) => Ok(Some(data)),
            Err(cacache::Error::EntryNotFound(_, _)) => Ok(None),
            Err(e) => Err(ApiError::Cache(e.to_string())),
        }
    }
}

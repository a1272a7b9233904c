//! Cached reader authorization and asset resolution.
//!
//! Readers report at heartbeat rate, so every observation would otherwise
//! cost two lookups. Both lookups go through TTL caches: staleness up to
//! one TTL is tolerated because reader and asset registration are operator
//! actions, not observation-rate events. The caches are never the source
//! of truth; admin writes and location mutations invalidate them.

use sqlx::PgPool;
use std::time::Duration;

use crate::error::ApiError;
use domain::models::{Asset, Reader};
use persistence::repositories::{AssetRepository, ReaderRepository};
use shared::cache::TtlCache;

pub struct Directory {
    readers: TtlCache<String, Reader>,
    assets: TtlCache<String, Asset>,
    reader_repo: ReaderRepository,
    asset_repo: AssetRepository,
}

impl Directory {
    pub fn new(pool: PgPool, reader_ttl: Duration, asset_ttl: Duration) -> Self {
        Self {
            readers: TtlCache::new(reader_ttl),
            assets: TtlCache::new(asset_ttl),
            reader_repo: ReaderRepository::new(pool.clone()),
            asset_repo: AssetRepository::new(pool),
        }
    }

    /// Authorizes a reader by name.
    ///
    /// Fails with `ReaderNotFound` for unknown names and `ReaderInactive`
    /// for disabled readers. The active check runs on every call, also for
    /// cache hits, so disabling a reader takes effect within one TTL.
    pub async fn authorize_reader(&self, name: &str) -> Result<Reader, ApiError> {
        let reader = match self.readers.get(&name.to_string()).await {
            Some(reader) => reader,
            None => {
                let reader: Reader = self
                    .reader_repo
                    .find_by_name(name)
                    .await?
                    .ok_or(ApiError::ReaderNotFound)?
                    .into();
                self.readers.insert(name.to_string(), reader.clone()).await;
                reader
            }
        };

        if !reader.active {
            return Err(ApiError::ReaderInactive);
        }
        Ok(reader)
    }

    /// Resolves the asset whose tag broadcasts `device_name`.
    ///
    /// Returns None for unregistered devices; only hits are cached so a
    /// freshly enrolled device is picked up on its next observation.
    pub async fn resolve_asset(&self, device_name: &str) -> Result<Option<Asset>, sqlx::Error> {
        if let Some(asset) = self.assets.get(&device_name.to_string()).await {
            return Ok(Some(asset));
        }
        let asset: Option<Asset> = self
            .asset_repo
            .find_by_tag_name(device_name)
            .await?
            .map(Into::into);
        if let Some(ref asset) = asset {
            self.assets
                .insert(device_name.to_string(), asset.clone())
                .await;
        }
        Ok(asset)
    }

    /// Drops the cached entry for a reader after an admin write.
    pub async fn invalidate_reader(&self, name: &str) {
        self.readers.invalidate(&name.to_string()).await;
    }

    /// Drops the cached entry for a device after its asset's location
    /// changed, so no stale asset-to-location binding is served.
    pub async fn invalidate_asset(&self, device_name: &str) {
        self.assets.invalidate(&device_name.to_string()).await;
    }

    /// Drops all cached assets. Used by admin writes to assets and tags,
    /// where the affected tag names are not cheaply known.
    pub async fn invalidate_all_assets(&self) {
        self.assets.clear().await;
    }
}

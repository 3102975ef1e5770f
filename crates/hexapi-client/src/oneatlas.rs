//! OneAtlas client
//!
//! Catalogue search, quicklooks, WMTS tiles and data usage.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::quicklook::{ImageSource, write_image};
use crate::session::AirbusSession;
use hexapi_core::endpoints::DEFAULT_EPSG;
use hexapi_core::{
    DataUsage, LruCache, OneAtlasFeature, OneAtlasQuery, OneAtlasSearchResponse, TileCache,
    TileCoord, TileKey,
};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
pub struct OneAtlasClient {
    session: AirbusSession,
    tiles: Mutex<TileCache>,
}

impl OneAtlasClient {
    /// Authenticate and build a client.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let session = AirbusSession::connect(config).await?;
        Ok(Self::with_session(session, config.tile_cache_size))
    }

    /// Reuse an existing session.
    pub fn with_session(session: AirbusSession, tile_cache_size: usize) -> Self {
        Self {
            session,
            tiles: Mutex::new(LruCache::new(tile_cache_size)),
        }
    }

    pub fn session(&self) -> &AirbusSession {
        &self.session
    }

    /// Run a catalogue search.
    pub async fn search(&self, query: &OneAtlasQuery) -> Result<OneAtlasSearchResponse> {
        let payload = query.payload();
        debug!(?payload, "OneAtlas search");
        let response = self
            .session
            .post_json(&self.session.endpoints.oneatlas_search, &payload)
            .await?;
        Ok(response.json().await?)
    }

    /// Fetch image bytes from a preview or tile URL.
    pub async fn image_data(&self, url: &str) -> Result<Vec<u8>> {
        self.session.get_image(url, &[]).await
    }

    /// Download a quicklook and return the path of the written file.
    pub async fn download_quicklook(
        &self,
        source: ImageSource<'_, OneAtlasFeature>,
    ) -> Result<PathBuf> {
        let url = match source {
            ImageSource::Feature(feature) => feature
                .thumbnail_href()
                .ok_or(ClientError::MissingQuicklook)?,
            ImageSource::Url(url) => url,
        };
        let bytes = self.image_data(url).await?;
        write_image(&bytes, self.session.download_dir.as_deref()).await
    }

    /// Fetch one web mercator WMTS tile, served from memory when possible.
    pub async fn wmts_tile(&self, item_id: &str, tile: TileCoord) -> Result<Vec<u8>> {
        self.wmts_tile_in(item_id, tile, DEFAULT_EPSG).await
    }

    /// Fetch one WMTS tile in the given projection.
    pub async fn wmts_tile_in(&self, item_id: &str, tile: TileCoord, epsg: u32) -> Result<Vec<u8>> {
        let key = TileKey::new(item_id, tile).with_epsg(epsg);
        if let Some(bytes) = self.tiles.lock().await.get(&key) {
            debug!(item_id, z = tile.z, x = tile.x, y = tile.y, "tile cache hit");
            return Ok(bytes.clone());
        }

        let url = self.session.endpoints.wmts_tile_url(item_id, tile, epsg);
        let bytes = self.image_data(&url).await?;
        self.tiles.lock().await.insert(key, bytes.clone());
        Ok(bytes)
    }

    /// Tile cache counters.
    pub async fn tile_cache_stats(&self) -> hexapi_core::CacheStats {
        self.tiles.lock().await.stats()
    }

    /// Consumed and maximum amount of the first limited subscription.
    ///
    /// # Errors
    ///
    /// [`ClientError::NoLimitedSubscriptions`] when no subscription has a limit.
    pub async fn data_usage(&self) -> Result<DataUsage> {
        self.session
            .auth
            .usage()
            .await?
            .ok_or(ClientError::NoLimitedSubscriptions)
    }
}

//! GeoStore client

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::quicklook::{ImageSource, write_image};
use crate::session::AirbusSession;
use hexapi_core::{GeoStoreFeature, GeoStoreQuery, GeoStoreSearchResponse, ImageSize};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct GeoStoreClient {
    session: AirbusSession,
}

impl GeoStoreClient {
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_session(AirbusSession::connect(config).await?))
    }

    pub fn with_session(session: AirbusSession) -> Self {
        Self { session }
    }

    pub async fn search(&self, query: &GeoStoreQuery) -> Result<GeoStoreSearchResponse> {
        let payload = query.payload();
        debug!(?payload, "GeoStore search");
        let response = self
            .session
            .post_json(&self.session.endpoints.geostore_search, &payload)
            .await?;
        Ok(response.json().await?)
    }

    /// Fetch a quicklook image at the given size.
    pub async fn image_data(&self, url: &str, size: ImageSize) -> Result<Vec<u8>> {
        self.session.get_image(url, &[("size", size.as_str())]).await
    }

    /// Download a quicklook and return the path of the written file.
    ///
    /// For a feature source, the quicklook matching `size` is used.
    pub async fn download_quicklook(
        &self,
        source: ImageSource<'_, GeoStoreFeature>,
        size: ImageSize,
    ) -> Result<PathBuf> {
        let url = match source {
            ImageSource::Feature(feature) => {
                feature.quicklook(size).ok_or(ClientError::MissingQuicklook)?
            }
            ImageSource::Url(url) => url,
        };
        let bytes = self.image_data(url, size).await?;
        write_image(&bytes, self.session.download_dir.as_deref()).await
    }
}

// Artwork fetcher - resolves every tile's artwork URL to decoded pixels
use crate::application::http_fetcher::HttpFetcher;
use crate::domain::tile::Tile;
use futures::StreamExt;
use futures::stream;
use std::sync::Arc;

#[derive(Clone)]
pub struct ArtworkFetcher {
    http: Arc<dyn HttpFetcher>,
    max_concurrent: Option<usize>,
}

impl ArtworkFetcher {
    /// `max_concurrent = None` runs one fetch per tile at once.
    pub fn new(http: Arc<dyn HttpFetcher>, max_concurrent: Option<usize>) -> Self {
        Self {
            http,
            max_concurrent: max_concurrent.filter(|n| *n > 0),
        }
    }

    /// Fetch and attach artwork for every tile, returning once all fetches
    /// have finished.
    ///
    /// Each fetch owns exactly one tile slot, so order is untouched and no
    /// locking is needed. A failed fetch only leaves its own tile imageless.
    pub async fn fetch_all(&self, tiles: &mut [Tile]) {
        stream::iter(tiles.iter_mut())
            .for_each_concurrent(self.max_concurrent, |tile| self.fetch_one(tile))
            .await;
    }

    async fn fetch_one(&self, tile: &mut Tile) {
        let url = tile.image_url().to_string();

        let response = match self.http.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "artwork request failed");
                return;
            }
        };

        // Only a plain 200 carries a complete image
        if response.status != 200 {
            tracing::warn!(url = %url, status = response.status, "artwork request rejected");
            return;
        }

        match image::load_from_memory(&response.body) {
            Ok(decoded) => {
                tile.attach_image(decoded.to_rgba8());
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "artwork could not be decoded");
            }
        }
    }
}

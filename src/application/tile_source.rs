// Tile source trait - produces the tiles of one collage from an upstream
use crate::domain::request::CollageQuery;
use crate::domain::tile::Tile;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("unreadable response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

#[async_trait]
pub trait TileSource: Send + Sync {
    /// Produce at most `query.tile_limit()` tiles in display order.
    ///
    /// An empty result is valid. Any upstream failure fails the whole
    /// request; partial results are never returned.
    async fn produce_tiles(&self, query: &CollageQuery) -> Result<Vec<Tile>, SourceError>;
}

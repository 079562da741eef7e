// Collage service - acquire tiles, fetch artwork, render, encode
use crate::application::artwork_fetcher::ArtworkFetcher;
use crate::application::tile_source::{SourceError, TileSource};
use crate::domain::request::{CollageRequest, OutputFormat};
use crate::domain::tile::{EntityKind, Tile};
use crate::infrastructure::collage_renderer::{CollageLayout, CollageRenderer};
use crate::infrastructure::image_encoder::{EncodedImage, encode};
use anyhow::Context;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollageError {
    #[error("missing or invalid request parameters")]
    InvalidParameters,

    #[error("tile source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
}

impl CollageError {
    /// Text shown on the error image
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidParameters => "Missing or invaild parameters",
            Self::SourceUnavailable(_) => "Error fetching info or invalid username",
        }
    }
}

/// Picks the tile source for a request and enriches its tiles with artwork
#[derive(Clone)]
pub struct TileAcquirer {
    album_source: Arc<dyn TileSource>,
    library_source: Arc<dyn TileSource>,
    artwork: ArtworkFetcher,
}

impl TileAcquirer {
    pub fn new(
        album_source: Arc<dyn TileSource>,
        library_source: Arc<dyn TileSource>,
        artwork: ArtworkFetcher,
    ) -> Self {
        Self {
            album_source,
            library_source,
            artwork,
        }
    }

    fn source_for(&self, kind: EntityKind) -> &dyn TileSource {
        match kind {
            EntityKind::Album => self.album_source.as_ref(),
            EntityKind::Artist | EntityKind::Track => self.library_source.as_ref(),
        }
    }

    /// Produce the request's tiles with as much artwork attached as could be
    /// fetched. Only tile acquisition can fail.
    pub async fn acquire(&self, request: &CollageRequest) -> Result<Vec<Tile>, CollageError> {
        let query = &request.query;
        let mut tiles = self.source_for(query.kind).produce_tiles(query).await?;
        debug_assert!(tiles.len() <= query.tile_limit());
        debug_assert!(tiles.iter().all(|t| t.kind() == query.kind));

        self.artwork.fetch_all(&mut tiles).await;

        let missing = tiles.iter().filter(|t| t.image().is_none()).count();
        tracing::debug!(
            user = %query.username,
            kind = query.kind.as_str(),
            tiles = tiles.len(),
            missing_artwork = missing,
            "tiles acquired"
        );
        Ok(tiles)
    }
}

#[derive(Clone)]
pub struct CollageService {
    acquirer: TileAcquirer,
    renderer: Arc<CollageRenderer>,
}

impl CollageService {
    pub fn new(acquirer: TileAcquirer, renderer: Arc<CollageRenderer>) -> Self {
        Self { acquirer, renderer }
    }

    /// Build the response image for a request, or an error image when the
    /// request is invalid or its tiles cannot be acquired.
    ///
    /// Only an encoding failure is returned as an error.
    pub async fn build_collage(
        &self,
        request: Result<CollageRequest, CollageError>,
        format: OutputFormat,
    ) -> anyhow::Result<EncodedImage> {
        let outcome = match request {
            Ok(request) => self
                .acquirer
                .acquire(&request)
                .await
                .map(|tiles| (request, tiles)),
            Err(e) => Err(e),
        };

        let renderer = self.renderer.clone();
        tokio::task::spawn_blocking(move || {
            let canvas = match outcome {
                Ok((request, tiles)) => {
                    let layout = CollageLayout {
                        kind: request.query.kind,
                        rows: request.query.rows,
                        cols: request.query.cols,
                        show_info: request.show_info,
                        show_play_count: request.show_play_count,
                    };
                    renderer.render_collage(&tiles, &layout)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "rendering error image");
                    renderer.render_error(e.user_message())
                }
            };
            encode(&canvas, format)
        })
        .await
        .context("Render task panicked")?
        .context("Failed to encode collage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeHttp, png_bytes, test_painter};
    use crate::domain::request::{CollageQuery, Period};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned tile source that counts its calls
    struct StubSource {
        result: Mutex<Option<Result<Vec<Tile>, SourceError>>>,
        calls: Mutex<usize>,
    }

    impl StubSource {
        fn new(result: Result<Vec<Tile>, SourceError>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(result)),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TileSource for StubSource {
        async fn produce_tiles(&self, _query: &CollageQuery) -> Result<Vec<Tile>, SourceError> {
            *self.calls.lock().unwrap() += 1;
            self.result.lock().unwrap().take().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn request(kind: EntityKind, rows: usize, cols: usize) -> CollageRequest {
        CollageRequest {
            query: CollageQuery {
                username: "x".to_string(),
                rows,
                cols,
                period: Period::Overall,
                kind,
            },
            show_info: false,
            show_play_count: false,
        }
    }

    fn album_tiles(count: usize) -> Vec<Tile> {
        (0..count)
            .map(|i| {
                Tile::album(
                    format!("A{}", i),
                    "B".to_string(),
                    1,
                    &format!("https://img.test/{}.png", i),
                )
            })
            .collect()
    }

    fn artwork_http(count: usize) -> FakeHttp {
        (0..count).fold(FakeHttp::new(), |http, i| {
            http.with_body(&format!("https://img.test/{}.webp", i), png_bytes(300, [9, 9, 9, 255]))
        })
    }

    fn acquirer(albums: Arc<StubSource>, library: Arc<StubSource>, http: FakeHttp) -> TileAcquirer {
        TileAcquirer::new(albums, library, ArtworkFetcher::new(Arc::new(http), None))
    }

    #[tokio::test]
    async fn test_album_request_uses_api_source_and_fetches_artwork() {
        let albums = StubSource::new(Ok(album_tiles(9)));
        let library = StubSource::new(Ok(Vec::new()));
        let svc = acquirer(albums.clone(), library.clone(), artwork_http(9));

        let tiles = svc.acquire(&request(EntityKind::Album, 3, 3)).await.unwrap();

        assert_eq!(albums.calls(), 1);
        assert_eq!(library.calls(), 0);
        assert_eq!(tiles.len(), 9);
        assert!(tiles.iter().all(|t| t.image().is_some()));
        assert_eq!(
            crate::infrastructure::collage_renderer::compose_grid(&tiles, 3, 3).dimensions(),
            (900, 900)
        );
    }

    #[tokio::test]
    async fn test_artist_and_track_use_library_source() {
        for kind in [EntityKind::Artist, EntityKind::Track] {
            let albums = StubSource::new(Ok(Vec::new()));
            let library = StubSource::new(Ok(Vec::new()));
            let svc = acquirer(albums.clone(), library.clone(), FakeHttp::new());

            let tiles = svc.acquire(&request(kind, 2, 2)).await.unwrap();

            assert!(tiles.is_empty());
            assert_eq!(albums.calls(), 0);
            assert_eq!(library.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_source_failure_is_source_unavailable() {
        let albums = StubSource::new(Ok(Vec::new()));
        let library = StubSource::new(Err(SourceError::Status {
            url: "https://site.test/user/x".to_string(),
            status: 500,
        }));
        let http = FakeHttp::new();
        let svc = acquirer(albums, library, http);

        let err = svc.acquire(&request(EntityKind::Track, 2, 2)).await.unwrap_err();

        assert!(matches!(err, CollageError::SourceUnavailable(_)));
        assert_eq!(err.user_message(), "Error fetching info or invalid username");
    }

    #[tokio::test]
    async fn test_invalid_request_renders_error_image_without_upstream_calls() {
        let painter = test_painter();
        let albums = StubSource::new(Ok(album_tiles(1)));
        let library = StubSource::new(Ok(Vec::new()));
        let http = Arc::new(FakeHttp::new());
        let svc = CollageService::new(
            TileAcquirer::new(albums.clone(), library.clone(), ArtworkFetcher::new(http.clone(), None)),
            Arc::new(CollageRenderer::new(painter)),
        );

        let encoded = svc
            .build_collage(Err(CollageError::InvalidParameters), OutputFormat::Jpeg)
            .await
            .unwrap();

        assert_eq!(encoded.content_type, "image/jpeg");
        let decoded = image::load_from_memory(&encoded.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 65));
        assert_eq!(albums.calls() + library.calls(), 0);
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn test_valid_album_request_renders_full_grid() {
        let painter = test_painter();
        let albums = StubSource::new(Ok(album_tiles(9)));
        let library = StubSource::new(Ok(Vec::new()));
        let svc = CollageService::new(
            acquirer(albums, library, artwork_http(9)),
            Arc::new(CollageRenderer::new(painter)),
        );

        let encoded = svc
            .build_collage(Ok(request(EntityKind::Album, 3, 3)), OutputFormat::WebP)
            .await
            .unwrap();

        assert_eq!(encoded.content_type, "image/webp");
        let decoded = image::load_from_memory(&encoded.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (900, 900));
    }

    #[test]
    fn test_invalid_parameters_message() {
        assert_eq!(
            CollageError::InvalidParameters.user_message(),
            "Missing or invaild parameters"
        );
    }
}

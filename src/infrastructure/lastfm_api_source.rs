// Last.fm API tile source - top albums via user.gettopalbums
use crate::application::http_fetcher::HttpFetcher;
use crate::application::tile_source::{SourceError, TileSource};
use crate::domain::request::CollageQuery;
use crate::domain::tile::{Tile, parse_leading_count};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Index of the "extralarge" (300x300) entry in an album's image list
const PREFERRED_IMAGE_INDEX: usize = 3;

pub struct LastfmApiSource {
    http: Arc<dyn HttpFetcher>,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TopAlbumsResponse {
    #[serde(default)]
    topalbums: Option<TopAlbums>,
}

#[derive(Debug, Deserialize)]
struct TopAlbums {
    #[serde(default)]
    album: Vec<ApiAlbum>,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    #[serde(default)]
    name: String,
    #[serde(default)]
    artist: Option<ApiArtist>,
    #[serde(default)]
    playcount: serde_json::Value,
    #[serde(default)]
    image: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    #[serde(rename = "#text", default)]
    url: String,
}

impl ApiAlbum {
    fn preferred_image(&self) -> Option<&str> {
        self.image
            .get(PREFERRED_IMAGE_INDEX)
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }

    fn play_count(&self) -> u64 {
        // The API sends counts as strings, but accept plain numbers too
        match &self.playcount {
            serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
            serde_json::Value::String(s) => parse_leading_count(s),
            _ => 0,
        }
    }
}

impl LastfmApiSource {
    pub fn new(http: Arc<dyn HttpFetcher>, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn build_top_albums_url(&self, query: &CollageQuery) -> String {
        let limit = query.request_limit().to_string();
        let params = [
            ("method", "user.gettopalbums"),
            ("format", "json"),
            ("api_key", self.api_key.as_str()),
            ("user", query.username.as_str()),
            ("period", query.period.api_code()),
            ("limit", limit.as_str()),
        ];
        let encoded: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();

        format!("{}?{}", self.base_url, encoded.join("&"))
    }
}

#[async_trait]
impl TileSource for LastfmApiSource {
    async fn produce_tiles(&self, query: &CollageQuery) -> Result<Vec<Tile>, SourceError> {
        let url = self.build_top_albums_url(query);
        tracing::debug!(user = %query.username, limit = query.request_limit(), "requesting top albums");

        let response = self.http.get(&url).await.map_err(|e| SourceError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !response.is_success() {
            return Err(SourceError::Status {
                url,
                status: response.status,
            });
        }

        let data: TopAlbumsResponse =
            serde_json::from_slice(&response.body).map_err(|e| SourceError::Malformed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let albums = data.topalbums.map(|t| t.album).unwrap_or_default();
        let tiles: Vec<Tile> = albums
            .into_iter()
            .filter_map(|album| {
                let image_url = album.preferred_image()?.to_string();
                let play_count = album.play_count();
                let artist = album.artist.map(|a| a.name).unwrap_or_default();
                Some(Tile::album(album.name, artist, play_count, &image_url))
            })
            .take(query.tile_limit())
            .collect();

        tracing::debug!(user = %query.username, tiles = tiles.len(), "top albums collected");
        Ok(tiles)
    }
}

// Last.fm library listing tile source - scrapes the artist/track chart pages
use crate::application::http_fetcher::HttpFetcher;
use crate::application::tile_source::{SourceError, TileSource};
use crate::domain::request::CollageQuery;
use crate::domain::tile::{EntityKind, Tile, parse_leading_count};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, LazyLock};

pub const PAGE_SIZE: usize = 50;
pub const MAX_PAGES: usize = 3;

/// Image id the site serves when an artist or track has no artwork
const PLACEHOLDER_IMAGE_ID: &str = "2a96cbd8b46e442fc41c2b86b821562f";

// Only called with the constant selectors below
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr.chartlist-row"));
static METADATA: LazyLock<Selector> = LazyLock::new(|| selector("p.metadata-display"));
static NAME: LazyLock<Selector> = LazyLock::new(|| selector(".chartlist-name > a"));
static ARTIST: LazyLock<Selector> = LazyLock::new(|| selector(".chartlist-artist > a"));
static COUNT: LazyLock<Selector> = LazyLock::new(|| selector(".chartlist-count-bar-value"));
static AVATAR_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector(".chartlist-image > .avatar > img"));
static COVER_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector(".chartlist-image > .cover-art > img"));

/// Tiles and total-items indicator parsed from one listing page
#[derive(Debug, Default)]
struct ListingPage {
    tiles: Vec<Tile>,
    total: Option<u64>,
}

pub struct LastfmLibrarySource {
    http: Arc<dyn HttpFetcher>,
    site_base_url: String,
}

impl LastfmLibrarySource {
    pub fn new(http: Arc<dyn HttpFetcher>, site_base_url: String) -> Self {
        Self {
            http,
            site_base_url: site_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_page_url(&self, query: &CollageQuery, page: usize) -> String {
        format!(
            "{}/user/{}/library/{}?date_preset={}&page={}",
            self.site_base_url,
            urlencoding::encode(&query.username),
            query.kind.library_segment(),
            query.period.date_preset(),
            page
        )
    }

    async fn fetch_page(&self, url: &str, kind: EntityKind) -> Result<ListingPage, SourceError> {
        let response = self.http.get(url).await.map_err(|e| SourceError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !response.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        let body = String::from_utf8_lossy(&response.body);
        Ok(parse_listing_page(&body, kind))
    }
}

/// Number of pages worth requesting for a query, before early stops
pub fn page_budget(query: &CollageQuery) -> usize {
    query.request_limit().div_ceil(PAGE_SIZE).min(MAX_PAGES)
}

#[async_trait]
impl TileSource for LastfmLibrarySource {
    async fn produce_tiles(&self, query: &CollageQuery) -> Result<Vec<Tile>, SourceError> {
        let mut tiles = Vec::with_capacity(query.tile_limit());
        let mut total: Option<u64> = None;

        for page in 1..=page_budget(query) {
            let already_listed = ((page - 1) * PAGE_SIZE) as u64;
            if total.is_some_and(|t| t <= already_listed) || tiles.len() >= query.tile_limit() {
                break;
            }

            let url = self.build_page_url(query, page);
            tracing::debug!(user = %query.username, page, "fetching library page");

            let parsed = self.fetch_page(&url, query.kind).await.inspect_err(|e| {
                tracing::warn!(user = %query.username, page, error = %e, "library page failed");
            })?;

            if parsed.total.is_some() {
                total = parsed.total;
            }
            tiles.extend(parsed.tiles);
        }

        tiles.truncate(query.tile_limit());
        tracing::debug!(user = %query.username, tiles = tiles.len(), "library listing collected");
        Ok(tiles)
    }
}

fn child_text(row: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    row.select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
}

fn child_attr(row: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    row.select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::to_string)
}

fn parse_listing_page(html: &str, kind: EntityKind) -> ListingPage {
    let document = Html::parse_document(html);

    let total = document
        .select(&METADATA)
        .next()
        .map(|e| parse_leading_count(&e.text().collect::<String>()));

    let tiles = document
        .select(&ROW)
        .filter_map(|row| parse_row(&row, kind))
        .collect();

    ListingPage { tiles, total }
}

fn parse_row(row: &ElementRef<'_>, kind: EntityKind) -> Option<Tile> {
    let play_count = child_text(row, &COUNT)
        .map(|text| parse_leading_count(&text))
        .unwrap_or(0);

    let tile = match kind {
        EntityKind::Artist => {
            let artist = child_text(row, &NAME)?;
            let image = child_attr(row, &AVATAR_IMAGE, "src")?.replacen("avatar70s", "avatar300s", 1);
            if image.contains(PLACEHOLDER_IMAGE_ID) {
                return None;
            }
            Tile::artist(artist, play_count, &image)
        }
        EntityKind::Track => {
            let artist = child_text(row, &ARTIST)?;
            let track = child_text(row, &NAME)?;
            let image = child_attr(row, &COVER_IMAGE, "src")?.replacen("64s", "300x300", 1);
            if image.contains(PLACEHOLDER_IMAGE_ID) {
                return None;
            }
            Tile::track(track, artist, play_count, &image)
        }
        // Albums come from the API source
        EntityKind::Album => return None,
    };

    Some(tile)
}

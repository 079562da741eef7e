// Collage request domain model
use super::tile::EntityKind;

/// Extra entries requested from the API to make up for albums without artwork
pub const OVERFETCH: usize = 15;

/// Largest accepted row or column count
pub const MAX_GRID_DIMENSION: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    SevenDay,
    OneMonth,
    ThreeMonth,
    SixMonth,
    TwelveMonth,
    Overall,
}

impl Period {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "7day" => Some(Self::SevenDay),
            "1month" => Some(Self::OneMonth),
            "3month" => Some(Self::ThreeMonth),
            "6month" => Some(Self::SixMonth),
            "12month" => Some(Self::TwelveMonth),
            "overall" => Some(Self::Overall),
            _ => None,
        }
    }

    /// Period code understood by the metadata API
    pub fn api_code(&self) -> &'static str {
        match self {
            Self::SevenDay => "7day",
            Self::OneMonth => "1month",
            Self::ThreeMonth => "3month",
            Self::SixMonth => "6month",
            Self::TwelveMonth => "12month",
            Self::Overall => "overall",
        }
    }

    /// `date_preset` value used by the library listing pages
    pub fn date_preset(&self) -> &'static str {
        match self {
            Self::SevenDay => "LAST_7_DAYS",
            Self::OneMonth => "LAST_30_DAYS",
            Self::ThreeMonth => "LAST_90_DAYS",
            Self::SixMonth => "LAST_180_DAYS",
            Self::TwelveMonth => "LAST_365_DAYS",
            Self::Overall => "ALL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    WebP,
}

impl OutputFormat {
    pub fn from_webp_flag(webp: bool) -> Self {
        if webp { Self::WebP } else { Self::Jpeg }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }
}

/// What to fetch: whose history, which period, which entity, how many
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollageQuery {
    pub username: String,
    pub rows: usize,
    pub cols: usize,
    pub period: Period,
    pub kind: EntityKind,
}

impl CollageQuery {
    /// Number of grid cells; no source ever returns more tiles than this
    pub fn tile_limit(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of entries to ask upstream for, including overfetch
    pub fn request_limit(&self) -> usize {
        self.tile_limit() + OVERFETCH
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollageRequest {
    pub query: CollageQuery,
    pub show_info: bool,
    pub show_play_count: bool,
}

pub fn is_valid_grid_dimension(value: usize) -> bool {
    (1..=MAX_GRID_DIMENSION).contains(&value)
}

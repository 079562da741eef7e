// Tile domain model - one grid cell of a collage
use image::RgbaImage;

/// Extension every artwork URL is rewritten to before fetching
pub const PREFERRED_IMAGE_EXTENSION: &str = ".webp";

const REWRITTEN_EXTENSIONS: [&str; 3] = [".jpg", ".png", ".gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Album,
    Artist,
    Track,
}

impl EntityKind {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "album" => Some(Self::Album),
            "artist" => Some(Self::Artist),
            "track" => Some(Self::Track),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Track => "track",
        }
    }

    /// Library path segment on the listing site ("artists", "tracks", ...)
    pub fn library_segment(&self) -> &'static str {
        match self {
            Self::Album => "albums",
            Self::Artist => "artists",
            Self::Track => "tracks",
        }
    }
}

#[derive(Debug)]
pub struct Tile {
    kind: EntityKind,
    primary_label: Option<String>,
    secondary_label: String,
    play_count: u64,
    image_url: String,
    image: Option<RgbaImage>,
}

impl Tile {
    pub fn album(album: String, artist: String, play_count: u64, image_url: &str) -> Self {
        Self::new(EntityKind::Album, Some(album), artist, play_count, image_url)
    }

    pub fn artist(artist: String, play_count: u64, image_url: &str) -> Self {
        Self::new(EntityKind::Artist, None, artist, play_count, image_url)
    }

    pub fn track(track: String, artist: String, play_count: u64, image_url: &str) -> Self {
        Self::new(EntityKind::Track, Some(track), artist, play_count, image_url)
    }

    fn new(
        kind: EntityKind,
        primary_label: Option<String>,
        secondary_label: String,
        play_count: u64,
        image_url: &str,
    ) -> Self {
        Self {
            kind,
            primary_label,
            secondary_label,
            play_count,
            image_url: to_preferred_format(image_url),
            image: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Album or track name; artists have none
    pub fn primary_label(&self) -> Option<&str> {
        self.primary_label.as_deref()
    }

    /// Artist name
    pub fn secondary_label(&self) -> &str {
        &self.secondary_label
    }

    pub fn play_count(&self) -> u64 {
        self.play_count
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Stores decoded artwork. The first image wins; later calls are ignored
    /// and return `false`.
    pub fn attach_image(&mut self, image: RgbaImage) -> bool {
        if self.image.is_some() {
            return false;
        }
        self.image = Some(image);
        true
    }
}

/// Rewrite a trailing known artwork extension to the preferred one.
///
/// Only the suffix is touched, so extensions elsewhere in the path are kept
/// and a rewritten URL comes back unchanged on a second pass.
pub fn to_preferred_format(url: &str) -> String {
    REWRITTEN_EXTENSIONS
        .iter()
        .find_map(|ext| url.strip_suffix(*ext))
        .map(|stem| format!("{}{}", stem, PREFERRED_IMAGE_EXTENSION))
        .unwrap_or_else(|| url.to_string())
}

/// Parse the count at the start of a human-formatted text such as
/// `"1,234 scrobbles"`.
///
/// Leading whitespace is skipped, then digits are consumed; a comma between
/// two digits is a grouping separator. Anything else ends the number.
/// Text without a leading digit yields 0.
pub fn parse_leading_count(text: &str) -> u64 {
    let bytes = text.trim_start().as_bytes();
    let mut count: u64 = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'0'..=b'9' => {
                count = count
                    .saturating_mul(10)
                    .saturating_add(u64::from(b - b'0'));
            }
            b',' if i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => {}
            _ => break,
        }
    }

    count
}

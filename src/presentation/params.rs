// Request parameter parsing for the collage endpoint
use crate::application::collage_service::CollageError;
use crate::domain::request::{
    CollageQuery, CollageRequest, OutputFormat, Period, is_valid_grid_dimension,
};
use crate::domain::tile::EntityKind;

/// Raw form/query fields; everything optional and parsed leniently
#[derive(Debug, Default)]
pub struct CollageParams {
    pub username: Option<String>,
    pub rows: Option<String>,
    pub cols: Option<String>,
    pub period: Option<String>,
    pub kind: Option<String>,
    pub info: Option<String>,
    pub playcount: Option<String>,
    pub webp: Option<String>,
}

/// Split `application/x-www-form-urlencoded` text into decoded pairs.
/// Pairs that do not decode to UTF-8 are dropped.
pub fn parse_urlencoded(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Boolean spellings accepted by the endpoint; anything else is false
fn parse_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "t" | "T" | "TRUE" | "true" | "True"))
}

/// Unparsable numbers become 0, which fails range validation
fn parse_dimension(value: Option<&str>) -> usize {
    value.and_then(|v| v.parse::<usize>().ok()).unwrap_or(0)
}

impl CollageParams {
    /// Collect known fields from key/value pairs. The first value of a
    /// repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "username" => &mut params.username,
                "rows" => &mut params.rows,
                "cols" => &mut params.cols,
                "period" => &mut params.period,
                "type" => &mut params.kind,
                "info" => &mut params.info,
                "playcount" => &mut params.playcount,
                "webp" => &mut params.webp,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }

    /// Output encoding; decided even when the rest of the request is invalid
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_webp_flag(parse_flag(self.webp.as_deref()))
    }

    pub fn into_request(self) -> Result<CollageRequest, CollageError> {
        let username = self.username.as_deref().unwrap_or_default().trim().to_string();
        let rows = parse_dimension(self.rows.as_deref());
        let cols = parse_dimension(self.cols.as_deref());
        let period = self.period.as_deref().and_then(Period::from_param);
        let kind = self.kind.as_deref().and_then(EntityKind::from_param);

        let (Some(period), Some(kind)) = (period, kind) else {
            return Err(CollageError::InvalidParameters);
        };
        if username.is_empty() || !is_valid_grid_dimension(rows) || !is_valid_grid_dimension(cols) {
            return Err(CollageError::InvalidParameters);
        }

        Ok(CollageRequest {
            query: CollageQuery {
                username,
                rows,
                cols,
                period,
                kind,
            },
            show_info: parse_flag(self.info.as_deref()),
            show_play_count: parse_flag(self.playcount.as_deref()),
        })
    }
}

// HTTP request handlers
use crate::infrastructure::http_response::image_response;
use crate::presentation::app_state::AppState;
use crate::presentation::params::{CollageParams, parse_urlencoded};
use axum::{
    body::Bytes,
    extract::{RawQuery, State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Urlencoded body text, if the request declares one
fn form_body(headers: &HeaderMap, body: &Bytes) -> Option<String> {
    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"));
    if !is_form {
        return None;
    }
    std::str::from_utf8(body).ok().map(str::to_string)
}

/// Merge body and query parameters, body first. Never rejects a request.
pub fn collage_params(headers: &HeaderMap, query: Option<&str>, body: &Bytes) -> CollageParams {
    let body_pairs = form_body(headers, body)
        .map(|text| parse_urlencoded(&text))
        .unwrap_or_default();
    let query_pairs = query.map(parse_urlencoded).unwrap_or_default();
    CollageParams::from_pairs(body_pairs.into_iter().chain(query_pairs))
}

/// Render a collage from GET query or POST form parameters. Invalid input
/// and upstream failures still answer 200 with an error image.
pub async fn collage(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = body.unwrap_or_else(|rejection| {
        tracing::debug!("Ignoring unreadable request body: {}", rejection);
        Bytes::new()
    });
    let params = collage_params(&headers, query.as_deref(), &body);
    let format = params.output_format();
    let request = params.into_request();

    match state.collage_service.build_collage(request, format).await {
        Ok(image) => match image_response(image) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => {
            tracing::error!("Collage rendering failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

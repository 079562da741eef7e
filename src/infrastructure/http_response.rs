// HTTP response utilities for encoded images
use crate::infrastructure::image_encoder::EncodedImage;
use axum::{
    body::Body,
    http::{HeaderValue, Response, StatusCode, header},
};

/// Build a 200 response carrying an encoded image
pub fn image_response(image: EncodedImage) -> Result<Response<Body>, StatusCode> {
    let content_length = HeaderValue::from_str(&image.bytes.len().to_string()).map_err(|e| {
        tracing::error!("Invalid content length header: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .body(Body::from(image.bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_response_headers() {
        let response = image_response(EncodedImage {
            content_type: "image/webp",
            bytes: vec![1, 2, 3, 4],
        })
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "4");
    }
}

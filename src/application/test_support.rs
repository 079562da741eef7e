// In-memory HTTP fake and fixtures shared by unit tests
use crate::application::http_fetcher::{HttpFetcher, HttpResponse};
use crate::infrastructure::glyphs::GlyphPainter;
use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

/// Serves canned responses by exact URL; unknown URLs fail like an
/// unreachable host.
#[derive(Default)]
pub struct FakeHttp {
    responses: HashMap<String, HttpResponse>,
    calls: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, response: HttpResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_body(self, url: &str, body: impl Into<bytes::Bytes>) -> Self {
        self.with_response(url, HttpResponse::new(200, body))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetcher for FakeHttp {
    async fn get(&self, url: &str) -> anyhow::Result<HttpResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(response) => Ok(response.clone()),
            None => anyhow::bail!("connection refused: {}", url),
        }
    }
}

/// PNG bytes of a solid square
pub fn png_bytes(size: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(size, size, Rgba(color));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// Painter backed by the DejaVu Sans font checked in under `tests/fixtures`
pub fn test_painter() -> GlyphPainter {
    let bytes = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/DejaVuSans.ttf"
    ));
    GlyphPainter::from_bytes(bytes.to_vec()).unwrap()
}

// HTTP port used by tile sources and the artwork fetcher
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET a URL. Transport failures are errors; any received status,
    /// including 4xx/5xx, is returned as a response.
    async fn get(&self, url: &str) -> anyhow::Result<HttpResponse>;
}

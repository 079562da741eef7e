// Application layer - Ports and use cases
pub mod artwork_fetcher;
pub mod collage_service;
pub mod http_fetcher;
pub mod tile_source;

#[cfg(test)]
pub mod test_support;

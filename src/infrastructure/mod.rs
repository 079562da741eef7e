// Infrastructure layer - External dependencies and adapters
pub mod collage_renderer;
pub mod config;
pub mod glyphs;
pub mod http_response;
pub mod image_encoder;
pub mod lastfm_api_source;
pub mod lastfm_library_source;
pub mod reqwest_fetcher;

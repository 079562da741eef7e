use serde::Deserialize;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:80.0) Gecko/20100101 Firefox/80.0";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub lastfm: LastfmSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub static_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            static_dir: "./static".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LastfmSettings {
    pub api_key: String,
    pub api_base_url: String,
    pub site_base_url: String,
}

impl Default for LastfmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://ws.audioscrobbler.com/2.0/".to_string(),
            site_base_url: "https://www.last.fm".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderSettings {
    pub font_path: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            font_path: "./NotoSansCJKtc-Medium.ttf".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchSettings {
    pub user_agent: String,
    /// Upper bound on simultaneous artwork downloads per request; unset is unbounded
    pub max_concurrent_fetches: Option<usize>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent_fetches: None,
        }
    }
}

/// Load `config/collage.*` (optional) overlaid with `COLLAGE__SECTION__KEY`
/// environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/collage").required(false))
        .add_source(
            config::Environment::with_prefix("COLLAGE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    if app_config.lastfm.api_key.is_empty() {
        tracing::warn!("lastfm.api_key is empty; album collages will fail upstream");
    }
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    #[test]
    fn test_defaults_when_sections_missing() {
        let settings = Config::builder()
            .add_source(File::from_str("[lastfm]\napi_key = \"abc\"\n", FileFormat::Toml))
            .build()
            .unwrap();

        let app_config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(app_config.lastfm.api_key, "abc");
        assert_eq!(app_config.lastfm.site_base_url, "https://www.last.fm");
        assert_eq!(app_config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(app_config.fetch.max_concurrent_fetches, None);
        assert!(app_config.fetch.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_overrides_from_file() {
        let toml = r#"
            [server]
            bind_addr = "0.0.0.0:9000"

            [render]
            font_path = "/fonts/a.ttf"

            [fetch]
            max_concurrent_fetches = 16
        "#;
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();

        let app_config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(app_config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(app_config.server.static_dir, "./static");
        assert_eq!(app_config.render.font_path, "/fonts/a.ttf");
        assert_eq!(app_config.fetch.max_concurrent_fetches, Some(16));
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::domain::Category;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_url: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/city-explorer.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoint {
    pub base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ProviderEndpoint {
    fn with_base(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: None,
        }
    }
}

impl Default for ProviderEndpoint {
    fn default() -> Self {
        Self::with_base("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Bounds every outbound provider call (default: 30)
    pub request_timeout_seconds: u64,

    pub geocode: ProviderEndpoint,

    pub weather: ProviderEndpoint,

    pub events: ProviderEndpoint,

    pub reviews: ProviderEndpoint,

    pub movies: ProviderEndpoint,

    /// Prefix for TMDB poster paths.
    pub movie_image_base_url: String,

    pub trails: ProviderEndpoint,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            geocode: ProviderEndpoint::with_base("https://maps.googleapis.com"),
            weather: ProviderEndpoint::with_base("https://api.darksky.net"),
            events: ProviderEndpoint::with_base("https://www.eventbriteapi.com"),
            reviews: ProviderEndpoint::with_base("https://api.yelp.com"),
            movies: ProviderEndpoint::with_base("https://api.themoviedb.org"),
            movie_image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            trails: ProviderEndpoint::with_base("https://www.hikingproject.com"),
        }
    }
}

impl ProvidersConfig {
    /// A `[providers.<name>]` table that only sets `api_key` deserializes with
    /// an empty `base_url`; put the default endpoint back.
    fn fill_default_base_urls(&mut self) {
        let defaults = Self::default();
        let pairs = [
            (&mut self.geocode, defaults.geocode),
            (&mut self.weather, defaults.weather),
            (&mut self.events, defaults.events),
            (&mut self.reviews, defaults.reviews),
            (&mut self.movies, defaults.movies),
            (&mut self.trails, defaults.trails),
        ];
        for (endpoint, default) in pairs {
            if endpoint.base_url.trim().is_empty() {
                endpoint.base_url = default.base_url;
            }
        }
        if self.movie_image_base_url.trim().is_empty() {
            self.movie_image_base_url = defaults.movie_image_base_url;
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Freshness thresholds per category, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub weather_ttl_seconds: u64,

    pub events_ttl_seconds: u64,

    pub reviews_ttl_seconds: u64,

    pub movies_ttl_seconds: u64,

    pub trails_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        const HOUR: u64 = 60 * 60;

        Self {
            weather_ttl_seconds: 15,
            events_ttl_seconds: 6 * HOUR,
            reviews_ttl_seconds: 24 * HOUR,
            movies_ttl_seconds: 7 * 24 * HOUR,
            trails_ttl_seconds: 24 * HOUR,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self, category: Category) -> Duration {
        let seconds = match category {
            Category::Weather => self.weather_ttl_seconds,
            Category::Events => self.events_ttl_seconds,
            Category::Reviews => self.reviews_ttl_seconds,
            Category::Movies => self.movies_ttl_seconds,
            Category::Trails => self.trails_ttl_seconds,
        };
        Duration::from_secs(seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "city-explorer".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.providers.fill_default_base_urls();
        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("city-explorer").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".city-explorer").join("config.toml"));
        }

        paths
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    /// Blank values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.general.database_url = url;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.general.log_level = level;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{port}'"))?;
        }

        let keys: [(&str, &mut ProviderEndpoint); 6] = [
            ("GEOCODE_API_KEY", &mut self.providers.geocode),
            ("WEATHER_API_KEY", &mut self.providers.weather),
            ("EVENTBRITE_API_KEY", &mut self.providers.events),
            ("YELP_API_KEY", &mut self.providers.reviews),
            ("MOVIE_API_KEY", &mut self.providers.movies),
            ("TRAIL_API_KEY", &mut self.providers.trails),
        ];
        for (name, endpoint) in keys {
            if let Some(key) = get(name) {
                endpoint.api_key = Some(key);
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.providers.request_timeout_seconds == 0 {
            anyhow::bail!("Provider request timeout must be > 0");
        }

        if self.general.max_db_connections == 0 {
            anyhow::bail!("max_db_connections must be > 0");
        }

        for (name, endpoint) in self.provider_endpoints() {
            if endpoint.base_url.trim().is_empty() {
                anyhow::bail!("Base URL for the {name} provider cannot be empty");
            }
        }

        Ok(())
    }

    /// Categories and the geocoder whose API key is not configured.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        self.provider_endpoints()
            .into_iter()
            .filter(|(_, e)| e.api_key.as_deref().is_none_or(|k| k.trim().is_empty()))
            .map(|(name, _)| name)
            .collect()
    }

    fn provider_endpoints(&self) -> [(&'static str, &ProviderEndpoint); 6] {
        [
            ("geocode", &self.providers.geocode),
            ("weather", &self.providers.weather),
            ("events", &self.providers.events),
            ("reviews", &self.providers.reviews),
            ("movies", &self.providers.movies),
            ("trails", &self.providers.trails),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.providers.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.cache.ttl(Category::Weather), Duration::from_secs(15));
        assert_eq!(
            config.cache.ttl(Category::Movies),
            Duration::from_secs(7 * 24 * 3600)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[providers.weather]"));
        assert!(toml_str.contains("[cache]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [server]
            port = 8080

            [cache]
            weather_ttl_seconds = 60

            [providers.reviews]
            api_key = "yelp-secret"
        "#;

        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl(Category::Weather), Duration::from_secs(60));
        assert_eq!(config.cache.events_ttl_seconds, 6 * 3600);
        assert_eq!(
            config.providers.reviews.api_key.as_deref(),
            Some("yelp-secret")
        );
        assert_eq!(config.providers.reviews.base_url, "https://api.yelp.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "4000"),
            ("WEATHER_API_KEY", "ds-key"),
            ("YELP_API_KEY", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides_from(|name| env.get(name).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.general.database_url, "sqlite::memory:");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.providers.weather.api_key.as_deref(), Some("ds-key"));
        assert_eq!(config.providers.reviews.api_key, None);
    }

    #[test]
    fn invalid_port_override_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides_from(|name| (name == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_zero_values() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.providers.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_credentials_lists_unconfigured_providers() {
        let mut config = Config::default();
        config.providers.geocode.api_key = Some("g".into());
        config.providers.movies.api_key = Some(String::new());

        let missing = config.missing_credentials();
        assert!(!missing.contains(&"geocode"));
        assert!(missing.contains(&"movies"));
        assert_eq!(missing.len(), 5);
    }
}

use crate::common::constants::{
    CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, NEWS_API_KEY_ENV, NEWS_DEFAULT_BASE_URL,
    NEWS_DEFAULT_LANGUAGE, NEWS_DEFAULT_PAGE_SIZE, NEWS_DEFAULT_TIMEOUT_SECS,
};
use crate::common::error::{FeedError, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub news: NewsConfig,
    pub weather: WeatherConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    /// File the settings were read from; `None` when the defaults were used
    #[serde(skip)]
    pub origin: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub language: String,
    pub page_size: u32,
    pub timeout_seconds: u64,
    /// Only ever set from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: NEWS_DEFAULT_BASE_URL.to_string(),
            language: NEWS_DEFAULT_LANGUAGE.to_string(),
            page_size: NEWS_DEFAULT_PAGE_SIZE,
            timeout_seconds: NEWS_DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

impl NewsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Markup file to use instead of the built-in fixture
    pub fixture_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily-rotated JSON logs; console only when unset
    pub log_dir: Option<PathBuf>,
    /// Filter directive used when RUST_LOG is unset
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Write the Prometheus text exposition here on exit; no recorder when unset
    pub dump_path: Option<PathBuf>,
}

impl Config {
    /// Load `.env`, then the config file (`TABULAR_FEED_CONFIG` or
    /// `config.toml`), then the API key from `NEWSAPI_KEY`.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(&path)?;
        config.set_api_key(std::env::var(NEWS_API_KEY_ENV).ok());
        Ok(config)
    }

    /// A missing file yields the defaults. Nothing is logged here since this
    /// runs before the subscriber exists; see `origin`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Config = match fs::read_to_string(path) {
            Ok(content) => {
                let mut config: Config = toml::from_str(&content)?;
                config.origin = Some(path.to_path_buf());
                config
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
            Err(e) => {
                return Err(FeedError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        self.news.api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.news.page_size) {
            return Err(FeedError::Config(format!(
                "news.page_size must be between 1 and 100, got {}",
                self.news.page_size
            )));
        }
        if self.news.timeout_seconds == 0 {
            return Err(FeedError::Config("news.timeout_seconds must be positive".into()));
        }
        if self.news.base_url.trim().is_empty() {
            return Err(FeedError::Config("news.base_url must not be empty".into()));
        }
        Ok(())
    }
}

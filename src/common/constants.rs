/// Source name constants shared by the sources, the CLI and log fields
pub const WEATHER_SOURCE: &str = "city_weather";
pub const NEWS_SOURCE: &str = "news_headlines";

// News endpoint defaults (overridable in config.toml)
pub const NEWS_DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/top-headlines";
pub const NEWS_DEFAULT_LANGUAGE: &str = "en";
pub const NEWS_DEFAULT_PAGE_SIZE: u32 = 100;
pub const NEWS_DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable holding the news API key; never read from config.toml
pub const NEWS_API_KEY_ENV: &str = "NEWSAPI_KEY";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "TABULAR_FEED_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

// Weather markup layout
pub const WEATHER_CONTAINER_SELECTOR: &str = "div.city-weather";
pub const WEATHER_TITLE_SELECTOR: &str = "h2";
pub const WEATHER_VALUE_SELECTOR: &str = "span.temp";
pub const WEATHER_LABEL_SELECTOR: &str = "span.condition";
pub const WEATHER_VALUE_UNIT: &str = "°C";

// Empty-state and error notices
pub const NO_MATCHES_NOTICE: &str = "No records match the current search.";
pub const EMPTY_PAYLOAD_NOTICE: &str = "No data found for the selected filters.";
pub const NO_ARTICLES_NOTICE: &str = "No articles found for the selected filters.";

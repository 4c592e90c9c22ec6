use crate::common::constants::WEATHER_SOURCE;
use crate::common::error::IngestError;
use crate::common::types::{FeedSource, RawInput};
use crate::config::WeatherConfig;
use crate::feed::MarkupLayout;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Built-in city readings rendered by the weather dashboard.
pub const CITY_WEATHER_MARKUP: &str = r#"
<div class="city-weather">
    <h2>New York</h2>
    <span class="temp">22°C</span>
    <span class="condition">Sunny</span>
</div>
<div class="city-weather">
    <h2>London</h2>
    <span class="temp">18°C</span>
    <span class="condition">Cloudy</span>
</div>
<div class="city-weather">
    <h2>Tokyo</h2>
    <span class="temp">25°C</span>
    <span class="condition">Rainy</span>
</div>
<div class="city-weather">
    <h2>Sydney</h2>
    <span class="temp">20°C</span>
    <span class="condition">Windy</span>
</div>
<div class="city-weather">
    <h2>Mumbai</h2>
    <span class="temp">30°C</span>
    <span class="condition">Humid</span>
</div>
<div class="city-weather">
    <h2>Cairo</h2>
    <span class="temp">28°C</span>
    <span class="condition">Sunny</span>
</div>
<div class="city-weather">
    <h2>Moscow</h2>
    <span class="temp">15°C</span>
    <span class="condition">Snowy</span>
</div>
<div class="city-weather">
    <h2>Paris</h2>
    <span class="temp">19°C</span>
    <span class="condition">Clear</span>
</div>
<div class="city-weather">
    <h2>São Paulo</h2>
    <span class="temp">26°C</span>
    <span class="condition">Thunderstorms</span>
</div>
<div class="city-weather">
    <h2>Toronto</h2>
    <span class="temp">17°C</span>
    <span class="condition">Foggy</span>
</div>
"#;

/// Static weather source: the built-in markup or an override file.
pub struct WeatherFixture {
    path: Option<PathBuf>,
}

impl Default for WeatherFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherFixture {
    pub fn new() -> Self {
        Self { path: None }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Self {
        match &config.fixture_path {
            Some(path) => Self::from_file(path.clone()),
            None => Self::new(),
        }
    }
}

#[async_trait::async_trait]
impl FeedSource for WeatherFixture {
    fn source_name(&self) -> &'static str {
        WEATHER_SOURCE
    }

    #[instrument(skip(self))]
    async fn fetch_raw(&self) -> Result<RawInput, IngestError> {
        let document = match &self.path {
            Some(path) => {
                debug!("Reading weather markup from {}", path.display());
                tokio::fs::read_to_string(path).await.map_err(|e| {
                    IngestError::unavailable(format!(
                        "Failed to read weather markup '{}': {}",
                        path.display(),
                        e
                    ))
                })?
            }
            None => CITY_WEATHER_MARKUP.to_string(),
        };

        Ok(RawInput::Markup {
            document,
            layout: MarkupLayout::weather(),
        })
    }
}

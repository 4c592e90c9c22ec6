use crate::app::ports::HttpClientPort;
use crate::common::constants::{NEWS_API_KEY_ENV, NEWS_SOURCE};
use crate::common::error::IngestError;
use crate::common::types::{FeedSource, RawInput};
use crate::config::NewsConfig;
use crate::feed::ApiLayout;
use crate::metrics::FeedMetrics;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// `"all"` (any case) selects every category.
    pub fn parse_filter(s: &str) -> Result<Option<Category>, String> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown category '{}'", s.trim()))
    }
}

/// Filters for one headlines fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsRequest {
    pub category: Option<Category>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub page_size: u32,
}

impl NewsRequest {
    /// All categories, today only.
    pub fn today(page_size: u32) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            category: None,
            from: today,
            to: today,
            page_size,
        }
    }
}

/// Error body returned by the provider on non-2xx responses
#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct NewsApiSource {
    config: NewsConfig,
    request: NewsRequest,
    http: Arc<dyn HttpClientPort>,
}

impl NewsApiSource {
    pub fn new(config: NewsConfig, request: NewsRequest, http: Arc<dyn HttpClientPort>) -> Self {
        Self {
            config,
            request,
            http,
        }
    }

    pub fn request(&self) -> &NewsRequest {
        &self.request
    }

    /// Headlines URL with every query parameter, including the api key.
    pub fn request_url(&self) -> Result<Url, IngestError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            IngestError::unavailable(format!(
                "No news API key configured (set {})",
                NEWS_API_KEY_ENV
            ))
        })?;

        let from = self.request.from.format("%Y-%m-%d").to_string();
        let to = self.request.to.format("%Y-%m-%d").to_string();
        let page_size = self.request.page_size.to_string();
        let mut params = vec![
            ("apiKey", api_key),
            ("language", self.config.language.as_str()),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("pageSize", page_size.as_str()),
        ];
        if let Some(category) = self.request.category {
            params.push(("category", category.as_str()));
        }

        Url::parse_with_params(&self.config.base_url, &params).map_err(|e| {
            IngestError::unavailable(format!("Invalid news endpoint '{}': {}", self.config.base_url, e))
        })
    }
}

fn status_message(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<ProviderError>(body) {
        Ok(ProviderError {
            message: Some(message),
            code,
        }) => match code {
            Some(code) => format!("HTTP {} ({}): {}", status, code, message),
            None => format!("HTTP {}: {}", status, message),
        },
        _ => format!("HTTP {}", status),
    }
}

#[async_trait::async_trait]
impl FeedSource for NewsApiSource {
    fn source_name(&self) -> &'static str {
        NEWS_SOURCE
    }

    #[instrument(skip(self))]
    async fn fetch_raw(&self) -> Result<RawInput, IngestError> {
        let url = self.request_url().map_err(|e| {
            FeedMetrics::source_error();
            e
        })?;
        info!(
            category = ?self.request.category,
            from = %self.request.from,
            to = %self.request.to,
            "Fetching latest news articles"
        );

        let resp = self.http.get(url.as_str()).await.map_err(|e| {
            FeedMetrics::source_error();
            IngestError::unavailable(e)
        })?;
        debug!(
            "News response status={} content_type={} bytes={}",
            resp.status,
            resp.content_type,
            resp.bytes.len()
        );

        if !resp.is_success() {
            FeedMetrics::source_error();
            let message = status_message(resp.status, &resp.bytes);
            warn!("News request failed: {}", message);
            return Err(IngestError::unavailable(message));
        }

        let payload: serde_json::Value = serde_json::from_slice(&resp.bytes).map_err(|e| {
            FeedMetrics::source_error();
            IngestError::unavailable(format!("Invalid news response body: {}", e))
        })?;

        if payload.get("status").and_then(|s| s.as_str()) == Some("error") {
            FeedMetrics::source_error();
            return Err(IngestError::unavailable(status_message(resp.status, &resp.bytes)));
        }

        info!("Data fetched successfully");
        Ok(RawInput::Api {
            payload,
            layout: ApiLayout::news_articles(),
        })
    }
}

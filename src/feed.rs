use crate::common::constants::{
    NEWS_SOURCE, WEATHER_CONTAINER_SELECTOR, WEATHER_LABEL_SELECTOR, WEATHER_SOURCE,
    WEATHER_TITLE_SELECTOR, WEATHER_VALUE_SELECTOR,
};
use crate::common::error::{FeedError, IngestError, Result};
use crate::common::types::{Field, FieldKind, Query, RawInput, Record, RecordSet, View};
use crate::metrics::FeedMetrics;
use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::{debug, info, instrument, warn};

/// ASCII digits only; U+2212 is accepted as a minus sign.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-+\x{2212}]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][-+]?[0-9]+)?")
        .expect("number pattern is valid")
});

/// CSS selectors describing one repeated container in a markup document.
/// Every child selector is required; an item missing one is skipped.
#[derive(Debug, Clone)]
pub struct MarkupLayout {
    pub feed: String,
    container: Selector,
    title: Selector,
    value: Selector,
    label: Selector,
}

impl MarkupLayout {
    pub fn new(
        feed: impl Into<String>,
        container: &str,
        title: &str,
        value: &str,
        label: &str,
    ) -> Result<Self> {
        Ok(Self {
            feed: feed.into(),
            container: parse_selector(container)?,
            title: parse_selector(title)?,
            value: parse_selector(value)?,
            label: parse_selector(label)?,
        })
    }

    /// `div.city-weather` containers with `h2`, `span.temp` and `span.condition`.
    pub fn weather() -> Self {
        Self::new(
            WEATHER_SOURCE,
            WEATHER_CONTAINER_SELECTOR,
            WEATHER_TITLE_SELECTOR,
            WEATHER_VALUE_SELECTOR,
            WEATHER_LABEL_SELECTOR,
        )
        .expect("weather selectors are valid")
    }

    fn extract(&self, index: usize, container: ElementRef<'_>) -> std::result::Result<Record, IngestError> {
        let title = child_text(container, &self.title)
            .ok_or_else(|| IngestError::malformed(index, "missing title"))?;
        let value_text = child_text(container, &self.value)
            .ok_or_else(|| IngestError::malformed(index, format!("{}: missing value", title)))?;
        let value = parse_leading_number(&value_text).ok_or_else(|| {
            IngestError::malformed(index, format!("{}: unparseable value '{}'", title, value_text))
        })?;
        let label = child_text(container, &self.label)
            .ok_or_else(|| IngestError::malformed(index, format!("{}: missing label", title)))?;

        let mut record = Record::new(title);
        record.primary_value = Some(value);
        record.secondary_label = Some(label);
        Ok(record)
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| FeedError::Config(format!("invalid selector '{}': {:?}", css, e)))
}

fn child_text(container: ElementRef<'_>, selector: &Selector) -> Option<String> {
    container
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// First signed decimal number in `text`, e.g. `"22°C"` -> `22.0`.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    NUMBER_RE
        .find(text)
        .and_then(|m| m.as_str().replace('\u{2212}', "-").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// JSON pointers describing the item list of an API payload and where each
/// record field lives inside one item.
#[derive(Debug, Clone)]
pub struct ApiLayout {
    pub feed: String,
    pub items: String,
    pub title: String,
    pub fields: Vec<(Field, String)>,
}

impl ApiLayout {
    pub fn new(feed: impl Into<String>, items: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            feed: feed.into(),
            items: items.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field, pointer: impl Into<String>) -> Self {
        self.fields.push((field, pointer.into()));
        self
    }

    /// Top-level `articles` list of a news headlines response.
    pub fn news_articles() -> Self {
        Self::new(NEWS_SOURCE, "/articles", "/title")
            .field(Field::SourceId, "/source/name")
            .field(Field::Author, "/author")
            .field(Field::Summary, "/description")
            .field(Field::Timestamp, "/publishedAt")
            .field(Field::Url, "/url")
            .field(Field::ImageUrl, "/urlToImage")
    }

    fn extract(&self, index: usize, item: &Value) -> std::result::Result<Record, IngestError> {
        let title = coerce_text(item.pointer(&self.title))
            .ok_or_else(|| IngestError::malformed(index, "missing title"))?;
        let mut record = Record::new(title);

        for (field, pointer) in &self.fields {
            let raw = item.pointer(pointer);
            match field.kind() {
                FieldKind::Number => record.primary_value = coerce_number(raw),
                FieldKind::Time => record.timestamp = coerce_time(raw),
                FieldKind::Text => {
                    if let Some(text) = coerce_text(raw) {
                        record.set_text(*field, text);
                    }
                }
            }
        }
        Ok(record)
    }
}

pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// RFC 3339 timestamps are normalized to UTC; naive timestamps are taken as-is.
pub fn coerce_time(value: Option<&Value>) -> Option<NaiveDateTime> {
    let text = value?.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    let parsed = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .ok();
    if parsed.is_none() {
        debug!("Unparseable timestamp '{}'", text);
    }
    parsed
}

/// The ingest + query pipeline shared by every dashboard.
pub struct TabularFeed;

impl TabularFeed {
    /// Normalize a raw payload into a `RecordSet`.
    ///
    /// Malformed items are skipped and kept on the result as `MalformedItem`
    /// errors. A batch with no usable items is `EmptyPayload`.
    pub fn ingest(raw: &RawInput) -> std::result::Result<RecordSet, IngestError> {
        match raw {
            RawInput::Markup { document, layout } => Self::ingest_markup(document, layout),
            RawInput::Api { payload, layout } => Self::ingest_api(payload, layout),
        }
    }

    #[instrument(skip(document, layout), fields(feed = %layout.feed))]
    fn ingest_markup(
        document: &str,
        layout: &MarkupLayout,
    ) -> std::result::Result<RecordSet, IngestError> {
        let html = Html::parse_document(document);
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for (index, container) in html.select(&layout.container).enumerate() {
            match layout.extract(index, container) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping item: {}", e);
                    FeedMetrics::item_skipped();
                    skipped.push(e);
                }
            }
        }
        Self::finish(&layout.feed, records, skipped)
    }

    #[instrument(skip(payload, layout), fields(feed = %layout.feed))]
    fn ingest_api(payload: &Value, layout: &ApiLayout) -> std::result::Result<RecordSet, IngestError> {
        let items: &[Value] = match payload.pointer(&layout.items) {
            Some(Value::Array(items)) => items.as_slice(),
            Some(Value::Null) | None => &[],
            Some(_) => {
                warn!("'{}' is not a list; treating payload as empty", layout.items);
                &[]
            }
        };
        debug!("Found {} candidate items at '{}'", items.len(), layout.items);

        let mut records = Vec::with_capacity(items.len());
        let mut skipped = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match layout.extract(index, item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping item: {}", e);
                    FeedMetrics::item_skipped();
                    skipped.push(e);
                }
            }
        }
        Self::finish(&layout.feed, records, skipped)
    }

    fn finish(
        feed: &str,
        records: Vec<Record>,
        skipped: Vec<IngestError>,
    ) -> std::result::Result<RecordSet, IngestError> {
        if records.is_empty() {
            FeedMetrics::empty_payload();
            warn!("No usable items ({} skipped)", skipped.len());
            return Err(IngestError::EmptyPayload {
                feed: feed.to_string(),
            });
        }
        FeedMetrics::records_ingested(records.len());
        info!("Ingested {} records ({} skipped)", records.len(), skipped.len());
        Ok(RecordSet::with_skipped(records, skipped))
    }

    /// Filter then stable-sort `set` according to `query`. Never fails and
    /// never mutates `set`.
    pub fn apply_query<'a>(set: &'a RecordSet, query: &Query) -> View<'a> {
        if query.is_identity() {
            return View::new(set.iter().collect());
        }

        let needle = query.search_term.to_lowercase();
        let mut rows: Vec<&Record> = set
            .iter()
            .filter(|record| needle.is_empty() || record.title.to_lowercase().contains(&needle))
            .collect();

        if let Some(field) = query.sort_key {
            rows.sort_by(|a, b| {
                let ord = compare_by(a, b, field);
                if query.sort_descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        View::new(rows)
    }
}

/// Absent values order below present ones.
fn compare_by(a: &Record, b: &Record, field: Field) -> Ordering {
    match (a.sort_value(field), b.sort_value(field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

use crate::common::error::IngestError;
use crate::feed::{ApiLayout, MarkupLayout, TabularFeed};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One normalized row. `title` is the identifying field used for search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub primary_value: Option<f64>,
    pub secondary_label: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub source_id: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

impl Record {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            primary_value: None,
            secondary_label: None,
            author: None,
            summary: None,
            timestamp: None,
            source_id: None,
            url: None,
            image_url: None,
        }
    }

    /// Value used to order records by `field`; `None` sorts lowest.
    pub fn sort_value(&self, field: Field) -> Option<SortValue<'_>> {
        match field {
            Field::Title => Some(SortValue::Text(&self.title)),
            Field::PrimaryValue => self.primary_value.map(SortValue::Number),
            Field::Timestamp => self.timestamp.map(SortValue::Time),
            Field::SecondaryLabel => self.secondary_label.as_deref().map(SortValue::Text),
            Field::Author => self.author.as_deref().map(SortValue::Text),
            Field::Summary => self.summary.as_deref().map(SortValue::Text),
            Field::SourceId => self.source_id.as_deref().map(SortValue::Text),
            Field::Url => self.url.as_deref().map(SortValue::Text),
            Field::ImageUrl => self.image_url.as_deref().map(SortValue::Text),
        }
    }

    pub(crate) fn set_text(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::SecondaryLabel => self.secondary_label = Some(value),
            Field::Author => self.author = Some(value),
            Field::Summary => self.summary = Some(value),
            Field::SourceId => self.source_id = Some(value),
            Field::Url => self.url = Some(value),
            Field::ImageUrl => self.image_url = Some(value),
            Field::PrimaryValue | Field::Timestamp => {}
        }
    }
}

/// Named columns of a `Record`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    PrimaryValue,
    SecondaryLabel,
    Author,
    Summary,
    Timestamp,
    SourceId,
    Url,
    ImageUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
    Time,
}

impl Field {
    pub fn kind(self) -> FieldKind {
        match self {
            Field::PrimaryValue => FieldKind::Number,
            Field::Timestamp => FieldKind::Time,
            _ => FieldKind::Text,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::PrimaryValue => "primary_value",
            Field::SecondaryLabel => "secondary_label",
            Field::Author => "author",
            Field::Summary => "summary",
            Field::Timestamp => "timestamp",
            Field::SourceId => "source_id",
            Field::Url => "url",
            Field::ImageUrl => "image_url",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    /// Accepts canonical names plus the column names the dashboards show.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "title" | "city" => Ok(Field::Title),
            "primary_value" | "value" | "temperature" | "temp" => Ok(Field::PrimaryValue),
            "secondary_label" | "label" | "condition" => Ok(Field::SecondaryLabel),
            "author" => Ok(Field::Author),
            "summary" | "description" => Ok(Field::Summary),
            "timestamp" | "published" | "publishedat" | "published_at" | "date" => {
                Ok(Field::Timestamp)
            }
            "source_id" | "source" => Ok(Field::SourceId),
            "url" => Ok(Field::Url),
            "image_url" | "image" => Ok(Field::ImageUrl),
            other => Err(format!("unknown field '{}'", other)),
        }
    }
}

/// Borrowed sort key extracted from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
    Time(NaiveDateTime),
}

impl SortValue<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Number(_) => 0,
            SortValue::Time(_) => 1,
            SortValue::Text(_) => 2,
        }
    }

    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Ordered, immutable result of one ingestion cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
    skipped: Vec<IngestError>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn with_skipped(records: Vec<Record>, skipped: Vec<IngestError>) -> Self {
        Self { records, skipped }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// `MalformedItem` errors for items dropped during ingestion.
    pub fn skipped(&self) -> &[IngestError] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn query(&self, query: &Query) -> View<'_> {
        TabularFeed::apply_query(self, query)
    }
}

/// Desired view, rebuilt from user input on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search_term: String,
    pub sort_key: Option<Field>,
    pub sort_descending: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn sort_by(mut self, field: Field, descending: bool) -> Self {
        self.sort_key = Some(field);
        self.sort_descending = descending;
        self
    }

    pub fn is_identity(&self) -> bool {
        self.search_term.is_empty() && self.sort_key.is_none()
    }
}

/// Filtered, ordered subsequence of a `RecordSet`.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    rows: Vec<&'a Record>,
}

impl<'a> View<'a> {
    pub(crate) fn new(rows: Vec<&'a Record>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    pub fn titles(&self) -> Vec<&'a str> {
        self.rows.iter().map(|r| r.title.as_str()).collect()
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.rows.iter().map(|r| (*r).clone()).collect()
    }
}

/// Raw payload handed to `TabularFeed::ingest`.
#[derive(Debug, Clone)]
pub enum RawInput {
    Markup {
        document: String,
        layout: MarkupLayout,
    },
    Api {
        payload: serde_json::Value,
        layout: ApiLayout,
    },
}

/// A data source that can produce raw input for one ingestion cycle
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Unique identifier for this source
    fn source_name(&self) -> &'static str;

    /// Fetch or read the raw payload
    async fn fetch_raw(&self) -> Result<RawInput, IngestError>;

    /// Fetch and normalize into a `RecordSet`
    async fn load(&self) -> Result<RecordSet, IngestError> {
        let raw = self.fetch_raw().await?;
        TabularFeed::ingest(&raw)
    }
}

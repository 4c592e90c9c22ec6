pub mod common;
pub mod config;
pub mod feed;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod sources;

// Ports and their adapters
pub mod app;
pub mod infra;

pub use common::error::{FeedError, IngestError};
pub use common::types::{Field, FeedSource, Query, RawInput, Record, RecordSet, View};
pub use feed::{ApiLayout, MarkupLayout, TabularFeed};

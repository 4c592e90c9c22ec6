//! Plain-text and JSON rendering of a `View` for the CLI host.

use crate::common::constants::{EMPTY_PAYLOAD_NOTICE, NO_MATCHES_NOTICE, WEATHER_VALUE_UNIT};
use crate::common::error::IngestError;
use crate::common::types::{Field, Record, SortValue, View};
use std::fmt::Write;

const MISSING: &str = "N/A";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One table column: header text and the record field it shows.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub field: Field,
}

impl Column {
    pub fn new(header: impl Into<String>, field: Field) -> Self {
        Self {
            header: header.into(),
            field,
        }
    }
}

/// City, temperature (with the markup's unit) and condition.
pub fn weather_columns() -> Vec<Column> {
    vec![
        Column::new("City", Field::Title),
        Column::new(format!("Temperature ({})", WEATHER_VALUE_UNIT), Field::PrimaryValue),
        Column::new("Condition", Field::SecondaryLabel),
    ]
}

pub fn cell(record: &Record, field: Field) -> String {
    match record.sort_value(field) {
        Some(SortValue::Number(n)) => format!("{:.1}", n),
        Some(SortValue::Text(s)) => s.to_string(),
        Some(SortValue::Time(t)) => t.format(TIMESTAMP_FORMAT).to_string(),
        None => MISSING.to_string(),
    }
}

/// Aligned text table; an empty view renders the no-matches notice instead.
pub fn render_table(view: &View<'_>, columns: &[Column]) -> String {
    if view.is_empty() {
        return format!("{}\n", NO_MATCHES_NOTICE);
    }

    let rows: Vec<Vec<String>> = view
        .iter()
        .map(|record| columns.iter().map(|c| cell(record, c.field)).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.header.chars().count()).collect();
    for row in &rows {
        for (width, text) in widths.iter_mut().zip(row) {
            *width = (*width).max(text.chars().count());
        }
    }

    let mut out = String::new();
    let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
    push_row(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(text, width)| {
            let pad = width.saturating_sub(text.chars().count());
            format!("{}{}", text, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

pub fn render_weather(view: &View<'_>) -> String {
    render_table(view, &weather_columns())
}

/// One block per article, separated by `---`.
pub fn render_articles(view: &View<'_>) -> String {
    if view.is_empty() {
        return format!("{}\n", NO_MATCHES_NOTICE);
    }

    let mut out = String::new();
    for record in view.iter() {
        let _ = writeln!(out, "### {}", record.title);
        let _ = writeln!(out, "Source: {}", cell(record, Field::SourceId));
        let _ = writeln!(out, "Author: {}", cell(record, Field::Author));
        let _ = writeln!(out, "Published At: {}", cell(record, Field::Timestamp));
        let _ = writeln!(out, "Summary: {}", cell(record, Field::Summary));
        if let Some(image) = &record.image_url {
            let _ = writeln!(out, "Image: {}", image);
        }
        let _ = writeln!(out, "Read more: {}", cell(record, Field::Url));
        out.push_str("---\n");
    }
    out
}

pub fn render_json(view: &View<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view.rows())
}

/// User-facing notice for a failed ingest. `empty_notice` replaces the
/// generic empty-payload text when the dashboard has its own wording.
pub fn render_ingest_error(err: &IngestError, empty_notice: Option<&str>) -> String {
    match err {
        IngestError::EmptyPayload { .. } => empty_notice.unwrap_or(EMPTY_PAYLOAD_NOTICE).to_string(),
        IngestError::SourceUnavailable { message } => format!("Error fetching data: {}", message),
        IngestError::MalformedItem { .. } => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{Query, RecordSet};

    fn weather_set() -> RecordSet {
        let mut paulo = Record::new("São Paulo");
        paulo.primary_value = Some(26.0);
        paulo.secondary_label = Some("Thunderstorms".into());
        let mut cairo = Record::new("Cairo");
        cairo.primary_value = Some(28.0);
        RecordSet::new(vec![paulo, cairo])
    }

    #[test]
    fn test_table_alignment_and_missing_cells() {
        let set = weather_set();
        let out = render_weather(&set.query(&Query::new()));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "City      | Temperature (°C) | Condition");
        assert_eq!(lines[2], "São Paulo | 26.0             | Thunderstorms");
        assert_eq!(lines[3], "Cairo     | 28.0             | N/A");
    }

    #[test]
    fn test_empty_view_renders_notice() {
        let set = weather_set();
        let out = render_weather(&set.query(&Query::new().search("zzz")));
        assert_eq!(out.trim(), NO_MATCHES_NOTICE);
    }

    #[test]
    fn test_article_block() {
        let mut article = Record::new("Headline");
        article.source_id = Some("Wire".into());
        article.url = Some("https://example.com/a".into());
        let set = RecordSet::new(vec![article]);

        let out = render_articles(&set.query(&Query::new()));
        assert!(out.starts_with("### Headline\nSource: Wire\nAuthor: N/A\n"));
        assert!(out.contains("Read more: https://example.com/a\n---\n"));
        assert!(!out.contains("Image:"));
    }

    #[test]
    fn test_article_without_url_still_has_read_more_line() {
        let set = RecordSet::new(vec![Record::new("No link")]);
        let out = render_articles(&set.query(&Query::new()));
        assert!(out.ends_with("Summary: N/A\nRead more: N/A\n---\n"));
    }

    #[test]
    fn test_ingest_error_notices() {
        let empty = IngestError::EmptyPayload { feed: "news".into() };
        assert_eq!(render_ingest_error(&empty, None), EMPTY_PAYLOAD_NOTICE);
        assert_eq!(render_ingest_error(&empty, Some("nothing")), "nothing");

        let down = IngestError::unavailable("HTTP 500");
        assert_eq!(render_ingest_error(&down, None), "Error fetching data: HTTP 500");
    }
}

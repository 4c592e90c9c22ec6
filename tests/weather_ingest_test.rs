use anyhow::Result;
use std::io::Write;
use tabular_feed::sources::{WeatherFixture, CITY_WEATHER_MARKUP};
use tabular_feed::{FeedSource, IngestError, MarkupLayout, RawInput, TabularFeed};
use tempfile::NamedTempFile;

fn markup(document: &str) -> RawInput {
    RawInput::Markup {
        document: document.to_string(),
        layout: MarkupLayout::weather(),
    }
}

#[test]
fn test_fixture_yields_ten_coerced_records() -> Result<()> {
    let set = TabularFeed::ingest(&markup(CITY_WEATHER_MARKUP))?;

    assert_eq!(set.len(), 10);
    assert!(set.skipped().is_empty());

    let first = &set.records()[0];
    assert_eq!(first.title, "New York");
    assert_eq!(first.primary_value, Some(22.0));
    assert_eq!(first.secondary_label.as_deref(), Some("Sunny"));

    let paulo = set.iter().find(|r| r.title == "São Paulo").unwrap();
    assert_eq!(paulo.primary_value, Some(26.0));
    assert_eq!(paulo.secondary_label.as_deref(), Some("Thunderstorms"));
    Ok(())
}

#[test]
fn test_item_missing_field_is_skipped_not_fatal() -> Result<()> {
    let document = r#"
        <div class="city-weather"><h2>Lima</h2><span class="temp">19°C</span><span class="condition">Overcast</span></div>
        <div class="city-weather"><h2>Quito</h2><span class="temp">14°C</span></div>
        <div class="city-weather"><h2>Bogotá</h2><span class="temp">-1.5 °C</span><span class="condition">Drizzle</span></div>
    "#;
    let set = TabularFeed::ingest(&markup(document))?;

    assert_eq!(set.len(), 2);
    assert_eq!(set.records()[1].title, "Bogotá");
    assert_eq!(set.records()[1].primary_value, Some(-1.5));

    assert_eq!(set.skipped().len(), 1);
    match &set.skipped()[0] {
        IngestError::MalformedItem { index, reason } => {
            assert_eq!(*index, 1);
            assert!(reason.contains("Quito"));
            assert!(reason.contains("label"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_unparseable_value_and_blank_title_are_skipped() -> Result<()> {
    let document = r#"
        <div class="city-weather"><h2>Oslo</h2><span class="temp">n/a</span><span class="condition">Clear</span></div>
        <div class="city-weather"><h2>   </h2><span class="temp">3°C</span><span class="condition">Clear</span></div>
        <div class="city-weather"><h2>Bergen</h2><span class="temp">8°C</span><span class="condition">Rain</span></div>
    "#;
    let set = TabularFeed::ingest(&markup(document))?;

    assert_eq!(set.len(), 1);
    assert_eq!(set.records()[0].title, "Bergen");
    assert_eq!(set.skipped().len(), 2);
    Ok(())
}

#[test]
fn test_no_containers_is_empty_payload() {
    let err = TabularFeed::ingest(&markup("<p>nothing here</p>")).unwrap_err();
    assert_eq!(
        err,
        IngestError::EmptyPayload {
            feed: "city_weather".to_string()
        }
    );
}

#[test]
fn test_all_items_malformed_is_empty_payload() {
    let document = r#"<div class="city-weather"><h2>Nowhere</h2></div>"#;
    let err = TabularFeed::ingest(&markup(document)).unwrap_err();
    assert!(matches!(err, IngestError::EmptyPayload { .. }));
}

#[test]
fn test_custom_layout() -> Result<()> {
    let layout = MarkupLayout::new("stations", "li.station", "b", "i.reading", "em")?;
    let raw = RawInput::Markup {
        document: r#"<ul><li class="station"><b>North</b><i class="reading">1013 hPa</i><em>steady</em></li></ul>"#
            .to_string(),
        layout,
    };
    let set = TabularFeed::ingest(&raw)?;
    assert_eq!(set.records()[0].primary_value, Some(1013.0));
    Ok(())
}

#[tokio::test]
async fn test_fixture_from_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"<div class="city-weather"><h2>Reykjavík</h2><span class="temp">4°C</span><span class="condition">Windy</span></div>"#
    )?;

    let set = WeatherFixture::from_file(file.path()).load().await?;
    assert_eq!(set.len(), 1);
    assert_eq!(set.records()[0].title, "Reykjavík");
    Ok(())
}

#[tokio::test]
async fn test_missing_fixture_file_is_source_unavailable() {
    let err = WeatherFixture::from_file("/nonexistent/cities.html")
        .load()
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::SourceUnavailable { .. }));
}

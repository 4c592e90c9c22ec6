#[cfg(test)]
mod tests {
    use tabular_feed::sources::WeatherFixture;
    use tabular_feed::{Field, FeedSource, Query, Record, RecordSet};

    fn record(title: &str, value: Option<f64>, label: Option<&str>) -> Record {
        let mut r = Record::new(title);
        r.primary_value = value;
        r.secondary_label = label.map(String::from);
        r
    }

    fn sample_sets() -> Vec<RecordSet> {
        vec![
            RecordSet::default(),
            RecordSet::new(vec![record("Solo", Some(1.0), None)]),
            RecordSet::new(vec![
                record("Toronto", Some(17.0), Some("Foggy")),
                record("tokyo", Some(25.0), Some("Rainy")),
                record("Stockholm", None, Some("Clear")),
                record("Oslo", Some(17.0), None),
                record("Toronto", Some(17.0), Some("Foggy")),
                record("ATLANTA", Some(-2.5), Some("Snowy")),
            ]),
        ]
    }

    #[test]
    fn test_identity_query_returns_all_records_in_order() {
        for set in sample_sets() {
            let view = set.query(&Query::new());
            let expected: Vec<&Record> = set.iter().collect();
            assert_eq!(view.rows(), expected.as_slice());
        }
    }

    #[test]
    fn test_every_result_matches_search_predicate() {
        let terms = ["to", "TO", "o", "lan", "kyo", "x", " ", "Toronto"];
        for set in sample_sets() {
            for term in terms {
                let view = set.query(&Query::new().search(term));
                let needle = term.to_lowercase();
                for r in view.iter() {
                    assert!(r.title.to_lowercase().contains(&needle), "{} / {}", r.title, term);
                }
                let expected = set
                    .iter()
                    .filter(|r| r.title.to_lowercase().contains(&needle))
                    .count();
                assert_eq!(view.len(), expected);
            }
        }
    }

    #[test]
    fn test_search_is_unanchored_substring_not_pattern() {
        let set = RecordSet::new(vec![record("St. Louis", None, None), record("Stockholm", None, None)]);
        assert_eq!(set.query(&Query::new().search("t.")).titles(), vec!["St. Louis"]);
        assert_eq!(set.query(&Query::new().search("ouis")).titles(), vec!["St. Louis"]);
    }

    #[test]
    fn test_search_lowercases_non_ascii_titles() {
        let set = RecordSet::new(vec![record("São Paulo", None, None), record("İstanbul", None, None)]);
        assert_eq!(set.query(&Query::new().search("SÃO")).titles(), vec!["São Paulo"]);
        assert_eq!(set.query(&Query::new().search("STANBUL")).titles(), vec!["İstanbul"]);
        assert_eq!(set.query(&Query::new().search("İstanbul")).titles(), vec!["İstanbul"]);
        // Lowercase 'İ' keeps its combining dot, so a dotless ASCII term does not match
        assert!(set.query(&Query::new().search("istanbul")).is_empty());
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let sets = sample_sets();
        let set = &sets[2];

        let asc = set.query(&Query::new().sort_by(Field::PrimaryValue, false));
        assert_eq!(
            asc.titles(),
            vec!["Stockholm", "ATLANTA", "Toronto", "Oslo", "Toronto", "tokyo"]
        );

        let desc = set.query(&Query::new().sort_by(Field::PrimaryValue, true));
        assert_eq!(
            desc.titles(),
            vec!["tokyo", "Toronto", "Oslo", "Toronto", "ATLANTA", "Stockholm"]
        );
    }

    #[test]
    fn test_text_sort_with_absent_labels() {
        let sets = sample_sets();
        let set = &sets[2];
        let view = set.query(&Query::new().sort_by(Field::SecondaryLabel, false));
        assert_eq!(
            view.titles(),
            vec!["Oslo", "Stockholm", "Toronto", "Toronto", "tokyo", "ATLANTA"]
        );
    }

    #[test]
    fn test_query_is_repeatable_and_does_not_mutate() {
        let set = sample_sets().remove(2);
        let before = set.clone();
        let query = Query::new().search("o").sort_by(Field::PrimaryValue, true);

        let first = set.query(&query).to_records();
        let second = set.query(&query).to_records();
        assert_eq!(first, second);
        assert_eq!(set, before);
    }

    #[tokio::test]
    async fn test_fixture_search_and_sort_scenario() {
        let set = WeatherFixture::new().load().await.unwrap();
        assert_eq!(set.len(), 10);

        let found = set.query(&Query::new().search("to"));
        assert_eq!(found.titles(), vec!["Tokyo", "Toronto"]);

        let hottest = set.query(&Query::new().sort_by(Field::PrimaryValue, true));
        assert_eq!(
            hottest.titles(),
            vec![
                "Mumbai", "Cairo", "São Paulo", "Tokyo", "New York", "Sydney", "Paris", "London",
                "Toronto", "Moscow"
            ]
        );

        let combined = set.query(&Query::new().search("O").sort_by(Field::PrimaryValue, false));
        assert_eq!(
            combined.titles(),
            vec!["Moscow", "Toronto", "London", "New York", "Tokyo", "São Paulo", "Cairo"]
        );
    }
}

use census_explorer::{
    aggregate::{mean, top_n},
    config::DashboardConfig,
    data::Value,
    filter::{RegionFilter, RowFilter, apply_filters},
    table::Table,
};
use proptest::prelude::*;

type Row = (Option<String>, Option<String>, Option<f64>);

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        proptest::option::of(prop::sample::select(vec![
            "Kerala".to_string(),
            "Goa".to_string(),
            "Bihar".to_string(),
        ])),
        proptest::option::of("[A-Za-z]{1,8}"),
        proptest::option::of(-1_000.0f64..1_000.0),
    )
}

fn build_table(rows: &[Row]) -> Table {
    Table::new(
        vec!["State".into(), "District".into(), "Score".into()],
        rows.iter()
            .map(|(region, district, score)| {
                vec![
                    region.clone().map(Value::Text),
                    district.clone().map(Value::Text),
                    score.map(Value::Number),
                ]
            })
            .collect(),
    )
}

proptest! {
    #[test]
    fn region_filter_returns_only_that_region(
        rows in prop::collection::vec(row_strategy(), 1..40),
        pick in any::<prop::sample::Index>(),
    ) {
        let config = DashboardConfig::default();
        let table = build_table(&rows);
        let row_filter = RowFilter::from_config(&config);
        let labels = row_filter.region_labels(&table);
        let region = pick.get(&labels).clone();

        let filtered = apply_filters(&table, &RegionFilter::Region(region.clone()), "", &config);

        prop_assert!(filtered.row_count() <= table.row_count());
        prop_assert!(filtered.row_count() > 0);
        for cell in filtered.column("State").unwrap() {
            prop_assert_eq!(&*row_filter.region_label(cell), region.as_str());
        }
    }

    #[test]
    fn search_keeps_exactly_the_matching_districts(
        rows in prop::collection::vec(row_strategy(), 0..40),
        needle in "[A-Za-z]{1,2}",
    ) {
        let config = DashboardConfig::default();
        let table = build_table(&rows);
        let filtered = apply_filters(&table, &RegionFilter::WholeDataset, &needle, &config);
        let lowered = needle.to_lowercase();

        let expected = rows
            .iter()
            .filter(|(_, district, _)| {
                district
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&lowered))
            })
            .count();
        prop_assert_eq!(filtered.row_count(), expected);
        for cell in filtered.column("District").unwrap() {
            let district = cell.map(Value::as_display);
            prop_assert!(district.is_some_and(|d| d.to_lowercase().contains(&lowered)));
        }
    }

    #[test]
    fn top_n_is_bounded_and_descending_with_missing_last(
        rows in prop::collection::vec(row_strategy(), 0..40),
        n in 0usize..15,
    ) {
        let table = build_table(&rows);
        let top = top_n(&table, "Score", n);
        prop_assert_eq!(top.row_count(), n.min(table.row_count()));

        let scores = top.numeric_column("Score").unwrap();
        for pair in scores.windows(2) {
            match (pair[0], pair[1]) {
                (Some(a), Some(b)) => prop_assert!(a >= b),
                (None, Some(_)) => prop_assert!(false, "missing value sorted before a number"),
                _ => {}
            }
        }
    }

    #[test]
    fn mean_matches_non_missing_values(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let table = build_table(&rows);
        let present = rows.iter().filter_map(|(_, _, score)| *score).collect::<Vec<_>>();
        match mean(&table, "Score") {
            None => prop_assert!(present.is_empty()),
            Some(value) => {
                let expected = present.iter().sum::<f64>() / present.len() as f64;
                prop_assert!((value - expected).abs() < 1e-6);
            }
        }
    }
}

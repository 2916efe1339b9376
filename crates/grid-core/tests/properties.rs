//! Determinism and filtering properties of resolve + materialize.

use grid_core::{ColumnResolver, GridOptions, TextFilter, materialize};
use grid_model::{NoMetadata, Record, RecordCollection, Value};
use proptest::prelude::*;
use uuid::Uuid;

fn field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z@. ]{0,12}".prop_map(Value::Text),
        any::<i64>().prop_map(Value::Integer),
        any::<bool>().prop_map(Value::Boolean),
    ]
}

fn collection() -> impl Strategy<Value = RecordCollection> {
    let fields = prop::sample::select(vec!["name", "email", "city", "age", "notes"]);
    prop::collection::vec(prop::collection::vec((fields, field_value()), 0..5), 0..8).prop_map(
        |rows| {
            let records = rows
                .into_iter()
                .enumerate()
                .map(|(i, fields)| {
                    let mut record =
                        Record::new("item", Uuid::from_u128(i as u128 + 1)).expect("record");
                    for (name, value) in fields {
                        record.insert(name, value);
                    }
                    record
                })
                .collect();
            RecordCollection::new(Some("item".into()), records)
        },
    )
}

fn filter_columns() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec!["name", "email", "city"]).prop_map(String::from),
        0..3,
    )
}

proptest! {
    #[test]
    fn resolve_and_materialize_are_deterministic(records in collection(), friendly in any::<bool>()) {
        let options = GridOptions { show_friendly_names: friendly, ..GridOptions::default() };
        let resolver = ColumnResolver::new(&options, &NoMetadata);

        let first = resolver.resolve(&records).expect("resolve");
        let second = resolver.resolve(&records).expect("resolve");
        prop_assert_eq!(&first, &second);

        let rows = materialize(&records, &first, &options, &mut |_| {});
        prop_assert_eq!(rows.len(), records.len());
        prop_assert_eq!(rows, materialize(&records, &second, &options, &mut |_| {}));
    }

    #[test]
    fn filtered_rows_are_a_matching_subset(
        records in collection(),
        needle in "[a-zA-Z@.]{1,3}",
        columns in filter_columns(),
    ) {
        let unfiltered = GridOptions::default();
        let filtered = GridOptions {
            filter_text: needle.clone(),
            filter_columns: columns.clone(),
            ..GridOptions::default()
        };
        let resolved = ColumnResolver::new(&unfiltered, &NoMetadata)
            .resolve(&records)
            .expect("resolve");

        let all = materialize(&records, &resolved, &unfiltered, &mut |_| {});
        let some = materialize(&records, &resolved, &filtered, &mut |_| {});
        prop_assert!(some.len() <= all.len());

        let filter = TextFilter::new(&needle, &columns);
        for row in &some {
            prop_assert!(all.contains(row));
            prop_assert!(filter.matches(row, &resolved));
            let hit = resolved
                .iter()
                .filter(|c| columns.is_empty() || columns.contains(&c.name))
                .any(|c| {
                    row.get(&c.name)
                        .to_text()
                        .is_some_and(|t| t.to_lowercase().contains(&needle.to_lowercase()))
                });
            prop_assert!(hit);
        }
    }
}

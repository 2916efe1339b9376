use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use grid_core::{
    CellPosition, DispatchError, GridError, GridOptions, GridSink, InteractionKind, MemorySink,
    RecordGrid, RecordService,
};
use chrono::{NaiveDate, NaiveDateTime};
use grid_model::{
    Aliased, Cell, DataSource, DateTimeValue, DisplayType, FieldKind, FieldMetadata, Record,
    RecordCollection, Reference, StaticMetadata, Value,
};
use uuid::Uuid;

fn contact(n: u128, email: Option<&str>) -> Record {
    let mut record = Record::new("contact", Uuid::from_u128(n))
        .expect("record")
        .with("name", format!("Contact {n}"))
        .with("age", 30 + n as i64);
    if let Some(email) = email {
        record.insert("email", email);
    }
    record
}

fn contacts() -> RecordCollection {
    RecordCollection::new(
        Some("contact".into()),
        vec![
            contact(1, Some("ann@acme.com")),
            contact(2, Some("bob@example.org")),
            contact(3, None),
        ],
    )
}

fn email_only() -> RecordCollection {
    let records = (1..=3)
        .map(|n| {
            let record = Record::new("contact", Uuid::from_u128(n)).expect("record");
            if n < 3 { record.with("email", format!("user{n}@example.org")) } else { record }
        })
        .collect();
    RecordCollection::new(None, records)
}

fn may_first(hour: u32, min: u32, sec: u32, milli: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
        .expect("timestamp")
}

fn grid() -> RecordGrid<MemorySink> {
    RecordGrid::new(MemorySink::new())
}

#[test]
fn discovers_columns_and_nulls_missing_fields() {
    let mut grid = grid();
    grid.set_data_source(email_only());

    let table = grid.table().expect("table");
    insta::assert_debug_snapshot!(table.column_names(), @r##"
    [
        "#no",
        "#id",
        "email",
        "#entity",
    ]
    "##);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[2].get("email"), &Cell::Null);
    assert!(!table.column("#entity").expect("record column").visible);
    assert_eq!(grid.sink().rows().len(), 3);
}

#[test]
fn filter_narrows_to_matching_rows() {
    let mut grid = grid();
    grid.set_options(GridOptions {
        filter_text: "acme".into(),
        filter_columns: vec!["email".into()],
        ..GridOptions::default()
    });
    grid.set_data_source(contacts());

    let table = grid.table().expect("table");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(
        table.rows[0].get("email"),
        &Cell::Text("ann@acme.com".into())
    );
}

#[test]
fn ordered_columns_are_forced_when_requested() {
    let mut grid = grid();
    grid.set_options(GridOptions {
        column_order: vec!["name".into(), "nickname".into()],
        show_all_ordered_columns: true,
        ..GridOptions::default()
    });
    grid.set_data_source(contacts());

    let table = grid.table().expect("table");
    let nickname = table.column("nickname").expect("forced column");
    assert!(nickname.forced);
    assert!(table.rows.iter().all(|row| row.get("nickname").is_null()));
    assert!(table.column("zip").is_none());
    assert_eq!(
        table.column_names(),
        vec!["#no", "#id", "name", "nickname", "age", "email", "#entity"]
    );
}

#[test]
fn unordered_columns_can_be_hidden() {
    let mut grid = grid();
    grid.set_options(GridOptions {
        column_order: vec!["email".into()],
        show_unordered_columns: false,
        ..GridOptions::default()
    });
    grid.set_data_source(contacts());
    assert_eq!(
        grid.table().expect("table").column_names(),
        vec!["#no", "#id", "email", "#entity"]
    );
}

#[test]
fn mixed_types_keep_the_previous_table() {
    let mut grid = grid();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    grid.on_diagnostic(move |d| sink.borrow_mut().push(d.message.clone()));
    grid.set_data_source(contacts());
    let before = grid.table().cloned().expect("table");

    let mixed = vec![
        contact(1, None),
        Record::new("account", Uuid::from_u128(9)).expect("record"),
    ];
    grid.update_options(|o| o.auto_refresh = false);
    grid.set_data_source(mixed);
    let err = grid.refresh().expect_err("mixed types");
    assert!(matches!(err, GridError::Validation(_)));
    assert_eq!(grid.table(), Some(&before));
    assert_eq!(grid.sink().rows().len(), 3);

    grid.update_options(|o| o.auto_refresh = true);
    assert_eq!(errors.borrow().len(), 1);
}

#[test]
fn friendly_mode_turns_numbers_into_text() {
    let mut grid = grid();
    grid.set_data_source(contacts());
    let age = grid.table().expect("table").column("age").cloned().expect("age");
    assert_eq!(age.display_type, DisplayType::Integer);
    assert_eq!(grid.table().expect("table").rows[0].get("age"), &Cell::Integer(31));

    grid.set_friendly_names(true);
    let table = grid.table().expect("table");
    let age = table.column("age").expect("age");
    assert_eq!(age.display_type, DisplayType::Text);
    assert_eq!(age.original_type, Some(DisplayType::Integer));
    assert_eq!(table.rows[0].get("age"), &Cell::Text("31".into()));
}

#[test]
fn layout_orders_and_hides_sink_columns() {
    let mut grid = grid();
    grid.set_layout_xml(
        r##"<grid name="resultset"><row name="result">
             <cell name="email" width="180"/>
             <cell name="name" width="120"/>
             <cell name="#id" width="0"/>
           </row></grid>"##,
    );
    grid.set_data_source(contacts());

    let visible: Vec<&str> = grid
        .sink()
        .visible_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(visible, vec!["email", "name"]);
    assert_eq!(grid.sink().display_rows()[0], vec!["ann@acme.com", "Contact 1"]);

    let exported = grid.export_layout().expect("export");
    let mut other = grid_core::RecordGrid::new(MemorySink::new());
    other.set_layout_xml(&exported);
    other.set_data_source(contacts());
    let restored: Vec<&str> = other
        .sink()
        .visible_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(restored, visible);
}

#[test]
fn malformed_layout_falls_back_to_natural_order() {
    let mut grid = grid();
    grid.set_layout_xml("<grid><row>");
    grid.set_data_source(contacts());
    assert!(grid.layout().is_none());
    let visible: Vec<&str> = grid
        .sink()
        .visible_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(visible, vec!["#no", "#id", "name", "age", "email"]);
}

#[test]
fn opaque_sources_bypass_the_pipeline() {
    let mut grid = grid();
    grid.set_data_source(DataSource::opaque("raw payload".to_string()));
    assert!(grid.table().is_none());
    let payload = grid.sink().opaque().expect("payload");
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("raw payload"));
    assert!(grid.sink().columns().is_empty());
}

#[test]
fn interactions_resolve_records_and_references() {
    let account = Reference::new("account", Uuid::from_u128(77)).with_name("Acme");
    let records = vec![
        contact(1, Some("ann@acme.com")).with(
            "parent",
            Value::Aliased(Aliased::new("account", "accountid", account.clone().into())),
        ),
    ];
    let mut grid = grid();
    grid.set_data_source(records);

    let position = CellPosition::new(0, "parent");
    let event = grid.interaction(InteractionKind::Click, Some(&position));
    assert_eq!(event.record.as_ref().map(|r| r.id()), Some(Uuid::from_u128(1)));
    assert_eq!(event.column.as_deref(), Some("parent"));
    assert_eq!(event.reference, None);

    grid.update_options(|o| o.entity_reference_clickable = true);
    let event = grid.interaction(InteractionKind::DoubleClick, Some(&position));
    assert_eq!(event.reference, Some(account));

    let outside = grid.interaction(InteractionKind::MouseLeave, None);
    assert!(outside.record.is_none());
    assert!(outside.column.is_none());
}

#[test]
fn selected_records_are_distinct() {
    let mut grid = grid();
    grid.set_data_source(contacts());
    let selected = grid.selected_records(&[
        CellPosition::new(1, "name"),
        CellPosition::new(1, "email"),
        CellPosition::new(0, "name"),
        CellPosition::new(42, "name"),
    ]);
    let ids: Vec<Uuid> = selected.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![Uuid::from_u128(2), Uuid::from_u128(1)]);
}

struct FixedService(RecordCollection);

impl RecordService for FixedService {
    fn retrieve(&self, _query: &str, _layout: Option<&str>) -> grid_core::Result<RecordCollection> {
        Ok(self.0.clone())
    }
}

struct FailingService;

impl RecordService for FailingService {
    fn retrieve(&self, _query: &str, _layout: Option<&str>) -> grid_core::Result<RecordCollection> {
        Err(GridError::Service("connection reset".into()))
    }
}

#[test]
fn fetch_requires_a_service() {
    let mut grid = grid();
    assert!(matches!(
        grid.fetch("contacts", None),
        Err(GridError::ServiceUnavailable)
    ));
}

#[test]
fn fetch_binds_the_result() {
    let mut grid = grid().with_service(Arc::new(FixedService(contacts())));
    grid.fetch("contacts", Some(r#"<grid><row><cell name="name" width="90"/></row></grid>"#))
        .expect("fetch");
    assert_eq!(grid.table().expect("table").rows.len(), 3);
    let visible: Vec<&str> = grid
        .sink()
        .visible_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(visible, vec!["name"]);
}

#[test]
fn background_fetch_applies_on_the_owner() {
    let mut grid = grid().with_service(Arc::new(FixedService(contacts())));
    let worker = grid.fetch_in_background("contacts", None).expect("spawn");
    worker.join().expect("worker");
    assert!(grid.table().is_none());

    assert_eq!(grid.process_pending(), 1);
    assert_eq!(grid.table().expect("table").rows.len(), 3);
}

#[test]
fn background_fetch_failures_become_diagnostics() {
    let mut grid = grid().with_service(Arc::new(FailingService));
    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink = messages.clone();
    grid.on_diagnostic(move |d| sink.borrow_mut().push(d.message.clone()));

    grid.fetch_in_background("contacts", None)
        .expect("spawn")
        .join()
        .expect("worker");
    grid.process_pending();
    assert!(grid.table().is_none());
    assert_eq!(messages.borrow().as_slice(), ["record service failed: connection reset"]);
}

#[test]
fn refresh_can_be_requested_from_another_thread() {
    let mut grid = grid();
    grid.update_options(|o| o.auto_refresh = false);
    grid.set_data_source(contacts());
    assert!(grid.table().is_none());

    let handle = grid.handle();
    std::thread::spawn(move || RecordGrid::<MemorySink>::queue_refresh(&handle).expect("post"))
        .join()
        .expect("worker");
    grid.process_pending();
    assert_eq!(grid.table().expect("table").rows.len(), 3);
}

#[test]
fn owner_refreshes_directly() {
    let mut grid = grid();
    grid.update_options(|o| o.auto_refresh = false);
    grid.set_data_source(contacts());

    assert_eq!(
        RecordGrid::queue_refresh(&grid.handle()),
        Err(DispatchError::OwnerThread)
    );
    assert!(grid.table().is_none());

    grid.request_refresh().expect("refresh");
    assert_eq!(grid.table().expect("table").rows.len(), 3);
}

#[test]
fn owner_refresh_runs_queued_work_first() {
    let mut grid = grid();
    grid.update_options(|o| o.auto_refresh = false);
    grid.set_data_source(contacts());

    let handle = grid.handle();
    std::thread::spawn(move || {
        handle
            .post(|grid: &mut RecordGrid<MemorySink>| grid.set_filter_text("acme"))
            .expect("post")
    })
    .join()
    .expect("worker");

    grid.request_refresh().expect("refresh");
    assert_eq!(grid.table().expect("table").rows.len(), 1);
}

#[test]
fn collection_name_may_differ_from_record_type() {
    let mut grid = grid();
    let collection = RecordCollection::new(Some("contacts".into()), vec![contact(1, None)]);
    grid.set_data_source(collection);
    assert_eq!(grid.table().expect("table").rows.len(), 1);
}

#[test]
fn millisecond_timestamps_display_with_their_precision() {
    let metadata = StaticMetadata::new()
        .with_field(FieldMetadata::new("contact", "seen", FieldKind::DateTime));
    let mut grid = grid().with_metadata(metadata);
    grid.update_options(|o| o.show_id_column = false);
    let record = Record::new("contact", Uuid::from_u128(1))
        .expect("record")
        .with("seen", Value::DateTime(DateTimeValue::utc(may_first(9, 30, 15, 250))));
    grid.set_data_source(RecordCollection::new(None, vec![record]));

    let seen = grid
        .sink()
        .columns()
        .iter()
        .find(|c| c.name == "seen")
        .expect("seen column");
    assert_eq!(seen.format.as_deref(), Some("%Y-%m-%d %H:%M:%S%.3f"));
    assert_eq!(
        grid.sink().display_rows(),
        vec![vec!["1".to_string(), "2024-05-01 09:30:15.250".to_string()]]
    );
}

#[test]
fn local_time_mode_shifts_only_universal_values() {
    let mut grid = grid();
    grid.update_options(|o| {
        o.show_local_times = true;
        o.utc_offset_minutes = Some(120);
    });
    let record = Record::new("contact", Uuid::from_u128(1))
        .expect("record")
        .with("due", Value::DateTime(DateTimeValue::utc(may_first(10, 0, 0, 0))))
        .with("met", Value::DateTime(DateTimeValue::local(may_first(10, 0, 0, 0))));
    grid.set_data_source(RecordCollection::new(None, vec![record]));

    let row = &grid.table().expect("raw table").rows[0];
    assert_eq!(row.get("due"), &Cell::DateTime(may_first(12, 0, 0, 0)));
    assert_eq!(row.get("met"), &Cell::DateTime(may_first(10, 0, 0, 0)));

    grid.set_friendly_names(true);
    let row = &grid.table().expect("friendly table").rows[0];
    assert_eq!(row.get("due"), &Cell::Text("2024-05-01 12:00".into()));
    assert_eq!(row.get("met"), &Cell::Text("2024-05-01 10:00".into()));
}

use std::fs;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value as Json};
use tracing::{debug, info_span, warn};

use grid_cli::input::{read_data_source, read_metadata};
use grid_core::{GridOptions, MemorySink, RecordGrid, load_options, parse_name_list};

use crate::cli::{OutputArg, ViewArgs};
use crate::summary::{columns_table, render_table};

pub fn run_render(args: &ViewArgs) -> Result<()> {
    let grid = build_grid(args)?;
    let sink = grid.sink();
    if let Some(payload) = sink.opaque() {
        let json = payload
            .downcast_ref::<Json>()
            .ok_or_else(|| anyhow!("unexpected passthrough payload"))?;
        println!("{}", serde_json::to_string_pretty(json)?);
        return Ok(());
    }
    let table = grid
        .table()
        .ok_or_else(|| anyhow!("no table was materialized"))?;
    match args.output {
        OutputArg::Table => println!("{}", render_table(sink, table)),
        OutputArg::Json => {
            let visible = sink.visible_columns();
            let rows: Vec<Json> = sink
                .display_rows()
                .into_iter()
                .map(|cells| {
                    let object: Map<String, Json> = visible
                        .iter()
                        .zip(cells)
                        .map(|(column, text)| (column.name.clone(), Json::String(text)))
                        .collect();
                    Json::Object(object)
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

pub fn run_columns(args: &ViewArgs) -> Result<()> {
    let grid = build_grid(args)?;
    let columns = grid.table().map(|t| t.columns.as_slice()).unwrap_or_default();
    match args.output {
        OutputArg::Table => println!("{}", columns_table(columns)),
        OutputArg::Json => println!("{}", serde_json::to_string_pretty(columns)?),
    }
    Ok(())
}

pub fn run_layout(args: &ViewArgs) -> Result<()> {
    let grid = build_grid(args)?;
    let xml = grid.export_layout().context("write layout")?;
    println!("{xml}");
    Ok(())
}

/// Loads every input named by `args` and runs one refresh.
pub fn build_grid(args: &ViewArgs) -> Result<RecordGrid<MemorySink>> {
    let span = info_span!("load", records = %args.records.display());
    let _guard = span.enter();

    let mut grid = RecordGrid::new(MemorySink::new());
    if let Some(path) = &args.metadata {
        grid = grid.with_metadata(read_metadata(path)?);
    }

    // one explicit refresh once every input is bound
    grid.set_options(GridOptions {
        auto_refresh: false,
        ..options_from_args(args)?
    });

    if let Some(path) = &args.layout {
        let xml = fs::read_to_string(path)
            .with_context(|| format!("read layout {}", path.display()))?;
        grid.set_layout_xml(&xml);
        if grid.layout().is_none() {
            warn!(path = %path.display(), "layout is malformed, using natural column order");
        }
    }
    grid.set_data_source(read_data_source(&args.records)?);
    grid.refresh().context("refresh grid")?;

    for diagnostic in grid.diagnostics() {
        eprintln!("warning: {diagnostic}");
    }
    debug!(diagnostics = grid.diagnostics().len(), "grid ready");
    Ok(grid)
}

/// Config file values, overridden by explicit flags.
pub fn options_from_args(args: &ViewArgs) -> Result<GridOptions> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => GridOptions::default(),
    };
    if args.friendly {
        options.show_friendly_names = true;
    }
    if args.local_times {
        options.show_local_times = true;
    }
    if args.utc_offset.is_some() {
        options.utc_offset_minutes = args.utc_offset;
    }
    if let Some(filter) = &args.filter {
        options.filter_text.clone_from(filter);
    }
    if let Some(columns) = &args.filter_columns {
        options.filter_columns = parse_name_list(columns);
    }
    if let Some(order) = &args.column_order {
        options.column_order = parse_name_list(order);
    }
    if args.show_all_ordered {
        options.show_all_ordered_columns = true;
    }
    if args.hide_unordered {
        options.show_unordered_columns = false;
    }
    if args.no_id_column {
        options.show_id_column = false;
    }
    if args.no_index_column {
        options.show_index_column = false;
    }
    Ok(options)
}

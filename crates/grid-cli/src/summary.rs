use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use grid_core::MemorySink;
use grid_model::{Alignment, ColumnDefinition, MaterializedTable};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

/// Visible sink columns in display order, with their rows.
pub fn render_table(sink: &MemorySink, table: &MaterializedTable) -> Table {
    let visible = sink.visible_columns();
    let mut out = Table::new();
    out.set_header(
        visible
            .iter()
            .map(|column| header_cell(&column.caption))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut out);
    for (index, column) in visible.iter().enumerate() {
        let right = table
            .column(&column.name)
            .is_some_and(|definition| definition.alignment == Alignment::Right);
        if right {
            align_column(&mut out, index, CellAlignment::Right);
        }
    }
    for row in sink.display_rows() {
        out.add_row(row);
    }
    out
}

pub fn columns_table(columns: &[ColumnDefinition]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Caption"),
        header_cell("Type"),
        header_cell("Original"),
        header_cell("Format"),
        header_cell("Align"),
        header_cell("Forced"),
        header_cell("Visible"),
    ]);
    apply_table_style(&mut table);
    for column in columns {
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(&column.caption),
            Cell::new(format!("{:?}", column.display_type)),
            dim_cell(column.original_type.map(|t| format!("{t:?}")).unwrap_or_default()),
            dim_cell(column.format.clone().unwrap_or_default()),
            Cell::new(format!("{:?}", column.alignment)),
            flag_cell(column.forced),
            flag_cell(column.visible),
        ]);
    }
    table
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flag_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

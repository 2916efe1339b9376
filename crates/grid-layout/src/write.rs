use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use grid_model::ViewColumn;

use crate::error::LayoutError;

/// Width written for visible columns the sink never sized.
pub const DEFAULT_COLUMN_WIDTH: u32 = 100;

/// Serializes the current column state as a layout description.
///
/// Columns are written in display order; hidden columns get width 0.
pub fn write_layout(columns: &[ViewColumn]) -> Result<String, LayoutError> {
    let mut ordered: Vec<&ViewColumn> = columns.iter().collect();
    ordered.sort_by_key(|column| column.display_index);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let mut grid = BytesStart::new("grid");
    grid.push_attribute(("name", "resultset"));
    writer
        .write_event(Event::Start(grid))
        .map_err(LayoutError::write)?;

    let mut row = BytesStart::new("row");
    row.push_attribute(("name", "result"));
    writer
        .write_event(Event::Start(row))
        .map_err(LayoutError::write)?;

    for column in ordered {
        let width = if column.visible {
            column.width.unwrap_or(DEFAULT_COLUMN_WIDTH).to_string()
        } else {
            "0".to_string()
        };
        let mut cell = BytesStart::new("cell");
        cell.push_attribute(("name", column.name.as_str()));
        cell.push_attribute(("width", width.as_str()));
        writer
            .write_event(Event::Empty(cell))
            .map_err(LayoutError::write)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("row")))
        .map_err(LayoutError::write)?;
    writer
        .write_event(Event::End(BytesEnd::new("grid")))
        .map_err(LayoutError::write)?;

    String::from_utf8(writer.into_inner()).map_err(LayoutError::write)
}

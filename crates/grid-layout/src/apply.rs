use tracing::debug;

use grid_model::ViewColumn;

use crate::parse::Layout;

/// Applies `layout` to the columns a sink currently exposes.
///
/// Cells with no matching column are added as placeholders. Named columns take
/// the cell's position and width, and are hidden when the width is zero;
/// columns the layout does not name are hidden and moved after the named ones.
/// Applying the same layout twice leaves the columns unchanged.
pub fn apply_layout(layout: &Layout, columns: &mut Vec<ViewColumn>) {
    for cell in layout.cells() {
        if !columns.iter().any(|column| column.name == cell.name) {
            debug!(column = %cell.name, "adding placeholder column from layout");
            columns.push(ViewColumn::placeholder(&cell.name, 0));
        }
    }

    let mut trailing = layout.len();
    for column in columns.iter_mut() {
        match layout.find(&column.name) {
            Some((position, cell)) => {
                column.display_index = position;
                column.width = Some(cell.width);
                column.visible = !cell.is_hidden();
            }
            None => {
                column.display_index = trailing;
                column.visible = false;
                trailing += 1;
            }
        }
    }
}

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use grid_model::is_synthetic;

use crate::error::LayoutError;

const ROW_ELEMENT: &[u8] = b"row";
const CELL_ELEMENT: &[u8] = b"cell";

/// One declared column: name and width in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCell {
    pub name: String,
    pub width: u32,
}

impl LayoutCell {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.width == 0
    }
}

/// Ordered column declarations parsed from a layout description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    cells: Vec<LayoutCell>,
}

impl Layout {
    pub fn new(cells: Vec<LayoutCell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[LayoutCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First declaration of `name` and its position.
    pub fn find(&self, name: &str) -> Option<(usize, &LayoutCell)> {
        self.cells
            .iter()
            .enumerate()
            .find(|(_, cell)| cell.name == name)
    }

    /// Declared record fields, synthetic columns excluded, in layout order.
    pub fn field_names(&self) -> Vec<String> {
        self.cells
            .iter()
            .filter(|cell| !is_synthetic(&cell.name))
            .map(|cell| cell.name.clone())
            .collect()
    }
}

/// Parses a layout description, treating any fault as "no layout".
pub fn parse_layout(xml: &str) -> Option<Layout> {
    match try_parse_layout(xml) {
        Ok(layout) => Some(layout),
        Err(error) => {
            debug!(%error, "ignoring malformed layout");
            None
        }
    }
}

pub fn try_parse_layout(xml: &str) -> Result<Layout, LayoutError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parser = LayoutParser::default();
    loop {
        match reader.read_event().map_err(LayoutError::malformed)? {
            Event::Start(element) => {
                parser.open(&element)?;
                parser.depth += 1;
            }
            Event::Empty(element) => parser.open(&element)?,
            Event::End(_) => parser.depth = parser.depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }
    parser.finish()
}

#[derive(Default)]
struct LayoutParser {
    depth: usize,
    saw_container: bool,
    saw_row: bool,
    cells: Vec<LayoutCell>,
}

impl LayoutParser {
    fn open(&mut self, element: &BytesStart<'_>) -> Result<(), LayoutError> {
        let name = element.name();
        match self.depth {
            0 if !self.saw_container => {
                self.saw_container = true;
                Ok(())
            }
            1 if !self.saw_row && name.as_ref() == ROW_ELEMENT => {
                self.saw_row = true;
                Ok(())
            }
            2 if name.as_ref() == CELL_ELEMENT => {
                let cell = read_cell(element)?;
                self.cells.push(cell);
                Ok(())
            }
            _ => Err(LayoutError::UnexpectedElement(
                String::from_utf8_lossy(name.as_ref()).into_owned(),
            )),
        }
    }

    fn finish(self) -> Result<Layout, LayoutError> {
        if self.depth != 0 {
            return Err(LayoutError::malformed("unclosed element"));
        }
        if !self.saw_row {
            return Err(LayoutError::MissingRow);
        }
        Ok(Layout::new(self.cells))
    }
}

fn read_cell(element: &BytesStart<'_>) -> Result<LayoutCell, LayoutError> {
    let mut name = None;
    let mut width = None;
    for attribute in element.attributes() {
        let attribute = attribute.map_err(LayoutError::malformed)?;
        let raw = std::str::from_utf8(&attribute.value).map_err(LayoutError::malformed)?;
        let value = unescape(raw).map_err(LayoutError::malformed)?;
        match attribute.key.as_ref() {
            b"name" => name = Some(value.into_owned()),
            b"width" => width = Some(value.into_owned()),
            _ => {}
        }
    }
    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or(LayoutError::MissingAttribute("name"))?;
    let width = width.ok_or(LayoutError::MissingAttribute("width"))?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutError::InvalidWidth(width.clone()))?;
    Ok(LayoutCell { name, width })
}

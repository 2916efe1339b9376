//! Column layout descriptions.
//!
//! A layout is a small XML document: one container element holding one
//! `row` element holding ordered `cell` elements, each with a `name` and a
//! pixel `width` (0 hides the column).
//!
//! ```xml
//! <grid name="resultset">
//!   <row name="result">
//!     <cell name="fullname" width="200"/>
//!     <cell name="emailaddress1" width="0"/>
//!   </row>
//! </grid>
//! ```

pub mod apply;
pub mod error;
pub mod parse;
pub mod write;

pub use apply::apply_layout;
pub use error::LayoutError;
pub use parse::{Layout, LayoutCell, parse_layout, try_parse_layout};
pub use write::{DEFAULT_COLUMN_WIDTH, write_layout};

//! Dynamic schema materialization for heterogeneous record sets.
//!
//! - **resolver**: which columns a refresh shows, in what order and with what type
//! - **materialize**: builds filtered rows from records and resolved columns
//! - **grid**: the stateful [`RecordGrid`] component and its `refresh()` entry point
//! - **sink**: the visual grid as a consumer of tables, plus an in-memory sink
//! - **dispatch**: running work on the thread that owns the grid

pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod grid;
pub mod materialize;
pub mod options;
pub mod resolver;
pub mod service;
pub mod sink;

pub use diagnostics::Diagnostic;
pub use dispatch::{OwnerHandle, OwnerQueue};
pub use error::{DispatchError, GridError, Result};
pub use events::{CellPosition, InteractionKind, RecordEvent};
pub use grid::RecordGrid;
pub use materialize::{TextFilter, materialize};
pub use options::{GridOptions, load_options, parse_name_list};
pub use resolver::ColumnResolver;
pub use service::RecordService;
pub use sink::{GridSink, MemorySink};

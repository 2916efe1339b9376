pub mod column;
pub mod error;
pub mod metadata;
pub mod record;
pub mod table;
pub mod value;

pub use column::{
    Alignment, ColumnDefinition, DisplayType, ID_COLUMN, RECORD_COLUMN, SEQUENCE_COLUMN,
    ViewColumn, is_synthetic,
};
pub use error::{ModelError, Result};
pub use metadata::{
    FieldKind, FieldMetadata, MetadataProvider, NoMetadata, StaticMetadata, TypeMetadata,
};
pub use record::{DataSource, Record, RecordCollection};
pub use table::{Cell, DEFAULT_DATE_TIME_FORMAT, MaterializedTable, Row};
pub use value::{
    Aliased, Amount, Choice, ClockBasis, DateTimeValue, Reference, Value, ValueKind,
};

//! Value coercion and display formatting.
//!
//! This crate maps raw record values to what the grid shows:
//!
//! - **coerce**: display-type inference, raw-mode unwrapping, alignment hints
//! - **datetime**: local clock conversion and date-time patterns
//! - **text**: friendly (human-readable) rendering
//! - **format**: the per-cell entry point used by the materializer

pub mod coerce;
pub mod datetime;
pub mod error;
pub mod format;
pub mod text;

pub use coerce::{alignment, display_type, raw_type};
pub use datetime::{
    DATE_ONLY_FORMAT, LocalClock, MILLISECOND_FORMAT, adjust_clock, format_date_time,
};
pub use error::FormattingFault;
pub use format::{FormatOptions, fallback_cell, format_value, raw_cell};
pub use text::{format_amount, friendly_text, group_thousands};

//! Date-time clock conversion and pattern rendering.
//!
//! Patterns are chrono `strftime` strings. A pattern is validated before use so
//! that a bad pattern surfaces as a [`FormattingFault`] instead of a panic while
//! writing the string.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Local, NaiveDateTime, TimeZone};

use grid_model::{ClockBasis, DateTimeValue};

use crate::error::FormattingFault;

/// Pattern attached to date-time columns whose values carry sub-second precision.
pub const MILLISECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
/// Pattern for date-only fields.
pub const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// The caller's local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalClock {
    /// Host time zone.
    #[default]
    System,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl LocalClock {
    /// Fixed clock `minutes` east of UTC; `None` when out of range.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(LocalClock::Fixed)
    }

    pub fn to_local(self, utc: NaiveDateTime) -> NaiveDateTime {
        match self {
            LocalClock::System => Local.from_utc_datetime(&utc).naive_local(),
            LocalClock::Fixed(offset) => offset.from_utc_datetime(&utc).naive_local(),
        }
    }
}

/// Moves universal timestamps onto the local clock when `local` is set.
///
/// Values stored as local or unspecified are returned as-is.
pub fn adjust_clock(value: &DateTimeValue, local: Option<LocalClock>) -> NaiveDateTime {
    match (local, value.basis) {
        (Some(clock), ClockBasis::Utc) => clock.to_local(value.at),
        _ => value.at,
    }
}

pub fn format_date_time(at: NaiveDateTime, pattern: &str) -> Result<String, FormattingFault> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(FormattingFault::InvalidPattern {
            pattern: pattern.to_string(),
        });
    }
    let mut out = String::new();
    write!(out, "{}", at.format_with_items(items.iter())).map_err(|_| {
        FormattingFault::Unrenderable {
            pattern: pattern.to_string(),
            value: at.to_string(),
        }
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn utc_values_move_to_local_clock() {
        let clock = LocalClock::from_offset_minutes(120).unwrap();
        let value = DateTimeValue::utc(at(10, 0));
        assert_eq!(adjust_clock(&value, Some(clock)), at(12, 0));
        assert_eq!(adjust_clock(&value, None), at(10, 0));
    }

    #[test]
    fn local_values_are_not_converted() {
        let clock = LocalClock::from_offset_minutes(-300).unwrap();
        let value = DateTimeValue::local(at(10, 0));
        assert_eq!(adjust_clock(&value, Some(clock)), at(10, 0));
    }

    #[test]
    fn millisecond_pattern_renders_fraction() {
        let value = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_milli_opt(8, 30, 5, 42)
            .unwrap();
        assert_eq!(
            format_date_time(value, MILLISECOND_FORMAT).unwrap(),
            "2024-01-15 08:30:05.042"
        );
    }

    #[test]
    fn bad_pattern_is_a_fault() {
        assert!(matches!(
            format_date_time(at(1, 0), "%Q"),
            Err(FormattingFault::InvalidPattern { .. })
        ));
    }

    #[test]
    fn offset_pattern_on_naive_value_is_a_fault() {
        assert!(matches!(
            format_date_time(at(1, 0), "%H:%M %z"),
            Err(FormattingFault::Unrenderable { .. })
        ));
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        assert!(LocalClock::from_offset_minutes(24 * 60).is_none());
    }
}

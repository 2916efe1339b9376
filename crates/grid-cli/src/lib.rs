//! Library components of the `grid` command-line front end.

pub mod input;
pub mod logging;

//! Table model shared by the cleaning and dirty-data pipelines
//!
//! A [`Table`] is an ordered list of [`Row`]s, each a column-name to
//! [`CellValue`] mapping. Rows scraped from different pages may carry different
//! keys; the table header is the union of them.

pub mod cell;
pub mod columns;
pub mod table;

pub use cell::CellValue;
pub use table::{Row, Table};

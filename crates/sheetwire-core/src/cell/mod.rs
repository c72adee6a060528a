//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] and the A1 codec functions
//! - [`CellRecord`] - cached server state of a cell plus its pending edit
//! - [`CellGrid`] - the sparse per-worksheet cache of records
//! - [`CellValue`] / [`CellInput`] - read and write sides of a cell value

mod address;
mod grid;
mod record;
mod value;

pub use address::{
    a1_sheet_name, column_number_to_letters, format_a1_range, letters_to_column_number, A1Range,
    CellAddress,
};
pub use grid::{CellGrid, GridBounds};
pub use record::CellRecord;
pub use value::{CellInput, CellValue, FormulaError, PendingValue, ValueKind};

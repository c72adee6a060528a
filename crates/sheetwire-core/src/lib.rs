//! # sheetwire-core
//!
//! Core data structures for the sheetwire spreadsheet API client.
//!
//! This crate has no I/O. It provides:
//! - [`CellAddress`] and the A1 codec functions
//! - [`CellRecord`] - cached server state of a cell plus its pending local edit
//! - [`CellGrid`] - sparse cache of fetched cells
//! - [`UpdateBatch`] - grouping of dirty cells into `updateCells` requests
//! - [`Worksheet`] - sheet properties plus its cell cache
//! - [`api`] - serde models of the REST resources
//!
//! ## Example
//!
//! ```rust
//! use sheetwire_core::api::{
//!     CellData, ExtendedValue, GridData, GridProperties, RowData, Sheet, SheetProperties,
//! };
//! use sheetwire_core::{CellValue, Worksheet};
//!
//! let mut sheet = Worksheet::from_sheet(Sheet {
//!     properties: SheetProperties {
//!         sheet_id: Some(0),
//!         title: Some("Sheet1".into()),
//!         grid_properties: Some(GridProperties::sized(100, 26)),
//!         ..Default::default()
//!     },
//!     data: vec![GridData {
//!         row_data: Some(vec![RowData {
//!             values: vec![CellData::entered(ExtendedValue::NumberValue(1.0)); 3],
//!         }]),
//!         ..Default::default()
//!     }],
//! });
//!
//! sheet.cell_by_a1_mut("A1").unwrap().set_value(42).unwrap();
//! sheet.cell_by_a1_mut("B1").unwrap().set_value("=A1*2").unwrap();
//!
//! let batch = sheet.plan_save();
//! assert_eq!(batch.response_ranges, vec!["'Sheet1'!A1:B1"]);
//!
//! // after the service accepted the batch
//! sheet.commit(batch.addresses());
//! assert_eq!(sheet.cell(0, 0).unwrap().value().unwrap(), CellValue::Number(42.0));
//! ```

pub mod api;
pub mod batch;
pub mod cell;
pub mod error;
pub mod worksheet;

// Re-exports for convenience
pub use batch::{group_updates, UpdateBatch, UpdateGroup};
pub use cell::{
    a1_sheet_name, column_number_to_letters, format_a1_range, letters_to_column_number, A1Range,
    CellAddress, CellGrid, CellInput, CellRecord, CellValue, FormulaError, GridBounds,
    PendingValue, ValueKind,
};
pub use error::{Error, Result};
pub use worksheet::Worksheet;

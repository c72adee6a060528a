//! # sheetwire
//!
//! A client for remote spreadsheet REST APIs (the v4 spreadsheets API shape).
//!
//! Sheets and cells are fetched into a local cache, edited locally, and written
//! back in batches: every run of consecutive edited cells in a row becomes one
//! `updateCells` request, and all runs of a save go out in a single
//! `:batchUpdate` call.
//!
//! Header rows and plain value rows go through the values API instead and
//! never touch the cell cache (see [`Spreadsheet::get_rows`]).
//!
//! The HTTP layer is not part of this crate. Plug one in by implementing
//! [`Transport`].
//!
//! ## Example
//!
//! ```rust
//! use sheetwire::prelude::*;
//!
//! async fn double_first_cell<T: Transport>(
//!     doc: &mut Spreadsheet<T>,
//! ) -> sheetwire::ClientResult<()> {
//!     doc.get_info(false).await?;
//!     let sheet_id = doc.sheets_by_index()?[0].sheet_id();
//!
//!     doc.load_sheet_cells(sheet_id, Some("A1:B1")).await?;
//!     let sheet = doc.sheet_by_id_mut(sheet_id)?;
//!     let n = sheet.cell_by_a1("A1")?.value()?.as_number().unwrap_or(0.0);
//!     sheet.cell_by_a1_mut("B1")?.set_value(n * 2.0)?;
//!
//!     doc.save_updated_cells(sheet_id).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod prelude;
pub mod rows;
pub mod spreadsheet;
pub mod transport;

pub use config::{SpreadsheetConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, Result as ClientResult};
pub use rows::{RowQuery, SheetRow};
pub use spreadsheet::Spreadsheet;
pub use transport::Transport;

// Re-export core types
pub use sheetwire_core::{
    a1_sheet_name, api, column_number_to_letters, format_a1_range, letters_to_column_number,
    A1Range, CellAddress, CellGrid, CellInput, CellRecord, CellValue, Error, FormulaError,
    GridBounds, PendingValue, Result, UpdateBatch, UpdateGroup, ValueKind, Worksheet,
};

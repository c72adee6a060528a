//! Prelude module - common imports for sheetwire users
//!
//! ```rust
//! use sheetwire::prelude::*;
//! ```

pub use crate::{
    // Cell types
    A1Range,
    CellAddress,
    CellInput,
    CellRecord,
    CellValue,

    // Error types
    ClientError,
    Error,
    FormulaError,

    // Rows
    RowQuery,
    SheetRow,

    // Main types
    Spreadsheet,
    SpreadsheetConfig,
    Transport,
    Worksheet,
};

pub use crate::api::{Dimension, DimensionProperties, GridProperties, SheetProperties};

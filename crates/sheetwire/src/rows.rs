//! Plain value rows below a sheet's header row.

use serde_json::Value;
use sheetwire_core::{A1Range, Result};

/// One row of plain values
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based row number, as shown in the sheet
    pub row_number: u64,
    pub values: Vec<Value>,
}

/// Window of data rows to read, counted from the first row after the header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowQuery {
    /// Data rows to skip
    pub offset: u32,
    /// Most rows to return; `None` reads to the end of the sheet
    pub limit: Option<u32>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Inclusive 1-based sheet rows covered on a sheet of `row_count` rows
    ///
    /// `None` when the window is empty.
    pub(crate) fn sheet_rows(&self, row_count: u32) -> Option<(u64, u64)> {
        let limit = self.limit.unwrap_or(row_count.saturating_sub(1));
        if limit == 0 {
            return None;
        }
        // row 1 holds the header
        let first = 2 + u64::from(self.offset);
        Some((first, first + u64::from(limit) - 1))
    }
}

/// Row number of the first row in an A1 range (`'Sheet1'!A4:C4` gives 4)
pub(crate) fn first_row_number(a1_range: &str) -> Result<u64> {
    Ok(A1Range::parse(a1_range)?.start.a1_row())
}

/// Header text of a value: strings as-is, anything else in its JSON form
pub(crate) fn header_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

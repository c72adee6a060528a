//! Worksheet type

use crate::api::{DimensionProperties, GridData, GridProperties, Sheet, SheetProperties};
use crate::batch::UpdateBatch;
use crate::cell::{
    a1_sheet_name, column_number_to_letters, CellAddress, CellGrid, CellRecord, GridBounds,
};
use crate::error::Result;

/// One sheet (tab) of a remote spreadsheet, with its locally cached cells
///
/// Properties are whatever the service last reported. Cells are only available
/// after they have been fetched into the grid.
#[derive(Debug, Default)]
pub struct Worksheet {
    /// Sheet properties as last reported
    properties: SheetProperties,
    /// Cell cache
    cells: CellGrid,
    /// Values of the first row, once read or written
    header_values: Option<Vec<String>>,
}

impl Worksheet {
    /// Create a worksheet from a fetched sheet resource
    pub fn from_sheet(sheet: Sheet) -> Self {
        let mut worksheet = Self::default();
        worksheet.update_from_sheet(sheet);
        worksheet
    }

    /// Take new properties and merge any grid data
    pub fn update_from_sheet(&mut self, sheet: Sheet) {
        self.properties = sheet.properties;
        if !sheet.data.is_empty() {
            tracing::trace!(
                "filling {} data blocks into sheet {}",
                sheet.data.len(),
                self.title()
            );
            self.cells.fill(sheet.data);
        }
    }

    // === Properties ===

    /// Raw sheet properties
    pub fn properties(&self) -> &SheetProperties {
        &self.properties
    }

    /// Sheet id, stable across renames
    pub fn sheet_id(&self) -> i64 {
        self.properties.sheet_id.unwrap_or_default()
    }

    /// Sheet title
    pub fn title(&self) -> &str {
        self.properties.title.as_deref().unwrap_or_default()
    }

    /// Position of the tab
    pub fn index(&self) -> u32 {
        self.properties.index.unwrap_or_default()
    }

    /// Sheet type (`GRID`, `OBJECT`, ...)
    pub fn sheet_type(&self) -> Option<&str> {
        self.properties.sheet_type.as_deref()
    }

    pub fn grid_properties(&self) -> Option<&GridProperties> {
        self.properties.grid_properties.as_ref()
    }

    /// Check if the sheet is hidden
    pub fn is_hidden(&self) -> bool {
        self.properties.hidden.unwrap_or(false)
    }

    pub fn tab_color(&self) -> Option<&serde_json::Value> {
        self.properties.tab_color.as_ref()
    }

    pub fn is_right_to_left(&self) -> bool {
        self.properties.right_to_left.unwrap_or(false)
    }

    /// Declared number of rows
    pub fn row_count(&self) -> u32 {
        self.grid_properties()
            .and_then(|g| g.row_count)
            .unwrap_or_default()
    }

    /// Declared number of columns
    pub fn column_count(&self) -> u32 {
        self.grid_properties()
            .and_then(|g| g.column_count)
            .unwrap_or_default()
    }

    /// Declared grid size
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.row_count(), self.column_count())
    }

    /// Quoted title for use in A1 ranges (`'My Sheet'`)
    pub fn a1_sheet_name(&self) -> String {
        a1_sheet_name(self.title())
    }

    /// Letters of the last declared column
    ///
    /// Fails with [`Error::MalformedReference`](crate::Error::MalformedReference)
    /// for a sheet without columns.
    pub fn last_column_letter(&self) -> Result<String> {
        column_number_to_letters(self.column_count())
    }

    /// Qualify an A1 filter with this sheet's name
    ///
    /// No filter means the whole sheet. A filter that already names this sheet
    /// is returned unchanged.
    pub fn qualify_range(&self, filter: Option<&str>) -> String {
        let sheet_name = self.a1_sheet_name();
        let bare_prefix = format!("{}!", self.title());
        match filter {
            None => sheet_name,
            Some(f) if f.starts_with(&sheet_name) || f.starts_with(&bare_prefix) => f.to_string(),
            Some(f) => format!("{}!{}", sheet_name, f),
        }
    }

    // === Cell access ===

    /// Get a loaded cell by 0-based row and column
    pub fn cell(&self, row: u32, col: u32) -> Result<&CellRecord> {
        self.cells.get(CellAddress::new(row, col), self.bounds())
    }

    /// Get a loaded cell for editing
    pub fn cell_mut(&mut self, row: u32, col: u32) -> Result<&mut CellRecord> {
        let bounds = self.bounds();
        self.cells.get_mut(CellAddress::new(row, col), bounds)
    }

    /// Get a loaded cell by A1 address ("B7")
    pub fn cell_by_a1(&self, address: &str) -> Result<&CellRecord> {
        let addr = CellAddress::parse(address)?;
        self.cell(addr.row, addr.col)
    }

    /// Get a loaded cell for editing by A1 address
    pub fn cell_by_a1_mut(&mut self, address: &str) -> Result<&mut CellRecord> {
        let addr = CellAddress::parse(address)?;
        self.cell_mut(addr.row, addr.col)
    }

    /// Number of cells in the local cache
    pub fn cells_loaded(&self) -> usize {
        self.cells.count_loaded()
    }

    /// Direct access to the cell cache
    pub fn cells(&self) -> &CellGrid {
        &self.cells
    }

    /// Merge fetched grid data into the cache
    pub fn fill_cell_data(&mut self, ranges: Vec<GridData>) {
        self.cells.fill(ranges);
    }

    /// Forget every cached cell, pending edits included
    pub fn reset_local_cells(&mut self) {
        tracing::debug!("resetting local cells of sheet {}", self.title());
        self.cells.reset();
    }

    /// Cells with a pending edit, row-major
    pub fn dirty_cells(&self) -> impl Iterator<Item = &CellRecord> {
        self.cells.dirty_cells()
    }

    pub fn row_metadata(&self, row: u32) -> Option<&DimensionProperties> {
        self.cells.row_metadata(row)
    }

    pub fn column_metadata(&self, col: u32) -> Option<&DimensionProperties> {
        self.cells.column_metadata(col)
    }

    // === Header row ===

    /// Cached header row; `None` until it has been loaded or set
    pub fn header_values(&self) -> Option<&[String]> {
        self.header_values.as_deref()
    }

    pub fn set_header_values(&mut self, headers: Vec<String>) {
        self.header_values = Some(headers);
    }

    /// Forget the cached header row
    pub fn clear_header_values(&mut self) {
        self.header_values = None;
    }

    // === Saving ===

    /// Plan a save of every dirty cell
    pub fn plan_save(&self) -> UpdateBatch {
        UpdateBatch::plan(self.cells.dirty_cells(), self.sheet_id(), self.title())
    }

    /// Plan a save of specific cells
    ///
    /// Addresses are sorted and deduplicated first; clean cells are skipped.
    /// Every address must be loaded.
    pub fn plan_cells(&self, addresses: &[CellAddress]) -> Result<UpdateBatch> {
        let mut addresses = addresses.to_vec();
        addresses.sort();
        addresses.dedup();

        let bounds = self.bounds();
        let records = addresses
            .into_iter()
            .map(|addr| self.cells.get(addr, bounds))
            .collect::<Result<Vec<_>>>()?;
        Ok(UpdateBatch::plan(records, self.sheet_id(), self.title()))
    }

    /// Promote the pending edits of saved cells to committed state
    pub fn commit<I>(&mut self, addresses: I)
    where
        I: IntoIterator<Item = CellAddress>,
    {
        for addr in addresses {
            if let Some(record) = self.cells.record_mut(addr) {
                record.commit_pending();
            }
        }
    }
}

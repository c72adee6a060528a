//! Sparse cell cache
//!
//! Only coordinates that were actually fetched get an entry, so a large declared
//! sheet with a handful of loaded cells costs a handful of records.

use std::collections::BTreeMap;

use super::{CellAddress, CellRecord};
use crate::api::{DimensionProperties, GridData};
use crate::error::{Error, Result};

/// Declared size of a worksheet's grid
///
/// Owned by the worksheet; the grid only checks coordinates against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub row_count: u32,
    pub column_count: u32,
}

impl GridBounds {
    pub fn new(row_count: u32, column_count: u32) -> Self {
        Self {
            row_count,
            column_count,
        }
    }

    /// Check if a coordinate lies inside the grid
    pub fn contains(&self, addr: CellAddress) -> bool {
        addr.row < self.row_count && addr.col < self.column_count
    }

    fn check(&self, addr: CellAddress) -> Result<()> {
        if self.contains(addr) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                row: addr.row,
                col: addr.col,
                row_count: self.row_count,
                column_count: self.column_count,
            })
        }
    }
}

/// Sparse row-based cache of fetched cells
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, CellRecord>>`, plus row and
/// column metadata keyed by absolute index. Ordered maps make iteration row-major
/// with ascending columns, which is the order the update batcher expects.
#[derive(Debug, Default)]
pub struct CellGrid {
    /// Row index → column map
    rows: BTreeMap<u32, BTreeMap<u32, CellRecord>>,

    /// Row sizes/visibility, independent of cell presence
    row_metadata: BTreeMap<u32, DimensionProperties>,

    /// Column sizes/visibility, independent of cell presence
    column_metadata: BTreeMap<u32, DimensionProperties>,
}

impl CellGrid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge fetched blocks into the cache
    ///
    /// Existing records are updated in place; new coordinates get new records. A
    /// block without `row_data` means the fetch came back empty and drops every
    /// cached cell. Row and column metadata present in a block always overwrite.
    ///
    /// A reload does not discard unsaved edits: a record that is already cached
    /// keeps its pending value and stays dirty while its server state is
    /// replaced. Call [`CellRecord::discard_pending`] or [`CellGrid::reset`]
    /// first to throw edits away. Cells past `u32::MAX` in either axis are
    /// ignored.
    pub fn fill(&mut self, ranges: Vec<GridData>) {
        for range in ranges {
            let start_row = range.start_row.unwrap_or(0);
            let start_col = range.start_column.unwrap_or(0);

            match range.row_data {
                Some(row_data) => {
                    for (i, row) in (start_row..=u32::MAX).zip(row_data) {
                        let cells = self.rows.entry(i).or_default();
                        for (j, data) in (start_col..=u32::MAX).zip(row.values) {
                            match cells.get_mut(&j) {
                                Some(record) => record.update_raw_data(data),
                                None => {
                                    let record = CellRecord::new(CellAddress::new(i, j), data);
                                    cells.insert(j, record);
                                }
                            }
                        }
                        if cells.is_empty() {
                            self.rows.remove(&i);
                        }
                    }
                }
                None => {
                    tracing::trace!(
                        "block at ({start_row}, {start_col}) has no row data, clearing cells"
                    );
                    self.rows.clear();
                }
            }

            for (i, meta) in (start_row..=u32::MAX).zip(range.row_metadata) {
                self.row_metadata.insert(i, meta);
            }
            for (j, meta) in (start_col..=u32::MAX).zip(range.column_metadata) {
                self.column_metadata.insert(j, meta);
            }
        }
    }

    /// Get a loaded cell
    ///
    /// Bounds are checked first, so an out-of-range coordinate reports
    /// [`Error::OutOfBounds`] even when nothing has been loaded.
    pub fn get(&self, addr: CellAddress, bounds: GridBounds) -> Result<&CellRecord> {
        bounds.check(addr)?;
        self.rows
            .get(&addr.row)
            .and_then(|r| r.get(&addr.col))
            .ok_or_else(|| Error::NotLoaded(addr.to_a1_string()))
    }

    /// Get a loaded cell for mutation
    pub fn get_mut(&mut self, addr: CellAddress, bounds: GridBounds) -> Result<&mut CellRecord> {
        bounds.check(addr)?;
        self.rows
            .get_mut(&addr.row)
            .and_then(|r| r.get_mut(&addr.col))
            .ok_or_else(|| Error::NotLoaded(addr.to_a1_string()))
    }

    /// Get a cell without a bounds check
    pub fn record(&self, addr: CellAddress) -> Option<&CellRecord> {
        self.rows.get(&addr.row).and_then(|r| r.get(&addr.col))
    }

    pub(crate) fn record_mut(&mut self, addr: CellAddress) -> Option<&mut CellRecord> {
        self.rows.get_mut(&addr.row).and_then(|r| r.get_mut(&addr.col))
    }

    /// Number of cached cells
    pub fn count_loaded(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop every cached cell
    ///
    /// Metadata is kept; it is overwritten by the next fetch anyway.
    pub fn reset(&mut self) {
        self.rows.clear();
    }

    /// Iterate over all cached cells in row order
    pub fn iter(&self) -> impl Iterator<Item = &CellRecord> {
        self.rows.values().flat_map(|cols| cols.values())
    }

    /// Iterate over cells with a pending edit, row-major with ascending columns
    pub fn dirty_cells(&self) -> impl Iterator<Item = &CellRecord> {
        self.iter().filter(|c| c.is_dirty())
    }

    /// Metadata of a row, if fetched
    pub fn row_metadata(&self, row: u32) -> Option<&DimensionProperties> {
        self.row_metadata.get(&row)
    }

    /// Metadata of a column, if fetched
    pub fn column_metadata(&self, col: u32) -> Option<&DimensionProperties> {
        self.column_metadata.get(&col)
    }
}

//! Grouping of dirty cells into batch update requests
//!
//! Dirty cells are partitioned by row and then split into runs of consecutive
//! columns. Each run becomes one `updateCells` request plus one A1 range used to
//! fetch the written cells back.
//!
//! Grouping is order-sensitive, not order-normalizing: rows come out in order of
//! first appearance and cells within a row are scanned in the order given. Callers
//! must sort same-row cells by column first (the grid's
//! [`dirty_cells`](crate::CellGrid::dirty_cells) already does).

use ahash::AHashMap;

use crate::api::{
    BatchUpdateRequest, CellData, GridCoordinate, Request, RowData, UpdateCellsRequest,
};
use crate::cell::{a1_sheet_name, format_a1_range, CellAddress, CellRecord, PendingValue};

/// A run of pending edits in one row with consecutive columns
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateGroup {
    start: CellAddress,
    values: Vec<PendingValue>,
}

impl UpdateGroup {
    fn new(start: CellAddress, value: PendingValue) -> Self {
        Self {
            start,
            values: vec![value],
        }
    }

    /// Append a cell if it directly follows the last member
    fn try_push(&mut self, addr: CellAddress, value: &PendingValue) -> bool {
        let next = self.end().col.checked_add(1);
        if addr.row == self.start.row && Some(addr.col) == next {
            self.values.push(value.clone());
            true
        } else {
            false
        }
    }

    /// First cell of the run
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// Last cell of the run
    pub fn end(&self) -> CellAddress {
        // groups are never empty and columns are consecutive
        CellAddress::new(self.start.row, self.start.col + (self.values.len() as u32 - 1))
    }

    /// Number of cells in the run
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the run has no cells (never true for a grouped run)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Addresses of the members, in order
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> + '_ {
        (0..self.values.len() as u32)
            .map(move |i| CellAddress::new(self.start.row, self.start.col + i))
    }

    /// Pending values of the members, in order
    pub fn values(&self) -> &[PendingValue] {
        &self.values
    }

    /// A1 range spanning the run ("A1:B1", or "D1" for a single cell)
    pub fn response_range(&self) -> String {
        format_a1_range(self.start, Some(self.end()))
    }

    /// Response range qualified with the sheet title
    pub fn qualified_response_range(&self, sheet_title: &str) -> String {
        format!("{}!{}", a1_sheet_name(sheet_title), self.response_range())
    }

    /// The `updateCells` request writing this run
    pub fn to_request(&self, sheet_id: i64) -> Request {
        Request::UpdateCells(UpdateCellsRequest {
            rows: vec![RowData {
                values: self
                    .values
                    .iter()
                    .map(|v| CellData::entered(v.to_extended()))
                    .collect(),
            }],
            fields: "userEnteredValue".to_string(),
            start: GridCoordinate {
                sheet_id,
                row_index: self.start.row,
                column_index: self.start.col,
            },
        })
    }
}

/// Partition cells with pending edits into maximal consecutive runs
///
/// Clean cells are skipped. An empty input gives an empty result.
pub fn group_updates<'a, I>(cells: I) -> Vec<UpdateGroup>
where
    I: IntoIterator<Item = &'a CellRecord>,
{
    let mut row_index: AHashMap<u32, usize> = AHashMap::new();
    let mut rows: Vec<Vec<(CellAddress, &PendingValue)>> = Vec::new();

    for cell in cells {
        let Some(pending) = cell.pending() else {
            continue;
        };
        let slot = *row_index.entry(cell.row()).or_insert_with(|| {
            rows.push(Vec::new());
            rows.len() - 1
        });
        rows[slot].push((cell.address(), pending));
    }

    let mut groups = Vec::new();
    for row in rows {
        let mut current: Option<UpdateGroup> = None;
        for (addr, value) in row {
            if let Some(group) = current.as_mut() {
                if group.try_push(addr, value) {
                    continue;
                }
            }
            if let Some(done) = current.replace(UpdateGroup::new(addr, value.clone())) {
                groups.push(done);
            }
        }
        groups.extend(current);
    }

    tracing::debug!("grouped pending edits into {} update runs", groups.len());
    groups
}

/// Everything needed to save a set of dirty cells in one round trip
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBatch {
    /// The runs, in request order
    pub groups: Vec<UpdateGroup>,
    /// One `updateCells` request per run
    pub requests: Vec<Request>,
    /// One sheet-qualified A1 range per run
    pub response_ranges: Vec<String>,
}

impl UpdateBatch {
    /// Group the cells and build the requests for a sheet
    pub fn plan<'a, I>(cells: I, sheet_id: i64, sheet_title: &str) -> Self
    where
        I: IntoIterator<Item = &'a CellRecord>,
    {
        let groups = group_updates(cells);
        let requests = groups.iter().map(|g| g.to_request(sheet_id)).collect();
        let response_ranges = groups
            .iter()
            .map(|g| g.qualified_response_range(sheet_title))
            .collect();
        Self {
            groups,
            requests,
            response_ranges,
        }
    }

    /// Check if there is nothing to save
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Addresses of every cell the batch writes
    pub fn addresses(&self) -> impl Iterator<Item = CellAddress> + '_ {
        self.groups.iter().flat_map(|g| g.addresses())
    }

    /// The `:batchUpdate` body
    ///
    /// With `fetch_back`, the written ranges are requested back with grid data.
    pub fn to_request(&self, fetch_back: bool) -> BatchUpdateRequest {
        let request = BatchUpdateRequest::new(self.requests.clone());
        if fetch_back {
            request.with_response_ranges(self.response_ranges.clone())
        } else {
            request
        }
    }
}

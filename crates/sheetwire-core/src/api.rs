//! Data shapes exchanged with the spreadsheet REST API
//!
//! These mirror the JSON resources of the v4 spreadsheets API closely enough to be
//! deserialized straight from a response body. Only the fields the client reads or
//! writes are modelled; formatting payloads are carried as opaque JSON.
//!
//! Property structs use `Option` fields throughout so the same type serves as a
//! fetched resource and as a partial update (see [`field_mask`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Cell data
// ============================================================================

/// A typed cell value (`{"numberValue": 3}`, `{"formulaValue": "=A1"}`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtendedValue {
    NumberValue(f64),
    StringValue(String),
    BoolValue(bool),
    FormulaValue(String),
    ErrorValue(ErrorValue),
}

/// A formula evaluation error reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorValue {
    /// Error class, e.g. `DIVIDE_BY_ZERO`, `REF`, `NAME`
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human readable message
    #[serde(default)]
    pub message: String,
}

/// Raw per-cell data as returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_entered_value: Option<ExtendedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_value: Option<ExtendedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_entered_format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
}

impl CellData {
    /// Cell data carrying only a user-entered value
    pub fn entered(value: ExtendedValue) -> Self {
        Self {
            user_entered_value: Some(value),
            ..Self::default()
        }
    }
}

/// One row of cell data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowData {
    #[serde(default)]
    pub values: Vec<CellData>,
}

/// Size and visibility of a single row or column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DimensionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_by_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_by_filter: Option<bool>,
}

/// A rectangular block of fetched grid data
///
/// `row_data` being absent means "nothing in this range", which is different from
/// present-but-empty rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_row: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_data: Option<Vec<RowData>>,
    pub row_metadata: Vec<DimensionProperties>,
    pub column_metadata: Vec<DimensionProperties>,
}

// ============================================================================
// Sheet and spreadsheet resources
// ============================================================================

/// Grid size and freeze settings of a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_row_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_column_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_gridlines: Option<bool>,
}

impl GridProperties {
    /// Grid properties for a resize to `rows` x `columns`
    pub fn sized(rows: u32, columns: u32) -> Self {
        Self {
            row_count: Some(rows),
            column_count: Some(columns),
            ..Self::default()
        }
    }
}

/// Properties of one sheet (tab)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_properties: Option<GridProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_to_left: Option<bool>,
}

/// Properties of the whole spreadsheet document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// `ON_CHANGE`, `MINUTE` or `HOUR`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_recalc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_theme: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterative_calculation_settings: Option<Value>,
}

/// A sheet resource: properties plus any grid data that was requested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sheet {
    pub properties: SheetProperties,
    pub data: Vec<GridData>,
}

/// A rectangular range addressed by indices (end indices exclusive)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_row_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_row_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column_index: Option<u32>,
}

/// A named range defined in the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NamedRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_range_id: Option<String>,
    pub name: String,
    pub range: GridRange,
}

/// The spreadsheet resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpreadsheetResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SpreadsheetProperties>,
    pub sheets: Vec<Sheet>,
    pub named_ranges: Vec<NamedRange>,
}

// ============================================================================
// Batch update requests
// ============================================================================

/// Top-left anchor of an `updateCells` write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCoordinate {
    pub sheet_id: i64,
    pub row_index: u32,
    pub column_index: u32,
}

/// Row or column axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Rows,
    Columns,
}

/// A span of rows or columns (end exclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    pub sheet_id: i64,
    pub dimension: Dimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellsRequest {
    pub rows: Vec<RowData>,
    pub fields: String,
    pub start: GridCoordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpreadsheetPropertiesRequest {
    pub properties: SpreadsheetProperties,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSheetPropertiesRequest {
    pub properties: SheetProperties,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetRequest {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSheetRequest {
    pub sheet_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDimensionPropertiesRequest {
    pub range: DimensionRange,
    pub properties: DimensionProperties,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNamedRangeRequest {
    pub named_range: NamedRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNamedRangeRequest {
    pub named_range_id: String,
}

/// One entry of a batch update's `requests` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    UpdateCells(UpdateCellsRequest),
    UpdateSpreadsheetProperties(UpdateSpreadsheetPropertiesRequest),
    UpdateSheetProperties(UpdateSheetPropertiesRequest),
    AddSheet(AddSheetRequest),
    DeleteSheet(DeleteSheetRequest),
    UpdateDimensionProperties(UpdateDimensionPropertiesRequest),
    AddNamedRange(AddNamedRangeRequest),
    DeleteNamedRange(DeleteNamedRangeRequest),
}

/// Body of a `:batchUpdate` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
    pub include_spreadsheet_in_response: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_ranges: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub response_include_grid_data: bool,
}

impl BatchUpdateRequest {
    /// A batch that asks for the updated spreadsheet back, without grid data
    pub fn new(requests: Vec<Request>) -> Self {
        Self {
            requests,
            include_spreadsheet_in_response: true,
            response_ranges: Vec::new(),
            response_include_grid_data: false,
        }
    }

    /// Also return grid data for the given A1 ranges
    pub fn with_response_ranges(mut self, ranges: Vec<String>) -> Self {
        self.response_include_grid_data = true;
        self.response_ranges = ranges;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddSheetReply {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNamedRangeReply {
    pub named_range: NamedRange,
}

/// One entry of a batch update's `replies` list; most request types reply with `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_sheet: Option<AddSheetReply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_named_range: Option<AddNamedRangeReply>,
}

/// Response of a `:batchUpdate` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    pub replies: Vec<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_spreadsheet: Option<SpreadsheetResource>,
}

// ============================================================================
// Data filter reads
// ============================================================================

/// One filter of a `:getByDataFilter` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFilter {
    pub a1_range: String,
}

/// Body of a `:getByDataFilter` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetByDataFilterRequest {
    pub include_grid_data: bool,
    pub data_filters: Vec<DataFilter>,
}

impl GetByDataFilterRequest {
    /// Fetch grid data for A1 ranges
    pub fn for_ranges<I, S>(ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include_grid_data: true,
            data_filters: ranges
                .into_iter()
                .map(|r| DataFilter { a1_range: r.into() })
                .collect(),
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// How written strings are interpreted (`=A1` as a formula or as text)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    Raw,
    #[default]
    UserEntered,
}

/// Where appended rows go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsertDataOption {
    Overwrite,
    InsertRows,
}

/// How read values are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    FormattedValue,
    UnformattedValue,
    Formula,
}

/// Plain values of an A1 range, as read by `GET /values/<range>`
///
/// The service omits `values` entirely for an empty range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<Dimension>,
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// A row-major block anchored at `range`
    pub fn rows(range: impl Into<String>, values: Vec<Vec<Value>>) -> Self {
        Self {
            range: Some(range.into()),
            major_dimension: Some(Dimension::Rows),
            values,
        }
    }
}

/// Query parameters of a values read; unset fields use the service default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetValuesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_render_option: Option<ValueRenderOption>,
}

/// Query parameters of a values write or append
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriteValuesParams {
    pub value_input_option: ValueInputOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_data_option: Option<InsertDataOption>,
    pub include_values_in_response: bool,
}

/// Response of a values write
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    pub spreadsheet_id: Option<String>,
    pub updated_range: Option<String>,
    pub updated_rows: Option<u32>,
    pub updated_columns: Option<u32>,
    pub updated_cells: Option<u32>,
    /// Only present when `includeValuesInResponse` was set
    pub updated_data: Option<ValueRange>,
}

/// Response of a values append
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppendValuesResponse {
    pub spreadsheet_id: Option<String>,
    /// The table the values were appended to, before the append
    pub table_range: Option<String>,
    pub updates: UpdateValuesResponse,
}

/// Body of a `sheets/<id>:copyTo` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopySheetToAnotherSpreadsheetRequest {
    pub destination_spreadsheet_id: String,
}

// ============================================================================
// Field masks
// ============================================================================

/// Compute the `fields` mask for a partial update
///
/// Every set leaf becomes a dotted path, so updating `gridProperties.rowCount`
/// leaves the other grid properties alone. Paths come out in key order.
pub fn field_mask<T: Serialize>(update: &T) -> Result<String> {
    let value = serde_json::to_value(update)?;
    let mut paths = Vec::new();
    collect_paths(&value, "", &mut paths);
    Ok(paths.join(","))
}

fn collect_paths(value: &Value, prefix: &str, paths: &mut Vec<String>) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, child) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match child {
            Value::Object(inner) if !inner.is_empty() => collect_paths(child, &path, paths),
            _ => paths.push(path),
        }
    }
}

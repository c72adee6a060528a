//! In-memory transport that records every call and replays canned responses.

#![allow(dead_code)]

use std::collections::VecDeque;

use serde_json::{json, Value};
use sheetwire::api::{
    AppendValuesResponse, BatchUpdateRequest, BatchUpdateResponse,
    CopySheetToAnotherSpreadsheetRequest, GetByDataFilterRequest, GetValuesParams,
    SheetProperties, SpreadsheetResource, UpdateValuesResponse, ValueRange, WriteValuesParams,
};
use sheetwire::Transport;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("mock transport failure: {0}")]
pub struct MockError(pub String);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetSpreadsheet(bool),
    GetByDataFilter(GetByDataFilterRequest),
    BatchUpdate(BatchUpdateRequest),
    ClearValues(String),
    GetValues(String, GetValuesParams),
    UpdateValues(String, ValueRange, WriteValuesParams),
    AppendValues(String, ValueRange, WriteValuesParams),
    CopyTo(i64, CopySheetToAnotherSpreadsheetRequest),
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub calls: Vec<Call>,
    pub info: SpreadsheetResource,
    pub filter_responses: VecDeque<SpreadsheetResource>,
    pub batch_responses: VecDeque<BatchUpdateResponse>,
    pub value_responses: VecDeque<ValueRange>,
    pub update_responses: VecDeque<UpdateValuesResponse>,
    pub append_responses: VecDeque<AppendValuesResponse>,
    pub copy_responses: VecDeque<SheetProperties>,
    pub fail_next: Option<String>,
}

impl RecordingTransport {
    pub fn new(info: SpreadsheetResource) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    fn check(&mut self) -> Result<(), MockError> {
        match self.fail_next.take() {
            Some(reason) => Err(MockError(reason)),
            None => Ok(()),
        }
    }

    pub fn batch_bodies(&self) -> Vec<Value> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::BatchUpdate(body) => Some(serde_json::to_value(body).unwrap()),
                _ => None,
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    type Error = MockError;

    async fn get_spreadsheet(
        &mut self,
        include_grid_data: bool,
    ) -> Result<SpreadsheetResource, MockError> {
        self.calls.push(Call::GetSpreadsheet(include_grid_data));
        self.check()?;
        Ok(self.info.clone())
    }

    async fn get_by_data_filter(
        &mut self,
        request: GetByDataFilterRequest,
    ) -> Result<SpreadsheetResource, MockError> {
        self.calls.push(Call::GetByDataFilter(request));
        self.check()?;
        Ok(self.filter_responses.pop_front().unwrap_or_default())
    }

    async fn batch_update(
        &mut self,
        request: BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, MockError> {
        self.calls.push(Call::BatchUpdate(request));
        self.check()?;
        Ok(self.batch_responses.pop_front().unwrap_or_default())
    }

    async fn clear_values(&mut self, a1_range: &str) -> Result<(), MockError> {
        self.calls.push(Call::ClearValues(a1_range.to_string()));
        self.check()
    }

    async fn get_values(
        &mut self,
        a1_range: &str,
        params: GetValuesParams,
    ) -> Result<ValueRange, MockError> {
        self.calls
            .push(Call::GetValues(a1_range.to_string(), params));
        self.check()?;
        Ok(self.value_responses.pop_front().unwrap_or_default())
    }

    async fn update_values(
        &mut self,
        a1_range: &str,
        body: ValueRange,
        params: WriteValuesParams,
    ) -> Result<UpdateValuesResponse, MockError> {
        self.calls
            .push(Call::UpdateValues(a1_range.to_string(), body, params));
        self.check()?;
        Ok(self.update_responses.pop_front().unwrap_or_default())
    }

    async fn append_values(
        &mut self,
        a1_range: &str,
        body: ValueRange,
        params: WriteValuesParams,
    ) -> Result<AppendValuesResponse, MockError> {
        self.calls
            .push(Call::AppendValues(a1_range.to_string(), body, params));
        self.check()?;
        Ok(self.append_responses.pop_front().unwrap_or_default())
    }

    async fn copy_to(
        &mut self,
        sheet_id: i64,
        request: CopySheetToAnotherSpreadsheetRequest,
    ) -> Result<SheetProperties, MockError> {
        self.calls.push(Call::CopyTo(sheet_id, request));
        self.check()?;
        Ok(self.copy_responses.pop_front().unwrap_or_default())
    }
}

pub fn sheet_json(sheet_id: i64, title: &str, index: u32) -> Value {
    json!({
        "properties": {
            "sheetId": sheet_id,
            "title": title,
            "index": index,
            "sheetType": "GRID",
            "gridProperties": {"rowCount": 100, "columnCount": 26}
        }
    })
}

/// "Budget" with sheets `Summary` (id 5, first tab) and `Sheet1` (id 0, second tab)
pub fn budget_info() -> SpreadsheetResource {
    serde_json::from_value(json!({
        "spreadsheetId": "doc-1",
        "properties": {
            "title": "Budget",
            "locale": "en_US",
            "autoRecalc": "ON_CHANGE",
            "timeZone": "Europe/Berlin"
        },
        "sheets": [sheet_json(0, "Sheet1", 1), sheet_json(5, "Summary", 0)]
    }))
    .unwrap()
}

/// A `:getByDataFilter` response with one row of numbers on `Sheet1`
pub fn sheet1_row(start_row: u32, numbers: &[f64]) -> SpreadsheetResource {
    let values: Vec<Value> = numbers
        .iter()
        .map(|n| {
            json!({
                "userEnteredValue": {"numberValue": n},
                "effectiveValue": {"numberValue": n}
            })
        })
        .collect();
    let mut sheet = sheet_json(0, "Sheet1", 1);
    sheet["data"] = json!([{
        "startRow": start_row,
        "startColumn": 0,
        "rowData": [{"values": values}]
    }]);
    serde_json::from_value(json!({"sheets": [sheet]})).unwrap()
}

//! Spreadsheet client against a recording transport

mod common;

use std::error::Error as _;

use common::{budget_info, sheet1_row, sheet_json, Call, RecordingTransport};
use pretty_assertions::assert_eq;
use serde_json::json;
use sheetwire::api::{
    BatchUpdateResponse, Dimension, DimensionProperties, GetByDataFilterRequest, GridProperties,
    SheetProperties, SpreadsheetProperties,
};
use sheetwire::{CellAddress, CellValue, ClientError, Error, Spreadsheet, SpreadsheetConfig};

fn open(transport: RecordingTransport) -> Spreadsheet<RecordingTransport> {
    Spreadsheet::new(transport, SpreadsheetConfig::new("doc-1"))
}

async fn loaded() -> Spreadsheet<RecordingTransport> {
    let mut doc = open(RecordingTransport::new(budget_info()));
    doc.get_info(false).await.unwrap();
    doc
}

/// Loaded doc with `Sheet1!A1:E1` = 1..5 in the cache and the call log cleared
async fn with_cells() -> Spreadsheet<RecordingTransport> {
    let mut doc = loaded().await;
    doc.transport()
        .filter_responses
        .push_back(sheet1_row(0, &[1.0, 2.0, 3.0, 4.0, 5.0]));
    doc.load_sheet_cells(0, Some("A1:E1")).await.unwrap();
    doc.transport().calls.clear();
    doc
}

#[tokio::test]
async fn test_accessors_require_info() {
    let doc = open(RecordingTransport::new(budget_info()));
    assert!(matches!(doc.title(), Err(ClientError::InfoNotLoaded)));
    assert!(matches!(doc.sheet_count(), Err(ClientError::InfoNotLoaded)));
    assert!(matches!(doc.sheets_by_index(), Err(ClientError::InfoNotLoaded)));
}

#[tokio::test]
async fn test_get_info() {
    let mut doc = loaded().await;

    assert_eq!(doc.title().unwrap(), "Budget");
    assert_eq!(doc.locale().unwrap(), "en_US");
    assert_eq!(doc.time_zone().unwrap(), "Europe/Berlin");
    assert_eq!(doc.auto_recalc().unwrap(), "ON_CHANGE");
    assert_eq!(doc.sheet_count().unwrap(), 2);

    let order: Vec<_> = doc
        .sheets_by_index()
        .unwrap()
        .iter()
        .map(|s| s.title().to_string())
        .collect();
    assert_eq!(order, vec!["Summary", "Sheet1"]);
    assert_eq!(doc.sheet_by_title("Sheet1").unwrap().sheet_id(), 0);
    assert_eq!(doc.transport().calls, vec![Call::GetSpreadsheet(false)]);

    doc.reset_local_cache();
    assert!(matches!(doc.title(), Err(ClientError::InfoNotLoaded)));
}

#[tokio::test]
async fn test_load_sheet_cells_qualifies_filter() {
    let doc = with_cells().await;
    let sheet = doc.sheet_by_id(0).unwrap();
    assert_eq!(sheet.cells_loaded(), 5);
    assert_eq!(
        sheet.cell_by_a1("C1").unwrap().value().unwrap(),
        CellValue::Number(3.0)
    );

    let mut doc = doc;
    doc.load_sheet_cells(0, None).await.unwrap();
    doc.load_sheet_cells(0, Some("'Sheet1'!B2")).await.unwrap();
    assert_eq!(
        doc.transport().calls,
        vec![
            Call::GetByDataFilter(GetByDataFilterRequest::for_ranges(["'Sheet1'"])),
            Call::GetByDataFilter(GetByDataFilterRequest::for_ranges(["'Sheet1'!B2"])),
        ]
    );
}

#[tokio::test]
async fn test_save_updated_cells_groups_runs() {
    let mut doc = with_cells().await;
    {
        let sheet = doc.sheet_by_id_mut(0).unwrap();
        sheet.cell_by_a1_mut("A1").unwrap().set_value(10).unwrap();
        sheet.cell_by_a1_mut("B1").unwrap().set_value("=A1+1").unwrap();
        sheet.cell_by_a1_mut("D1").unwrap().set_value(true).unwrap();
    }

    doc.save_updated_cells(0).await.unwrap();

    let bodies = doc.transport().batch_bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "requests": [
                {"updateCells": {
                    "rows": [{"values": [
                        {"userEnteredValue": {"numberValue": 10.0}},
                        {"userEnteredValue": {"formulaValue": "=A1+1"}}
                    ]}],
                    "fields": "userEnteredValue",
                    "start": {"sheetId": 0, "rowIndex": 0, "columnIndex": 0}
                }},
                {"updateCells": {
                    "rows": [{"values": [{"userEnteredValue": {"boolValue": true}}]}],
                    "fields": "userEnteredValue",
                    "start": {"sheetId": 0, "rowIndex": 0, "columnIndex": 3}
                }}
            ],
            "includeSpreadsheetInResponse": true,
            "responseRanges": ["'Sheet1'!A1:B1", "'Sheet1'!D1"],
            "responseIncludeGridData": true
        })
    );

    let sheet = doc.sheet_by_id(0).unwrap();
    assert_eq!(sheet.dirty_cells().count(), 0);
    assert_eq!(
        sheet.cell_by_a1("A1").unwrap().value().unwrap(),
        CellValue::Number(10.0)
    );
    assert_eq!(sheet.cell_by_a1("B1").unwrap().formula(), Some("=A1+1"));
    assert_eq!(
        sheet.cell_by_a1("D1").unwrap().value().unwrap(),
        CellValue::Boolean(true)
    );
}

#[tokio::test]
async fn test_saved_ranges_are_filled_back() {
    let mut doc = with_cells().await;
    doc.sheet_by_id_mut(0)
        .unwrap()
        .cell_by_a1_mut("B1")
        .unwrap()
        .set_formula("=A1*7")
        .unwrap();

    let mut updated = sheet1_row(0, &[1.0, 7.0]);
    updated.properties = budget_info().properties;
    doc.transport().batch_responses.push_back(BatchUpdateResponse {
        updated_spreadsheet: Some(updated),
        ..BatchUpdateResponse::default()
    });

    doc.save_updated_cells(0).await.unwrap();

    let cell = doc.sheet_by_id(0).unwrap().cell_by_a1("B1").unwrap();
    assert!(!cell.is_dirty());
    assert_eq!(cell.value().unwrap(), CellValue::Number(7.0));
}

#[tokio::test]
async fn test_failed_save_keeps_edits_pending() {
    let mut doc = with_cells().await;
    doc.sheet_by_id_mut(0)
        .unwrap()
        .cell_by_a1_mut("E1")
        .unwrap()
        .set_value("draft")
        .unwrap();
    doc.transport().fail_next = Some("503".into());

    let err = doc.save_updated_cells(0).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(
        err.source().unwrap().to_string(),
        "mock transport failure: 503"
    );

    let cell = doc.sheet_by_id(0).unwrap().cell_by_a1("E1").unwrap();
    assert!(cell.is_dirty());
    assert!(matches!(cell.value(), Err(Error::UnsavedChangesPending(_))));
}

#[tokio::test]
async fn test_nothing_to_save_makes_no_call() {
    let mut doc = with_cells().await;
    doc.save_updated_cells(0).await.unwrap();
    doc.save_cells(0, &[CellAddress::new(0, 0)]).await.unwrap();
    assert!(doc.transport().calls.is_empty());
}

#[tokio::test]
async fn test_save_cells_only_sends_selected() {
    let mut doc = with_cells().await;
    {
        let sheet = doc.sheet_by_id_mut(0).unwrap();
        sheet.cell_mut(0, 0).unwrap().set_value(1).unwrap();
        sheet.cell_mut(0, 4).unwrap().set_value(2).unwrap();
    }

    doc.save_cells(0, &[CellAddress::new(0, 4)]).await.unwrap();

    let bodies = doc.transport().batch_bodies();
    assert_eq!(bodies[0]["responseRanges"], json!(["'Sheet1'!E1"]));
    let sheet = doc.sheet_by_id(0).unwrap();
    assert!(sheet.cell(0, 0).unwrap().is_dirty());
    assert!(!sheet.cell(0, 4).unwrap().is_dirty());

    assert!(matches!(
        doc.save_cells(0, &[CellAddress::new(50, 0)]).await,
        Err(ClientError::Core(Error::NotLoaded(_)))
    ));
}

#[tokio::test]
async fn test_clear_cell() {
    let mut doc = with_cells().await;
    doc.clear_cell(0, "C1").await.unwrap();

    let bodies = doc.transport().batch_bodies();
    assert_eq!(
        bodies[0]["requests"][0]["updateCells"]["rows"][0]["values"][0],
        json!({"userEnteredValue": {"stringValue": ""}})
    );
    let cell = doc.sheet_by_id(0).unwrap().cell_by_a1("C1").unwrap();
    assert_eq!(cell.value().unwrap(), CellValue::Empty);
}

#[tokio::test]
async fn test_clear_sheet() {
    let mut doc = with_cells().await;
    doc.clear_sheet(0).await.unwrap();
    assert_eq!(
        doc.transport().calls,
        vec![Call::ClearValues("'Sheet1'".into())]
    );
    assert_eq!(doc.sheet_by_id(0).unwrap().cells_loaded(), 0);
}

#[tokio::test]
async fn test_add_and_delete_sheet() {
    let mut doc = loaded().await;
    doc.transport()
        .batch_responses
        .push_back(serde_json::from_value(json!({
            "replies": [{"addSheet": sheet_json(42, "Added", 2)}]
        }))
        .unwrap());

    let id = doc
        .add_sheet(SheetProperties {
            title: Some("Added".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(id, 42);
    assert_eq!(doc.sheet_by_id(42).unwrap().title(), "Added");
    assert_eq!(doc.sheet_count().unwrap(), 3);

    doc.delete_sheet(42).await.unwrap();
    assert!(matches!(
        doc.sheet_by_id(42),
        Err(ClientError::SheetNotFound(42))
    ));
    assert_eq!(
        doc.transport().batch_bodies()[1]["requests"],
        json!([{"deleteSheet": {"sheetId": 42}}])
    );
}

#[tokio::test]
async fn test_add_sheet_without_reply_is_an_error() {
    let mut doc = loaded().await;
    assert!(matches!(
        doc.add_sheet(Default::default()).await,
        Err(ClientError::UnexpectedResponse(_))
    ));
}

#[tokio::test]
async fn test_update_properties_sends_field_mask() {
    let mut doc = loaded().await;
    doc.update_properties(SpreadsheetProperties {
        title: Some("Budget 2025".into()),
        locale: Some("de_DE".into()),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(
        doc.transport().batch_bodies()[0]["requests"][0],
        json!({"updateSpreadsheetProperties": {
            "properties": {"title": "Budget 2025", "locale": "de_DE"},
            "fields": "locale,title"
        }})
    );
}

#[tokio::test]
async fn test_resize_resets_cells() {
    let mut doc = with_cells().await;
    let mut renamed = budget_info();
    renamed.sheets[0].properties.grid_properties = Some(GridProperties::sized(10, 3));
    doc.transport().batch_responses.push_back(BatchUpdateResponse {
        updated_spreadsheet: Some(renamed),
        ..Default::default()
    });

    doc.resize(0, GridProperties::sized(10, 3)).await.unwrap();

    assert_eq!(
        doc.transport().batch_bodies()[0]["requests"][0],
        json!({"updateSheetProperties": {
            "properties": {"sheetId": 0, "gridProperties": {"rowCount": 10, "columnCount": 3}},
            "fields": "gridProperties.columnCount,gridProperties.rowCount"
        }})
    );
    let sheet = doc.sheet_by_id(0).unwrap();
    assert_eq!(sheet.cells_loaded(), 0);
    assert_eq!(sheet.column_count(), 3);
}

#[tokio::test]
async fn test_set_title_and_dimensions() {
    let mut doc = loaded().await;
    doc.set_title(5, "Overview").await.unwrap();
    doc.update_dimension_properties(
        5,
        Dimension::Columns,
        DimensionProperties {
            pixel_size: Some(120),
            ..Default::default()
        },
        Some(0..2),
    )
    .await
    .unwrap();

    let bodies = doc.transport().batch_bodies();
    assert_eq!(
        bodies[0]["requests"][0]["updateSheetProperties"]["fields"],
        json!("title")
    );
    assert_eq!(
        bodies[1]["requests"][0],
        json!({"updateDimensionProperties": {
            "range": {"sheetId": 5, "dimension": "COLUMNS", "startIndex": 0, "endIndex": 2},
            "properties": {"pixelSize": 120},
            "fields": "pixelSize"
        }})
    );

    assert!(matches!(
        doc.set_title(99, "Nope").await,
        Err(ClientError::SheetNotFound(99))
    ));
}

#[tokio::test]
async fn test_sheet_id_is_not_part_of_the_mask() {
    let mut doc = loaded().await;
    doc.update_sheet_properties(
        0,
        SheetProperties {
            sheet_id: Some(99),
            title: Some("Renamed".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(
        doc.transport().batch_bodies()[0]["requests"][0],
        json!({"updateSheetProperties": {
            "properties": {"sheetId": 0, "title": "Renamed"},
            "fields": "title"
        }})
    );
}

#[tokio::test]
async fn test_empty_updates_are_not_sent() {
    let mut doc = loaded().await;
    doc.transport().calls.clear();

    doc.update_properties(SpreadsheetProperties::default())
        .await
        .unwrap();
    doc.update_sheet_properties(
        0,
        SheetProperties {
            sheet_id: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    doc.update_dimension_properties(0, Dimension::Rows, DimensionProperties::default(), None)
        .await
        .unwrap();

    assert!(doc.transport().calls.is_empty());
}

#[tokio::test]
async fn test_sheet_without_id_is_ignored() {
    let mut info = budget_info();
    info.sheets.push(
        serde_json::from_value(json!({"properties": {"title": "Orphan", "index": 2}})).unwrap(),
    );
    let mut doc = open(RecordingTransport::new(info));
    doc.get_info(false).await.unwrap();

    assert_eq!(doc.sheet_count().unwrap(), 2);
    assert_eq!(doc.sheet_by_id(0).unwrap().title(), "Sheet1");
    assert!(doc.sheet_by_title("Orphan").is_none());
}

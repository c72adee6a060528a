//! Spreadsheet handle: cached document state on top of a [`Transport`].

use std::collections::BTreeMap;
use std::ops::Range;

use serde_json::{Map, Value};
use sheetwire_core::api::{
    AddNamedRangeRequest, AddSheetRequest, BatchUpdateRequest,
    CopySheetToAnotherSpreadsheetRequest, DeleteNamedRangeRequest, DeleteSheetRequest, Dimension,
    DimensionProperties, DimensionRange, GetByDataFilterRequest, GetValuesParams, GridProperties,
    GridRange, InsertDataOption, NamedRange, Reply, Request, Sheet, SheetProperties,
    SpreadsheetProperties, SpreadsheetResource, UpdateDimensionPropertiesRequest,
    UpdateSheetPropertiesRequest, UpdateSpreadsheetPropertiesRequest, ValueRange,
    WriteValuesParams,
};
use sheetwire_core::{api, column_number_to_letters, CellAddress, UpdateBatch, Worksheet};

use crate::config::SpreadsheetConfig;
use crate::error::{ClientError, Result};
use crate::rows::{first_row_number, header_text, RowQuery, SheetRow};
use crate::transport::Transport;

/// A remote spreadsheet document and its locally cached sheets.
///
/// Nothing is fetched on construction. Call [`get_info`](Self::get_info) before
/// reading properties or sheets.
pub struct Spreadsheet<T> {
    transport: T,
    config: SpreadsheetConfig,
    properties: Option<SpreadsheetProperties>,
    sheets: BTreeMap<i64, Worksheet>,
}

impl<T: Transport> Spreadsheet<T> {
    pub fn new(transport: T, config: SpreadsheetConfig) -> Self {
        Self {
            transport,
            config,
            properties: None,
            sheets: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SpreadsheetConfig {
        &self.config
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.config.spreadsheet_id
    }

    /// Get direct access to the transport.
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    // ========================================================================
    // Cached state
    // ========================================================================

    /// Document properties; fails until [`get_info`](Self::get_info) succeeded
    pub fn properties(&self) -> Result<&SpreadsheetProperties> {
        self.properties.as_ref().ok_or(ClientError::InfoNotLoaded)
    }

    pub fn title(&self) -> Result<&str> {
        Ok(self.properties()?.title.as_deref().unwrap_or_default())
    }

    pub fn locale(&self) -> Result<&str> {
        Ok(self.properties()?.locale.as_deref().unwrap_or_default())
    }

    pub fn time_zone(&self) -> Result<&str> {
        Ok(self.properties()?.time_zone.as_deref().unwrap_or_default())
    }

    /// Recalculation interval (`ON_CHANGE`, `MINUTE` or `HOUR`)
    pub fn auto_recalc(&self) -> Result<&str> {
        Ok(self.properties()?.auto_recalc.as_deref().unwrap_or_default())
    }

    pub fn default_format(&self) -> Result<Option<&Value>> {
        Ok(self.properties()?.default_format.as_ref())
    }

    pub fn spreadsheet_theme(&self) -> Result<Option<&Value>> {
        Ok(self.properties()?.spreadsheet_theme.as_ref())
    }

    pub fn iterative_calculation_settings(&self) -> Result<Option<&Value>> {
        Ok(self.properties()?.iterative_calculation_settings.as_ref())
    }

    pub fn sheet_count(&self) -> Result<usize> {
        self.properties()?;
        Ok(self.sheets.len())
    }

    /// Sheets keyed by sheet id
    pub fn sheets_by_id(&self) -> Result<&BTreeMap<i64, Worksheet>> {
        self.properties()?;
        Ok(&self.sheets)
    }

    /// Sheets in tab order
    pub fn sheets_by_index(&self) -> Result<Vec<&Worksheet>> {
        self.properties()?;
        let mut sheets: Vec<_> = self.sheets.values().collect();
        sheets.sort_by_key(|s| s.index());
        Ok(sheets)
    }

    pub fn sheet_by_id(&self, sheet_id: i64) -> Result<&Worksheet> {
        self.sheets
            .get(&sheet_id)
            .ok_or(ClientError::SheetNotFound(sheet_id))
    }

    pub fn sheet_by_id_mut(&mut self, sheet_id: i64) -> Result<&mut Worksheet> {
        self.sheets
            .get_mut(&sheet_id)
            .ok_or(ClientError::SheetNotFound(sheet_id))
    }

    pub fn sheet_by_title(&self, title: &str) -> Option<&Worksheet> {
        self.sheets.values().find(|s| s.title() == title)
    }

    /// Forget all fetched state, including unsaved edits
    pub fn reset_local_cache(&mut self) {
        self.properties = None;
        self.sheets.clear();
    }

    fn update_or_create_sheet(&mut self, sheet: Sheet) {
        let Some(sheet_id) = sheet.properties.sheet_id else {
            tracing::warn!(
                "ignoring sheet {:?} without a sheet id",
                sheet.properties.title.as_deref().unwrap_or_default()
            );
            return;
        };
        match self.sheets.get_mut(&sheet_id) {
            Some(existing) => existing.update_from_sheet(sheet),
            None => {
                tracing::debug!("caching new sheet {}", sheet_id);
                self.sheets.insert(sheet_id, Worksheet::from_sheet(sheet));
            }
        }
    }

    fn merge_resource(&mut self, resource: SpreadsheetResource) {
        if let Some(properties) = resource.properties {
            self.properties = Some(properties);
        }
        for sheet in resource.sheets {
            self.update_or_create_sheet(sheet);
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    async fn send_batch(&mut self, request: BatchUpdateRequest) -> Result<Vec<Reply>> {
        let response = self
            .transport
            .batch_update(request)
            .await
            .map_err(ClientError::transport)?;
        if let Some(updated) = response.updated_spreadsheet {
            self.merge_resource(updated);
        }
        Ok(response.replies)
    }

    async fn single_update(&mut self, request: Request) -> Result<Reply> {
        let replies = self.send_batch(BatchUpdateRequest::new(vec![request])).await?;
        Ok(replies.into_iter().next().unwrap_or_default())
    }

    /// Fetch document properties and sheets
    ///
    /// With `include_cells`, every cell of every sheet is loaded as well.
    pub async fn get_info(&mut self, include_cells: bool) -> Result<()> {
        tracing::info!(
            "fetching spreadsheet {} (cells: {})",
            self.config.spreadsheet_id,
            include_cells
        );
        let resource = self
            .transport
            .get_spreadsheet(include_cells)
            .await
            .map_err(ClientError::transport)?;
        self.properties = Some(resource.properties.unwrap_or_default());
        for sheet in resource.sheets {
            self.update_or_create_sheet(sheet);
        }
        Ok(())
    }

    /// Update document properties; only the fields set in `properties` change
    ///
    /// An update that sets nothing is not sent.
    pub async fn update_properties(&mut self, properties: SpreadsheetProperties) -> Result<()> {
        let fields = api::field_mask(&properties)?;
        if fields.is_empty() {
            tracing::debug!("no document properties to update");
            return Ok(());
        }
        self.single_update(Request::UpdateSpreadsheetProperties(
            UpdateSpreadsheetPropertiesRequest { properties, fields },
        ))
        .await?;
        Ok(())
    }

    /// Add a sheet, returning its id
    pub async fn add_sheet(&mut self, properties: SheetProperties) -> Result<i64> {
        let reply = self
            .single_update(Request::AddSheet(AddSheetRequest { properties }))
            .await?;
        let properties = reply
            .add_sheet
            .ok_or_else(|| ClientError::UnexpectedResponse("missing addSheet reply".into()))?
            .properties;
        let sheet_id = properties.sheet_id.ok_or_else(|| {
            ClientError::UnexpectedResponse("addSheet reply without sheet id".into())
        })?;

        if !self.sheets.contains_key(&sheet_id) {
            self.update_or_create_sheet(Sheet {
                properties,
                data: Vec::new(),
            });
        }
        tracing::info!("added sheet {}", sheet_id);
        Ok(sheet_id)
    }

    /// Add a sheet and write its header row, returning its id
    ///
    /// The sheet exists even if writing the headers fails.
    pub async fn add_sheet_with_headers(
        &mut self,
        properties: SheetProperties,
        headers: Vec<String>,
    ) -> Result<i64> {
        let sheet_id = self.add_sheet(properties).await?;
        self.set_header_row(sheet_id, headers).await?;
        Ok(sheet_id)
    }

    pub async fn delete_sheet(&mut self, sheet_id: i64) -> Result<()> {
        self.single_update(Request::DeleteSheet(DeleteSheetRequest { sheet_id }))
            .await?;
        self.sheets.remove(&sheet_id);
        tracing::info!("deleted sheet {}", sheet_id);
        Ok(())
    }

    /// Add a named range; the service picks an id when `named_range_id` is `None`
    pub async fn add_named_range(
        &mut self,
        name: &str,
        range: GridRange,
        named_range_id: Option<String>,
    ) -> Result<NamedRange> {
        let reply = self
            .single_update(Request::AddNamedRange(AddNamedRangeRequest {
                named_range: NamedRange {
                    named_range_id,
                    name: name.to_string(),
                    range,
                },
            }))
            .await?;
        reply
            .add_named_range
            .map(|r| r.named_range)
            .ok_or_else(|| ClientError::UnexpectedResponse("missing addNamedRange reply".into()))
    }

    pub async fn delete_named_range(&mut self, named_range_id: &str) -> Result<()> {
        self.single_update(Request::DeleteNamedRange(DeleteNamedRangeRequest {
            named_range_id: named_range_id.to_string(),
        }))
        .await?;
        Ok(())
    }

    /// Fetch cells for A1 ranges (sheet-qualified) into the local cache
    pub async fn load_cells<I, S>(&mut self, a1_ranges: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = GetByDataFilterRequest::for_ranges(a1_ranges);
        tracing::info!("loading {} ranges", request.data_filters.len());
        let resource = self
            .transport
            .get_by_data_filter(request)
            .await
            .map_err(ClientError::transport)?;
        for sheet in resource.sheets {
            self.update_or_create_sheet(sheet);
        }
        Ok(())
    }

    // ========================================================================
    // Sheet-level requests
    // ========================================================================

    /// Fetch cells of one sheet; no filter loads the whole sheet
    pub async fn load_sheet_cells(&mut self, sheet_id: i64, filter: Option<&str>) -> Result<()> {
        let range = self.sheet_by_id(sheet_id)?.qualify_range(filter);
        self.load_cells([range]).await
    }

    /// Update sheet properties; only the fields set in `properties` change
    ///
    /// `properties.sheet_id` is ignored in favour of `sheet_id`. An update that
    /// sets nothing is not sent.
    pub async fn update_sheet_properties(
        &mut self,
        sheet_id: i64,
        mut properties: SheetProperties,
    ) -> Result<()> {
        self.sheet_by_id(sheet_id)?;
        properties.sheet_id = None;
        let fields = api::field_mask(&properties)?;
        if fields.is_empty() {
            tracing::debug!("no properties to update on sheet {}", sheet_id);
            return Ok(());
        }
        properties.sheet_id = Some(sheet_id);
        self.single_update(Request::UpdateSheetProperties(UpdateSheetPropertiesRequest {
            properties,
            fields,
        }))
        .await?;
        Ok(())
    }

    pub async fn update_grid_properties(
        &mut self,
        sheet_id: i64,
        grid_properties: GridProperties,
    ) -> Result<()> {
        self.update_sheet_properties(
            sheet_id,
            SheetProperties {
                grid_properties: Some(grid_properties),
                ..SheetProperties::default()
            },
        )
        .await
    }

    /// Change the grid size
    ///
    /// Cached cells are dropped, since cells beyond the new bounds no longer exist.
    pub async fn resize(&mut self, sheet_id: i64, grid_properties: GridProperties) -> Result<()> {
        self.update_grid_properties(sheet_id, grid_properties).await?;
        self.sheet_by_id_mut(sheet_id)?.reset_local_cells();
        Ok(())
    }

    pub async fn set_title(&mut self, sheet_id: i64, title: &str) -> Result<()> {
        self.update_sheet_properties(
            sheet_id,
            SheetProperties {
                title: Some(title.to_string()),
                ..SheetProperties::default()
            },
        )
        .await
    }

    /// Update size or visibility of rows or columns
    ///
    /// `bounds` is a 0-based, end-exclusive index range; `None` covers the whole axis.
    pub async fn update_dimension_properties(
        &mut self,
        sheet_id: i64,
        dimension: Dimension,
        properties: DimensionProperties,
        bounds: Option<Range<u32>>,
    ) -> Result<()> {
        self.sheet_by_id(sheet_id)?;
        let fields = api::field_mask(&properties)?;
        if fields.is_empty() {
            tracing::debug!("no dimension properties to update on sheet {}", sheet_id);
            return Ok(());
        }
        let range = DimensionRange {
            sheet_id,
            dimension,
            start_index: bounds.as_ref().map(|b| b.start),
            end_index: bounds.as_ref().map(|b| b.end),
        };
        self.single_update(Request::UpdateDimensionProperties(
            UpdateDimensionPropertiesRequest {
                range,
                properties,
                fields,
            },
        ))
        .await?;
        Ok(())
    }

    /// Save every cell of a sheet that has a pending edit
    pub async fn save_updated_cells(&mut self, sheet_id: i64) -> Result<()> {
        let batch = self.sheet_by_id(sheet_id)?.plan_save();
        self.save_batch(sheet_id, batch).await
    }

    /// Save specific cells; clean ones are skipped
    pub async fn save_cells(&mut self, sheet_id: i64, addresses: &[CellAddress]) -> Result<()> {
        let batch = self.sheet_by_id(sheet_id)?.plan_cells(addresses)?;
        self.save_batch(sheet_id, batch).await
    }

    /// Clear one loaded cell and save it
    pub async fn clear_cell(&mut self, sheet_id: i64, a1_address: &str) -> Result<()> {
        let cell = self.sheet_by_id_mut(sheet_id)?.cell_by_a1_mut(a1_address)?;
        cell.clear_value();
        let address = cell.address();
        self.save_cells(sheet_id, &[address]).await
    }

    /// Clear every value of a sheet and drop its cached cells
    pub async fn clear_sheet(&mut self, sheet_id: i64) -> Result<()> {
        let range = self.sheet_by_id(sheet_id)?.a1_sheet_name();
        tracing::info!("clearing {}", range);
        self.transport
            .clear_values(&range)
            .await
            .map_err(ClientError::transport)?;
        let sheet = self.sheet_by_id_mut(sheet_id)?;
        sheet.reset_local_cells();
        sheet.clear_header_values();
        Ok(())
    }

    /// Copy a sheet into another document, returning the copy's properties
    pub async fn copy_sheet_to(
        &mut self,
        sheet_id: i64,
        destination_spreadsheet_id: &str,
    ) -> Result<SheetProperties> {
        self.sheet_by_id(sheet_id)?;
        tracing::info!(
            "copying sheet {} to spreadsheet {}",
            sheet_id,
            destination_spreadsheet_id
        );
        let request = CopySheetToAnotherSpreadsheetRequest {
            destination_spreadsheet_id: destination_spreadsheet_id.to_string(),
        };
        self.transport
            .copy_to(sheet_id, request)
            .await
            .map_err(ClientError::transport)
    }

    // ========================================================================
    // Values and rows
    // ========================================================================

    /// Read the plain values of a range on one sheet, row by row
    ///
    /// Trailing empty rows and cells are not returned. The cell cache is not
    /// touched.
    pub async fn get_cells_in_range(
        &mut self,
        sheet_id: i64,
        a1_range: &str,
        params: GetValuesParams,
    ) -> Result<Vec<Vec<Value>>> {
        let range = self.sheet_by_id(sheet_id)?.qualify_range(Some(a1_range));
        tracing::debug!("reading values of {}", range);
        let values = self
            .transport
            .get_values(&range, params)
            .await
            .map_err(ClientError::transport)?;
        Ok(values.values)
    }

    /// Read the first row and cache it as the sheet's header row
    pub async fn load_header_row(&mut self, sheet_id: i64) -> Result<Vec<String>> {
        let last_column = self.sheet_by_id(sheet_id)?.last_column_letter()?;
        let rows = self
            .get_cells_in_range(
                sheet_id,
                &format!("A1:{last_column}1"),
                GetValuesParams::default(),
            )
            .await?;
        let headers: Vec<String> = rows
            .first()
            .map(|row| row.iter().map(header_text).collect())
            .unwrap_or_default();
        self.sheet_by_id_mut(sheet_id)?
            .set_header_values(headers.clone());
        Ok(headers)
    }

    /// Write the header row, starting at A1
    ///
    /// Values are entered as if typed, so `=` starts a formula. The row the
    /// service echoes back is cached as the header row.
    pub async fn set_header_row(&mut self, sheet_id: i64, headers: Vec<String>) -> Result<()> {
        let sheet = self.sheet_by_id(sheet_id)?;
        let column_count = sheet.column_count();
        if headers.len() > column_count as usize {
            return Err(ClientError::HeaderTooWide {
                headers: headers.len(),
                column_count,
            });
        }

        let range = format!("{}!A1", sheet.a1_sheet_name());
        let row: Vec<Value> = headers.iter().cloned().map(Value::String).collect();
        let params = WriteValuesParams {
            include_values_in_response: true,
            ..WriteValuesParams::default()
        };
        let response = self
            .transport
            .update_values(&range, ValueRange::rows(range.as_str(), vec![row]), params)
            .await
            .map_err(ClientError::transport)?;

        let echoed: Option<Vec<String>> = response
            .updated_data
            .and_then(|data| data.values.into_iter().next())
            .map(|row| row.iter().map(header_text).collect());
        self.sheet_by_id_mut(sheet_id)?
            .set_header_values(echoed.unwrap_or(headers));
        Ok(())
    }

    /// Append one row of values after the sheet's data, returning it with its row number
    pub async fn add_row(&mut self, sheet_id: i64, values: Vec<Value>) -> Result<SheetRow> {
        let range = self.sheet_by_id(sheet_id)?.a1_sheet_name();
        let params = WriteValuesParams {
            insert_data_option: Some(InsertDataOption::Overwrite),
            include_values_in_response: true,
            ..WriteValuesParams::default()
        };
        let body = ValueRange {
            values: vec![values.clone()],
            ..ValueRange::default()
        };
        let response = self
            .transport
            .append_values(&range, body, params)
            .await
            .map_err(ClientError::transport)?;

        let updates = response.updates;
        let updated_range = updates.updated_range.ok_or_else(|| {
            ClientError::UnexpectedResponse("append reply without updatedRange".into())
        })?;
        let row_number = first_row_number(&updated_range)?;
        let values = updates
            .updated_data
            .and_then(|data| data.values.into_iter().next())
            .unwrap_or(values);
        tracing::debug!("appended row {} to sheet {}", row_number, sheet_id);
        Ok(SheetRow { row_number, values })
    }

    /// Append a row given as header name to value
    ///
    /// Loads the header row first if it is not cached. Headers missing from
    /// `record` become empty cells; keys that match no header are dropped.
    pub async fn add_row_from_map(
        &mut self,
        sheet_id: i64,
        record: &Map<String, Value>,
    ) -> Result<SheetRow> {
        let headers = self.cached_or_loaded_headers(sheet_id).await?;
        let values = headers
            .iter()
            .map(|h| record.get(h).cloned().unwrap_or(Value::Null))
            .collect();
        self.add_row(sheet_id, values).await
    }

    /// Read data rows below the header row
    ///
    /// Only as many columns as there are headers are read, so a sheet without
    /// headers has no rows.
    pub async fn get_rows(&mut self, sheet_id: i64, query: RowQuery) -> Result<Vec<SheetRow>> {
        let headers = self.cached_or_loaded_headers(sheet_id).await?;
        if headers.is_empty() {
            tracing::debug!("sheet {} has no header row", sheet_id);
            return Ok(Vec::new());
        }
        let row_count = self.sheet_by_id(sheet_id)?.row_count();
        let Some((first_row, last_row)) = query.sheet_rows(row_count) else {
            return Ok(Vec::new());
        };

        let last_column = column_number_to_letters(headers.len() as u32)?;
        let range = format!("A{first_row}:{last_column}{last_row}");
        let rows = self
            .get_cells_in_range(sheet_id, &range, GetValuesParams::default())
            .await?;
        Ok((first_row..=last_row)
            .zip(rows)
            .map(|(row_number, values)| SheetRow { row_number, values })
            .collect())
    }

    async fn cached_or_loaded_headers(&mut self, sheet_id: i64) -> Result<Vec<String>> {
        if let Some(headers) = self.sheet_by_id(sheet_id)?.header_values() {
            return Ok(headers.to_vec());
        }
        self.load_header_row(sheet_id).await
    }

    /// Send a planned batch; on success its cells are committed
    ///
    /// On failure no cell is touched and every edit stays pending.
    async fn save_batch(&mut self, sheet_id: i64, batch: UpdateBatch) -> Result<()> {
        if batch.is_empty() {
            tracing::debug!("nothing to save on sheet {}", sheet_id);
            return Ok(());
        }

        tracing::info!(
            "saving {} cells in {} runs on sheet {}",
            batch.addresses().count(),
            batch.groups.len(),
            sheet_id
        );
        let request = batch.to_request(self.config.fetch_saved_ranges);
        let response = self
            .transport
            .batch_update(request)
            .await
            .map_err(ClientError::transport)?;

        // commit before merging so fetched values win over local guesses
        self.sheet_by_id_mut(sheet_id)?.commit(batch.addresses());
        if let Some(updated) = response.updated_spreadsheet {
            self.merge_resource(updated);
        }
        Ok(())
    }
}

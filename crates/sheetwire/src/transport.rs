//! The boundary to the remote service.
//!
//! A transport owns HTTP, authentication and retries. It maps each call onto
//! one REST request against [`SpreadsheetConfig::endpoint`](crate::SpreadsheetConfig::endpoint):
//!
//! | Method | Request |
//! |---|---|
//! | `get_spreadsheet` | `GET <endpoint>` (`?includeGridData=true` when asked) |
//! | `get_by_data_filter` | `POST <endpoint>:getByDataFilter` |
//! | `batch_update` | `POST <endpoint>:batchUpdate` |
//! | `clear_values` | `POST <endpoint>/values/<range>:clear` |
//! | `get_values` | `GET <endpoint>/values/<range>` (params as query string) |
//! | `update_values` | `PUT <endpoint>/values/<range>` (params as query string) |
//! | `append_values` | `POST <endpoint>/values/<range>:append` (params as query string) |
//! | `copy_to` | `POST <endpoint>/sheets/<sheet id>:copyTo` |
//!
//! Status codes are the transport's business; the client only sees `Ok` or the
//! transport's error.

use sheetwire_core::api::{
    AppendValuesResponse, BatchUpdateRequest, BatchUpdateResponse,
    CopySheetToAnotherSpreadsheetRequest, GetByDataFilterRequest, GetValuesParams,
    SheetProperties, SpreadsheetResource, UpdateValuesResponse, ValueRange, WriteValuesParams,
};

/// Async access to one remote spreadsheet document.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the document resource, optionally with every cell
    async fn get_spreadsheet(
        &mut self,
        include_grid_data: bool,
    ) -> Result<SpreadsheetResource, Self::Error>;

    /// Fetch the document restricted to A1 ranges, with grid data
    async fn get_by_data_filter(
        &mut self,
        request: GetByDataFilterRequest,
    ) -> Result<SpreadsheetResource, Self::Error>;

    /// Apply a batch of update requests
    async fn batch_update(
        &mut self,
        request: BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, Self::Error>;

    /// Clear every value in an A1 range
    async fn clear_values(&mut self, a1_range: &str) -> Result<(), Self::Error>;

    /// Read the plain values of an A1 range
    async fn get_values(
        &mut self,
        a1_range: &str,
        params: GetValuesParams,
    ) -> Result<ValueRange, Self::Error>;

    /// Overwrite the values of an A1 range
    async fn update_values(
        &mut self,
        a1_range: &str,
        body: ValueRange,
        params: WriteValuesParams,
    ) -> Result<UpdateValuesResponse, Self::Error>;

    /// Append rows after the table found in an A1 range
    async fn append_values(
        &mut self,
        a1_range: &str,
        body: ValueRange,
        params: WriteValuesParams,
    ) -> Result<AppendValuesResponse, Self::Error>;

    /// Copy a sheet into another document, returning the new sheet's properties
    async fn copy_to(
        &mut self,
        sheet_id: i64,
        request: CopySheetToAnotherSpreadsheetRequest,
    ) -> Result<SheetProperties, Self::Error>;
}

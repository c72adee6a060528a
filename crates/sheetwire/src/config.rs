//! Client configuration.

/// Default REST endpoint of the spreadsheets API
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Configuration for a [`Spreadsheet`](crate::Spreadsheet) handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetConfig {
    /// Id of the remote document.
    pub spreadsheet_id: String,
    /// Base URL of the spreadsheets collection. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Ask the service to return the saved ranges with grid data, so formula
    /// results are known right after a save. Default: true.
    pub fetch_saved_ranges: bool,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_saved_ranges: true,
        }
    }
}

impl SpreadsheetConfig {
    /// Configuration for a document id with default settings
    pub fn new<S: Into<String>>(spreadsheet_id: S) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_fetch_saved_ranges(mut self, fetch: bool) -> Self {
        self.fetch_saved_ranges = fetch;
        self
    }

    /// URL of the document resource (`<base>/<id>`)
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id
        )
    }
}

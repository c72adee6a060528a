//! Error types for the spreadsheet client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Core(#[from] sheetwire_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Spreadsheet info not loaded; call get_info() first")]
    InfoNotLoaded,

    #[error("No sheet with id {0}")]
    SheetNotFound(i64),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Sheet has {column_count} columns, too few for {headers} headers; resize it first")]
    HeaderTooWide { headers: usize, column_count: u32 },
}

impl ClientError {
    /// Wrap a transport failure, keeping it as the error source
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ClientError::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

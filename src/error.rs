use thiserror::Error;

pub type TripsheetResult<T> = Result<T, TripsheetError>;

#[derive(Error, Debug)]
pub enum TripsheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

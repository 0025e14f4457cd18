use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sensor store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Parquet read error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unknown weather quantity: {0}")]
    UnknownQuantity(String),

    #[error("Quantity {0} is not available in this table")]
    QuantityUnavailable(String),

    #[error("Forecast file has {rows} rows, at least {required} are required")]
    InsufficientForecast { rows: usize, required: usize },

    #[error("Forecast timestamps are not strictly ascending at row {row}")]
    UnorderedForecast { row: usize },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

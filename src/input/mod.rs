pub mod csv;

pub use csv::load_trajectory;

/// Result type for trajectory loading
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors raised while reading a trajectory file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid value {value:?} in column {column} on row {row}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SptError {
    /// A cell could not be interpreted. Rows are 1-based, columns 0-based.
    #[error("row {row}, column {column}: {message}")]
    Table {
        row: usize,
        column: usize,
        message: String,
    },

    /// Structural problem with an input table that is not tied to one cell.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Two wordlists handed to a permutation run differ in length.
    #[error("wordlists have different lengths: {left}, {right}")]
    LengthMismatch { left: usize, right: usize },

    /// A trial failed inside the worker pool. The whole run is abandoned.
    #[error("trial failed: {0}")]
    Trial(String),

    /// Calibration could not be performed.
    #[error("calibration error: {0}")]
    Calibration(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Propagated CSV reader error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Propagated I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SptError {
    pub(crate) fn table(row: usize, column: usize, message: impl Into<String>) -> Self {
        SptError::Table {
            row,
            column,
            message: message.into(),
        }
    }
}

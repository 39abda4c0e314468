//! Error kinds raised by the cleaning and charting stages.

/// Failures while loading or normalizing a source table.
#[derive(Debug, thiserror::Error)]
pub enum DataFormatError {
    #[error("{table}: expected column '{column}' is missing")]
    MissingColumn { table: &'static str, column: String },

    #[error("{table}: cannot coerce {column} value '{value}' in row {row}")]
    ValueCoercion {
        table: &'static str,
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures while deriving or drawing a chart.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unsupported image format '{0}': only png and svg are supported")]
    UnsupportedFormat(String),

    #[error("{chart}: field '{field}' has no values to plot")]
    EmptyEncoding {
        chart: &'static str,
        field: &'static str,
    },

    #[error("{chart}: drawing failed: {message}")]
    Draw { chart: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

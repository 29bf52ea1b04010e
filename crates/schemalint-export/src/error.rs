//! Export errors

/// Input the exporter cannot render faithfully
///
/// Raised instead of emitting DDL or documents that would not round-trip.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Column {table}.{column} of type {data_type} has no length")]
    MissingLength {
        table: String,
        column: String,
        data_type: String,
    },

    #[error("Column {table}.{column} of type {data_type} has length {length}, expected 1..={limit}")]
    LengthOutOfRange {
        table: String,
        column: String,
        data_type: String,
        length: u32,
        limit: u32,
    },

    #[error("Column {table}.{column} of type {data_type} has no precision")]
    MissingPrecision {
        table: String,
        column: String,
        data_type: String,
    },

    #[error("Column {table}.{column} has precision {precision}, expected 1..=38")]
    PrecisionOutOfRange {
        table: String,
        column: String,
        precision: u8,
    },

    #[error("Column {table}.{column} has scale {scale} above precision {precision}")]
    ScaleExceedsPrecision {
        table: String,
        column: String,
        precision: u8,
        scale: u8,
    },

    #[error("Column {table}.{column} cannot be IDENTITY: {reason}")]
    InvalidIdentity {
        table: String,
        column: String,
        reason: String,
    },

    #[error("Index {index} on {table} has no columns")]
    IndexWithoutColumns { table: String, index: String },

    #[error("Index {index} on {table} references unknown column {column}")]
    UnknownIndexColumn {
        table: String,
        index: String,
        column: String,
    },

    #[error("Relationship {name} references unknown {target}")]
    UnknownRelationshipTarget { name: String, target: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

use thiserror::Error;

/// Why a placement was refused. The descriptor stays with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("column {column} is outside the grid ({columns} columns)")]
    ColumnOutOfBounds { column: usize, columns: u8 },
    #[error("column {0} is full")]
    ColumnFull(usize),
    #[error("a cascade is in progress")]
    CascadeBusy,
}

impl PlaceError {
    /// Stable wire code
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::ColumnOutOfBounds { .. } => "column_out_of_bounds",
            PlaceError::ColumnFull(_) => "column_full",
            PlaceError::CascadeBusy => "cascade_busy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidVar { key: &'static str, value: String },
    #[error("grid must have at least one row and one column (got {rows}x{columns})")]
    EmptyGrid { rows: u8, columns: u8 },
    #[error("cell size must be positive (got {0})")]
    CellSize(f32),
}

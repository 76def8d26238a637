//! Errors produced by the level model and the level file format

use thiserror::Error;

/// Errors that can occur when building, editing or parsing a level
#[derive(Debug, Error)]
pub enum LevelError {
    /// A row or column count was negative
    #[error("invalid dimension: {0} (dimensions must be non-negative)")]
    InvalidDimension(i64),
    /// The requested grid holds more cells than a level may have
    #[error("a {rows}x{columns} level exceeds the limit of {limit} cells")]
    TooLarge {
        rows: usize,
        columns: usize,
        limit: usize,
    },
    /// A cell address fell outside the grid
    #[error("cell ({row}, {column}) is outside the {rows}x{columns} level")]
    OutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
    /// Nested rows passed to a constructor did not all have the same length
    #[error("row {row} has {found} tiles, expected {expected}")]
    JaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A `.lvl` file could not be parsed. `line` is 1-based.
    #[error("malformed level file (line {line}): {reason}")]
    MalformedLevelFile { line: usize, reason: String },
    /// Tile set metadata is inconsistent
    #[error("invalid tile set: {0}")]
    InvalidTileSet(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LevelError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        LevelError::MalformedLevelFile {
            line,
            reason: reason.into(),
        }
    }
}

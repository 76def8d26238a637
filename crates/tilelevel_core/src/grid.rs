//! The level grid: a rectangular matrix of tile indices

use serde::{Deserialize, Serialize};

use crate::LevelError;

/// Index of a tile within the active tile set. `0` marks an empty cell.
pub type TileIndex = u32;

/// The reserved "no tile" value
pub const EMPTY_TILE: TileIndex = 0;

/// Largest number of cells a level may hold (4096 x 4096)
pub const MAX_LEVEL_CELLS: usize = 1 << 24;

/// A single-layer level layout
///
/// Cells are stored row-major, so every row always has exactly `columns`
/// entries. The grid is owned by one editing session and mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LevelRows", into = "LevelRows")]
pub struct LevelGrid {
    rows: usize,
    columns: usize,
    tiles: Vec<TileIndex>,
}

/// Nested-row form used when the grid is stored as a JSON blob
#[derive(Serialize, Deserialize)]
struct LevelRows {
    level: Vec<Vec<TileIndex>>,
}

impl LevelGrid {
    /// Create an empty grid, rejecting sizes above [`MAX_LEVEL_CELLS`]
    pub fn new(rows: usize, columns: usize) -> Result<Self, LevelError> {
        Ok(Self {
            rows,
            columns,
            tiles: vec![EMPTY_TILE; cell_count(rows, columns)?],
        })
    }

    /// Create an empty grid from signed dimensions (e.g. parsed user input)
    pub fn create(rows: i64, columns: i64) -> Result<Self, LevelError> {
        Self::new(dimension(rows)?, dimension(columns)?)
    }

    /// Build a grid from nested rows, rejecting rows of unequal length
    pub fn from_rows(rows: Vec<Vec<TileIndex>>) -> Result<Self, LevelError> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        let mut tiles = Vec::with_capacity(rows.len() * columns);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(LevelError::JaggedRows {
                    row: i,
                    expected: columns,
                    found: row.len(),
                });
            }
            tiles.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            tiles,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// True when the grid has no addressable cells
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Get the tile at a cell, or `None` outside the grid
    pub fn tile(&self, row: usize, column: usize) -> Option<TileIndex> {
        self.index(row, column).map(|idx| self.tiles[idx])
    }

    /// Get one row as a slice
    pub fn row(&self, row: usize) -> Option<&[TileIndex]> {
        if row < self.rows {
            let start = row * self.columns;
            Some(&self.tiles[start..start + self.columns])
        } else {
            None
        }
    }

    /// Iterate rows top to bottom
    pub fn iter_rows(&self) -> impl Iterator<Item = &[TileIndex]> + '_ {
        (0..self.rows).map(move |r| {
            let start = r * self.columns;
            &self.tiles[start..start + self.columns]
        })
    }

    /// Iterate every non-empty cell as `(row, column, tile)`
    pub fn placed_tiles(&self) -> impl Iterator<Item = (usize, usize, TileIndex)> + '_ {
        let columns = self.columns;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile != EMPTY_TILE)
            .map(move |(idx, tile)| (idx / columns, idx % columns, *tile))
    }

    /// Copy the grid out as nested rows
    pub fn to_rows(&self) -> Vec<Vec<TileIndex>> {
        self.iter_rows().map(<[TileIndex]>::to_vec).collect()
    }

    /// Place a tile in a cell
    pub fn set_tile(
        &mut self,
        row: usize,
        column: usize,
        tile: TileIndex,
    ) -> Result<(), LevelError> {
        let idx = self.index(row, column).ok_or(LevelError::OutOfBounds {
            row,
            column,
            rows: self.rows,
            columns: self.columns,
        })?;
        self.tiles[idx] = tile;
        Ok(())
    }

    /// Reset a cell to [`EMPTY_TILE`]
    pub fn clear_tile(&mut self, row: usize, column: usize) -> Result<(), LevelError> {
        self.set_tile(row, column, EMPTY_TILE)
    }

    /// Change the level dimensions, keeping what still fits.
    ///
    /// Rows are anchored to the top edge: shrinking drops rows from the top,
    /// growing inserts empty rows at the top and pushes existing content down.
    /// Columns are anchored to the left: growing appends empty cells,
    /// shrinking truncates each row.
    pub fn resize(&mut self, new_rows: i64, new_columns: i64) -> Result<(), LevelError> {
        let new_rows = dimension(new_rows)?;
        let new_columns = dimension(new_columns)?;

        let mut tiles = vec![EMPTY_TILE; cell_count(new_rows, new_columns)?];
        let kept_rows = new_rows.min(self.rows);
        let kept_columns = new_columns.min(self.columns);
        // Last `kept_rows` source rows land in the last `kept_rows` target rows.
        let src_start = self.rows - kept_rows;
        let dst_start = new_rows - kept_rows;

        for k in 0..kept_rows {
            let src = (src_start + k) * self.columns;
            let dst = (dst_start + k) * new_columns;
            tiles[dst..dst + kept_columns].copy_from_slice(&self.tiles[src..src + kept_columns]);
        }

        self.rows = new_rows;
        self.columns = new_columns;
        self.tiles = tiles;
        Ok(())
    }

    fn index(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.columns).then(|| row * self.columns + column)
    }
}

impl Default for LevelGrid {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            tiles: Vec::new(),
        }
    }
}

impl TryFrom<LevelRows> for LevelGrid {
    type Error = LevelError;

    fn try_from(value: LevelRows) -> Result<Self, Self::Error> {
        LevelGrid::from_rows(value.level)
    }
}

impl From<LevelGrid> for LevelRows {
    fn from(grid: LevelGrid) -> Self {
        LevelRows {
            level: grid.to_rows(),
        }
    }
}

fn dimension(value: i64) -> Result<usize, LevelError> {
    usize::try_from(value).map_err(|_| LevelError::InvalidDimension(value))
}

fn cell_count(rows: usize, columns: usize) -> Result<usize, LevelError> {
    rows.checked_mul(columns)
        .filter(|cells| *cells <= MAX_LEVEL_CELLS)
        .ok_or(LevelError::TooLarge {
            rows,
            columns,
            limit: MAX_LEVEL_CELLS,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_of(rows: Vec<Vec<TileIndex>>) -> LevelGrid {
        LevelGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_create_is_empty() {
        let grid = LevelGrid::create(2, 3).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.to_rows(), vec![vec![0, 0, 0], vec![0, 0, 0]]);
        assert_eq!(grid.placed_tiles().count(), 0);
    }

    #[test]
    fn test_create_rejects_negative_dimensions() {
        assert!(matches!(
            LevelGrid::create(-1, 3),
            Err(LevelError::InvalidDimension(-1))
        ));
        assert!(matches!(
            LevelGrid::create(3, -2),
            Err(LevelError::InvalidDimension(-2))
        ));
    }

    #[test]
    fn test_create_zero_sized() {
        let grid = LevelGrid::create(0, 0).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.iter_rows().count(), 0);
    }

    #[test]
    fn test_set_tile() {
        let mut grid = LevelGrid::create(2, 3).unwrap();
        grid.set_tile(1, 2, 5).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![0, 0, 0], vec![0, 0, 5]]);
        assert_eq!(grid.tile(1, 2), Some(5));
        assert_eq!(grid.placed_tiles().collect::<Vec<_>>(), vec![(1, 2, 5)]);
    }

    #[test]
    fn test_bounds_checking() {
        let mut grid = LevelGrid::new(2, 3).unwrap();

        assert!(matches!(
            grid.set_tile(2, 0, 1),
            Err(LevelError::OutOfBounds { row: 2, column: 0, .. })
        ));
        assert!(matches!(
            grid.set_tile(0, 3, 1),
            Err(LevelError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.clear_tile(2, 3),
            Err(LevelError::OutOfBounds { .. })
        ));

        grid.set_tile(1, 2, 7).unwrap();
        assert_eq!(grid.tile(1, 2), Some(7));
        grid.clear_tile(1, 2).unwrap();
        assert_eq!(grid.tile(1, 2), Some(EMPTY_TILE));
        assert_eq!(grid.tile(2, 2), None);
    }

    #[test]
    fn test_from_rows_rejects_jagged() {
        let err = LevelGrid::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(
            err,
            LevelError::JaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_resize_same_size_is_identity() {
        let mut grid = grid_of(vec![vec![1, 0, 2], vec![0, 3, 0], vec![4, 5, 6]]);
        let before = grid.clone();
        grid.resize(3, 3).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_resize_grow_pushes_content_down() {
        let mut grid = grid_of(vec![vec![5]]);
        grid.resize(2, 2).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![0, 0], vec![5, 0]]);
    }

    #[test]
    fn test_resize_shrink_drops_top_rows() {
        let mut grid = grid_of(vec![vec![1, 1], vec![2, 2], vec![3, 3]]);
        grid.resize(1, 2).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![3, 3]]);
    }

    #[test]
    fn test_resize_shrink_then_grow_loses_rows() {
        let mut grid = grid_of(vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        grid.resize(1, 2).unwrap();
        grid.resize(3, 2).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![0, 0], vec![0, 0], vec![5, 6]]);
    }

    #[test]
    fn test_resize_column_truncation_keeps_prefix() {
        let original = grid_of(vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]);
        let mut grid = original.clone();
        grid.resize(2, 2).unwrap();
        for (row, orig) in grid.iter_rows().zip(original.iter_rows()) {
            assert_eq!(row, &orig[..2]);
        }
    }

    #[test]
    fn test_resize_column_growth_appends_empty() {
        let mut grid = grid_of(vec![vec![1], vec![2]]);
        grid.resize(2, 3).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![1, 0, 0], vec![2, 0, 0]]);
    }

    #[test]
    fn test_resize_to_zero() {
        let mut grid = grid_of(vec![vec![1, 2], vec![3, 4]]);
        grid.resize(0, 2).unwrap();
        assert_eq!(grid.rows(), 0);
        assert!(grid.is_empty());

        let mut grid = grid_of(vec![vec![1, 2], vec![3, 4]]);
        grid.resize(2, 0).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_resize_negative_leaves_grid_untouched() {
        let mut grid = grid_of(vec![vec![9]]);
        assert!(matches!(
            grid.resize(-3, 1),
            Err(LevelError::InvalidDimension(-3))
        ));
        assert_eq!(grid.to_rows(), vec![vec![9]]);
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        assert!(matches!(
            LevelGrid::create(1 << 40, 1 << 40),
            Err(LevelError::TooLarge { .. })
        ));
        assert!(matches!(
            LevelGrid::new(usize::MAX, 2),
            Err(LevelError::TooLarge { .. })
        ));
        assert!(matches!(
            LevelGrid::new(MAX_LEVEL_CELLS, 2),
            Err(LevelError::TooLarge { .. })
        ));
        let edge = LevelGrid::new(MAX_LEVEL_CELLS, 0).unwrap();
        assert!(edge.is_empty());
    }

    #[test]
    fn test_resize_oversized_leaves_grid_untouched() {
        let mut grid = grid_of(vec![vec![1, 2], vec![3, 4]]);
        let before = grid.clone();

        assert!(matches!(
            grid.resize(i64::MAX, 2),
            Err(LevelError::TooLarge { columns: 2, .. })
        ));
        assert!(matches!(
            grid.resize(1 << 32, 1 << 32),
            Err(LevelError::TooLarge { .. })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_json_blob_shape() {
        let grid = grid_of(vec![vec![0, 1], vec![2, 0]]);
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json, serde_json::json!({ "level": [[0, 1], [2, 0]] }));

        let back: LevelGrid = serde_json::from_value(json).unwrap();
        assert_eq!(back, grid);

        let jagged = serde_json::json!({ "level": [[0, 1], [2]] });
        assert!(serde_json::from_value::<LevelGrid>(jagged).is_err());
    }
}

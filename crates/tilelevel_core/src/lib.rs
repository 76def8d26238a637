//! Core data structures for tilelevel
//!
//! This crate provides the level model behind the tile-map editor:
//! - `LevelGrid` - A single-layer grid of tile indices with top-anchored resize
//! - `TileSetDescriptor` - Metadata for a tile sheet cut into square tiles
//! - `format` - The text-based `.lvl` level file format

mod error;
pub mod format;
mod grid;
mod tileset;

pub use error::LevelError;
pub use format::{
    deserialize, read_level_file, serialize, write_level_file, LevelFile, LEVEL_FILE_EXTENSION,
};
pub use grid::{LevelGrid, TileIndex, EMPTY_TILE, MAX_LEVEL_CELLS};
pub use tileset::TileSetDescriptor;

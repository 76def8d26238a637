//! Tile-map level editing for tilelevel
//!
//! This crate wires the level model from `tilelevel_core` to the pieces an
//! editor front-end needs:
//! - `EditorSession` - The level, tile set and selected tile being edited
//! - `ImageSlicer` / `TileSheetSlicer` - Cutting a tile sheet into tiles
//! - `KeyValueStore` - Persisting session state between runs
//! - `EditorPreferences` - User settings stored as TOML
//!
//! # Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use tilelevel_editor::{load_preferences, save_preferences, EditorSession, TileSheetSlicer};
//!
//! let mut prefs = load_preferences();
//! let slicer = TileSheetSlicer::new(prefs.resolved_tile_cache_dir());
//!
//! let mut session = EditorSession::open(&slicer, &mut prefs)?;
//! session.import_tile_sheet(&slicer, Path::new("tiles.png"))?;
//! session.select_tile(1)?;
//! session.paint(9, 0)?;
//! session.export_level(Path::new("level.lvl"), &mut prefs)?;
//! session.save_state(&prefs)?;
//! save_preferences(&prefs)?;
//! ```

pub mod preferences;
pub mod session;
pub mod slicer;
pub mod store;

pub use preferences::{
    load_preferences, load_preferences_from, save_preferences, save_preferences_to,
    EditorPreferences, PreferencesError, RecentLevel,
};
pub use session::{EditorSession, PaintOutcome};
pub use slicer::{ImageSlicer, SliceError, TileSheetSlicer, SUPPORTED_IMAGE_EXTENSIONS};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};

use thiserror::Error;
use tilelevel_core::{LevelError, TileIndex};

/// Errors that can occur during an editing session
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Slice(#[from] SliceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no tile set is loaded")]
    NoTileSet,
    #[error("tile {tile} is not in the current tile set ({count} tiles)")]
    UnknownTile { tile: TileIndex, count: u32 },
}

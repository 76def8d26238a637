//! The editing session
//!
//! An [`EditorSession`] owns the level being painted, the tile set it is
//! painted with and the selected tile. Persistence is explicit: call
//! [`EditorSession::persist`] and [`EditorSession::restore`] at session
//! boundaries, or [`EditorSession::open`] and [`EditorSession::save_state`] to
//! use the store directory from preferences. Level file import/export lives in
//! `file`.

mod file;

use std::path::{Path, PathBuf};

use tilelevel_core::{LevelGrid, TileIndex, TileSetDescriptor, EMPTY_TILE};
use tracing::{debug, info, warn};

use crate::preferences::{EditorPreferences, DEFAULT_LEVEL_COLUMNS, DEFAULT_LEVEL_ROWS};
use crate::slicer::ImageSlicer;
use crate::store::{KeyValueStore, LEVEL_KEY, SELECTED_TILE_KEY, TILE_SET_KEY};
use crate::EditorError;

/// What a paint click did to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    Placed(TileIndex),
    Cleared,
}

/// State of one level being edited
#[derive(Debug, Clone)]
pub struct EditorSession {
    tile_set: Option<TileSetDescriptor>,
    level: LevelGrid,
    selected_tile: TileIndex,
    level_path: Option<PathBuf>,
    default_rows: usize,
    default_columns: usize,
    dirty: bool,
}

impl EditorSession {
    /// Start a session with an empty level of the configured default size.
    ///
    /// A configured size too large for a level falls back to 10x10.
    pub fn new(preferences: &EditorPreferences) -> Self {
        let level = LevelGrid::new(preferences.default_rows, preferences.default_columns)
            .unwrap_or_else(|e| {
                warn!("Ignoring default level size from preferences: {}", e);
                LevelGrid::new(DEFAULT_LEVEL_ROWS, DEFAULT_LEVEL_COLUMNS).unwrap_or_default()
            });

        Self {
            tile_set: None,
            default_rows: level.rows(),
            default_columns: level.columns(),
            level,
            selected_tile: EMPTY_TILE,
            level_path: None,
            dirty: false,
        }
    }

    pub fn level(&self) -> &LevelGrid {
        &self.level
    }

    pub fn tile_set(&self) -> Option<&TileSetDescriptor> {
        self.tile_set.as_ref()
    }

    pub fn selected_tile(&self) -> TileIndex {
        self.selected_tile
    }

    /// File the level was last imported from or exported to
    pub fn level_path(&self) -> Option<&Path> {
        self.level_path.as_deref()
    }

    /// Check if the level has changes that were not exported
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Slice a tile sheet and start a fresh default-sized level with it
    pub fn import_tile_sheet<S: ImageSlicer + ?Sized>(
        &mut self,
        slicer: &S,
        image_path: &Path,
    ) -> Result<&TileSetDescriptor, EditorError> {
        let tile_set = slicer.slice(image_path)?;
        info!(
            "Imported tile sheet {:?}: {} tiles ({})",
            image_path,
            tile_set.tile_count,
            tile_set.resolution_label()
        );

        self.level = LevelGrid::new(self.default_rows, self.default_columns)?;
        self.level_path = None;
        self.selected_tile = EMPTY_TILE;
        self.dirty = false;
        Ok(&*self.tile_set.insert(tile_set))
    }

    /// Replace the level with an empty one
    pub fn new_level(&mut self, rows: i64, columns: i64) -> Result<(), EditorError> {
        self.level = LevelGrid::create(rows, columns)?;
        self.level_path = None;
        self.dirty = true;
        Ok(())
    }

    /// Choose the tile that [`paint`](Self::paint) places
    pub fn select_tile(&mut self, tile: TileIndex) -> Result<(), EditorError> {
        let tile_set = self.tile_set.as_ref().ok_or(EditorError::NoTileSet)?;
        if !tile_set.contains(tile) {
            return Err(EditorError::UnknownTile {
                tile,
                count: tile_set.tile_count,
            });
        }
        self.selected_tile = tile;
        Ok(())
    }

    /// Paint the selected tile into a cell.
    ///
    /// Painting over the same tile removes it. Tile `0` doubles as the empty
    /// marker, so painting with it always clears.
    pub fn paint(&mut self, row: usize, column: usize) -> Result<PaintOutcome, EditorError> {
        if self.tile_set.is_none() {
            return Err(EditorError::NoTileSet);
        }

        let current = self.level.tile(row, column);
        let outcome = if current == Some(self.selected_tile) || self.selected_tile == EMPTY_TILE {
            self.level.clear_tile(row, column)?;
            PaintOutcome::Cleared
        } else {
            self.level.set_tile(row, column, self.selected_tile)?;
            PaintOutcome::Placed(self.selected_tile)
        };

        debug!("Paint ({}, {}): {:?}", row, column, outcome);
        self.dirty = true;
        Ok(outcome)
    }

    /// Remove whatever tile is in a cell
    pub fn erase(&mut self, row: usize, column: usize) -> Result<(), EditorError> {
        self.level.clear_tile(row, column)?;
        self.dirty = true;
        Ok(())
    }

    /// Change the level size, keeping bottom-left content (see [`LevelGrid::resize`])
    pub fn resize_level(&mut self, rows: i64, columns: i64) -> Result<(), EditorError> {
        self.level.resize(rows, columns)?;
        info!("Resized level to {}x{}", rows, columns);
        self.dirty = true;
        Ok(())
    }

    /// Image of the tile painted in a cell, `None` if empty or unknown
    pub fn tile_path_at(&self, row: usize, column: usize) -> Option<&str> {
        let tile = self.level.tile(row, column)?;
        if tile == EMPTY_TILE {
            return None;
        }
        self.tile_set.as_ref()?.tile_path(tile)
    }

    /// Save level, tile set and selection to a store
    pub fn persist<K: KeyValueStore>(&self, store: &mut K) -> Result<(), EditorError> {
        store.save_object(LEVEL_KEY, &self.level)?;
        match &self.tile_set {
            Some(tile_set) => store.save_object(TILE_SET_KEY, tile_set)?,
            None => store.delete(TILE_SET_KEY)?,
        }
        store.save_object(SELECTED_TILE_KEY, &self.selected_tile)?;
        debug!("Persisted session state");
        Ok(())
    }

    /// Rebuild a session from a store, using defaults for missing keys
    pub fn restore<K: KeyValueStore>(
        store: &K,
        preferences: &EditorPreferences,
    ) -> Result<Self, EditorError> {
        let mut session = Self::new(preferences);
        if let Some(level) = store.get_object::<LevelGrid>(LEVEL_KEY)? {
            session.level = level;
        }
        session.tile_set = store.get_object(TILE_SET_KEY)?;
        if let Some(tile) = store.get_object::<TileIndex>(SELECTED_TILE_KEY)? {
            // A stale selection from another tile set falls back to tile 0.
            if session.tile_set.as_ref().is_some_and(|ts| ts.contains(tile)) {
                session.selected_tile = tile;
            }
        }
        info!(
            "Restored session: {}x{} level, tile set {}",
            session.level.rows(),
            session.level.columns(),
            if session.tile_set.is_some() {
                "loaded"
            } else {
                "missing"
            }
        );
        Ok(session)
    }
}

//! Level file import/export and startup for the editing session

use std::path::{Path, PathBuf};

use tilelevel_core::{format, EMPTY_TILE};
use tracing::{info, warn};

use super::EditorSession;
use crate::preferences::EditorPreferences;
use crate::slicer::ImageSlicer;
use crate::store::JsonFileStore;
use crate::EditorError;

impl EditorSession {
    /// Start the editor from the state saved in the preferences' store
    /// directory, then reopen the most recent level if
    /// `auto_open_last_level` is set.
    ///
    /// A recent level that no longer exists is dropped from the recent list.
    /// One that fails to load is logged and skipped.
    pub fn open<S: ImageSlicer + ?Sized>(
        slicer: &S,
        preferences: &mut EditorPreferences,
    ) -> Result<Self, EditorError> {
        let store = JsonFileStore::new(preferences.resolved_store_dir());
        let mut session = Self::restore(&store, preferences)?;

        if !preferences.auto_open_last_level {
            return Ok(session);
        }

        if let Some(recent) = preferences.last_level().cloned() {
            let path = PathBuf::from(&recent.path);
            if path.exists() {
                match session.import_level(slicer, &path, preferences) {
                    Ok(()) => info!("Auto-opened last level: {}", recent.path),
                    Err(e) => warn!("Failed to auto-open level '{}': {}", recent.path, e),
                }
            } else {
                warn!("Last level file not found: {}", recent.path);
                preferences.remove_recent_level(&recent.path);
            }
        }
        Ok(session)
    }

    /// Persist to the preferences' store directory
    pub fn save_state(&self, preferences: &EditorPreferences) -> Result<(), EditorError> {
        let mut store = JsonFileStore::new(preferences.resolved_store_dir());
        self.persist(&mut store)
    }

    /// Load a `.lvl` file and re-slice the tile sheet it references.
    /// The file becomes the most recent level.
    pub fn import_level<S: ImageSlicer + ?Sized>(
        &mut self,
        slicer: &S,
        level_path: &Path,
        preferences: &mut EditorPreferences,
    ) -> Result<(), EditorError> {
        let file = format::read_level_file(level_path)?;
        let tile_set = slicer.slice(Path::new(&file.image_path))?;

        info!(
            "Imported level {:?}: {}x{} using {}",
            level_path,
            file.grid.rows(),
            file.grid.columns(),
            file.image_path
        );

        self.level = file.grid;
        self.tile_set = Some(tile_set);
        self.selected_tile = EMPTY_TILE;
        self.level_path = Some(level_path.to_path_buf());
        self.dirty = false;
        preferences.add_recent_level(level_path);
        Ok(())
    }

    /// The level encoded in the `.lvl` format
    pub fn level_text(&self) -> Result<String, EditorError> {
        let tile_set = self.tile_set.as_ref().ok_or(EditorError::NoTileSet)?;
        Ok(format::serialize(&self.level, tile_set))
    }

    /// Write the level to a `.lvl` file and make it the most recent level
    pub fn export_level(
        &mut self,
        path: &Path,
        preferences: &mut EditorPreferences,
    ) -> Result<(), EditorError> {
        let tile_set = self.tile_set.as_ref().ok_or(EditorError::NoTileSet)?;
        format::write_level_file(path, &self.level, tile_set)?;
        info!("Exported level to {:?}", path);

        self.level_path = Some(path.to_path_buf());
        self.dirty = false;
        preferences.add_recent_level(path);
        Ok(())
    }
}

//! Editor preferences and persistent settings
//!
//! Manages user preferences stored in platform-specific config directories:
//! - Windows: %APPDATA%/tilelevel/tilelevel/config/
//! - Linux: ~/.config/tilelevel/
//! - macOS: ~/Library/Application Support/dev.tilelevel.tilelevel/

mod file;

pub use file::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum number of recent level files to track
pub const MAX_RECENT_LEVELS: usize = 10;

/// Size of the level created after importing a tile sheet
pub const DEFAULT_LEVEL_ROWS: usize = 10;
pub const DEFAULT_LEVEL_COLUMNS: usize = 10;

/// Editor preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Version for future migrations
    pub version: u32,

    // New level size
    pub default_rows: usize,
    pub default_columns: usize,

    /// Where sliced tile images are written. `None` uses the platform cache dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_cache_dir: Option<PathBuf>,
    /// Where session state is kept. `None` uses the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,

    // Startup behavior
    pub auto_open_last_level: bool,

    // Recent level files
    pub recent_levels: Vec<RecentLevel>,
}

/// A recent level file entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentLevel {
    pub path: String,
    pub last_opened: u64, // Unix timestamp
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            version: 1,
            default_rows: DEFAULT_LEVEL_ROWS,
            default_columns: DEFAULT_LEVEL_COLUMNS,
            tile_cache_dir: None,
            store_dir: None,
            auto_open_last_level: false,
            recent_levels: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Add a level file to the recent list
    pub fn add_recent_level(&mut self, path: &Path) {
        use std::time::{SystemTime, UNIX_EPOCH};

        let path_str = path.to_string_lossy().to_string();

        // Remove if already exists (will re-add at front)
        self.recent_levels.retain(|l| l.path != path_str);

        self.recent_levels.insert(
            0,
            RecentLevel {
                path: path_str,
                last_opened: SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0),
            },
        );

        self.recent_levels.truncate(MAX_RECENT_LEVELS);
    }

    /// Remove a level from the recent list (e.g., if the file no longer exists)
    pub fn remove_recent_level(&mut self, path: &str) {
        self.recent_levels.retain(|l| l.path != path);
    }

    /// Get the most recently opened level
    pub fn last_level(&self) -> Option<&RecentLevel> {
        self.recent_levels.first()
    }

    /// Directory for sliced tile images
    pub fn resolved_tile_cache_dir(&self) -> PathBuf {
        self.tile_cache_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.cache_dir().join("tiles"))
                .unwrap_or_else(|| PathBuf::from("temp"))
        })
    }

    /// Directory for the persisted session state
    pub fn resolved_store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("store"))
                .unwrap_or_else(|| PathBuf::from("store"))
        })
    }
}

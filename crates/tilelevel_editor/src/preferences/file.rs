//! Loading and saving preferences as TOML

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::EditorPreferences;

const PREFERENCES_FILE: &str = "preferences.toml";

/// Errors that can occur when reading or writing preferences
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// Platform directories for the editor
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "tilelevel", "tilelevel")
}

/// Default location of the preferences file
pub fn preferences_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(PREFERENCES_FILE))
}

/// Load preferences from the default location, falling back to defaults
pub fn load_preferences() -> EditorPreferences {
    let Some(path) = preferences_path() else {
        warn!("No config directory found, using default preferences");
        return EditorPreferences::default();
    };

    if !path.exists() {
        return EditorPreferences::default();
    }

    match load_preferences_from(&path) {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!("Failed to load preferences from {:?}: {}", path, e);
            EditorPreferences::default()
        }
    }
}

/// Load preferences from a specific file
pub fn load_preferences_from(path: &Path) -> Result<EditorPreferences, PreferencesError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Save preferences to the default location
pub fn save_preferences(prefs: &EditorPreferences) -> Result<(), PreferencesError> {
    let path = preferences_path().ok_or(PreferencesError::NoConfigDir)?;
    save_preferences_to(&path, prefs)
}

/// Save preferences to a specific file, creating its directory
pub fn save_preferences_to(path: &Path, prefs: &EditorPreferences) -> Result<(), PreferencesError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(prefs)?)?;
    info!("Saved preferences to {:?}", path);
    Ok(())
}

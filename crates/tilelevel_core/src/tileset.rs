//! Tile set metadata produced by slicing a tile sheet

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{LevelError, TileIndex};

/// Describes a tile sheet that has been cut into square tiles
///
/// Tiles are laid out left to right in a single strip, so the tile side is the
/// image height and the tile count is `image_width / image_height`. Cell values
/// in a [`LevelGrid`](crate::LevelGrid) index into `tile_paths`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TileSetRecord")]
pub struct TileSetDescriptor {
    /// Path of the tile sheet the tiles were cut from
    pub source_image_path: String,
    pub image_width: u32,
    pub image_height: u32,
    /// Side length of each (square) tile in pixels
    pub tile_resolution: u32,
    pub tile_count: u32,
    /// One image per tile, in tile index order
    pub tile_paths: Vec<String>,
}

/// Stored form, checked against the sheet size before it becomes a descriptor
#[derive(Deserialize)]
struct TileSetRecord {
    source_image_path: String,
    image_width: u32,
    image_height: u32,
    tile_resolution: u32,
    tile_count: u32,
    tile_paths: Vec<String>,
}

impl TileSetDescriptor {
    /// Create a descriptor, deriving resolution and count from the sheet size
    pub fn new(
        source_image_path: impl Into<String>,
        image_width: u32,
        image_height: u32,
        tile_paths: Vec<String>,
    ) -> Result<Self, LevelError> {
        let tile_count = Self::tile_count_for(image_width, image_height)?;
        if tile_paths.len() != tile_count as usize {
            return Err(LevelError::InvalidTileSet(format!(
                "expected {} tile paths for a {}x{} sheet, got {}",
                tile_count,
                image_width,
                image_height,
                tile_paths.len()
            )));
        }

        Ok(Self {
            source_image_path: source_image_path.into(),
            image_width,
            image_height,
            tile_resolution: image_height,
            tile_count,
            tile_paths,
        })
    }

    /// Number of whole square tiles in a sheet of the given size
    pub fn tile_count_for(image_width: u32, image_height: u32) -> Result<u32, LevelError> {
        if image_height == 0 {
            return Err(LevelError::InvalidTileSet(
                "tile sheet height must be greater than zero".to_string(),
            ));
        }
        Ok(image_width / image_height)
    }

    /// Check if a tile index refers to a tile in this set
    pub fn contains(&self, tile: TileIndex) -> bool {
        (tile as usize) < self.tile_paths.len()
    }

    /// Image path of a tile
    pub fn tile_path(&self, tile: TileIndex) -> Option<&str> {
        self.tile_paths.get(tile as usize).map(String::as_str)
    }

    /// Find the index of a tile from its image path
    pub fn index_of_path(&self, path: impl AsRef<Path>) -> Option<TileIndex> {
        let path = path.as_ref();
        self.tile_paths
            .iter()
            .position(|p| Path::new(p) == path)
            .map(|i| i as TileIndex)
    }

    /// Human-readable tile size, e.g. `"16x16"`
    pub fn resolution_label(&self) -> String {
        format!("{0}x{0}", self.tile_resolution)
    }
}

impl TryFrom<TileSetRecord> for TileSetDescriptor {
    type Error = LevelError;

    fn try_from(record: TileSetRecord) -> Result<Self, Self::Error> {
        let descriptor = TileSetDescriptor::new(
            record.source_image_path,
            record.image_width,
            record.image_height,
            record.tile_paths,
        )?;
        if descriptor.tile_count != record.tile_count
            || descriptor.tile_resolution != record.tile_resolution
        {
            return Err(LevelError::InvalidTileSet(format!(
                "stored {} tiles of {} px do not match a {}x{} sheet",
                record.tile_count, record.tile_resolution, record.image_width, record.image_height
            )));
        }
        Ok(descriptor)
    }
}

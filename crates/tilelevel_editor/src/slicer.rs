//! Cutting a tile sheet image into individual tile images

use std::path::{Path, PathBuf};

use thiserror::Error;
use tilelevel_core::{LevelError, TileSetDescriptor};
use tracing::{debug, info};

/// Image file extensions accepted as tile sheets
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpeg", "jpg", "gif", "bmp"];

/// Errors that can occur while slicing a tile sheet
#[derive(Debug, Error)]
pub enum SliceError {
    /// The sheet could not be opened or decoded
    #[error("failed to decode image '{}': {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The sheet has zero width or height
    #[error("image '{}' has no pixels", .0.display())]
    EmptyImage(PathBuf),
    /// A cropped tile could not be written
    #[error("failed to write tile '{}': {source}", .path.display())]
    TileWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    TileSet(#[from] LevelError),
}

/// Turns a tile sheet into a [`TileSetDescriptor`]
pub trait ImageSlicer {
    /// Slice the image at `image_path`. Blocks until every tile is written.
    fn slice(&self, image_path: &Path) -> Result<TileSetDescriptor, SliceError>;
}

/// Slices a horizontal strip of square tiles using the `image` crate
///
/// Tile `i` is the square at `x = i * height` and is written to
/// `<output_dir>/<i>.<ext>`, keeping the sheet's extension. Files from a
/// previous sheet with the same names are overwritten.
#[derive(Debug, Clone)]
pub struct TileSheetSlicer {
    output_dir: PathBuf,
}

impl TileSheetSlicer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory the tile images are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Check if a path has a supported tile sheet extension
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                SUPPORTED_IMAGE_EXTENSIONS
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(e))
            })
    }

    fn tile_extension(image_path: &Path) -> String {
        if Self::is_supported(image_path) {
            image_path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_else(|| "png".to_string())
        } else {
            "png".to_string()
        }
    }
}

impl ImageSlicer for TileSheetSlicer {
    fn slice(&self, image_path: &Path) -> Result<TileSetDescriptor, SliceError> {
        let sheet = image::open(image_path).map_err(|source| SliceError::ImageDecode {
            path: image_path.to_path_buf(),
            source,
        })?;

        let (width, height) = (sheet.width(), sheet.height());
        if width == 0 || height == 0 {
            return Err(SliceError::EmptyImage(image_path.to_path_buf()));
        }

        let tile_resolution = height;
        let tile_count = TileSetDescriptor::tile_count_for(width, height)?;
        let extension = Self::tile_extension(image_path);

        std::fs::create_dir_all(&self.output_dir)?;

        let mut tile_paths = Vec::with_capacity(tile_count as usize);
        for i in 0..tile_count {
            let tile = sheet.crop_imm(i * tile_resolution, 0, tile_resolution, tile_resolution);
            let path = self.output_dir.join(format!("{}.{}", i, extension));
            tile.save(&path).map_err(|source| SliceError::TileWrite {
                path: path.clone(),
                source,
            })?;
            debug!("Wrote tile {} to {:?}", i, path);
            tile_paths.push(path.to_string_lossy().into_owned());
        }

        info!(
            "Sliced {:?} ({}x{}) into {} tiles of {}x{}",
            image_path, width, height, tile_count, tile_resolution, tile_resolution
        );

        Ok(TileSetDescriptor::new(
            image_path.to_string_lossy(),
            width,
            height,
            tile_paths,
        )?)
    }
}

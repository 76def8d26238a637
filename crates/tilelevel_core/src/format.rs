//! The `.lvl` level file format
//!
//! A level file is plain text. Each grid row is written as its tile indices
//! separated by spaces, with a space after the last index and a CRLF line end:
//!
//! ```text
//! 0 0 0 \r\n
//! 0 0 5 \r\n
//! { "image_path": "C:\\tiles\\sheet.png" }
//! ```
//!
//! The final line is a JSON object naming the tile sheet the level was painted
//! with. Readers split on `\n` and drop the last space-separated token of every
//! row line, so the trailing space is part of the format.

use serde::Deserialize;
use std::path::Path;

use crate::{LevelError, LevelGrid, TileIndex, TileSetDescriptor, EMPTY_TILE};

/// File extension used for level files
pub const LEVEL_FILE_EXTENSION: &str = "lvl";

const LINE_TERMINATOR: &str = "\r\n";

/// A parsed level file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFile {
    pub grid: LevelGrid,
    /// Tile sheet referenced by the level, unescaped
    pub image_path: String,
}

#[derive(Deserialize)]
struct LevelMeta {
    image_path: String,
}

/// Encode a level and the tile sheet it uses
pub fn serialize(grid: &LevelGrid, tile_set: &TileSetDescriptor) -> String {
    serialize_with_image_path(grid, &tile_set.source_image_path)
}

/// Encode a level against a bare tile sheet path
pub fn serialize_with_image_path(grid: &LevelGrid, image_path: &str) -> String {
    let mut out = String::new();
    for row in grid.iter_rows() {
        for tile in row {
            out.push_str(&tile.to_string());
            out.push(' ');
        }
        out.push_str(LINE_TERMINATOR);
    }
    out.push_str("{ \"image_path\": ");
    out.push_str(&quote_path(image_path));
    out.push_str(" }");
    out
}

/// Decode a level file
pub fn deserialize(text: &str) -> Result<LevelFile, LevelError> {
    // Tolerate a single line break after the JSON line.
    let text = match text.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => text,
    };

    let (body, meta_line) = match text.rsplit_once('\n') {
        Some((body, last)) => (Some(body), last),
        None => (None, text),
    };
    let row_lines: Vec<&str> = body.map(|b| b.split('\n').collect()).unwrap_or_default();
    let meta_line_number = row_lines.len() + 1;

    let meta: LevelMeta = serde_json::from_str(meta_line)
        .map_err(|e| LevelError::malformed(meta_line_number, e.to_string()))?;

    let mut rows: Vec<Vec<TileIndex>> = Vec::with_capacity(row_lines.len());
    for (i, line) in row_lines.iter().enumerate() {
        let row = parse_row(line, i + 1)?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(LevelError::malformed(
                    i + 1,
                    format!("expected {} tiles, found {}", first.len(), row.len()),
                ));
            }
        }
        rows.push(row);
    }

    Ok(LevelFile {
        grid: LevelGrid::from_rows(rows)?,
        image_path: meta.image_path,
    })
}

/// Read and decode a `.lvl` file
pub fn read_level_file(path: impl AsRef<Path>) -> Result<LevelFile, LevelError> {
    let text = std::fs::read_to_string(path)?;
    deserialize(&text)
}

/// Encode a level and write it to disk
pub fn write_level_file(
    path: impl AsRef<Path>,
    grid: &LevelGrid,
    tile_set: &TileSetDescriptor,
) -> Result<(), LevelError> {
    std::fs::write(path, serialize(grid, tile_set))?;
    Ok(())
}

fn parse_row(line: &str, line_number: usize) -> Result<Vec<TileIndex>, LevelError> {
    let mut tokens: Vec<&str> = line.split(' ').collect();
    // Last token is whatever followed the trailing space (usually "\r").
    tokens.pop();

    tokens
        .into_iter()
        .map(|token| {
            // Doubled spaces leave blank tokens, which read as empty cells.
            if token.is_empty() {
                return Ok(EMPTY_TILE);
            }
            token.parse::<TileIndex>().map_err(|e| {
                LevelError::malformed(line_number, format!("invalid tile '{}': {}", token, e))
            })
        })
        .collect()
}

/// JSON string literal for a path, quotes included
fn quote_path(path: &str) -> String {
    serde_json::Value::from(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(path: &str) -> TileSetDescriptor {
        TileSetDescriptor::new(path, 32, 16, vec!["0.png".into(), "1.png".into()]).unwrap()
    }

    #[test]
    fn test_serialize_exact_text() {
        let mut grid = LevelGrid::create(2, 3).unwrap();
        grid.set_tile(1, 2, 5).unwrap();

        let text = serialize(&grid, &descriptor("C:\\img.png"));
        assert_eq!(
            text,
            "0 0 0 \r\n0 0 5 \r\n{ \"image_path\": \"C:\\\\img.png\" }"
        );
    }

    #[test]
    fn test_round_trip() {
        let grid =
            LevelGrid::from_rows(vec![vec![0, 12, 3], vec![7, 0, 0], vec![1, 1, 40]]).unwrap();
        let path = "C:\\Users\\me\\tiles\\sheet.png";

        let file = deserialize(&serialize(&grid, &descriptor(path))).unwrap();
        assert_eq!(file.grid, grid);
        assert_eq!(file.image_path, path);
    }

    #[test]
    fn test_round_trip_quoted_path() {
        let grid = LevelGrid::new(1, 1).unwrap();
        let path = "tiles/\"odd\".png";
        let file = deserialize(&serialize(&grid, &descriptor(path))).unwrap();
        assert_eq!(file.image_path, path);
    }

    #[test]
    fn test_round_trip_control_characters_in_path() {
        let grid = LevelGrid::from_rows(vec![vec![1, 0]]).unwrap();
        let path = "tiles\tab\there\nnew\u{1}line.png";

        let text = serialize(&grid, &descriptor(path));
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("{ \"image_path\": \"tiles\\tab\\there\\nnew\\u0001line.png\" }"));

        let file = deserialize(&text).unwrap();
        assert_eq!(file.grid, grid);
        assert_eq!(file.image_path, path);
    }

    #[test]
    fn test_round_trip_degenerate_shapes() {
        let empty = LevelGrid::new(0, 0).unwrap();
        let file = deserialize(&serialize(&empty, &descriptor("a.png"))).unwrap();
        assert_eq!(file.grid.rows(), 0);
        assert!(file.grid.is_empty());

        let no_columns = LevelGrid::new(2, 0).unwrap();
        let text = serialize(&no_columns, &descriptor("a.png"));
        assert_eq!(text, "\r\n\r\n{ \"image_path\": \"a.png\" }");
        let file = deserialize(&text).unwrap();
        assert_eq!(file.grid.rows(), 2);
        assert_eq!(file.grid.columns(), 0);
    }

    #[test]
    fn test_deserialize_lf_only_and_trailing_newline() {
        let file = deserialize("1 2 \n3 4 \n{ \"image_path\": \"x.png\" }\n").unwrap();
        assert_eq!(file.grid.to_rows(), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(file.image_path, "x.png");
    }

    #[test]
    fn test_deserialize_discards_last_token() {
        // Without the trailing space the last index is lost, as in files
        // written by other tools that skip it.
        let file = deserialize("1 2 3\r\n{ \"image_path\": \"x.png\" }").unwrap();
        assert_eq!(file.grid.to_rows(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_deserialize_blank_tokens_are_empty_tiles() {
        let file = deserialize("1  2 \r\n3 4 5 \r\n{ \"image_path\": \"x\" }").unwrap();
        assert_eq!(file.grid.to_rows(), vec![vec![1, 0, 2], vec![3, 4, 5]]);
        assert_eq!(file.image_path, "x");

        let file = deserialize(" 7 \r\n{ \"image_path\": \"x\" }").unwrap();
        assert_eq!(file.grid.to_rows(), vec![vec![0, 7]]);
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let err = deserialize("0 0 \r\nnot json").unwrap_err();
        assert!(matches!(err, LevelError::MalformedLevelFile { line: 2, .. }));
    }

    #[test]
    fn test_deserialize_missing_image_path() {
        let err = deserialize("0 0 \r\n{ \"path\": \"x.png\" }").unwrap_err();
        assert!(matches!(err, LevelError::MalformedLevelFile { line: 2, .. }));
    }

    #[test]
    fn test_deserialize_bad_tile() {
        let err = deserialize("0 a 0 \r\n{ \"image_path\": \"x.png\" }").unwrap_err();
        assert!(matches!(err, LevelError::MalformedLevelFile { line: 1, .. }));

        let err = deserialize("0 -1 0 \r\n{ \"image_path\": \"x.png\" }").unwrap_err();
        assert!(matches!(err, LevelError::MalformedLevelFile { line: 1, .. }));
    }

    #[test]
    fn test_deserialize_rejects_uneven_rows() {
        let err = deserialize("0 0 0 \r\n0 0 \r\n{ \"image_path\": \"x.png\" }").unwrap_err();
        match err {
            LevelError::MalformedLevelFile { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 3"));
            }
            other => panic!("expected MalformedLevelFile, got {:?}", other),
        }
    }

    #[test]
    fn test_file_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("level.{}", LEVEL_FILE_EXTENSION));

        let mut grid = LevelGrid::new(3, 2).unwrap();
        grid.set_tile(0, 1, 1).unwrap();
        write_level_file(&path, &grid, &descriptor("sheet.png")).unwrap();

        let file = read_level_file(&path).unwrap();
        assert_eq!(file.grid, grid);
        assert_eq!(file.image_path, "sheet.png");

        let missing = read_level_file(dir.path().join("missing.lvl")).unwrap_err();
        assert!(matches!(missing, LevelError::Io(_)));
    }
}

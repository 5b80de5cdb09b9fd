//! Error types for parsing, matching, composing and searching tiles.

use std::path::PathBuf;

use crate::symmetry::Orientation;
use crate::tile::TileId;

/// Every failure the reassembly pipeline can report.
#[derive(thiserror::Error, Debug)]
pub enum JigsawError {
    /// A bitmap row whose width differs from the first row.
    #[error("row {row} is {found} pixels wide, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid pixel {0:?}")]
    InvalidPixel(char),

    /// A row-level error, tagged with the tile it came from.
    #[error("tile {tile}: {source}")]
    InTile {
        tile: TileId,
        #[source]
        source: Box<JigsawError>,
    },

    #[error("malformed tile header {0:?}")]
    BadHeader(String),

    #[error("pixel row {0:?} appears before any tile header")]
    OrphanRow(String),

    #[error("tile {0} has no pixel rows")]
    EmptyTile(TileId),

    /// Tiles must be square and all the same size.
    #[error("tile {tile} is {width}x{height}, expected {expected}x{expected}")]
    TileSize {
        tile: TileId,
        width: usize,
        height: usize,
        expected: usize,
    },

    #[error("tile {tile} is {size} pixels wide, edge signatures hold at most {max}")]
    TileTooLarge { tile: TileId, size: usize, max: usize },

    #[error("tile id {0} appears more than once")]
    DuplicateTile(TileId),

    #[error("input contains no tiles")]
    NoTiles,

    #[error("orientation index {0} is outside 0..8")]
    InvalidOrientation(u8),

    /// No edge of this tile lines up with any tile already placed.
    #[error("tile {0} does not fit against any other tile")]
    UnresolvableAdjacency(TileId),

    #[error("tiles do not form a rectangular grid: {0}")]
    MalformedGrid(String),

    #[error("product of corner tile ids {0:?} does not fit in 64 bits")]
    CornerProductOverflow(Vec<TileId>),

    #[error("pattern matches in more than one orientation: {0:?}")]
    AmbiguousPatternOrientation(Vec<Orientation>),

    #[error("pattern has no set pixels")]
    EmptyPattern,

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not valid UTF-8: {source}", .path.display())]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A self-test answer that disagrees with the known sample result.
    #[error("{part} is {actual}, expected {expected}")]
    SelfTest {
        part: &'static str,
        actual: u64,
        expected: u64,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JigsawError>;

impl JigsawError {
    /// Attaches the id of the tile being parsed to a row-level error.
    pub fn in_tile(self, tile: TileId) -> Self {
        Self::InTile {
            tile,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_tile_prefixes_message() {
        let error = JigsawError::RowWidth {
            row: 3,
            expected: 10,
            found: 9,
        }
        .in_tile(2311);
        assert_eq!(
            error.to_string(),
            "tile 2311: row 3 is 9 pixels wide, expected 10"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_self_test_message() {
        let error = JigsawError::SelfTest {
            part: "roughness",
            actual: 0,
            expected: 273,
        };
        assert_eq!(error.to_string(), "roughness is 0, expected 273");
    }
}

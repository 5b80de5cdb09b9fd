//! Tile definitions, edge signatures and input parsing.
//!
//! A tile keeps only its pixels as parsed. Orientation is never stored on the
//! tile itself; callers pass the orientation they want to look through.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::bitmap::Bitmap;
use crate::error::{JigsawError, Result};
use crate::symmetry::Orientation;

/// Numeric label from a `Tile <id>:` header.
pub type TileId = u64;

/// Longest edge that fits in an [`EdgeSignature`].
pub const MAX_EDGE_LEN: usize = u64::BITS as usize;

/// One side of a tile, in whatever orientation it is being viewed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Side {
    /// All sides, in the order used by [`Tile::edges`].
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Position of this side within an edge array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The side a neighbour touches this one with.
    pub const fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// Pixels along one side, packed into bits.
///
/// Bit `i` holds the `i`-th pixel reading left to right (top and bottom sides)
/// or top to bottom (left and right sides). Two tiles placed next to each
/// other in a common frame read their shared edge in the same direction, so
/// plain equality is the match test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeSignature(u64);

impl EdgeSignature {
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }
}

/// A square block of the original image.
#[derive(Clone, Debug)]
pub struct Tile {
    id: TileId,
    pixels: Bitmap,
}

impl Tile {
    /// Creates a tile with no rows yet.
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            pixels: Bitmap::default(),
        }
    }

    /// Parses a `Tile <id>:` header line into the tile id.
    pub fn parse_header(line: &str) -> Result<TileId> {
        line.trim()
            .strip_prefix("Tile")
            .and_then(|rest| rest.strip_suffix(':'))
            .and_then(|id| id.trim().parse().ok())
            .ok_or_else(|| JigsawError::BadHeader(line.to_string()))
    }

    /// Appends one row of `#`/`.` pixels.
    pub fn parse_row(&mut self, row: &str) -> Result<()> {
        let id = self.id;
        let pixels = row
            .chars()
            .map(|c| match c {
                '#' => Ok(true),
                '.' => Ok(false),
                other => Err(JigsawError::InvalidPixel(other)),
            })
            .collect::<Result<Vec<bool>>>()
            .map_err(|error| error.in_tile(id))?;

        self.pixels
            .push_row(&pixels)
            .map_err(|error| error.in_tile(id))
    }

    #[inline]
    pub const fn id(&self) -> TileId {
        self.id
    }

    /// Pixels as parsed, before any orientation.
    pub const fn pixels(&self) -> &Bitmap {
        &self.pixels
    }

    /// Side length; tiles are square once validated.
    pub const fn size(&self) -> usize {
        self.pixels.width()
    }

    /// Pixels as seen in `orientation`.
    pub fn oriented(&self, orientation: Orientation) -> Bitmap {
        orientation.apply(&self.pixels)
    }

    /// Signature of one side, viewed in `orientation`.
    pub fn edge(&self, orientation: Orientation, side: Side) -> EdgeSignature {
        let (width, height) = orientation.dims(self.pixels.width(), self.pixels.height());
        let len = match side {
            Side::Top | Side::Bottom => width,
            Side::Left | Side::Right => height,
        };

        let mut bits = 0u64;
        for i in 0..len.min(MAX_EDGE_LEN) {
            let (x, y) = match side {
                Side::Top => (i, 0),
                Side::Bottom => (i, height - 1),
                Side::Left => (0, i),
                Side::Right => (width - 1, i),
            };
            if orientation.get(&self.pixels, x, y) {
                bits |= 1 << i;
            }
        }
        EdgeSignature(bits)
    }

    /// All four signatures in `orientation`, indexed by [`Side::index`].
    pub fn edges(&self, orientation: Orientation) -> [EdgeSignature; 4] {
        Side::ALL.map(|side| self.edge(orientation, side))
    }

    /// Checks the tile is non-empty, square and small enough to sign.
    fn validate(&self) -> Result<()> {
        let (width, height) = (self.pixels.width(), self.pixels.height());
        if self.pixels.is_empty() {
            return Err(JigsawError::EmptyTile(self.id));
        }
        if width != height {
            return Err(JigsawError::TileSize {
                tile: self.id,
                width,
                height,
                expected: width,
            });
        }
        if width > MAX_EDGE_LEN {
            return Err(JigsawError::TileTooLarge {
                tile: self.id,
                size: width,
                max: MAX_EDGE_LEN,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tile {}:", self.id)?;
        write!(f, "{}", self.pixels)
    }
}

/// Parses a whole puzzle: `Tile <id>:` headers, each followed by its rows.
///
/// Blank lines between tiles are skipped. Every tile must be square, the same
/// size as the others and carry a unique id.
pub fn parse_tiles(input: &str) -> Result<Vec<Tile>> {
    let mut tiles: Vec<Tile> = Vec::new();

    for line in input.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("Tile") {
            tiles.push(Tile::new(Tile::parse_header(line)?));
            continue;
        }
        let Some(tile) = tiles.last_mut() else {
            return Err(JigsawError::OrphanRow(line.to_string()));
        };
        tile.parse_row(line)?;
    }

    let Some(first) = tiles.first() else {
        return Err(JigsawError::NoTiles);
    };
    first.validate()?;
    let size = first.size();

    let mut seen_ids = FxHashSet::default();
    for tile in &tiles {
        tile.validate()?;
        if tile.size() != size {
            return Err(JigsawError::TileSize {
                tile: tile.id,
                width: tile.pixels.width(),
                height: tile.pixels.height(),
                expected: size,
            });
        }
        if !seen_ids.insert(tile.id) {
            return Err(JigsawError::DuplicateTile(tile.id));
        }
    }

    log::debug!("parsed {} tiles of {size}x{size}", tiles.len());
    Ok(tiles)
}

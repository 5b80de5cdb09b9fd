//! Tile Reassembly Library
//!
//! Rebuilds a square image from shuffled tiles that may be rotated or
//! mirrored, by matching their edges, then scans the result for the sea
//! monster pattern.
//!
//! Pipeline: [`tile::parse_tiles`] -> [`matcher::Layout::assemble`] ->
//! [`composer::compose`] -> [`pattern::search`].

pub mod bitmap;
pub mod composer;
pub mod error;
pub mod input;
pub mod matcher;
pub mod pattern;
pub mod symmetry;
pub mod tile;

use std::fmt;

pub use error::{JigsawError, Result};

use matcher::Layout;
use pattern::Pattern;

/// The two puzzle answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Answers {
    /// Product of the ids of the four corner tiles.
    pub corner_product: u64,
    /// Set pixels of the composed image that are not part of a sea monster.
    pub roughness: usize,
}

impl fmt::Display for Answers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.corner_product)?;
        write!(f, "{}", self.roughness)
    }
}

/// Solves a whole puzzle given as text.
pub fn solve(input: &str) -> Result<Answers> {
    let tiles = tile::parse_tiles(input)?;
    let layout = Layout::assemble(tiles)?;
    let corner_product = layout.corner_product()?;

    let image = composer::compose(&layout)?;
    let monster = Pattern::sea_monster()?;
    let sighting = pattern::search(&image, &monster)?;

    Ok(Answers {
        corner_product,
        roughness: sighting.roughness(&image, &monster),
    })
}

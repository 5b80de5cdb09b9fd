//! Orientation solving and neighbour linking.
//!
//! Two passes:
//! - Breadth-first flood from the first tile, which stays in the identity
//!   orientation. Each unsolved tile is tried in all 8 orientations against the
//!   tile being expanded; the first orientation with a lined-up edge is fixed.
//! - With every orientation fixed, each ordered pair of tiles is compared once
//!   more to record who sits right of and below whom.
//!
//! Tiles live in one arena (`Vec<Tile>`); links are arena indices, so the
//! adjacency table is plain data.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::bitmap::Bitmap;
use crate::error::{JigsawError, Result};
use crate::symmetry::Orientation;
use crate::tile::{EdgeSignature, Side, Tile, TileId};

/// Solved orientation of every tile, keyed by tile id.
pub type OrientationTable = FxHashMap<TileId, Orientation>;

/// Edge signatures of one tile in its solved orientation, by [`Side::index`].
type Edges = [EdgeSignature; 4];

/// Arena indices of a tile's neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Links {
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub up: Option<usize>,
    pub down: Option<usize>,
}

impl Links {
    /// Neighbour across `side`, if any.
    pub const fn get(&self, side: Side) -> Option<usize> {
        match side {
            Side::Top => self.up,
            Side::Right => self.right,
            Side::Bottom => self.down,
            Side::Left => self.left,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<usize> {
        match side {
            Side::Top => &mut self.up,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.down,
            Side::Left => &mut self.left,
        }
    }

    /// Number of sides with a neighbour.
    pub fn count(&self) -> usize {
        Side::ALL
            .iter()
            .filter(|&&side| self.get(side).is_some())
            .count()
    }

    /// Exactly two neighbours: a grid corner.
    pub fn is_corner(&self) -> bool {
        self.count() == 2
    }

    /// Top-left corner of the grid: neighbours right and below only.
    pub const fn is_keystone(&self) -> bool {
        self.left.is_none() && self.up.is_none() && self.right.is_some() && self.down.is_some()
    }
}

/// True when some side of `fixed` lines up with the facing side of `candidate`.
#[inline]
fn fits_beside(fixed: &Edges, candidate: &Edges) -> bool {
    Side::ALL
        .iter()
        .any(|&side| fixed[side.index()] == candidate[side.opposite().index()])
}

/// Fixes an orientation for every tile so that neighbours line up.
///
/// The first tile seeds the search in the identity orientation. Fails with
/// [`JigsawError::UnresolvableAdjacency`] naming the first tile the flood
/// never reaches.
pub fn solve_orientations(tiles: &[Tile]) -> Result<OrientationTable> {
    let Some(seed) = tiles.first() else {
        return Err(JigsawError::NoTiles);
    };

    let mut solved = OrientationTable::default();
    solved.insert(seed.id(), Orientation::IDENTITY);
    let mut queue = VecDeque::from([0usize]);

    while let Some(current) = queue.pop_front() {
        let tile = &tiles[current];
        let orientation = solved[&tile.id()];
        let fixed_edges = tile.edges(orientation);
        log::trace!("expanding tile {} in orientation {orientation}", tile.id());

        for (candidate_index, candidate) in tiles.iter().enumerate() {
            if solved.contains_key(&candidate.id()) {
                continue;
            }

            let fit = Orientation::all().find(|&candidate_orientation| {
                fits_beside(&fixed_edges, &candidate.edges(candidate_orientation))
            });

            if let Some(candidate_orientation) = fit {
                log::debug!(
                    "tile {} fits tile {} in orientation {candidate_orientation}",
                    candidate.id(),
                    tile.id()
                );
                solved.insert(candidate.id(), candidate_orientation);
                queue.push_back(candidate_index);
            }
        }
    }

    if let Some(stray) = tiles.iter().find(|tile| !solved.contains_key(&tile.id())) {
        return Err(JigsawError::UnresolvableAdjacency(stray.id()));
    }

    Ok(solved)
}

/// Records `to` as the neighbour of `from` across `side`, and the reverse.
///
/// A side that already holds a different neighbour means the edges are not
/// unique, so the tiles cannot form a grid.
fn connect(
    links: &mut [Links],
    tiles: &[Tile],
    from: usize,
    side: Side,
    to: usize,
) -> Result<()> {
    for (index, facing, other) in [(from, side, to), (to, side.opposite(), from)] {
        let slot = links[index].slot_mut(facing);
        match *slot {
            Some(existing) if existing != other => {
                return Err(JigsawError::MalformedGrid(format!(
                    "tile {} has two {facing:?} neighbours, {} and {}",
                    tiles[index].id(),
                    tiles[existing].id(),
                    tiles[other].id()
                )));
            }
            _ => *slot = Some(other),
        }
    }
    Ok(())
}

/// Builds the adjacency table for tiles in their solved orientations.
///
/// Links are always symmetric: if `a.right == b` then `b.left == a`.
pub fn link(tiles: &[Tile], orientations: &OrientationTable) -> Result<Vec<Links>> {
    let edges: Vec<Edges> = tiles
        .iter()
        .map(|tile| {
            orientations
                .get(&tile.id())
                .map(|&orientation| tile.edges(orientation))
                .ok_or(JigsawError::UnresolvableAdjacency(tile.id()))
        })
        .collect::<Result<_>>()?;

    let mut links = vec![Links::default(); tiles.len()];

    for (a, a_edges) in edges.iter().enumerate() {
        for (b, b_edges) in edges.iter().enumerate() {
            if a == b {
                continue;
            }
            // the (b, a) visit covers left and up
            for side in [Side::Right, Side::Bottom] {
                if a_edges[side.index()] == b_edges[side.opposite().index()] {
                    log::trace!("tile {} is {side:?} of tile {}", tiles[b].id(), tiles[a].id());
                    connect(&mut links, tiles, a, side, b)?;
                }
            }
        }
    }

    Ok(links)
}

/// A solved puzzle: tiles, their orientations and their neighbours.
pub struct Layout {
    tiles: Vec<Tile>,
    orientations: Vec<Orientation>,
    links: Vec<Links>,
}

impl Layout {
    /// Solves orientations and links for `tiles`.
    pub fn assemble(tiles: Vec<Tile>) -> Result<Self> {
        let table = solve_orientations(&tiles)?;
        let links = link(&tiles, &table)?;
        let orientations = tiles.iter().map(|tile| table[&tile.id()]).collect();

        log::info!("solved orientations for {} tiles", tiles.len());
        Ok(Self {
            tiles,
            orientations,
            links,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.tiles.len()
    }

    pub(crate) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles[index]
    }

    pub fn orientation(&self, index: usize) -> Orientation {
        self.orientations[index]
    }

    pub fn links(&self, index: usize) -> Links {
        self.links[index]
    }

    /// Side length shared by every tile.
    pub fn tile_size(&self) -> usize {
        self.tiles.first().map_or(0, Tile::size)
    }

    /// Pixels of one tile in its solved orientation.
    pub fn oriented(&self, index: usize) -> Bitmap {
        self.tiles[index].oriented(self.orientations[index])
    }

    /// Signature of one tile's side in its solved orientation.
    pub fn edge(&self, index: usize, side: Side) -> EdgeSignature {
        self.tiles[index].edge(self.orientations[index], side)
    }

    /// Arena indices of the corner tiles, in arena order.
    pub fn corners(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&index| self.links[index].is_corner())
            .collect()
    }

    /// Product of the four corner tile ids.
    pub fn corner_product(&self) -> Result<u64> {
        let corners = self.corners();
        if corners.len() != 4 {
            return Err(JigsawError::MalformedGrid(format!(
                "found {} corner tiles, expected 4",
                corners.len()
            )));
        }
        let ids: Vec<TileId> = corners.iter().map(|&index| self.tiles[index].id()).collect();
        log::debug!("corners: {ids:?}");
        let product = ids
            .iter()
            .try_fold(1u64, |product, &id| product.checked_mul(id));
        product.ok_or(JigsawError::CornerProductOverflow(ids))
    }

    /// Arena index of the top-left tile.
    pub fn keystone(&self) -> Result<usize> {
        let mut keystones = (0..self.len()).filter(|&index| self.links[index].is_keystone());
        match (keystones.next(), keystones.next()) {
            (Some(index), None) => Ok(index),
            (None, _) => Err(JigsawError::MalformedGrid(
                "no tile has neighbours only to the right and below".to_string(),
            )),
            (Some(first), Some(second)) => Err(JigsawError::MalformedGrid(format!(
                "tiles {} and {} both look like the top-left corner",
                self.tiles[first].id(),
                self.tiles[second].id()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SAMPLE_INPUT;
    use crate::tile::parse_tiles;

    fn sample_layout() -> Layout {
        Layout::assemble(parse_tiles(SAMPLE_INPUT).unwrap()).unwrap()
    }

    #[test]
    fn test_seed_keeps_identity() {
        let tiles = parse_tiles(SAMPLE_INPUT).unwrap();
        let solved = solve_orientations(&tiles).unwrap();
        assert_eq!(solved.len(), tiles.len());
        assert_eq!(solved[&2311], Orientation::IDENTITY);
    }

    #[test]
    fn test_solving_is_idempotent() {
        let tiles = parse_tiles(SAMPLE_INPUT).unwrap();
        assert_eq!(
            solve_orientations(&tiles).unwrap(),
            solve_orientations(&tiles).unwrap()
        );
    }

    #[test]
    fn test_links_are_symmetric() {
        let layout = sample_layout();
        for index in 0..layout.len() {
            let links = layout.links(index);
            for side in Side::ALL {
                if let Some(other) = links.get(side) {
                    assert_eq!(
                        layout.links(other).get(side.opposite()),
                        Some(index),
                        "link {side:?} of tile {} is one-way",
                        layout.tile(index).id()
                    );
                }
            }
        }
    }

    #[test]
    fn test_linked_edges_line_up() {
        let layout = sample_layout();
        for index in 0..layout.len() {
            for side in Side::ALL {
                if let Some(other) = layout.links(index).get(side) {
                    assert_eq!(layout.edge(index, side), layout.edge(other, side.opposite()));
                }
            }
        }
    }

    #[test]
    fn test_sample_corners_and_keystone() {
        let layout = sample_layout();
        let mut corner_ids: Vec<TileId> = layout
            .corners()
            .iter()
            .map(|&index| layout.tile(index).id())
            .collect();
        corner_ids.sort_unstable();
        assert_eq!(corner_ids, vec![1171, 1951, 2971, 3079]);

        let keystones = (0..layout.len())
            .filter(|&index| layout.links(index).is_keystone())
            .count();
        assert_eq!(keystones, 1);
        assert_eq!(layout.tile(layout.keystone().unwrap()).id(), 2971);
        assert_eq!(layout.corner_product().unwrap(), 20_899_048_083_289);
    }

    #[test]
    fn test_corner_product_overflow_is_an_error() {
        let mut input = SAMPLE_INPUT.to_string();
        for id in [1171, 1951, 2971, 3079] {
            input = input.replace(&format!("Tile {id}:"), &format!("Tile 900000{id}:"));
        }
        let layout = Layout::assemble(parse_tiles(&input).unwrap()).unwrap();
        match layout.corner_product() {
            Err(JigsawError::CornerProductOverflow(mut ids)) => {
                ids.sort_unstable();
                assert_eq!(ids, vec![9_000_001_171, 9_000_001_951, 9_000_002_971, 9_000_003_079]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_side_claimed_twice_is_malformed() {
        let tiles = parse_tiles(SAMPLE_INPUT).unwrap();
        let mut table = solve_orientations(&tiles).unwrap();

        // same top edge as 2311, so 1427 gets two tiles below it
        let twin = SAMPLE_INPUT
            .split("\n\n")
            .next()
            .unwrap()
            .replace("Tile 2311:", "Tile 5555:")
            .replace("..###..###", "..........");
        let tiles = parse_tiles(&format!("{SAMPLE_INPUT}\n\n{twin}")).unwrap();
        table.insert(5555, Orientation::IDENTITY);

        match link(&tiles, &table) {
            Err(JigsawError::MalformedGrid(message)) => assert!(message.contains("5555")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_link_counts_form_three_by_three() {
        let layout = sample_layout();
        let mut counts: Vec<usize> = (0..layout.len())
            .map(|index| layout.links(index).count())
            .collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![2, 2, 2, 2, 3, 3, 3, 3, 4]);
    }

    #[test]
    fn test_stray_tile_is_unresolvable() {
        let mut input = SAMPLE_INPUT.to_string();
        input.push_str("\n\nTile 9999:\n");
        for _ in 0..10 {
            input.push_str("##########\n");
        }
        let tiles = parse_tiles(&input).unwrap();
        assert!(matches!(
            solve_orientations(&tiles),
            Err(JigsawError::UnresolvableAdjacency(9999))
        ));
    }

    #[test]
    fn test_links_keystone_shape() {
        let links = Links {
            left: None,
            right: Some(1),
            up: None,
            down: Some(2),
        };
        assert!(links.is_corner());
        assert!(links.is_keystone());

        let bottom_right = Links {
            left: Some(0),
            up: Some(3),
            ..Links::default()
        };
        assert!(bottom_right.is_corner());
        assert!(!bottom_right.is_keystone());
    }
}

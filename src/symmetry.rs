//! The eight symmetries of a square bitmap.
//!
//! A square has 8 orientations (the dihedral group of order 8): 4 rotations,
//! each optionally mirrored. Every orientation here is described by the
//! primitives it applies to the unrotated pixels, always in the same order:
//! mirror left-right, mirror top-bottom, then a quarter turn clockwise.
//!
//! Index mapping:
//! - 0: mirror both ways (half turn)
//! - 1: mirror left-right, quarter turn
//! - 2: mirror top-bottom, quarter turn
//! - 3: quarter turn
//! - 4: mirror left-right
//! - 5: mirror top-bottom
//! - 6: identity
//! - 7: mirror both ways, quarter turn (three-quarter turn)

use crate::bitmap::Bitmap;
use crate::error::{JigsawError, Result};

/// Number of distinct orientations of a square.
pub const NUM_ORIENTATIONS: usize = 8;

/// Primitives applied by each orientation: (mirror x, mirror y, quarter turn).
const STEPS: [(bool, bool, bool); NUM_ORIENTATIONS] = [
    (true, true, false),
    (true, false, true),
    (false, true, true),
    (false, false, true),
    (true, false, false),
    (false, true, false),
    (false, false, false),
    (true, true, true),
];

/// One of the eight orientations, identified by its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Orientation(u8);

impl Orientation {
    /// Leaves the bitmap as parsed.
    pub const IDENTITY: Self = Self(6);

    pub fn new(index: u8) -> Result<Self> {
        if usize::from(index) < NUM_ORIENTATIONS {
            Ok(Self(index))
        } else {
            Err(JigsawError::InvalidOrientation(index))
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// All orientations in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_ORIENTATIONS as u8).map(Self)
    }

    #[inline]
    const fn steps(self) -> (bool, bool, bool) {
        STEPS[self.0 as usize]
    }

    /// Dimensions of a `width` x `height` bitmap after this orientation.
    ///
    /// A quarter turn swaps the axes.
    #[inline]
    pub const fn dims(self, width: usize, height: usize) -> (usize, usize) {
        if self.steps().2 {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Reads pixel `(x, y)` of `source` as it appears in this orientation,
    /// without building the oriented bitmap.
    #[inline]
    pub fn get(self, source: &Bitmap, x: usize, y: usize) -> bool {
        let (mirror_x, mirror_y, turn) = self.steps();
        let (width, height) = (source.width(), source.height());

        // undo the steps in reverse order
        let (mut source_x, mut source_y) = if turn { (y, height - 1 - x) } else { (x, y) };
        if mirror_y {
            source_y = height - 1 - source_y;
        }
        if mirror_x {
            source_x = width - 1 - source_x;
        }

        source.get(source_x, source_y)
    }

    /// Returns `source` transformed into this orientation.
    pub fn apply(self, source: &Bitmap) -> Bitmap {
        let (width, height) = self.dims(source.width(), source.height());
        Bitmap::from_fn(width, height, |x, y| self.get(source, x, y))
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::from_text;

    fn asymmetric() -> Bitmap {
        from_text("###\n#..\n...")
    }

    #[test]
    fn test_identity_is_unchanged() {
        let bitmap = asymmetric();
        assert_eq!(Orientation::IDENTITY.apply(&bitmap), bitmap);
        assert_eq!(Orientation::new(6).unwrap(), Orientation::IDENTITY);
    }

    #[test]
    fn test_orientations_are_distinct() {
        let bitmap = asymmetric();
        let mut oriented: Vec<Bitmap> = Orientation::all().map(|o| o.apply(&bitmap)).collect();
        assert_eq!(oriented.len(), NUM_ORIENTATIONS);
        oriented.sort_by_key(|b| b.to_string());
        oriented.dedup();
        assert_eq!(oriented.len(), NUM_ORIENTATIONS, "two orientations coincide");
    }

    #[test]
    fn test_orientations_preserve_pixel_count() {
        let bitmap = from_text("#.#.\n##..\n...#\n.#..");
        for orientation in Orientation::all() {
            assert_eq!(
                orientation.apply(&bitmap).count_set(),
                bitmap.count_set(),
                "orientation {orientation} changed the pixel count"
            );
        }
    }

    #[test]
    fn test_quarter_turn_is_clockwise_and_swaps_axes() {
        let bitmap = from_text("##.\n#..");
        let turned = Orientation::new(3).unwrap().apply(&bitmap);
        assert_eq!((turned.width(), turned.height()), (2, 3));
        assert_eq!(turned.to_string(), "##\n.#\n..\n");
    }

    #[test]
    fn test_index_table_on_rectangle() {
        let bitmap = from_text("##.\n#..");
        let expected = [
            "..#\n.##\n",
            "..\n.#\n##\n",
            "##\n#.\n..\n",
            "##\n.#\n..\n",
            ".##\n..#\n",
            "#..\n##.\n",
            "##.\n#..\n",
            "..\n#.\n##\n",
        ];
        for (orientation, text) in Orientation::all().zip(expected) {
            assert_eq!(orientation.apply(&bitmap).to_string(), text, "orientation {orientation}");
        }
    }

    #[test]
    fn test_get_matches_apply() {
        let bitmap = from_text("#.#.\n##..\n...#\n.#..");
        for orientation in Orientation::all() {
            let oriented = orientation.apply(&bitmap);
            for y in 0..oriented.height() {
                for x in 0..oriented.width() {
                    assert_eq!(oriented.get(x, y), orientation.get(&bitmap, x, y));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        assert!(matches!(
            Orientation::new(8),
            Err(JigsawError::InvalidOrientation(8))
        ));
    }
}

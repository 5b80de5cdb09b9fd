//! Searching a composed image for a sparse pixel pattern.
//!
//! A pattern is a bounding box plus the offsets that must be set; every other
//! cell in the box is ignored. The image is scanned in all 8 orientations and
//! exactly one orientation is expected to contain matches.

use rustc_hash::FxHashSet;

use crate::bitmap::Bitmap;
use crate::error::{JigsawError, Result};
use crate::symmetry::Orientation;

/// The sea monster: 15 set pixels in a 20x3 box.
pub const SEA_MONSTER: &str = concat!(
    "                  # \n",
    "#    ##    ##    ###\n",
    " #  #  #  #  #  #   ",
);

/// Offset within a pattern or position within an image, as `(x, y)`.
pub type Point = (usize, usize);

/// Cells that must be set, inside a `width` x `height` box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    width: usize,
    height: usize,
    offsets: Vec<Point>,
}

impl Pattern {
    /// Parses a pattern where `#` must be set and ` ` or `.` may be anything.
    ///
    /// Rows may have different lengths; the box is as wide as the longest.
    pub fn parse(text: &str) -> Result<Self> {
        if let Some(invalid) = text.chars().find(|&c| !matches!(c, '#' | ' ' | '.' | '\n' | '\r')) {
            return Err(JigsawError::InvalidPixel(invalid));
        }
        let pattern = Self::from_rows(text);
        if pattern.offsets.is_empty() {
            return Err(JigsawError::EmptyPattern);
        }
        Ok(pattern)
    }

    /// The built-in sea monster.
    pub fn sea_monster() -> Result<Self> {
        Self::parse(SEA_MONSTER)
    }

    fn from_rows(text: &str) -> Self {
        let mut width = 0;
        let mut height = 0;
        let mut offsets = Vec::new();
        for (y, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            width = width.max(line.chars().count());
            height = y + 1;
            offsets.extend(
                line.chars()
                    .enumerate()
                    .filter(|&(_, c)| c == '#')
                    .map(|(x, _)| (x, y)),
            );
        }
        Self {
            width,
            height,
            offsets,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of must-be-set pixels.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[Point] {
        &self.offsets
    }

    /// True when the pattern, with its top-left corner at `(left, top)`, fits
    /// inside `image` and all its set cells are set there.
    pub fn matches_at(&self, image: &Bitmap, left: usize, top: usize) -> bool {
        left + self.width <= image.width()
            && top + self.height <= image.height()
            && self
                .offsets
                .iter()
                .all(|&(dx, dy)| image.get(left + dx, top + dy))
    }

    /// Top-left positions of every match in `image`, row by row.
    pub fn find_all(&self, image: &Bitmap) -> Vec<Point> {
        if self.width > image.width() || self.height > image.height() {
            return Vec::new();
        }
        let mut positions = Vec::new();
        for top in 0..=image.height() - self.height {
            for left in 0..=image.width() - self.width {
                if self.matches_at(image, left, top) {
                    positions.push((left, top));
                }
            }
        }
        positions
    }
}

/// Where a pattern was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sighting {
    /// Orientation of the image the matches were found in; `None` if none.
    pub orientation: Option<Orientation>,
    /// Top-left positions in the oriented image.
    pub positions: Vec<Point>,
}

impl Sighting {
    /// Image pixels covered by at least one match, in oriented coordinates.
    pub fn covered(&self, pattern: &Pattern) -> FxHashSet<Point> {
        self.positions
            .iter()
            .flat_map(|&(left, top)| {
                pattern
                    .offsets()
                    .iter()
                    .map(move |&(dx, dy)| (left + dx, top + dy))
            })
            .collect()
    }

    /// Set pixels not accounted for by the matches.
    ///
    /// Each match is assumed to cover its own pixels; overlapping matches are
    /// counted twice and reported with a warning.
    pub fn roughness(&self, image: &Bitmap, pattern: &Pattern) -> usize {
        let claimed = self.positions.len() * pattern.len();
        let covered = self.covered(pattern).len();
        if covered != claimed {
            log::warn!("pattern matches overlap: {claimed} pixels claimed, {covered} distinct");
        }
        image.count_set().saturating_sub(claimed)
    }
}

/// Finds the orientation of `image` in which `pattern` occurs.
///
/// Matches in more than one orientation are reported as
/// [`JigsawError::AmbiguousPatternOrientation`]. No match at all is not an
/// error: the sighting is empty.
pub fn search(image: &Bitmap, pattern: &Pattern) -> Result<Sighting> {
    let mut found: Vec<(Orientation, Vec<Point>)> = Orientation::all()
        .map(|orientation| (orientation, pattern.find_all(&orientation.apply(image))))
        .filter(|(_, positions)| !positions.is_empty())
        .collect();

    for (orientation, positions) in &found {
        log::debug!("{} matches in orientation {orientation}", positions.len());
    }

    match found.len() {
        0 => {
            log::warn!("pattern not found in any orientation");
            Ok(Sighting {
                orientation: None,
                positions: Vec::new(),
            })
        }
        1 => {
            let (orientation, positions) = found.remove(0);
            log::info!("found {} matches in orientation {orientation}", positions.len());
            Ok(Sighting {
                orientation: Some(orientation),
                positions,
            })
        }
        _ => Err(JigsawError::AmbiguousPatternOrientation(
            found.into_iter().map(|(orientation, _)| orientation).collect(),
        )),
    }
}

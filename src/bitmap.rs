//! Dense boolean pixel grids.
//!
//! Pixels are stored row-major in a flat vector, so `(x, y)` lives at
//! `y * width + x`. Rendering uses `#` for a set pixel and `.` otherwise.

use std::fmt;

use crate::error::{JigsawError, Result};

/// A rectangular grid of on/off pixels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// Creates a bitmap with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: bool) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    /// Creates a bitmap by evaluating `pixel(x, y)` for every position.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut pixel: impl FnMut(usize, usize) -> bool,
    ) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(pixel(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Appends one row below the existing ones.
    ///
    /// The first row fixes the width; every later row must match it.
    pub fn push_row(&mut self, row: &[bool]) -> Result<()> {
        if self.height == 0 {
            self.width = row.len();
        } else if row.len() != self.width {
            return Err(JigsawError::RowWidth {
                row: self.height,
                expected: self.width,
                found: row.len(),
            });
        }
        self.pixels.extend_from_slice(row);
        self.height += 1;
        Ok(())
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// Panics if the position lies outside the bitmap.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.pixels[y * self.width + x]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, value: bool) {
        self.pixels[y * self.width + x] = value;
    }

    /// Number of set pixels.
    pub fn count_set(&self) -> usize {
        self.pixels.iter().filter(|&&pixel| pixel).count()
    }

    /// Returns a copy with the outermost ring of pixels removed.
    pub fn interior(&self) -> Self {
        let width = self.width.saturating_sub(2);
        let height = self.height.saturating_sub(2);
        Self::from_fn(width, height, |x, y| self.get(x + 1, y + 1))
    }

    /// Copies `source` into this bitmap with its top-left corner at `(left, top)`.
    ///
    /// Pixels falling outside this bitmap are dropped.
    pub fn blit(&mut self, source: &Self, left: usize, top: usize) {
        for y in 0..source.height {
            let target_y = top + y;
            if target_y >= self.height {
                break;
            }
            for x in 0..source.width {
                let target_x = left + x;
                if target_x >= self.width {
                    break;
                }
                self.set(target_x, target_y, source.get(x, y));
            }
        }
    }
}

impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.pixels.chunks(self.width.max(1)) {
            for &pixel in row {
                f.write_str(if pixel { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses `#`/`.` text into a bitmap, one line per row.
///
/// Intended for fixtures; trailing blank lines are ignored.
#[cfg(test)]
pub(crate) fn from_text(text: &str) -> Bitmap {
    let mut bitmap = Bitmap::default();
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let row: Vec<bool> = line.trim().chars().map(|c| c == '#').collect();
        bitmap
            .push_row(&row)
            .expect("fixture rows must have equal width");
    }
    bitmap
}

//! Puzzle input: the bundled sample and memory-mapped input files.

use std::fs::File;
use std::path::Path;

use memmap::Mmap;

use crate::error::{JigsawError, Result};
use crate::Answers;

/// Nine 10x10 tiles forming a 3x3 grid.
pub const SAMPLE_INPUT: &str = r"Tile 2311:
..##.#..#.
##..#.....
#...##..#.
####.#...#
##.##.###.
##...#.###
.#.#.#..##
..#....#..
###...#.#.
..###..###

Tile 1951:
#.##...##.
#.####...#
.....#..##
#...######
.##.#....#
.###.#####
###.##.##.
.###....#.
..#.#..#.#
#...##.#..

Tile 1171:
####...##.
#..##.#..#
##.#..#.#.
.###.####.
..###.####
.##....##.
.#...####.
#.##.####.
####..#...
.....##...

Tile 1427:
###.##.#..
.#..#.##..
.#.##.#..#
#.#.#.##.#
....#...##
...##..##.
...#.#####
.#.####.#.
..#..###.#
..##.#..#.

Tile 1489:
##.#.#....
..##...#..
.##..##...
..#...#...
#####...#.
#..#.#.#.#
...#.#.#..
##.#...##.
..##.##.##
###.##.#..

Tile 2473:
#....####.
#..#.##...
#.##..#...
######.#.#
.#...#.#.#
.#########
.###.#..#.
########.#
##...##.#.
..###.#.#.

Tile 2971:
..#.#....#
#...###...
#.#.###...
##.##..#..
.#####..##
.#..####.#
#..#.#..#.
..####.###
..#.#.###.
...#.#.#.#

Tile 2729:
...#.#.#.#
####.#....
..#.#.....
....#..#.#
.##..##.#.
.#.####...
####.#.#..
##.####...
##..#.##..
#.##...##.

Tile 3079:
#.#.#####.
.#..######
..#.......
######....
####.#..#.
.#...#.##.
#.#####.##
..#.###...
..#.......
..#.###...
";

/// Product of the sample's corner tile ids.
pub const SAMPLE_CORNER_PRODUCT: u64 = 20_899_048_083_289;

/// Roughness of the sample: 303 set pixels less two 15-pixel monsters.
pub const SAMPLE_ROUGHNESS: usize = 273;

/// Maps the file at `path` into memory and passes its text to `f`.
///
/// The file must be UTF-8. Empty files are handed over as `""` without being
/// mapped.
pub fn with_mapped_file<T>(path: &Path, f: impl FnOnce(&str) -> Result<T>) -> Result<T> {
    let io_error = |source: std::io::Error| JigsawError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    if file.metadata().map_err(io_error)?.len() == 0 {
        return f("");
    }

    // SAFETY: the map is read-only and dropped before returning. The file must
    // not be truncated or rewritten by another process while it is mapped.
    let map = unsafe { Mmap::map(&file) }.map_err(io_error)?;
    let text = std::str::from_utf8(&map).map_err(|source| JigsawError::Utf8 {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("mapped {} bytes from '{}'", map.len(), path.display());
    f(text)
}

/// Checks answers computed from [`SAMPLE_INPUT`] against the known results.
pub fn verify_sample(answers: &Answers) -> Result<()> {
    if answers.corner_product != SAMPLE_CORNER_PRODUCT {
        return Err(JigsawError::SelfTest {
            part: "corner product",
            actual: answers.corner_product,
            expected: SAMPLE_CORNER_PRODUCT,
        });
    }
    if answers.roughness != SAMPLE_ROUGHNESS {
        return Err(JigsawError::SelfTest {
            part: "roughness",
            actual: answers.roughness as u64,
            expected: SAMPLE_ROUGHNESS as u64,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_mapped_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_INPUT.as_bytes()).unwrap();
        file.flush().unwrap();

        let answers = with_mapped_file(file.path(), crate::solve).unwrap();
        verify_sample(&answers).unwrap();
    }

    #[test]
    fn test_empty_file_is_not_mapped() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let length = with_mapped_file(file.path(), |text| Ok(text.len())).unwrap();
        assert_eq!(length, 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let error = with_mapped_file(&path, |_| Ok(())).unwrap_err();
        assert!(matches!(error, JigsawError::Io { .. }));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'T', 0xff, 0xfe]).unwrap();
        file.flush().unwrap();
        let error = with_mapped_file(file.path(), |_| Ok(())).unwrap_err();
        assert!(matches!(error, JigsawError::Utf8 { .. }));
    }

    #[test]
    fn test_verify_sample_reports_mismatch() {
        let answers = Answers {
            corner_product: SAMPLE_CORNER_PRODUCT,
            roughness: 0,
        };
        let error = verify_sample(&answers).unwrap_err();
        assert_eq!(error.to_string(), "roughness is 0, expected 273");
    }
}

//! Stitching a solved layout into a single image.
//!
//! The walk starts at the keystone and follows `right` links to build a row,
//! then the keystone column's `down` links to start the next row. Each tile
//! gives up its outer ring of pixels; the interiors are laid edge to edge.

use crate::bitmap::Bitmap;
use crate::error::{JigsawError, Result};
use crate::matcher::Layout;

/// Arena indices of a layout, one vector per row, top to bottom.
pub type Arrangement = Vec<Vec<usize>>;

/// Walks the layout from the keystone and checks it is a full rectangle.
///
/// Every row must be as long as the first, every tile must sit directly below
/// the tile in the same column of the previous row, and every tile must be
/// reached exactly once.
pub fn arrange(layout: &Layout) -> Result<Arrangement> {
    let keystone = layout.keystone()?;
    let mut visited = vec![false; layout.len()];
    let mut rows: Arrangement = Vec::new();

    let mut row_start = Some(keystone);
    while let Some(start) = row_start {
        let mut row = Vec::new();
        let mut cursor = Some(start);
        while let Some(index) = cursor {
            if std::mem::replace(&mut visited[index], true) {
                return Err(JigsawError::MalformedGrid(format!(
                    "tile {} is reached twice",
                    layout.tile(index).id()
                )));
            }
            row.push(index);
            cursor = layout.links(index).right;
        }

        if let Some(previous) = rows.last() {
            if row.len() != previous.len() {
                return Err(JigsawError::MalformedGrid(format!(
                    "row {} has {} tiles, expected {}",
                    rows.len(),
                    row.len(),
                    previous.len()
                )));
            }
            for (&above, &below) in previous.iter().zip(&row) {
                if layout.links(above).down != Some(below) {
                    return Err(JigsawError::MalformedGrid(format!(
                        "tile {} is not below tile {}",
                        layout.tile(below).id(),
                        layout.tile(above).id()
                    )));
                }
            }
        }

        rows.push(row);
        row_start = layout.links(start).down;
    }

    if let Some(missed) = visited.iter().position(|&seen| !seen) {
        return Err(JigsawError::MalformedGrid(format!(
            "tile {} is not reachable from the top-left corner",
            layout.tile(missed).id()
        )));
    }

    Ok(rows)
}

/// Builds the full image from the interiors of every tile.
///
/// The result is `columns * (size - 2)` wide and `rows * (size - 2)` high.
pub fn compose(layout: &Layout) -> Result<Bitmap> {
    let rows = arrange(layout)?;
    let inner = layout.tile_size().saturating_sub(2);
    let columns = rows.first().map_or(0, Vec::len);

    let mut image = Bitmap::filled(columns * inner, rows.len() * inner, false);
    for (row_index, row) in rows.iter().enumerate() {
        for (column_index, &index) in row.iter().enumerate() {
            let interior = layout.oriented(index).interior();
            image.blit(&interior, column_index * inner, row_index * inner);
        }
    }

    log::info!(
        "composed {}x{} image from {columns}x{} tiles",
        image.width(),
        image.height(),
        rows.len()
    );
    Ok(image)
}

/// Formats the tile ids of a layout as a grid, one row per line.
pub fn format_layout(layout: &Layout) -> Result<String> {
    let rows = arrange(layout)?;
    let width = layout
        .tiles()
        .iter()
        .map(|tile| tile.id().to_string().len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for row in &rows {
        for (column_index, &index) in row.iter().enumerate() {
            if column_index > 0 {
                output.push(' ');
            }
            output.push_str(&format!("{:>width$}", layout.tile(index).id()));
        }
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SAMPLE_INPUT;
    use crate::tile::parse_tiles;

    fn layout_without(id: u64) -> Layout {
        let tiles = parse_tiles(SAMPLE_INPUT)
            .unwrap()
            .into_iter()
            .filter(|tile| tile.id() != id)
            .collect();
        Layout::assemble(tiles).unwrap()
    }

    #[test]
    fn test_sample_dimensions() {
        let layout = Layout::assemble(parse_tiles(SAMPLE_INPUT).unwrap()).unwrap();
        let image = compose(&layout).unwrap();
        assert_eq!((image.width(), image.height()), (24, 24));
        assert_eq!(image.count_set(), 303);
    }

    #[test]
    fn test_sample_arrangement() {
        let layout = Layout::assemble(parse_tiles(SAMPLE_INPUT).unwrap()).unwrap();
        assert_eq!(
            format_layout(&layout).unwrap(),
            "2971 1489 1171\n2729 1427 2473\n1951 2311 3079\n"
        );
    }

    #[test]
    fn test_layout_pads_short_ids() {
        let input = SAMPLE_INPUT.replace("Tile 2971:", "Tile 7:");
        let layout = Layout::assemble(parse_tiles(&input).unwrap()).unwrap();
        assert_eq!(
            format_layout(&layout).unwrap(),
            "   7 1489 1171\n2729 1427 2473\n1951 2311 3079\n"
        );
    }

    #[test]
    fn test_missing_corner_breaks_rectangle() {
        let layout = layout_without(3079);
        assert!(matches!(
            compose(&layout),
            Err(JigsawError::MalformedGrid(_))
        ));
        assert!(matches!(
            layout.corner_product(),
            Err(JigsawError::MalformedGrid(_))
        ));
    }

    #[test]
    fn test_missing_centre_breaks_rectangle() {
        let layout = layout_without(1427);
        assert!(matches!(
            arrange(&layout),
            Err(JigsawError::MalformedGrid(_))
        ));
    }
}

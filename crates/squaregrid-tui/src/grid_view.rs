//! Terminal placement of grid tiles.
//!
//! The core engine works in abstract layout units. Here one unit is one terminal
//! column, and heights are divided by [`CELL_ASPECT`] so square tiles look square.
//! All rectangles are in content space: y = 0 is the top of the scrollable grid.

use squaregrid_core::grid::{
    line_count, GridLayoutEngine, LayoutConfig, Row, TileGeometry, TileId,
};

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// A tile placed in content space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub id: TileId,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Part of a double row
    pub sub: bool,
}

impl TileRect {
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

/// Cell geometry of the grid for one container width
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub geometry: TileGeometry,
    pub tile_height: u16,
    pub gap_y: u16,
    pub line_count: usize,
}

impl GridView {
    pub fn new(
        engine: &GridLayoutEngine,
        layout: &LayoutConfig,
        row_count: usize,
        width: u16,
    ) -> squaregrid_core::Result<Self> {
        let geometry = engine.geometry(width as f64, layout)?;
        Ok(Self {
            tile_height: to_cells(geometry.tile / CELL_ASPECT).max(1),
            gap_y: to_cells(geometry.spacing / CELL_ASPECT),
            line_count: line_count(row_count, geometry.columns),
            geometry,
        })
    }

    pub fn line_height(&self) -> u16 {
        self.tile_height.saturating_add(self.gap_y)
    }

    /// Top edge of a grid line
    pub fn line_top(&self, line: usize) -> u16 {
        clamp_u16(self.gap_y as u64 + line as u64 * self.line_height() as u64)
    }

    /// Height of the whole grid including the trailing gap
    pub fn content_height(&self) -> u16 {
        self.line_top(self.line_count)
    }

    pub fn max_scroll(&self, viewport: u16) -> u16 {
        self.content_height().saturating_sub(viewport)
    }

    /// Scroll offset that puts the middle of `line` in the middle of the viewport
    pub fn center_offset(&self, line: usize, viewport: u16) -> u16 {
        let middle = self.line_top(line).saturating_add(self.tile_height / 2);
        middle
            .saturating_sub(viewport / 2)
            .min(self.max_scroll(viewport))
    }

    /// Smallest change to `current` that makes `rect` fully visible
    pub fn reveal_offset(&self, rect: &TileRect, current: u16, viewport: u16) -> u16 {
        let offset = if rect.y < current {
            rect.y.saturating_sub(self.gap_y)
        } else if rect.bottom() > current.saturating_add(viewport) {
            rect.bottom()
                .saturating_add(self.gap_y)
                .saturating_sub(viewport)
        } else {
            current
        };
        offset.min(self.max_scroll(viewport))
    }

    /// Place every tile of `rows`
    pub fn placements(&self, rows: &[Row]) -> Vec<TileRect> {
        let columns = self.geometry.columns.max(1);
        let tile = self.geometry.tile;
        let spacing = self.geometry.spacing;
        let sub = self.geometry.sub_tile;
        let sub_height = sub.height / CELL_ASPECT;

        let mut rects = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let column = index % columns;
            let cell_x = spacing + column as f64 * (tile + spacing);
            let cell_y = self.line_top(index / columns);

            match row {
                Row::Single { tile: item } => {
                    let (x, width) = span(cell_x, tile);
                    rects.push(TileRect {
                        id: item.id,
                        x,
                        y: cell_y,
                        width,
                        height: self.tile_height,
                        sub: false,
                    });
                }
                Row::Double { .. } => {
                    for (line, group) in row.sub_rows().enumerate() {
                        let top = to_cells(line as f64 * sub_height);
                        let bottom = to_cells((line + 1) as f64 * sub_height);
                        for (slot, sub_tile) in group.iter().enumerate() {
                            let left = cell_x + slot as f64 * (sub.width + spacing);
                            let (x, width) = span(left, sub.width);
                            rects.push(TileRect {
                                id: sub_tile.id,
                                x,
                                y: cell_y.saturating_add(top),
                                width,
                                height: bottom.saturating_sub(top).max(1),
                                sub: true,
                            });
                        }
                    }
                }
            }
        }
        rects
    }
}

/// Rounded start and length of a horizontal run
fn span(start: f64, len: f64) -> (u16, u16) {
    let x0 = to_cells(start);
    let x1 = to_cells(start + len);
    (x0, x1.saturating_sub(x0).max(1))
}

fn to_cells(value: f64) -> u16 {
    if value <= 0.0 {
        0
    } else {
        clamp_u16(value.round() as u64)
    }
}

fn clamp_u16(value: u64) -> u16 {
    value.min(u16::MAX as u64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use squaregrid_core::grid::{GridItem, RowMode};

    fn view(engine: &GridLayoutEngine, columns: usize, rows: usize, width: u16) -> GridView {
        let layout = LayoutConfig::new(columns, 1.0).unwrap();
        GridView::new(engine, &layout, rows, width).unwrap()
    }

    #[test]
    fn test_single_column_geometry() {
        let engine = GridLayoutEngine::default();
        let view = view(&engine, 1, 15, 80);

        assert_eq!(view.tile_height, 39);
        assert_eq!(view.gap_y, 1);
        assert_eq!(view.line_height(), 40);
        assert_eq!(view.content_height(), 1 + 15 * 40);
        assert_eq!(view.max_scroll(20), 601 - 20);
    }

    #[test]
    fn test_too_narrow_is_an_error() {
        let engine = GridLayoutEngine::default();
        let layout = LayoutConfig::new(5, 1.0).unwrap();
        assert!(GridView::new(&engine, &layout, 10, 6).is_err());
    }

    #[test]
    fn test_single_tiles_are_placed_per_column() {
        let engine = GridLayoutEngine::default();
        let rows = engine
            .compute_rows(&(1..=4).map(GridItem::single).collect::<Vec<_>>())
            .unwrap();
        // tile = (31 - 4) / 3 = 9
        let view = view(&engine, 3, rows.len(), 31);
        let rects = view.placements(&rows);

        let xs: Vec<u16> = rects.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![1, 11, 21, 1]);
        assert!(rects.iter().all(|r| r.width == 9 && !r.sub));
        assert_eq!(rects[3].y, view.line_top(1));
    }

    #[test]
    fn test_block_sub_tiles_fill_the_cell() {
        let engine = GridLayoutEngine::new(RowMode::Block);
        let rows = engine.compute_rows(&[GridItem::double(10)]).unwrap();
        let view = view(&engine, 1, rows.len(), 80);
        let rects = view.placements(&rows);

        let ids: Vec<TileId> = rects.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13]);
        assert_eq!(rects[0].y, rects[1].y);
        assert_eq!(rects[2].y, rects[0].bottom());
        assert_eq!(rects[0].height + rects[2].height, view.tile_height);
        assert!(rects[1].x > rects[0].x + rects[0].width);
    }

    #[test]
    fn test_center_and_reveal() {
        let engine = GridLayoutEngine::default();
        let view = view(&engine, 1, 15, 80);

        assert_eq!(view.center_offset(0, 20), 10);
        // Last line is clamped to the end of the content
        assert_eq!(view.center_offset(14, 100), view.max_scroll(100));

        let rect = TileRect {
            id: 2,
            x: 1,
            y: 41,
            width: 78,
            height: 39,
            sub: false,
        };
        assert_eq!(view.reveal_offset(&rect, 0, 50), 31);
        assert_eq!(view.reveal_offset(&rect, 60, 50), 40);
        assert_eq!(view.reveal_offset(&rect, 40, 80), 40);
    }
}

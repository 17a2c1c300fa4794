use std::collections::HashSet;

use tracing::debug;

use super::models::{
    GridItem, LayoutConfig, Row, RowMode, SubTile, TileGeometry, TileId, TilePosition, TileSize,
};
use crate::{Error, Result};

/// Turns a flat item list into display rows and sizes tiles for a container width.
///
/// The engine only holds the sub-tile arrangement; everything else is passed in,
/// so `compute_rows` stays a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridLayoutEngine {
    row_mode: RowMode,
}

impl GridLayoutEngine {
    pub fn new(row_mode: RowMode) -> Self {
        Self { row_mode }
    }

    pub fn row_mode(&self) -> RowMode {
        self.row_mode
    }

    /// Build one row per item, preserving order.
    ///
    /// Fails when an item has an unsupported image count, an id below 1, or an id
    /// already used by an earlier item. Sub-tile ids of a double item may coincide
    /// with the ids of later items.
    pub fn compute_rows(&self, items: &[GridItem]) -> Result<Vec<Row>> {
        let mut seen: HashSet<TileId> = HashSet::with_capacity(items.len());
        let mut rows = Vec::with_capacity(items.len());

        for item in items {
            if item.id < 1 {
                return Err(Error::invalid_item(item.id, "item ids start at 1"));
            }
            if !seen.insert(item.id) {
                return Err(Error::invalid_item(item.id, "duplicate item id"));
            }
            rows.push(self.build_row(item)?);
        }

        debug!(
            "Computed {} rows ({} mode)",
            rows.len(),
            self.row_mode.label()
        );
        Ok(rows)
    }

    fn build_row(&self, item: &GridItem) -> Result<Row> {
        match item.image_count {
            1 => Ok(Row::Single { tile: *item }),
            2 => {
                let count = item.image_count * self.row_mode.tiles_per_image();
                let tiles = (0..count as usize)
                    .map(|sub_index| {
                        item.id
                            .checked_add(sub_index as TileId)
                            .map(|id| SubTile { id, sub_index })
                            .ok_or_else(|| Error::invalid_item(item.id, "tile id overflows"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Row::Double { item: *item, tiles })
            }
            other => Err(Error::invalid_item(
                item.id,
                format!("unsupported image count {other}, expected 1 or 2"),
            )),
        }
    }

    /// Edge length of a square tile.
    ///
    /// Spacing is symmetric: one gap before the first column, one between each pair
    /// of columns and one after the last, `columns + 1` gaps in total.
    pub fn tile_size(container_width: f64, columns: usize, spacing: f64) -> Result<f64> {
        if columns == 0 {
            return Err(Error::InvalidLayout("columns must be at least 1".to_string()));
        }
        if !spacing.is_finite() || spacing < 0.0 {
            return Err(Error::InvalidLayout(format!(
                "spacing must be a non-negative number, got {spacing}"
            )));
        }
        if !container_width.is_finite() {
            return Err(Error::InvalidLayout(format!(
                "container width must be finite, got {container_width}"
            )));
        }

        let available = container_width - spacing * (columns as f64 + 1.0);
        let size = available / columns as f64;
        if size <= 0.0 {
            return Err(Error::InvalidLayout(format!(
                "width {container_width} leaves no room for {columns} columns with spacing {spacing}"
            )));
        }
        Ok(size)
    }

    /// Size of one tile of a double row
    pub fn sub_tile_size(tile_size: f64, spacing: f64, mode: RowMode) -> TileSize {
        let width = (tile_size - spacing) / 2.0;
        let height = match mode {
            RowMode::Strip => tile_size,
            RowMode::Block => tile_size / 2.0,
        };
        TileSize { width, height }
    }

    /// All sizes needed to draw the grid at `container_width`
    pub fn geometry(&self, container_width: f64, config: &LayoutConfig) -> Result<TileGeometry> {
        let tile = Self::tile_size(container_width, config.columns(), config.spacing())?;
        Ok(TileGeometry {
            tile,
            sub_tile: Self::sub_tile_size(tile, config.spacing(), self.row_mode),
            spacing: config.spacing(),
            columns: config.columns(),
        })
    }
}

/// Flow rows into visual grid lines of `columns` cells each
pub fn grid_lines(rows: &[Row], columns: usize) -> Result<std::slice::Chunks<'_, Row>> {
    if columns == 0 {
        return Err(Error::InvalidLayout("columns must be at least 1".to_string()));
    }
    Ok(rows.chunks(columns))
}

/// Number of grid lines needed for `row_count` rows
pub fn line_count(row_count: usize, columns: usize) -> usize {
    if columns == 0 {
        0
    } else {
        row_count.div_ceil(columns)
    }
}

/// Find the first tile (single or sub-tile) carrying `id` in the flowed grid
pub fn locate(rows: &[Row], columns: usize, id: TileId) -> Option<TilePosition> {
    if columns == 0 {
        return None;
    }

    rows.iter().enumerate().find_map(|(index, row)| {
        let sub_index = match row {
            Row::Single { tile } if tile.id == id => None,
            Row::Single { .. } => return None,
            Row::Double { tiles, .. } => Some(tiles.iter().find(|t| t.id == id)?.sub_index),
        };
        Some(TilePosition {
            line: index / columns,
            column: index % columns,
            row: index,
            sub_index,
        })
    })
}

/// Every tile id in display order
pub fn tile_ids(rows: &[Row]) -> Vec<TileId> {
    rows.iter().flat_map(Row::tile_ids).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singles(ids: std::ops::RangeInclusive<TileId>) -> Vec<GridItem> {
        ids.map(GridItem::single).collect()
    }

    #[test]
    fn test_one_row_per_item_in_order() {
        let items = vec![
            GridItem::single(1),
            GridItem::double(2),
            GridItem::single(4),
            GridItem::single(5),
        ];
        let rows = GridLayoutEngine::default().compute_rows(&items).unwrap();

        assert_eq!(rows.len(), items.len());
        let ids: Vec<TileId> = rows.iter().map(Row::item_id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let rows = GridLayoutEngine::default().compute_rows(&[]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_single_item_has_one_tile() {
        let rows = GridLayoutEngine::default()
            .compute_rows(&[GridItem::single(7)])
            .unwrap();
        assert_eq!(
            rows[0],
            Row::Single {
                tile: GridItem::single(7)
            }
        );
        assert_eq!(rows[0].tile_ids(), vec![7]);
        assert_eq!(rows[0].sub_rows().count(), 0);
    }

    #[test]
    fn test_double_item_strip_mode() {
        let rows = GridLayoutEngine::new(RowMode::Strip)
            .compute_rows(&[GridItem::double(10)])
            .unwrap();

        assert_eq!(rows[0].tile_ids(), vec![10, 11]);
        let sub_rows: Vec<Vec<TileId>> = rows[0]
            .sub_rows()
            .map(|r| r.iter().map(|t| t.id).collect())
            .collect();
        assert_eq!(sub_rows, vec![vec![10, 11]]);
    }

    #[test]
    fn test_double_item_block_mode() {
        let rows = GridLayoutEngine::new(RowMode::Block)
            .compute_rows(&[GridItem::double(10)])
            .unwrap();

        assert_eq!(rows.len(), 1);
        let sub_rows: Vec<Vec<TileId>> = rows[0]
            .sub_rows()
            .map(|r| r.iter().map(|t| t.id).collect())
            .collect();
        assert_eq!(sub_rows, vec![vec![10, 11], vec![12, 13]]);

        if let Row::Double { tiles, .. } = &rows[0] {
            let indices: Vec<usize> = tiles.iter().map(|t| t.sub_index).collect();
            assert_eq!(indices, vec![0, 1, 2, 3]);
        } else {
            panic!("expected a double row");
        }
    }

    #[test]
    fn test_unsupported_image_count_is_rejected() {
        for count in [0, 3] {
            let err = GridLayoutEngine::default()
                .compute_rows(&[GridItem::single(1), GridItem::new(2, count)])
                .unwrap_err();
            assert!(matches!(err, Error::InvalidItem { id: 2, .. }));
        }
    }

    #[test]
    fn test_non_positive_id_is_rejected() {
        let err = GridLayoutEngine::default()
            .compute_rows(&[GridItem::single(0)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidItem { id: 0, .. }));
    }

    #[test]
    fn test_duplicate_item_ids_are_rejected() {
        let err = GridLayoutEngine::default()
            .compute_rows(&[GridItem::single(3), GridItem::single(3)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidItem { id: 3, .. }));
    }

    #[test]
    fn test_sub_tile_ids_may_match_later_items() {
        let items = [
            GridItem::double(1),
            GridItem::single(2),
            GridItem::single(3),
        ];
        for mode in [RowMode::Strip, RowMode::Block] {
            let rows = GridLayoutEngine::new(mode).compute_rows(&items).unwrap();
            assert_eq!(rows.len(), 3);
            let ids: Vec<TileId> = rows.iter().map(Row::item_id).collect();
            assert_eq!(ids, vec![1, 2, 3]);
        }

        let rows = GridLayoutEngine::new(RowMode::Strip)
            .compute_rows(&items)
            .unwrap();
        assert_eq!(tile_ids(&rows), vec![1, 2, 2, 3]);
        // The sub-tile comes first in display order
        assert_eq!(
            locate(&rows, 1, 2),
            Some(TilePosition {
                line: 0,
                column: 0,
                row: 0,
                sub_index: Some(1),
            })
        );
    }

    #[test]
    fn test_tile_size_formula() {
        let size = GridLayoutEngine::tile_size(300.0, 3, 5.0).unwrap();
        assert!((size - 280.0 / 3.0).abs() < 1e-9);

        let size = GridLayoutEngine::tile_size(100.0, 5, 10.0).unwrap();
        assert!((size - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_tile_size_rejects_bad_layouts() {
        assert!(matches!(
            GridLayoutEngine::tile_size(50.0, 5, 10.0),
            Err(Error::InvalidLayout(_))
        ));
        // Exactly consumed by spacing
        assert!(matches!(
            GridLayoutEngine::tile_size(60.0, 5, 10.0),
            Err(Error::InvalidLayout(_))
        ));
        assert!(matches!(
            GridLayoutEngine::tile_size(300.0, 0, 5.0),
            Err(Error::InvalidLayout(_))
        ));
        assert!(matches!(
            GridLayoutEngine::tile_size(300.0, 3, -1.0),
            Err(Error::InvalidLayout(_))
        ));
        assert!(matches!(
            GridLayoutEngine::tile_size(f64::NAN, 3, 1.0),
            Err(Error::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_sub_tile_sizes_per_mode() {
        let strip = GridLayoutEngine::sub_tile_size(100.0, 4.0, RowMode::Strip);
        assert_eq!(
            strip,
            TileSize {
                width: 48.0,
                height: 100.0,
            }
        );

        let block = GridLayoutEngine::sub_tile_size(100.0, 4.0, RowMode::Block);
        assert_eq!(
            block,
            TileSize {
                width: 48.0,
                height: 50.0,
            }
        );
    }

    #[test]
    fn test_single_column_scenario() {
        let engine = GridLayoutEngine::default();
        let rows = engine.compute_rows(&singles(1..=5)).unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| matches!(r, Row::Single { .. })));

        let config = LayoutConfig::new(1, 5.0).unwrap();
        let geometry = engine.geometry(390.0, &config).unwrap();
        assert!((geometry.tile - (390.0 - 2.0 * 5.0)).abs() < 1e-9);
        assert_eq!(grid_lines(&rows, 1).unwrap().count(), 5);
    }

    #[test]
    fn test_grid_lines_and_locate() {
        let rows = GridLayoutEngine::new(RowMode::Block)
            .compute_rows(&[
                GridItem::single(1),
                GridItem::single(2),
                GridItem::double(3),
                GridItem::single(7),
            ])
            .unwrap();

        let lines: Vec<usize> = grid_lines(&rows, 3).unwrap().map(<[Row]>::len).collect();
        assert_eq!(lines, vec![3, 1]);
        assert_eq!(line_count(rows.len(), 3), 2);
        assert!(grid_lines(&rows, 0).is_err());

        assert_eq!(
            locate(&rows, 3, 5),
            Some(TilePosition {
                line: 0,
                column: 2,
                row: 2,
                sub_index: Some(2),
            })
        );
        assert_eq!(
            locate(&rows, 3, 7),
            Some(TilePosition {
                line: 1,
                column: 0,
                row: 3,
                sub_index: None,
            })
        );
        assert_eq!(locate(&rows, 3, 99), None);
        assert_eq!(locate(&rows, 0, 1), None);

        assert_eq!(tile_ids(&rows), vec![1, 2, 3, 4, 5, 6, 7]);
    }
}

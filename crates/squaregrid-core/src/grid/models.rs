use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier of a single tile (and of the item that starts it)
pub type TileId = i64;

/// Smallest and largest column counts offered by the column picker
pub const MIN_COLUMNS: usize = 1;
pub const MAX_COLUMNS: usize = 5;

/// One logical row unit supplied by an item source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridItem {
    pub id: TileId,
    /// 1 renders one full-size tile, 2 renders a group of sub-tiles
    #[serde(default = "default_image_count")]
    pub image_count: u32,
}

fn default_image_count() -> u32 {
    1
}

impl GridItem {
    pub fn new(id: TileId, image_count: u32) -> Self {
        Self { id, image_count }
    }

    pub fn single(id: TileId) -> Self {
        Self::new(id, 1)
    }

    pub fn double(id: TileId) -> Self {
        Self::new(id, 2)
    }
}

/// How the sub-tiles of a double item are arranged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowMode {
    /// Two full-height tiles side by side
    #[default]
    Strip,
    /// Four half-height tiles in a 2x2 block
    Block,
}

impl RowMode {
    /// Number of tiles generated per image
    pub fn tiles_per_image(self) -> u32 {
        match self {
            RowMode::Strip => 1,
            RowMode::Block => 2,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            RowMode::Strip => RowMode::Block,
            RowMode::Block => RowMode::Strip,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RowMode::Strip => "strip",
            RowMode::Block => "block",
        }
    }
}

/// A tile inside a double row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubTile {
    pub id: TileId,
    pub sub_index: usize,
}

/// Display row produced for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Row {
    Single { tile: GridItem },
    Double { item: GridItem, tiles: Vec<SubTile> },
}

impl Row {
    /// Id of the item this row was built from
    pub fn item_id(&self) -> TileId {
        match self {
            Row::Single { tile } => tile.id,
            Row::Double { item, .. } => item.id,
        }
    }

    /// All tile ids of the row in display order
    pub fn tile_ids(&self) -> Vec<TileId> {
        match self {
            Row::Single { tile } => vec![tile.id],
            Row::Double { tiles, .. } => tiles.iter().map(|t| t.id).collect(),
        }
    }

    /// Horizontal groups of sub-tiles, two per group. A single row yields nothing.
    pub fn sub_rows(&self) -> std::slice::Chunks<'_, SubTile> {
        let tiles: &[SubTile] = match self {
            Row::Single { .. } => &[],
            Row::Double { tiles, .. } => tiles,
        };
        tiles.chunks(2)
    }
}

/// User-adjustable layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    columns: usize,
    spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: MIN_COLUMNS,
            spacing: 5.0,
        }
    }
}

impl LayoutConfig {
    pub fn new(columns: usize, spacing: f64) -> Result<Self> {
        validate_columns(columns)?;
        if !spacing.is_finite() || spacing < 0.0 {
            return Err(Error::InvalidLayout(format!(
                "spacing must be a non-negative number, got {spacing}"
            )));
        }
        Ok(Self { columns, spacing })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn set_columns(&mut self, columns: usize) -> Result<()> {
        validate_columns(columns)?;
        self.columns = columns;
        Ok(())
    }
}

fn validate_columns(columns: usize) -> Result<()> {
    if (MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
        Ok(())
    } else {
        Err(Error::InvalidLayout(format!(
            "columns must be between {MIN_COLUMNS} and {MAX_COLUMNS}, got {columns}"
        )))
    }
}

/// Width and height of a tile, in layout units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileSize {
    pub width: f64,
    pub height: f64,
}

/// Sizes computed for one layout pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileGeometry {
    /// Edge of a full (square) tile
    pub tile: f64,
    /// Size of one sub-tile of a double row
    pub sub_tile: TileSize,
    pub spacing: f64,
    pub columns: usize,
}

/// Where a tile sits in the flowed grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePosition {
    /// Index of the visual grid line
    pub line: usize,
    /// Cell index inside the line
    pub column: usize,
    /// Index of the row (item) in display order
    pub row: usize,
    /// Position within a double row, `None` for single rows
    pub sub_index: Option<usize>,
}

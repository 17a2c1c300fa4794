mod layout;
mod models;
mod source;

pub use layout::{grid_lines, line_count, locate, tile_ids, GridLayoutEngine};
pub use models::{
    GridItem, LayoutConfig, Row, RowMode, SubTile, TileGeometry, TileId, TilePosition, TileSize,
    MAX_COLUMNS, MIN_COLUMNS,
};
pub use source::{ItemSource, StaticItemSource};

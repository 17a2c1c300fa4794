use super::models::{GridItem, TileId};

/// Supplies the items shown by the grid
pub trait ItemSource {
    fn items(&self) -> Vec<GridItem>;
}

/// Item source backed by a fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticItemSource {
    items: Vec<GridItem>,
}

impl StaticItemSource {
    pub fn new(items: Vec<GridItem>) -> Self {
        Self { items }
    }

    /// `count` single-image items numbered from 1
    pub fn sequential(count: usize) -> Self {
        Self {
            items: (1..=count as TileId).map(GridItem::single).collect(),
        }
    }
}

impl ItemSource for StaticItemSource {
    fn items(&self) -> Vec<GridItem> {
        self.items.clone()
    }
}
